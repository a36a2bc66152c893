//! Live round-trips against the Ensembl REST API.
//!
//! Ignored by default; run with `cargo test -- --ignored` when network
//! access to rest.ensembl.org is acceptable.

use varanno_ensembl::{EnsemblClient, GeneQuery, VariantQuery};

fn gene_query(symbol: &str) -> GeneQuery {
    GeneQuery {
        symbol: symbol.to_string(),
        species: "human".to_string(),
        include_transcripts: false,
        include_phenotypes: false,
    }
}

#[test]
#[ignore = "Avoid Ensembl dependency in CI"]
fn test_annotate_brca1() {
    let client = EnsemblClient::builder().finish();
    let record = client.annotate_gene(&gene_query("BRCA1")).unwrap();

    assert_eq!(record.symbol, "BRCA1");
    assert_eq!(record.id, "ENSG00000012048");
    assert_eq!(record.biotype.as_deref(), Some("protein_coding"));
}

#[test]
#[ignore = "Avoid Ensembl dependency in CI"]
fn test_annotate_unknown_gene_fails() {
    let client = EnsemblClient::builder().finish();
    let result = client.annotate_gene(&gene_query("NOT_A_REAL_GENE_SYMBOL"));
    // Ensembl reports unknown symbols with HTTP 400, not 404.
    assert!(matches!(
        result,
        Err(varanno_core::AnnotError::BadRequest { .. } | varanno_core::AnnotError::NotFound(_))
    ));
}

#[test]
#[ignore = "Avoid Ensembl dependency in CI"]
fn test_annotate_variant() {
    let client = EnsemblClient::builder().finish();
    let record = client
        .annotate_variant(&VariantQuery {
            locus: "chr17:43057063:G:A".parse().unwrap(),
            assembly: Default::default(),
            include_populations: false,
        })
        .unwrap();

    assert_eq!(record.reference, "G");
    assert_eq!(record.alternate, "A");
    assert!(record.effect.is_some());
}
