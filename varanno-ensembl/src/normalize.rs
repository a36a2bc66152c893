//! Extraction of flat annotation records from Ensembl response JSON.
//!
//! The mapping from response paths to output fields is fixed. Missing
//! optional paths become absent fields, never errors; only an unusable
//! top-level shape (a gene lookup without `id`, a VEP response that is not a
//! non-empty array) is a [`AnnotError::Schema`].

use serde_json::Value;

use varanno_core::{
    AnnotError, GeneRecord, PhenotypeAssociation, TranscriptSummary, VariantRecord,
};

use super::query::{GeneQuery, VariantQuery};

fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Joined, comma-separated descriptions of xref entries whose `dbname` is in
/// `databases`. Empty results collapse to `None`.
fn join_xref_descriptions(xrefs: &Value, databases: &[&str]) -> Option<String> {
    let entries = xrefs.as_array()?;
    let descriptions: Vec<&str> = entries
        .iter()
        .filter(|entry| {
            entry
                .get("dbname")
                .and_then(Value::as_str)
                .is_some_and(|db| databases.contains(&db))
        })
        .filter_map(|entry| entry.get("description").and_then(Value::as_str))
        .filter(|d| !d.is_empty())
        .collect();

    if descriptions.is_empty() {
        None
    } else {
        Some(descriptions.join(", "))
    }
}

fn extract_transcripts(lookup: &Value) -> Option<Vec<TranscriptSummary>> {
    let transcripts: Vec<TranscriptSummary> = lookup
        .get("Transcript")?
        .as_array()?
        .iter()
        .map(|t| TranscriptSummary {
            transcript_id: str_field(t, "id").unwrap_or_default(),
            transcript_name: str_field(t, "display_name"),
            biotype: str_field(t, "biotype"),
            is_canonical: t
                .get("is_canonical")
                .map(|v| v == &Value::from(1) || v == &Value::Bool(true))
                .unwrap_or(false),
        })
        .collect();

    if transcripts.is_empty() {
        None
    } else {
        Some(transcripts)
    }
}

fn extract_phenotypes(phenotypes: &Value) -> Option<Vec<PhenotypeAssociation>> {
    let associations: Vec<PhenotypeAssociation> = phenotypes
        .as_array()?
        .iter()
        .filter_map(|entry| {
            let description = entry
                .get("phenotype")
                .and_then(|p| p.get("description"))
                .and_then(Value::as_str)?;
            Some(PhenotypeAssociation {
                description: description.to_string(),
                source: entry
                    .get("source")
                    .and_then(|s| s.get("name"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
        })
        .collect();

    if associations.is_empty() {
        None
    } else {
        Some(associations)
    }
}

///
/// Build a [`GeneRecord`] from a lookup response plus the dependent xref and
/// phenotype responses.
///
pub fn normalize_gene(
    query: &GeneQuery,
    lookup: &Value,
    functions: &Value,
    pathways: &Value,
    phenotypes: Option<&Value>,
) -> Result<GeneRecord, AnnotError> {
    let id = lookup
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            AnnotError::Schema(format!(
                "gene lookup for '{}' is missing the 'id' field",
                query.symbol
            ))
        })?
        .to_string();

    let location = match (
        lookup.get("seq_region_name").and_then(Value::as_str),
        lookup.get("start").and_then(Value::as_u64),
        lookup.get("end").and_then(Value::as_u64),
    ) {
        (Some(chrom), Some(start), Some(end)) => Some(format!("{}:{}-{}", chrom, start, end)),
        _ => None,
    };

    Ok(GeneRecord {
        symbol: str_field(lookup, "display_name").unwrap_or_else(|| query.symbol.clone()),
        id,
        description: str_field(lookup, "description"),
        location,
        biotype: str_field(lookup, "biotype"),
        function: join_xref_descriptions(functions, &["GO"]),
        pathways: join_xref_descriptions(pathways, &["Reactome", "KEGG"]),
        transcripts: if query.include_transcripts {
            extract_transcripts(lookup)
        } else {
            None
        },
        phenotypes: phenotypes.and_then(extract_phenotypes),
    })
}

/// Normalized key for a population-frequency source database.
fn source_key(source: &str) -> String {
    match source {
        "gnomAD" => "gnomad".to_string(),
        "1000GENOMES" => "1000g".to_string(),
        other => other.to_lowercase(),
    }
}

fn as_frequency(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Per-source frequency of the alternate allele across all colocated
/// variants. Order is gnomAD, then 1000 Genomes, then remaining sources
/// alphabetically.
fn collect_frequencies(vep_first: &Value, alternate: &str) -> Vec<(String, f64)> {
    let mut collected: Vec<(String, f64)> = Vec::new();
    let colocated = vep_first
        .get("colocated_variants")
        .and_then(Value::as_array);

    for entry in colocated.into_iter().flatten() {
        let Some(frequencies) = entry.get("frequencies").and_then(Value::as_object) else {
            continue;
        };
        for (source, alleles) in frequencies {
            if collected.iter().any(|(s, _)| s == source) {
                continue;
            }
            if let Some(freq) = alleles.get(alternate).and_then(as_frequency) {
                collected.push((source.clone(), freq));
            }
        }
    }

    collected.sort_by_key(|(source, _)| match source.as_str() {
        "gnomAD" => 0,
        "1000GENOMES" => 1,
        _ => 2,
    });
    collected
}

/// An rsID for the variant, preferring the VEP echo, then colocated
/// variants, then the overlap response; falls back to the query locus.
fn choose_variant_id(query: &VariantQuery, vep_first: &Value, overlap: &Value) -> String {
    if let Some(id) = str_field(vep_first, "id")
        && id.starts_with("rs")
    {
        return id;
    }

    let colocated_rs = vep_first
        .get("colocated_variants")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|entry| str_field(entry, "id"))
        .find(|id| id.starts_with("rs"));
    if let Some(id) = colocated_rs {
        return id;
    }

    let overlap_rs = overlap
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|entry| str_field(entry, "id"))
        .find(|id| id.starts_with("rs"));
    if let Some(id) = overlap_rs {
        return id;
    }

    str_field(vep_first, "id").unwrap_or_else(|| query.locus.to_string())
}

///
/// Build a [`VariantRecord`] from the overlap and VEP responses for one
/// locus. The first VEP array element carries the most severe consequence.
///
pub fn normalize_variant(
    query: &VariantQuery,
    overlap: &Value,
    vep: &Value,
) -> Result<VariantRecord, AnnotError> {
    let first = vep
        .as_array()
        .and_then(|entries| entries.first())
        .ok_or_else(|| {
            AnnotError::Schema(format!(
                "VEP response for '{}' is not a non-empty array",
                query.locus
            ))
        })?;

    let (reference, alternate) = match str_field(first, "allele_string") {
        Some(alleles) => {
            let mut parts = alleles.splitn(2, '/');
            let reference = parts.next().unwrap_or_default().to_string();
            let alternate = parts
                .next()
                .map(str::to_string)
                .unwrap_or_else(|| query.locus.alternate.clone());
            (reference, alternate)
        }
        None => (query.locus.reference.clone(), query.locus.alternate.clone()),
    };

    let location = match (
        first.get("seq_region_name").and_then(Value::as_str),
        first.get("start").and_then(Value::as_u64),
    ) {
        (Some(chrom), Some(start)) => Some(format!("{}:{}", chrom, start)),
        _ => None,
    };

    let consequence = first
        .get("transcript_consequences")
        .and_then(Value::as_array)
        .and_then(|consequences| consequences.first())
        .and_then(|c| {
            let amino_acids = c.get("amino_acids").and_then(Value::as_str)?;
            let position = c.get("protein_start")?;
            Some(format!("p.{}{}", amino_acids.replace('/', "to"), position))
        });

    let clinical_significance = first
        .get("clinical_significance")
        .and_then(Value::as_array)
        .map(|terms| {
            terms
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .filter(|joined| !joined.is_empty());

    let all_frequencies = collect_frequencies(first, &alternate);
    let global_frequency = all_frequencies
        .iter()
        .find(|(source, _)| source == "gnomAD")
        .or_else(|| {
            all_frequencies
                .iter()
                .find(|(source, _)| source == "1000GENOMES")
        })
        .map(|(_, freq)| *freq);

    let frequencies = if query.include_populations {
        all_frequencies
            .into_iter()
            .map(|(source, freq)| (source_key(&source), freq))
            .collect()
    } else {
        Vec::new()
    };

    Ok(VariantRecord {
        id: choose_variant_id(query, first, overlap),
        location,
        reference,
        alternate,
        effect: str_field(first, "most_severe_consequence"),
        consequence,
        clinical_significance,
        global_frequency,
        frequencies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Assembly;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use serde_json::json;

    fn gene_query(include_transcripts: bool, include_phenotypes: bool) -> GeneQuery {
        GeneQuery {
            symbol: "BRCA1".to_string(),
            species: "human".to_string(),
            include_transcripts,
            include_phenotypes,
        }
    }

    fn variant_query(include_populations: bool) -> VariantQuery {
        VariantQuery {
            locus: "chr17:41245466:G:A".parse().unwrap(),
            assembly: Assembly::GRCh38,
            include_populations,
        }
    }

    fn brca1_lookup() -> Value {
        json!({
            "id": "ENSG00000012048",
            "display_name": "BRCA1",
            "description": "BRCA1 DNA repair associated",
            "seq_region_name": "17",
            "start": 43044295,
            "end": 43125483,
            "biotype": "protein_coding",
            "Transcript": [
                {
                    "id": "ENST00000357654",
                    "display_name": "BRCA1-201",
                    "biotype": "protein_coding",
                    "is_canonical": 1
                }
            ]
        })
    }

    fn go_xrefs() -> Value {
        json!([
            {"dbname": "GO", "primary_id": "GO:0006281", "description": "DNA repair"},
            {"dbname": "GO", "primary_id": "GO:0051276", "description": "chromosome organization"}
        ])
    }

    fn pathway_xrefs() -> Value {
        json!([
            {"dbname": "Reactome", "description": "HDR through Homologous Recombination (HRR)"},
            {"dbname": "KEGG", "description": "Homologous recombination"},
            {"dbname": "UniProt", "description": "should be ignored"}
        ])
    }

    fn vep_response() -> Value {
        json!([
            {
                "id": "rs80357906",
                "seq_region_name": "17",
                "start": 41245466,
                "allele_string": "G/A",
                "most_severe_consequence": "missense_variant",
                "transcript_consequences": [
                    {"amino_acids": "R/Q", "protein_start": 1699}
                ],
                "clinical_significance": ["pathogenic"],
                "colocated_variants": [
                    {
                        "id": "rs80357906",
                        "frequencies": {
                            "gnomAD": {"A": 0.00001},
                            "1000GENOMES": {"A": 0.0002}
                        }
                    }
                ]
            }
        ])
    }

    #[rstest]
    fn test_normalize_gene_basic_fields() {
        let record = normalize_gene(
            &gene_query(false, false),
            &brca1_lookup(),
            &go_xrefs(),
            &pathway_xrefs(),
            None,
        )
        .unwrap();

        assert_eq!(record.symbol, "BRCA1");
        assert_eq!(record.id, "ENSG00000012048");
        assert_eq!(record.location.as_deref(), Some("17:43044295-43125483"));
        assert_eq!(record.biotype.as_deref(), Some("protein_coding"));
        assert_eq!(
            record.function.as_deref(),
            Some("DNA repair, chromosome organization")
        );
        assert_eq!(
            record.pathways.as_deref(),
            Some("HDR through Homologous Recombination (HRR), Homologous recombination")
        );
        assert!(record.transcripts.is_none());
    }

    #[rstest]
    fn test_normalize_gene_with_transcripts() {
        let record = normalize_gene(
            &gene_query(true, false),
            &brca1_lookup(),
            &json!([]),
            &json!([]),
            None,
        )
        .unwrap();

        let transcripts = record.transcripts.unwrap();
        assert_eq!(transcripts.len(), 1);
        assert_eq!(transcripts[0].transcript_id, "ENST00000357654");
        assert!(transcripts[0].is_canonical);
        assert!(record.function.is_none());
    }

    #[rstest]
    fn test_normalize_gene_with_phenotypes() {
        let phenotypes = json!([
            {
                "source": {"name": "OMIM"},
                "phenotype": {"description": "Breast-ovarian cancer, familial 1"}
            }
        ]);
        let record = normalize_gene(
            &gene_query(false, true),
            &brca1_lookup(),
            &json!([]),
            &json!([]),
            Some(&phenotypes),
        )
        .unwrap();

        let associations = record.phenotypes.unwrap();
        assert_eq!(
            associations[0].description,
            "Breast-ovarian cancer, familial 1"
        );
        assert_eq!(associations[0].source.as_deref(), Some("OMIM"));
    }

    #[rstest]
    fn test_normalize_gene_missing_id_is_schema_error() {
        let lookup = json!({"display_name": "BRCA1"});
        let result = normalize_gene(
            &gene_query(false, false),
            &lookup,
            &json!([]),
            &json!([]),
            None,
        );
        assert!(matches!(result, Err(AnnotError::Schema(_))));
    }

    #[rstest]
    fn test_normalize_gene_missing_optional_paths_are_none() {
        let lookup = json!({"id": "ENSG00000012048"});
        let record = normalize_gene(
            &gene_query(false, false),
            &lookup,
            &json!([]),
            &json!([]),
            None,
        )
        .unwrap();

        // The display name falls back to the queried symbol.
        assert_eq!(record.symbol, "BRCA1");
        assert!(record.description.is_none());
        assert!(record.location.is_none());
        assert!(record.pathways.is_none());
    }

    #[rstest]
    fn test_normalize_variant_basic_fields() {
        let record =
            normalize_variant(&variant_query(false), &json!([]), &vep_response()).unwrap();

        assert_eq!(record.id, "rs80357906");
        assert_eq!(record.location.as_deref(), Some("17:41245466"));
        assert_eq!(record.reference, "G");
        assert_eq!(record.alternate, "A");
        assert_eq!(record.effect.as_deref(), Some("missense_variant"));
        assert_eq!(record.consequence.as_deref(), Some("p.RtoQ1699"));
        assert_eq!(record.clinical_significance.as_deref(), Some("pathogenic"));
        assert_eq!(record.global_frequency, Some(0.00001));
        assert!(record.frequencies.is_empty());
    }

    #[rstest]
    fn test_normalize_variant_population_frequencies() {
        let record =
            normalize_variant(&variant_query(true), &json!([]), &vep_response()).unwrap();

        assert_eq!(
            record.frequencies,
            vec![
                ("gnomad".to_string(), 0.00001),
                ("1000g".to_string(), 0.0002),
            ]
        );
    }

    #[rstest]
    fn test_normalize_variant_rsid_from_overlap() {
        let vep = json!([
            {
                "id": "17_41245466_G/A",
                "allele_string": "G/A",
                "most_severe_consequence": "missense_variant"
            }
        ]);
        let overlap = json!([
            {"id": "rs80357906", "feature_type": "variation"}
        ]);

        let record = normalize_variant(&variant_query(false), &overlap, &vep).unwrap();
        assert_eq!(record.id, "rs80357906");
    }

    #[rstest]
    fn test_normalize_variant_falls_back_to_locus_alleles() {
        let vep = json!([{"id": "rs1", "most_severe_consequence": "intron_variant"}]);
        let record = normalize_variant(&variant_query(false), &json!([]), &vep).unwrap();
        assert_eq!(record.reference, "G");
        assert_eq!(record.alternate, "A");
    }

    #[rstest]
    #[case(json!([]))]
    #[case(json!({"error": "unexpected"}))]
    fn test_normalize_variant_unusable_vep_is_schema_error(#[case] vep: Value) {
        let result = normalize_variant(&variant_query(false), &json!([]), &vep);
        assert!(matches!(result, Err(AnnotError::Schema(_))));
    }
}
