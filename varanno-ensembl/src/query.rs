//! Query specifications and Ensembl endpoint builders.

use std::fmt::{self, Display};
use std::str::FromStr;

use varanno_core::{AnnotError, Locus};

use super::consts::DEFAULT_SPECIES;

/// Reference genome build. GRCh37 is served from a dedicated Ensembl host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Assembly {
    GRCh37,
    #[default]
    GRCh38,
}

impl FromStr for Assembly {
    type Err = AnnotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GRCh37" => Ok(Assembly::GRCh37),
            "GRCh38" => Ok(Assembly::GRCh38),
            other => Err(AnnotError::Validation(format!(
                "unknown assembly '{}', expected GRCh37 or GRCh38",
                other
            ))),
        }
    }
}

impl Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assembly::GRCh37 => write!(f, "GRCh37"),
            Assembly::GRCh38 => write!(f, "GRCh38"),
        }
    }
}

/// One gene annotation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneQuery {
    pub symbol: String,
    pub species: String,
    pub include_transcripts: bool,
    pub include_phenotypes: bool,
}

/// One variant annotation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantQuery {
    pub locus: Locus,
    pub assembly: Assembly,
    pub include_populations: bool,
}

/// A single item of a batch: annotate one gene or one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySpec {
    Gene(GeneQuery),
    Variant(VariantQuery),
}

impl QuerySpec {
    /// The user-supplied input this spec was built from, for reporting.
    pub fn label(&self) -> String {
        match self {
            QuerySpec::Gene(q) => q.symbol.clone(),
            QuerySpec::Variant(q) => q.locus.to_string(),
        }
    }
}

/// One GET request against the Ensembl REST API: a path relative to the base
/// URL plus query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRequest {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl EndpointRequest {
    fn new(path: String, params: &[(&str, &str)]) -> Self {
        EndpointRequest {
            path,
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// Lookup a gene by symbol, with transcripts expanded.
pub fn gene_lookup(symbol: &str, species: &str) -> EndpointRequest {
    EndpointRequest::new(
        format!("lookup/symbol/{}/{}", species, symbol),
        &[("expand", "1")],
    )
}

/// Cross-references for a gene identifier, restricted to the given external
/// databases ("GO" for function, "Reactome,KEGG" for pathways).
pub fn gene_xrefs(gene_id: &str, external_db: &str) -> EndpointRequest {
    EndpointRequest::new(
        format!("xrefs/id/{}", gene_id),
        &[("external_db", external_db)],
    )
}

/// Phenotype associations for a gene identifier.
pub fn gene_phenotypes(gene_id: &str) -> EndpointRequest {
    EndpointRequest::new(format!("phenotype/gene/{}", gene_id), &[])
}

/// Known variation features overlapping the locus.
pub fn variant_overlap(locus: &Locus) -> EndpointRequest {
    EndpointRequest::new(
        format!("overlap/region/{}/{}", DEFAULT_SPECIES, locus.region()),
        &[("feature", "variation")],
    )
}

/// VEP consequences for the alternate allele at the locus.
pub fn variant_vep(locus: &Locus) -> EndpointRequest {
    EndpointRequest::new(
        format!(
            "vep/{}/region/{}/{}",
            DEFAULT_SPECIES,
            locus.region(),
            locus.alternate
        ),
        &[
            ("variant_class", "1"),
            ("regulatory", "1"),
            ("clinical_significance", "1"),
            ("af", "1"),
            ("af_1kg", "1"),
            ("af_gnomad", "1"),
        ],
    )
}
