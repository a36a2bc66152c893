use serde::Serialize;
use serde_json::{Value, json};

/// An annotation record flattened to an ordered list of field/value pairs.
///
/// This is the common currency between the response normalizer and the
/// formatter: gene and variant batches both collect into `Vec<FlatRecord>`,
/// and the CSV header is derived from the union of field names across
/// records, ordered by the canonical field lists in [`crate::consts`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRecord {
    fields: Vec<(String, Value)>,
}

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field. Null values are dropped so that absent optional
    /// fields simply fall out of the header union.
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        if value.is_null() {
            return;
        }
        self.fields.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One transcript of a gene, kept when `--include-transcripts` is given.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TranscriptSummary {
    pub transcript_id: String,
    pub transcript_name: Option<String>,
    pub biotype: Option<String>,
    pub is_canonical: bool,
}

/// One phenotype association of a gene, kept when `--include-phenotypes`
/// is given.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PhenotypeAssociation {
    pub description: String,
    pub source: Option<String>,
}

///
/// Annotations for a single gene, built from Ensembl lookup and xref
/// responses. Immutable once built; `flatten` produces the output fields.
///
#[derive(Debug, Clone, Serialize, Default)]
pub struct GeneRecord {
    pub symbol: String,
    pub id: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub biotype: Option<String>,
    pub function: Option<String>,
    pub pathways: Option<String>,
    pub transcripts: Option<Vec<TranscriptSummary>>,
    pub phenotypes: Option<Vec<PhenotypeAssociation>>,
}

impl GeneRecord {
    ///
    /// Flatten to output fields in canonical order (see
    /// [`crate::consts::GENE_FIELDS`]).
    ///
    pub fn flatten(&self) -> FlatRecord {
        let mut flat = FlatRecord::new();
        flat.push("gene_symbol", json!(self.symbol));
        flat.push("gene_id", json!(self.id));
        flat.push("description", json!(self.description));
        flat.push("location", json!(self.location));
        flat.push("biotype", json!(self.biotype));
        flat.push("function", json!(self.function));
        flat.push("pathways", json!(self.pathways));
        flat.push("transcripts", json!(self.transcripts));
        flat.push("phenotypes", json!(self.phenotypes));
        flat
    }
}

///
/// Annotations for a single variant, built from Ensembl overlap and VEP
/// responses. `frequencies` holds per-source population frequencies in the
/// order the normalizer produced them, flattened to `freq_<source>` output
/// fields.
///
#[derive(Debug, Clone, Serialize, Default)]
pub struct VariantRecord {
    pub id: String,
    pub location: Option<String>,
    pub reference: String,
    pub alternate: String,
    pub effect: Option<String>,
    pub consequence: Option<String>,
    pub clinical_significance: Option<String>,
    pub global_frequency: Option<f64>,
    pub frequencies: Vec<(String, f64)>,
}

impl VariantRecord {
    ///
    /// Flatten to output fields in canonical order (see
    /// [`crate::consts::VARIANT_FIELDS`]), with `freq_<source>` fields last.
    ///
    pub fn flatten(&self) -> FlatRecord {
        let mut flat = FlatRecord::new();
        flat.push("variant_id", json!(self.id));
        flat.push("location", json!(self.location));
        flat.push("reference", json!(self.reference));
        flat.push("alternate", json!(self.alternate));
        flat.push("variant_effect", json!(self.effect));
        flat.push("consequence", json!(self.consequence));
        flat.push("clinical_significance", json!(self.clinical_significance));
        flat.push("global_frequency", json!(self.global_frequency));
        for (source, freq) in &self.frequencies {
            flat.push(format!("freq_{}", source), json!(freq));
        }
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_gene_flatten_order_and_absent_fields() {
        let record = GeneRecord {
            symbol: "BRCA1".to_string(),
            id: "ENSG00000012048".to_string(),
            description: Some("BRCA1 DNA repair associated".to_string()),
            biotype: Some("protein_coding".to_string()),
            ..Default::default()
        };

        let flat = record.flatten();
        let names: Vec<&str> = flat.names().collect();
        assert_eq!(names, vec!["gene_symbol", "gene_id", "description", "biotype"]);
        assert_eq!(flat.get("gene_symbol"), Some(&json!("BRCA1")));
        assert_eq!(flat.get("location"), None);
    }

    #[rstest]
    fn test_variant_flatten_appends_frequency_fields() {
        let record = VariantRecord {
            id: "rs80357906".to_string(),
            reference: "G".to_string(),
            alternate: "A".to_string(),
            effect: Some("missense_variant".to_string()),
            global_frequency: Some(0.0001),
            frequencies: vec![
                ("gnomad".to_string(), 0.0001),
                ("1000g".to_string(), 0.0002),
            ],
            ..Default::default()
        };

        let flat = record.flatten();
        let names: Vec<&str> = flat.names().collect();
        assert_eq!(
            names,
            vec![
                "variant_id",
                "reference",
                "alternate",
                "variant_effect",
                "global_frequency",
                "freq_gnomad",
                "freq_1000g",
            ]
        );
        assert_eq!(flat.get("freq_1000g"), Some(&json!(0.0002)));
    }

    #[rstest]
    fn test_flat_record_drops_null() {
        let mut flat = FlatRecord::new();
        flat.push("kept", json!("value"));
        flat.push("dropped", Value::Null);
        assert_eq!(flat.len(), 1);
        assert!(flat.get("dropped").is_none());
    }
}
