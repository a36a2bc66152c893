//! Constants shared between the varanno library crates and the CLI.

// Command-line interface command names

/// Subcommand for annotating genes by symbol.
pub const GENE_CMD: &str = "gene";

/// Subcommand for annotating variants by locus.
pub const VARIANT_CMD: &str = "variant";

// Canonical output field names
//
// The formatter derives CSV headers from the union of fields present across
// all records; these lists fix the order in which gene and variant fields
// appear when no allow-list is given.

/// Canonical field order for gene records.
pub const GENE_FIELDS: &[&str] = &[
    "gene_symbol",
    "gene_id",
    "description",
    "location",
    "biotype",
    "function",
    "pathways",
    "transcripts",
    "phenotypes",
];

/// Canonical field order for variant records. Population-frequency fields
/// (`freq_<source>`) follow these, gnomAD first, then 1000 Genomes, then any
/// remaining sources.
pub const VARIANT_FIELDS: &[&str] = &[
    "variant_id",
    "location",
    "reference",
    "alternate",
    "variant_effect",
    "consequence",
    "clinical_significance",
    "global_frequency",
];
