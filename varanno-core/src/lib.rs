//! Core data model and output formatting for varanno.
//!
//! This crate holds everything that is independent of the Ensembl REST API
//! itself:
//!
//! - `errors` - the error taxonomy shared across the workspace
//! - `locus` - parsing of `chr:position:ref:alt` variant loci
//! - `record` - [`GeneRecord`], [`VariantRecord`] and the flat field/value
//!   representation the formatter consumes
//! - `format` - CSV and JSON serialization of annotation records

pub mod consts;
pub mod errors;
pub mod format;
pub mod locus;
pub mod record;

pub use errors::AnnotError;
pub use format::{OutputFormat, OutputSpec, write_records};
pub use locus::Locus;
pub use record::{FlatRecord, GeneRecord, PhenotypeAssociation, TranscriptSummary, VariantRecord};
