//! Ensembl REST API client for varanno.
//!
//! This crate talks to the Ensembl REST service and turns its JSON responses
//! into the flat annotation records defined in `varanno-core`:
//!
//! - `client` - [`EnsemblClient`] and its builder: HTTP GET with timeout,
//!   bounded retry with exponential backoff, and 429 handling
//! - `query` - [`QuerySpec`] and the endpoint builders for gene lookup,
//!   xrefs, phenotypes, overlap, and VEP requests
//! - `normalize` - fixed-path field extraction from response JSON
//! - `batch` - the sequential batch driver and its [`Annotate`] seam
//! - `retry` - the bounded backoff schedule, separated for testability

pub mod batch;
pub mod client;
pub mod consts;
pub mod normalize;
pub mod query;
pub mod retry;

pub use batch::{Annotate, BatchOutcome, ItemFailure, run_batch};
pub use client::{EnsemblClient, EnsemblClientBuilder};
pub use query::{Assembly, GeneQuery, QuerySpec, VariantQuery};
