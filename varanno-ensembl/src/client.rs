//! Ensembl REST client implementation.
//!
//! This module provides the core [`EnsemblClient`] type and its builder for
//! fetching gene and variant annotations from the Ensembl REST API.

use std::cell::Cell;
use std::env;
use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;

use varanno_core::{AnnotError, GeneRecord, VariantRecord};

use super::consts::{
    DEFAULT_ENSEMBL_API, DEFAULT_INITIAL_BACKOFF, DEFAULT_MAX_ATTEMPTS, DEFAULT_MIN_SPACING,
    DEFAULT_TIMEOUT, ENSEMBL_API_ENV, GRCH37_ENSEMBL_API,
};
use super::normalize;
use super::query::{self, Assembly, EndpointRequest, GeneQuery, VariantQuery};
use super::retry::{AttemptOutcome, RetryPolicy};

/// Get the REST endpoint for an assembly, honoring the `ENSEMBL_API`
/// environment variable override.
///
/// # Returns
/// - base URL of the Ensembl REST API
pub fn default_api_url(assembly: Assembly) -> String {
    if let Ok(val) = env::var(ENSEMBL_API_ENV) {
        return val;
    }
    match assembly {
        Assembly::GRCh37 => GRCH37_ENSEMBL_API.to_string(),
        Assembly::GRCh38 => DEFAULT_ENSEMBL_API.to_string(),
    }
}

/// Builder for constructing an [`EnsemblClient`] with custom configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use std::time::Duration;
/// use varanno_ensembl::EnsemblClient;
///
/// let client = EnsemblClient::builder()
///     .with_base_url("https://grch37.rest.ensembl.org".to_string())
///     .with_timeout(Duration::from_secs(10))
///     .finish();
/// ```
#[derive(Default)]
pub struct EnsemblClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    max_attempts: Option<u32>,
    initial_backoff: Option<Duration>,
    min_spacing: Option<Duration>,
}

impl EnsemblClientBuilder {
    /// Creates a new, empty EnsemblClientBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the REST API base URL.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the total attempt bound for transient failures.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Sets the backoff before the first retry (doubles per retry).
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = Some(backoff);
        self
    }

    /// Sets the minimum spacing between consecutive requests.
    pub fn with_min_spacing(mut self, spacing: Duration) -> Self {
        self.min_spacing = Some(spacing);
        self
    }

    /// Consumes the builder and creates an EnsemblClient.
    pub fn finish(self) -> EnsemblClient {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();

        EnsemblClient {
            agent,
            base_url: self
                .base_url
                .unwrap_or_else(|| default_api_url(Assembly::default())),
            max_attempts: self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
            initial_backoff: self.initial_backoff.unwrap_or(DEFAULT_INITIAL_BACKOFF),
            min_spacing: self.min_spacing.unwrap_or(DEFAULT_MIN_SPACING),
            last_request: Cell::new(None),
        }
    }
}

/// Client for fetching gene and variant annotations from the Ensembl
/// REST API.
///
/// All requests are sequential GETs with a per-request timeout, a minimum
/// spacing between calls, and a bounded retry-with-backoff loop for
/// transient failures (429, 5xx, timeouts, connection errors). Hard 4xx
/// failures are never retried. No state is retained between calls beyond
/// the last-request instant used for spacing.
///
/// # Examples
///
/// ```rust,no_run
/// use varanno_ensembl::{EnsemblClient, GeneQuery};
///
/// # fn main() -> Result<(), varanno_core::AnnotError> {
/// let client = EnsemblClient::builder().finish();
///
/// let record = client.annotate_gene(&GeneQuery {
///     symbol: "BRCA1".to_string(),
///     species: "human".to_string(),
///     include_transcripts: false,
///     include_phenotypes: false,
/// })?;
/// println!("{} -> {}", record.symbol, record.id);
/// # Ok(())
/// # }
/// ```
pub struct EnsemblClient {
    agent: ureq::Agent,
    /// REST API base URL, e.g. `https://rest.ensembl.org`
    pub base_url: String,
    max_attempts: u32,
    initial_backoff: Duration,
    min_spacing: Duration,
    last_request: Cell<Option<Instant>>,
}

impl EnsemblClient {
    /// Creates a new builder for constructing an [`EnsemblClient`].
    pub fn builder() -> EnsemblClientBuilder {
        EnsemblClientBuilder::default()
    }

    /// Creates a client for the given assembly's REST host with default
    /// configuration.
    pub fn for_assembly(assembly: Assembly) -> Self {
        Self::builder()
            .with_base_url(default_api_url(assembly))
            .finish()
    }

    /// Sleep long enough to keep the minimum spacing since the last request.
    fn pace(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < self.min_spacing {
                thread::sleep(self.min_spacing - elapsed);
            }
        }
    }

    /// Issues one GET against the REST API and decodes the JSON body,
    /// retrying transient failures per the client's retry policy.
    pub fn get_json(&self, request: &EndpointRequest) -> Result<Value, AnnotError> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            request.path
        );
        let policy = RetryPolicy {
            max_attempts: self.max_attempts,
            initial_backoff: self.initial_backoff,
        };

        policy.run(|attempt| {
            self.pace();
            let mut get = self.agent.get(&url);
            for (k, v) in &request.params {
                get = get.query(k, v);
            }
            let outcome = get.call();
            self.last_request.set(Some(Instant::now()));

            match outcome {
                Ok(response) => match response.into_string() {
                    Ok(body) => match serde_json::from_str::<Value>(&body) {
                        Ok(json) => AttemptOutcome::Done(json),
                        Err(e) => AttemptOutcome::Fatal(AnnotError::Schema(format!(
                            "invalid JSON from {}: {}",
                            url, e
                        ))),
                    },
                    Err(e) => AttemptOutcome::Transient {
                        wait: None,
                        error: AnnotError::Transport {
                            url: url.clone(),
                            message: e.to_string(),
                            attempts: attempt,
                        },
                    },
                },
                Err(ureq::Error::Status(429, response)) => {
                    let wait = response
                        .header("retry-after")
                        .and_then(|s| s.trim().parse::<u64>().ok())
                        .map(Duration::from_secs);
                    AttemptOutcome::Transient {
                        wait,
                        error: AnnotError::RateLimit {
                            url: url.clone(),
                            attempts: attempt,
                        },
                    }
                }
                Err(ureq::Error::Status(404, _)) => {
                    AttemptOutcome::Fatal(AnnotError::NotFound(url.clone()))
                }
                Err(ureq::Error::Status(status @ 400..=499, response)) => {
                    AttemptOutcome::Fatal(AnnotError::BadRequest {
                        url: url.clone(),
                        status,
                        message: remote_message(response),
                    })
                }
                Err(ureq::Error::Status(status, _)) => AttemptOutcome::Transient {
                    wait: None,
                    error: AnnotError::Server {
                        url: url.clone(),
                        status,
                        attempts: attempt,
                    },
                },
                Err(ureq::Error::Transport(transport)) => AttemptOutcome::Transient {
                    wait: None,
                    error: AnnotError::Transport {
                        url: url.clone(),
                        message: transport.to_string(),
                        attempts: attempt,
                    },
                },
            }
        })
    }

    /// Annotate one gene: lookup by symbol, then the dependent xref and
    /// phenotype requests keyed by the identifier from the lookup response.
    /// The dependency is sequential; nothing is fetched in parallel.
    pub fn annotate_gene(&self, query: &GeneQuery) -> Result<GeneRecord, AnnotError> {
        log::debug!("annotating gene {} ({})", query.symbol, query.species);

        let lookup = self.get_json(&query::gene_lookup(&query.symbol, &query.species))?;
        let gene_id = lookup
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AnnotError::Schema(format!(
                    "gene lookup for '{}' is missing the 'id' field",
                    query.symbol
                ))
            })?
            .to_string();

        let functions = self.get_json(&query::gene_xrefs(&gene_id, "GO"))?;
        let pathways = self.get_json(&query::gene_xrefs(&gene_id, "Reactome,KEGG"))?;
        let phenotypes = if query.include_phenotypes {
            Some(self.get_json(&query::gene_phenotypes(&gene_id))?)
        } else {
            None
        };

        normalize::normalize_gene(query, &lookup, &functions, &pathways, phenotypes.as_ref())
    }

    /// Annotate one variant: an overlap-region request for known variation
    /// at the locus, then a VEP request for the alternate allele.
    pub fn annotate_variant(&self, query: &VariantQuery) -> Result<VariantRecord, AnnotError> {
        log::debug!("annotating variant {}", query.locus);

        let overlap = self.get_json(&query::variant_overlap(&query.locus))?;
        let vep = self.get_json(&query::variant_vep(&query.locus))?;

        normalize::normalize_variant(query, &overlap, &vep)
    }
}

/// Best-effort extraction of the remote error message from a 4xx body
/// (Ensembl reports errors as `{"error": "..."}`).
fn remote_message(response: ureq::Response) -> String {
    match response.into_string() {
        Ok(body) => serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string()),
        Err(_) => String::new(),
    }
}
