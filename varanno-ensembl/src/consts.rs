//! Constants for the Ensembl REST client configuration.

use std::time::Duration;

/// Environment variable name for overriding the Ensembl REST endpoint.
///
/// When set, this overrides both the default endpoint and the GRCh37 host
/// selection.
///
/// # Example
///
/// ```bash
/// export ENSEMBL_API=https://mirror.example.org
/// ```
pub const ENSEMBL_API_ENV: &str = "ENSEMBL_API";

/// Default Ensembl REST endpoint (GRCh38).
pub const DEFAULT_ENSEMBL_API: &str = "https://rest.ensembl.org";

/// Ensembl REST endpoint serving the GRCh37 assembly.
pub const GRCH37_ENSEMBL_API: &str = "https://grch37.rest.ensembl.org";

/// Default species for variant endpoints.
pub const DEFAULT_SPECIES: &str = "human";

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Total attempts per request (1 initial + retries) for transient failures:
/// HTTP 429, HTTP 5xx, timeouts, and connection errors.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Backoff before the first retry; doubles after each further retry. A 429
/// `Retry-After` hint takes precedence when present.
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Minimum spacing between consecutive requests, to stay under the Ensembl
/// rate limit in the first place.
pub const DEFAULT_MIN_SPACING: Duration = Duration::from_millis(100);
