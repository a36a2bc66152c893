use thiserror::Error;

/// Errors produced while annotating genes and variants.
///
/// Per-item errors (everything except [`AnnotError::Io`] on the output
/// destination) are caught by the batch driver and reported without aborting
/// the run.
#[derive(Error, Debug)]
pub enum AnnotError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request ({status}) for {url}: {message}")]
    BadRequest {
        url: String,
        status: u16,
        message: String,
    },

    #[error("rate limited after {attempts} attempts: {url}")]
    RateLimit { url: String, attempts: u32 },

    #[error("server error ({status}) after {attempts} attempts: {url}")]
    Server {
        url: String,
        status: u16,
        attempts: u32,
    },

    #[error("transport error after {attempts} attempts for {url}: {message}")]
    Transport {
        url: String,
        message: String,
        attempts: u32,
    },

    #[error("unexpected response shape: {0}")]
    Schema(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
