use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("invalid export filter '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("failed to list exports: {0}")]
    Listing(String),
}

impl ResolveError {
    /// Short machine-readable code used in structured log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::InvalidPattern { .. } => "invalid_pattern",
            Self::Listing(_) => "listing_error",
        }
    }
}
