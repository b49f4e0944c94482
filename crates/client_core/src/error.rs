use thiserror::Error;

/// Diagnostic failure raised by an accounts gateway.
///
/// Controllers log these and collapse them into a
/// [`LoadFailure`](shared::error::LoadFailure) before touching state.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {status} fetching {resource}")]
    Status { status: u16, resource: String },
    #[error("empty response body fetching {resource}")]
    EmptyBody { resource: String },
    #[error("malformed response body fetching {resource}: {source}")]
    Decode {
        resource: String,
        source: serde_json::Error,
    },
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("base url '{0}' cannot carry path segments")]
    UnsupportedBaseUrl(String),
}

impl GatewayError {
    pub fn status(status: u16, resource: impl Into<String>) -> Self {
        Self::Status {
            status,
            resource: resource.into(),
        }
    }
}
