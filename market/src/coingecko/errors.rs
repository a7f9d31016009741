use thiserror::Error;

/// Every failure of the market data client: connection problems, non-2xx
/// statuses and malformed bodies all collapse into this one kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        let message = if let Some(status) = e.status() {
            format!("market api returned {status}")
        } else if e.is_timeout() {
            format!("market api request timed out: {e}")
        } else if e.is_connect() {
            format!("could not reach market api: {e}")
        } else if e.is_decode() {
            format!("malformed market api response: {e}")
        } else {
            format!("market api request failed: {e}")
        };
        Self::new(message)
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("malformed market api response: {e}"))
    }
}
