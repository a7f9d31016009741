use market::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Upstream failure on a lookup that has no offline fallback.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The live list fetch failed and no cached snapshot was available.
    /// Displays the original transport message unchanged.
    #[error(transparent)]
    EmptyFallback(TransportError),
}

impl RepositoryError {
    pub fn transport(&self) -> &TransportError {
        match self {
            RepositoryError::Transport(e) | RepositoryError::EmptyFallback(e) => e,
        }
    }
}
