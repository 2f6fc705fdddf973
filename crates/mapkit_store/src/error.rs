use mapkit_model::MappingError;
use thiserror::Error;

/// Errors raised by a [`SecureStore`](crate::SecureStore) or a
/// [`Keychain`](crate::Keychain).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("stored value does not map: {0}")]
    Mapping(#[from] MappingError),

    #[error("secure store backend failed: {message}")]
    Backend { message: String },

    #[error("invalid store snapshot: {0}")]
    Snapshot(#[source] serde_json::Error),
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
