use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// Errors raised while mapping records and documents.
///
/// Only [`NotIntrospectable`], [`PathNotFound`], [`ParseFailure`] and
/// [`Serialize`] are returned to callers. The per-field variants describe
/// values that were skipped; they are logged and the operation goes on.
///
/// [`NotIntrospectable`]: MappingError::NotIntrospectable
/// [`PathNotFound`]: MappingError::PathNotFound
/// [`ParseFailure`]: MappingError::ParseFailure
/// [`Serialize`]: MappingError::Serialize
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MappingError {
    #[error("`{type_path}` has no model descriptor")]
    NotIntrospectable { type_path: &'static str },

    #[error("designated path `{path}` was not found in the document")]
    PathNotFound { path: String },

    #[error("failed to parse JSON text: {0}")]
    ParseFailure(#[from] serde_json::Error),

    #[error("field `{field}` kept its value: document value does not convert to `{type_path}`")]
    ConversionSkipped {
        field: &'static str,
        type_path: &'static str,
    },

    #[error("field `{field}` omitted: `{type_path}` value has no document representation")]
    UnrepresentableValue {
        field: &'static str,
        type_path: &'static str,
    },

    #[error("failed to write JSON text: {0}")]
    Serialize(serde_json::Error),

    #[error("a global mapping config has already been installed")]
    ConfigAlreadyInstalled,
}

impl MappingError {
    /// Returns `true` for errors that end an operation.
    ///
    /// ```
    /// use mapkit_model::MappingError;
    ///
    /// let skipped = MappingError::ConversionSkipped { field: "age", type_path: "i32" };
    /// assert!(!skipped.is_fatal());
    /// assert!(MappingError::PathNotFound { path: "data".into() }.is_fatal());
    /// ```
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::ConversionSkipped { .. } | Self::UnrepresentableValue { .. }
        )
    }
}

/// Alias of `Result` with [`MappingError`].
pub type Result<T, E = MappingError> = core::result::Result<T, E>;
