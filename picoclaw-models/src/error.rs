//! Error types for provider and credential handling.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced while loading persisted credentials.
///
/// Resolution and aggregation never fail; only the store loader does.
#[derive(Debug, Error)]
pub enum Error {
    /// The credential store exists but could not be read or parsed.
    #[error("failed to load credential store {}: {source}", path.display())]
    CredentialStore {
        /// Location of the store file.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn store(path: impl Into<PathBuf>, source: impl Into<Error>) -> Self {
        Self::CredentialStore {
            path: path.into(),
            source: Box::new(source.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_serde_json() {
        let json_err: serde_json::Error = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn store_error_names_the_file() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::store("/tmp/auth.json", io);
        let display = err.to_string();
        assert!(display.contains("/tmp/auth.json"));
        assert!(display.contains("denied"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
