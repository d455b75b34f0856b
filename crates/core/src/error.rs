//! Unified error types for casefinder-core.

use tokio_rusqlite::rusqlite;

/// Unified error types for the core store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database operation failed.
    #[error("store error: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("store error: migration failed: {0}")]
    MigrationFailed(String),

    /// Cache payload could not be serialized for storage.
    #[error("cache encode error: {0}")]
    Encode(String),

    /// Stored cache payload could not be reconstituted.
    #[error("cache decode error: {0}")]
    Decode(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Decode("bad TREE payload".to_string());
        assert!(err.to_string().contains("cache decode error"));
        assert!(err.to_string().contains("bad TREE payload"));
    }

    #[test]
    fn test_migration_error_display() {
        let err = Error::MigrationFailed("002 failed".to_string());
        assert!(err.to_string().contains("migration failed"));
    }
}
