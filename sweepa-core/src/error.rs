//! Typed error handling for sweepa.
//!
//! Provides structured errors that library consumers can match on,
//! with full context about what went wrong and where.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sweepa operations.
///
/// This provides typed errors that library consumers can match on,
/// unlike opaque `anyhow::Error` types.
#[derive(Error, Debug)]
pub enum SweepaError {
    /// I/O error when reading/writing files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Package manifest errors (missing, malformed)
    #[error("Manifest error at {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    /// The compiler facade could not answer a query
    #[error("Facade error: {message}")]
    Facade { message: String },

    /// A program snapshot could not be decoded
    #[error("Snapshot error at {path}: {message}")]
    Snapshot { path: PathBuf, message: String },

    /// Baseline file errors
    #[error("Baseline error: {message}")]
    Baseline { message: String },

    /// Fix operation errors
    #[error("Fix error: {message}")]
    Fix { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SweepaError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a manifest error.
    pub fn manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a facade error.
    pub fn facade(message: impl Into<String>) -> Self {
        Self::Facade {
            message: message.into(),
        }
    }

    /// Create a snapshot error.
    pub fn snapshot(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Snapshot {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a baseline error.
    pub fn baseline(message: impl Into<String>) -> Self {
        Self::Baseline {
            message: message.into(),
        }
    }

    /// Create a fix error.
    pub fn fix(message: impl Into<String>) -> Self {
        Self::Fix {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error (analysis can continue with
    /// reduced coverage).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::Facade { .. } | Self::Manifest { .. }
        )
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            Self::Manifest { path, .. } => Some(path),
            Self::Snapshot { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for sweepa results.
pub type SweepaResult<T> = Result<T, SweepaError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> SweepaResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> SweepaResult<T> {
        self.map_err(|e| SweepaError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error() {
        let err = SweepaError::io(
            PathBuf::from("/proj/src/app.ts"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(matches!(err, SweepaError::Io { .. }));
        assert_eq!(err.path(), Some(&PathBuf::from("/proj/src/app.ts")));
        assert!(err.to_string().contains("/proj/src/app.ts"));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(SweepaError::config("/proj/sweepa.toml", "bad key").is_recoverable());
        assert!(SweepaError::facade("no references for node").is_recoverable());
        assert!(!SweepaError::fix("manifest write failed").is_recoverable());
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let sweepa_result = result.with_path("/missing/package.json");
        assert!(sweepa_result.is_err());
    }
}
