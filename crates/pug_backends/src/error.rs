//! Error types for template backends.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for backend processing.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors raised while a registered backend processes one template.
///
/// [`BackendError::UnsupportedFeature`] is the only declared, expected
/// condition: it means the backend's compiler path cannot handle a construct
/// in the source. Every other variant is a genuine failure.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend knowingly does not support a construct in this source.
    #[error("{backend} does not support a construct in {filename}: {message}")]
    UnsupportedFeature {
        backend: String,
        filename: String,
        message: String,
    },

    /// The engine raised while compiling or rendering.
    #[error("{backend} failed to render {filename}: {message}")]
    Render {
        backend: String,
        filename: String,
        message: String,
    },

    /// The driver worker went away (pipe closed, process exited).
    #[error("{backend} render worker is gone: {message}")]
    WorkerGone { backend: String, message: String },

    /// The worker answered with something that is not a protocol message.
    #[error("{backend} sent a malformed response: {source}")]
    Protocol {
        backend: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO error talking to the worker.
    #[error("IO error in {backend}: {source}")]
    Io {
        backend: String,
        #[source]
        source: std::io::Error,
    },
}

impl BackendError {
    /// Creates an unsupported-feature error.
    pub fn unsupported(
        backend: impl Into<String>,
        filename: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::UnsupportedFeature {
            backend: backend.into(),
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Creates a render error.
    pub fn render(
        backend: impl Into<String>,
        filename: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Render {
            backend: backend.into(),
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Returns true for the declared "not supported" condition.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, BackendError::UnsupportedFeature { .. })
    }
}

/// Why a backend kind could not be registered.
#[derive(Debug, Error)]
pub enum BackendUnavailable {
    /// No interpreter could be located for the render driver.
    #[error("no interpreter found (tried {tried}); set PUGJS_PYTHON or `interpreter` in the config")]
    InterpreterNotFound { tried: String },

    /// The configured driver script does not exist.
    #[error("render driver not found at {path}")]
    DriverNotFound { path: PathBuf },

    /// The embedded driver could not be written out.
    #[error("failed to materialise the embedded render driver: {0}")]
    DriverWrite(#[source] std::io::Error),

    /// The worker process could not be started.
    #[error("failed to spawn {backend} render worker: {source}")]
    Spawn {
        backend: String,
        #[source]
        source: std::io::Error,
    },

    /// The worker started but its engine dependencies are missing.
    #[error("{backend} dependencies are not importable: {message}")]
    MissingDependency { backend: String, message: String },

    /// The worker never announced readiness.
    #[error("{backend} render worker did not become ready within {timeout_secs} seconds")]
    Timeout { backend: String, timeout_secs: u64 },

    /// The worker exited or spoke garbage before announcing readiness.
    #[error("{backend} render worker failed during start-up: {message}")]
    Handshake { backend: String, message: String },
}
