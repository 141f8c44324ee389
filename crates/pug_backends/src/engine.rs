//! Backends that delegate to a render worker.

use crate::backend::Backend;
use crate::driver::{RenderResponse, WorkerSession};
use crate::error::{BackendError, BackendResult};

/// A backend whose engine runs in a dedicated worker process.
///
/// The worker holds the engine environment (template loader, delimiter
/// settings, compiled-template cache) for the lifetime of the backend.
#[derive(Debug)]
pub struct DriverBackend {
    name: String,
    session: WorkerSession,
}

impl DriverBackend {
    /// Wrap a started worker.
    pub fn new(name: impl Into<String>, session: WorkerSession) -> Self {
        Self {
            name: name.into(),
            session,
        }
    }
}

impl Backend for DriverBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, source: &str, filename: &str) -> BackendResult<String> {
        match self.session.render(source, filename)? {
            RenderResponse::Ok { output } => Ok(output),
            RenderResponse::Unsupported { message } => {
                Err(BackendError::unsupported(&self.name, filename, message))
            }
            RenderResponse::Error { message } => {
                Err(BackendError::render(&self.name, filename, message))
            }
        }
    }
}
