//! The uniform processing contract over template engines.

use crate::error::BackendResult;

/// A named pipeline that turns Pug-like source into rendered HTML.
///
/// `filename` is the case name with its `.pug` suffix. Engines that resolve
/// includes or extends relative to a template root need it; engines that
/// render from `source` alone may ignore it.
///
/// # Example
///
/// ```rust,ignore
/// use pug_backends::{Backend, FnBackend};
///
/// let echo = FnBackend::new("Echo", |source: &str, _filename: &str| Ok(source.to_string()));
/// assert_eq!(echo.process("div Hello", "basic-tag.pug")?, "div Hello");
/// ```
pub trait Backend: Send + Sync {
    /// Stable registry name (e.g. `"Jinja2"`, `"Html"`).
    fn name(&self) -> &str;

    /// Compile and render one template.
    fn process(&self, source: &str, filename: &str) -> BackendResult<String>;
}

/// In-process backend backed by a closure.
pub struct FnBackend<F> {
    name: String,
    func: F,
}

impl<F> FnBackend<F>
where
    F: Fn(&str, &str) -> BackendResult<String> + Send + Sync,
{
    /// Wrap a closure under the given backend name.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Backend for FnBackend<F>
where
    F: Fn(&str, &str) -> BackendResult<String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, source: &str, filename: &str) -> BackendResult<String> {
        (self.func)(source, filename)
    }
}

impl std::fmt::Debug for dyn Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend").field("name", &self.name()).finish()
    }
}
