//! Plain HTML backend.
//!
//! Compiles straight to HTML with no intermediate engine. The HTML compiler
//! resolves `include` paths against its working directory rather than a
//! template root, so include lines are rewritten to point into the fixture
//! root before the source is handed over.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::backend::Backend;
use crate::engine::DriverBackend;
use crate::error::BackendResult;

static INCLUDE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([ \t]*include )(.+)$").expect("include pattern is valid"));

/// HTML passthrough backend with include-path rewriting.
#[derive(Debug)]
pub struct HtmlBackend {
    inner: DriverBackend,
    include_prefix: String,
}

impl HtmlBackend {
    /// Wrap a worker running the `html` engine.
    pub fn new(inner: DriverBackend, cases_root: &Path) -> Self {
        Self {
            inner,
            include_prefix: include_prefix(cases_root),
        }
    }
}

impl Backend for HtmlBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn process(&self, source: &str, filename: &str) -> BackendResult<String> {
        let source = rewrite_includes(source, &self.include_prefix);
        self.inner.process(&source, filename)
    }
}

/// Directory prefix (with trailing `/`) for rewritten include paths.
pub fn include_prefix(cases_root: &Path) -> String {
    let mut prefix = cases_root.to_string_lossy().replace('\\', "/");
    if !prefix.ends_with('/') {
        prefix.push('/');
    }
    prefix
}

/// Prefix every `include <path>` line's path with `prefix`.
///
/// Lines already pointing into the prefix are left alone, as is source with
/// no include at all.
pub fn rewrite_includes(source: &str, prefix: &str) -> String {
    if !source.contains("include") {
        return source.to_string();
    }

    INCLUDE_LINE
        .replace_all(source, |caps: &Captures<'_>| {
            let keyword = &caps[1];
            let path = &caps[2];
            if path.starts_with(prefix) {
                format!("{keyword}{path}")
            } else {
                format!("{keyword}{prefix}{path}")
            }
        })
        .into_owned()
}
