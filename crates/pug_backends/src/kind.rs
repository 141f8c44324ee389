//! The fixed list of backend kinds the harness knows how to build.

use std::fmt;
use std::str::FromStr;

use crate::backend::Backend;
use crate::driver::{WorkerSession, WorkerSpec};
use crate::engine::DriverBackend;
use crate::error::BackendUnavailable;
use crate::html::HtmlBackend;
use crate::probe::Probe;

/// Custom Jinja2 variable opening delimiter.
pub const JINJA_VARIABLE_START: &str = "{%#.-.**";

/// Custom Jinja2 variable closing delimiter.
pub const JINJA_VARIABLE_END: &str = "**.-.#%}";

/// A template-engine integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BackendKind {
    /// Jinja2 with its default environment
    Jinja2,
    /// Jinja2 with non-default variable delimiters
    Jinja2VariableStartString,
    /// Tornado templates
    Tornado,
    /// Django templates
    Django,
    /// Mako templates
    Mako,
    /// Direct HTML output, no intermediate engine
    Html,
}

impl BackendKind {
    /// Every kind, in registration order.
    pub const ALL: [BackendKind; 6] = [
        BackendKind::Jinja2,
        BackendKind::Jinja2VariableStartString,
        BackendKind::Tornado,
        BackendKind::Django,
        BackendKind::Mako,
        BackendKind::Html,
    ];

    /// Registry name.
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Jinja2 => "Jinja2",
            BackendKind::Jinja2VariableStartString => "Jinja2-variable_start_string",
            BackendKind::Tornado => "Tornado",
            BackendKind::Django => "Django",
            BackendKind::Mako => "Mako",
            BackendKind::Html => "Html",
        }
    }

    /// Worker arguments selecting this kind's engine.
    pub fn worker_spec(&self) -> WorkerSpec {
        match self {
            BackendKind::Jinja2 => WorkerSpec::new("jinja2"),
            BackendKind::Jinja2VariableStartString => WorkerSpec::new("jinja2")
                .option("--variable-start", JINJA_VARIABLE_START)
                .option("--variable-end", JINJA_VARIABLE_END),
            BackendKind::Tornado => WorkerSpec::new("tornado"),
            BackendKind::Django => WorkerSpec::new("django"),
            BackendKind::Mako => WorkerSpec::new("mako"),
            BackendKind::Html => WorkerSpec::new("html"),
        }
    }

    /// Try to build this kind's backend.
    ///
    /// Starts a worker and waits for it to import its engine. Any failure is
    /// reported as [`BackendUnavailable`]; whether that is fatal is up to
    /// the caller.
    pub fn connect(&self, probe: &Probe) -> Result<Box<dyn Backend>, BackendUnavailable> {
        let interpreter = probe.interpreter()?;
        let driver = probe.driver()?;
        let config = probe.config();

        let session = WorkerSession::start(
            self.name(),
            interpreter,
            driver.path(),
            &config.cases_root,
            &self.worker_spec(),
            config.timeout,
            config.inherit_stderr,
        )?;
        let backend = DriverBackend::new(self.name(), session);

        Ok(match self {
            BackendKind::Html => Box::new(HtmlBackend::new(backend, &config.cases_root)),
            _ => Box::new(backend),
        })
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognised backend kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown backend kind '{0}'; expected one of: Jinja2, Jinja2-variable_start_string, Tornado, Django, Mako, Html")]
pub struct UnknownBackendKind(pub String);

impl FromStr for BackendKind {
    type Err = UnknownBackendKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BackendKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownBackendKind(s.to_string()))
    }
}
