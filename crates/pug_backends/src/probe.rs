//! Start-up capability probe.
//!
//! Locates the interpreter and render driver once, then lets each
//! [`BackendKind`](crate::BackendKind) try to start its worker against them.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::BackendUnavailable;

const EMBEDDED_DRIVER_PY: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/driver/render.py"));

/// Default time a worker gets to announce readiness.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 30;

/// Interpreter override environment variable.
pub const INTERPRETER_ENV: &str = "PUGJS_PYTHON";

/// Driver script override environment variable.
pub const DRIVER_ENV: &str = "PUGJS_DRIVER";

/// Configuration for probing backends.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Fixture root; engines resolve templates and includes against it.
    pub cases_root: PathBuf,
    /// Explicit interpreter path.
    pub interpreter: Option<PathBuf>,
    /// Explicit driver script path.
    pub driver: Option<PathBuf>,
    /// How long a worker may take to report readiness.
    pub timeout: Duration,
    /// Let worker stderr through to ours.
    pub inherit_stderr: bool,
}

impl ProbeConfig {
    /// Creates a config rooted at the given fixture directory.
    pub fn new(cases_root: impl Into<PathBuf>) -> Self {
        Self {
            cases_root: cases_root.into(),
            interpreter: None,
            driver: None,
            timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            inherit_stderr: false,
        }
    }

    /// Sets the interpreter path.
    pub fn interpreter(mut self, path: impl Into<PathBuf>) -> Self {
        self.interpreter = Some(path.into());
        self
    }

    /// Sets the driver script path.
    pub fn driver(mut self, path: impl Into<PathBuf>) -> Self {
        self.driver = Some(path.into());
        self
    }

    /// Sets the readiness timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Lets worker stderr through.
    pub fn inherit_stderr(mut self, inherit: bool) -> Self {
        self.inherit_stderr = inherit;
        self
    }
}

/// A located driver script; keeps the temp file alive when embedded.
#[derive(Debug)]
pub struct ResolvedDriver {
    path: PathBuf,
    _tempfile: Option<tempfile::NamedTempFile>,
}

impl ResolvedDriver {
    /// Path handed to the interpreter.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this is the embedded copy written to a temp file.
    pub fn is_embedded(&self) -> bool {
        self._tempfile.is_some()
    }
}

/// Interpreter and driver resolved once for all backend kinds.
#[derive(Debug)]
pub struct Probe {
    config: ProbeConfig,
    interpreter: Result<PathBuf, String>,
    driver: Result<ResolvedDriver, DriverProblem>,
}

/// Remembered driver resolution failure.
#[derive(Debug)]
enum DriverProblem {
    NotFound(PathBuf),
    Write(String),
}

impl Probe {
    /// Resolve the interpreter and driver for the given config.
    ///
    /// Failures are remembered rather than returned: a missing interpreter
    /// makes every kind unavailable, which the registry decides how to treat.
    pub fn new(config: ProbeConfig) -> Self {
        let interpreter = find_interpreter(&config).map_err(|tried| tried.join(", "));
        let driver = resolve_driver(&config).map_err(|err| match err {
            BackendUnavailable::DriverNotFound { path } => DriverProblem::NotFound(path),
            other => DriverProblem::Write(other.to_string()),
        });
        Self {
            config,
            interpreter,
            driver,
        }
    }

    /// The config this probe was built from.
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// The located interpreter.
    pub fn interpreter(&self) -> Result<&Path, BackendUnavailable> {
        self.interpreter
            .as_deref()
            .map_err(|tried| BackendUnavailable::InterpreterNotFound {
                tried: tried.clone(),
            })
    }

    /// The located driver script.
    pub fn driver(&self) -> Result<&ResolvedDriver, BackendUnavailable> {
        match &self.driver {
            Ok(driver) => Ok(driver),
            Err(DriverProblem::NotFound(path)) => {
                Err(BackendUnavailable::DriverNotFound { path: path.clone() })
            }
            Err(DriverProblem::Write(message)) => Err(BackendUnavailable::DriverWrite(
                std::io::Error::other(message.clone()),
            )),
        }
    }
}

/// Find the interpreter: config, else `PUGJS_PYTHON`, else PATH.
///
/// On failure returns the candidates that were tried.
fn find_interpreter(config: &ProbeConfig) -> Result<PathBuf, Vec<String>> {
    let mut tried = Vec::new();

    if let Some(ref path) = config.interpreter {
        if path.exists() {
            return Ok(path.clone());
        }
        if let Ok(found) = which::which(path) {
            return Ok(found);
        }
        // An explicit choice is never swapped for whatever is on PATH.
        return Err(vec![path.display().to_string()]);
    }

    if let Ok(path) = std::env::var(INTERPRETER_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(path);
        }
        tried.push(format!("{INTERPRETER_ENV}={}", path.display()));
    }

    let names: &[&str] = if cfg!(windows) {
        &["python.exe", "py.exe", "python3.exe"]
    } else {
        &["python3", "python"]
    };

    for name in names {
        if let Ok(path) = which::which(name) {
            return Ok(path);
        }
        tried.push((*name).to_string());
    }

    Err(tried)
}

fn resolve_driver(config: &ProbeConfig) -> Result<ResolvedDriver, BackendUnavailable> {
    if let Some(ref path) = config.driver {
        if path.exists() {
            return Ok(ResolvedDriver {
                path: path.clone(),
                _tempfile: None,
            });
        }
        return Err(BackendUnavailable::DriverNotFound { path: path.clone() });
    }

    if let Ok(path) = std::env::var(DRIVER_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(ResolvedDriver {
                path,
                _tempfile: None,
            });
        }
        return Err(BackendUnavailable::DriverNotFound { path });
    }

    let mut file = tempfile::Builder::new()
        .prefix("pugjs_render_driver_")
        .suffix(".py")
        .tempfile()
        .map_err(BackendUnavailable::DriverWrite)?;
    file.write_all(EMBEDDED_DRIVER_PY.as_bytes())
        .map_err(BackendUnavailable::DriverWrite)?;
    file.flush().map_err(BackendUnavailable::DriverWrite)?;

    Ok(ResolvedDriver {
        path: file.path().to_path_buf(),
        _tempfile: Some(file),
    })
}
