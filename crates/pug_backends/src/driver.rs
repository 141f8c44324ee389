//! Render worker sessions.
//!
//! A worker is one driver process bound to one engine configuration. Requests
//! and responses are single JSON lines; a reader thread forwards stdout lines
//! over a channel so start-up can be bounded by a timeout.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{BackendError, BackendResult, BackendUnavailable};

/// Exit code the driver uses when the engine cannot be imported.
pub const EXIT_MISSING_DEPENDENCY: i32 = 3;

/// Arguments that select and configure an engine inside the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSpec {
    /// Driver engine key (`jinja2`, `tornado`, `django`, `mako`, `html`).
    pub engine: &'static str,
    /// Extra `--flag value` pairs.
    pub options: Vec<(&'static str, String)>,
}

impl WorkerSpec {
    /// Worker for an engine with default options.
    pub fn new(engine: &'static str) -> Self {
        Self {
            engine,
            options: Vec::new(),
        }
    }

    /// Adds a `--flag value` option.
    pub fn option(mut self, flag: &'static str, value: impl Into<String>) -> Self {
        self.options.push((flag, value.into()));
        self
    }
}

#[derive(Debug, Deserialize)]
struct Handshake {
    ready: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    source: &'a str,
    filename: &'a str,
}

/// One response line from the worker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenderResponse {
    /// Rendered output.
    Ok { output: String },
    /// Declared unsupported construct.
    Unsupported { message: String },
    /// Any other engine failure.
    Error { message: String },
}

struct Pipes {
    stdin: ChildStdin,
    lines: Receiver<std::io::Result<String>>,
}

/// A running worker owned by exactly one backend.
pub struct WorkerSession {
    backend: String,
    child: Mutex<Child>,
    pipes: Mutex<Pipes>,
}

impl WorkerSession {
    /// Start a worker and wait for its ready line.
    pub fn start(
        backend: &str,
        interpreter: &Path,
        driver: &Path,
        cases_root: &Path,
        spec: &WorkerSpec,
        timeout: Duration,
        inherit_stderr: bool,
    ) -> Result<Self, BackendUnavailable> {
        let mut cmd = Command::new(interpreter);
        cmd.arg(driver)
            .arg("--engine")
            .arg(spec.engine)
            .arg("--root")
            .arg(cases_root);
        for (flag, value) in &spec.options {
            cmd.arg(flag).arg(value);
        }
        // The protocol is UTF-8 whatever the worker's locale says.
        cmd.env("PYTHONIOENCODING", "utf-8");
        cmd.stdin(Stdio::piped()).stdout(Stdio::piped());
        cmd.stderr(if inherit_stderr {
            Stdio::inherit()
        } else {
            Stdio::null()
        });

        debug!(backend, engine = spec.engine, interpreter = %interpreter.display(), "starting render worker");

        let mut child = cmd.spawn().map_err(|source| BackendUnavailable::Spawn {
            backend: backend.to_string(),
            source,
        })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(BackendUnavailable::Handshake {
                backend: backend.to_string(),
                message: "worker pipes were not captured".to_string(),
            });
        };

        let (tx, lines) = mpsc::channel();
        std::thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        let handshake = match lines.recv_timeout(timeout) {
            Ok(Ok(line)) => serde_json::from_str::<Handshake>(&line).map_err(|e| {
                BackendUnavailable::Handshake {
                    backend: backend.to_string(),
                    message: format!("unreadable ready line {line:?}: {e}"),
                }
            }),
            Ok(Err(e)) => Err(BackendUnavailable::Handshake {
                backend: backend.to_string(),
                message: e.to_string(),
            }),
            Err(RecvTimeoutError::Timeout) => Err(BackendUnavailable::Timeout {
                backend: backend.to_string(),
                timeout_secs: timeout.as_secs(),
            }),
            Err(RecvTimeoutError::Disconnected) => Err(exit_before_ready(backend, &mut child)),
        };

        let handshake = match handshake {
            Ok(handshake) => handshake,
            Err(err) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(err);
            }
        };

        if !handshake.ready {
            let _ = child.kill();
            let _ = child.wait();
            return Err(BackendUnavailable::MissingDependency {
                backend: backend.to_string(),
                message: handshake
                    .message
                    .unwrap_or_else(|| "unknown import failure".to_string()),
            });
        }

        Ok(Self {
            backend: backend.to_string(),
            child: Mutex::new(child),
            pipes: Mutex::new(Pipes { stdin, lines }),
        })
    }

    /// Send one template and wait for the response.
    pub fn render(&self, source: &str, filename: &str) -> BackendResult<RenderResponse> {
        let request = serde_json::to_string(&RenderRequest { source, filename }).map_err(|source| {
            BackendError::Protocol {
                backend: self.backend.clone(),
                source,
            }
        })?;

        let mut pipes = self.pipes.lock();
        let io_err = |source| BackendError::Io {
            backend: self.backend.clone(),
            source,
        };
        pipes.stdin.write_all(request.as_bytes()).map_err(io_err)?;
        pipes.stdin.write_all(b"\n").map_err(io_err)?;
        pipes.stdin.flush().map_err(io_err)?;

        let line = match pipes.lines.recv() {
            Ok(line) => line.map_err(io_err)?,
            Err(_) => {
                return Err(BackendError::WorkerGone {
                    backend: self.backend.clone(),
                    message: "worker closed its output".to_string(),
                });
            }
        };

        serde_json::from_str(&line).map_err(|source| BackendError::Protocol {
            backend: self.backend.clone(),
            source,
        })
    }

    /// Backend name this worker serves.
    pub fn backend(&self) -> &str {
        &self.backend
    }
}

fn exit_before_ready(backend: &str, child: &mut Child) -> BackendUnavailable {
    match child.wait() {
        Ok(status) if status.code() == Some(EXIT_MISSING_DEPENDENCY) => {
            BackendUnavailable::MissingDependency {
                backend: backend.to_string(),
                message: "driver reported missing imports".to_string(),
            }
        }
        Ok(status) => BackendUnavailable::Handshake {
            backend: backend.to_string(),
            message: format!("worker exited with {status} before becoming ready"),
        },
        Err(e) => BackendUnavailable::Handshake {
            backend: backend.to_string(),
            message: e.to_string(),
        },
    }
}

impl Drop for WorkerSession {
    fn drop(&mut self) {
        let child = self.child.get_mut();
        if let Err(e) = child.kill() {
            // Already exited is fine; anything else is worth a note.
            if e.kind() != std::io::ErrorKind::InvalidInput {
                warn!(backend = %self.backend, error = %e, "failed to stop render worker");
            }
        }
        let _ = child.wait();
    }
}

impl std::fmt::Debug for WorkerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerSession")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}
