//! Template backends for the pugjs conformance harness.
//!
//! Each backend turns Pug-like source into rendered HTML through one
//! template engine. The engines and the Pug compiler live outside this
//! process; this crate only provides a uniform contract over them.
//!
//! # Overview
//!
//! - [`Backend`] - the `process(source, filename)` contract
//! - [`BackendKind`] - the fixed list of engine integrations
//! - [`Probe`] - locates the interpreter and render driver at start-up
//! - [`WorkerSession`] - one long-lived driver process per backend
//! - [`HtmlBackend`] - direct HTML output with include-path rewriting
//!
//! # Architecture
//!
//! Engines run inside a render driver (`driver/render.py`, embedded in the
//! crate). [`BackendKind::connect`] starts one worker per backend, the worker
//! imports its engine and reports readiness, and from then on every
//! [`Backend::process`] call is one JSON request/response line pair.
//!
//! A worker that cannot import its engine makes the kind unavailable. This
//! is reported as [`BackendUnavailable`] and is not a processing error.
//!
//! # Example
//!
//! ```rust,ignore
//! use pug_backends::{BackendKind, Probe, ProbeConfig};
//!
//! let probe = Probe::new(ProbeConfig::new("cases"));
//! match BackendKind::Jinja2.connect(&probe) {
//!     Ok(backend) => println!("{}", backend.process("div Hello", "basic-tag.pug")?),
//!     Err(reason) => println!("Jinja2 unavailable: {reason}"),
//! }
//! ```
//!
//! # Requirements
//!
//! The driver needs a Python interpreter with `pypugjs` and whichever
//! engines should be exercised. The interpreter is searched for in:
//!
//! 1. `ProbeConfig::interpreter`
//! 2. `PUGJS_PYTHON` environment variable
//! 3. `python3` / `python` on PATH

#![forbid(unsafe_code)]

pub mod backend;
pub mod driver;
pub mod engine;
pub mod error;
pub mod html;
pub mod kind;
pub mod probe;

pub use backend::{Backend, FnBackend};
pub use driver::{RenderResponse, WorkerSession, WorkerSpec};
pub use engine::DriverBackend;
pub use error::{BackendError, BackendResult, BackendUnavailable};
pub use html::HtmlBackend;
pub use kind::{BackendKind, JINJA_VARIABLE_END, JINJA_VARIABLE_START, UnknownBackendKind};
pub use probe::{Probe, ProbeConfig, ResolvedDriver};
