#![allow(clippy::all)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]
#![allow(clippy::style)]
//! Cross-backend conformance harness for the pugjs template transpiler
//!
//! Every case in the fixture store is a `.pug` source with the `.html` it
//! must render to. The harness runs each case through every registered
//! template backend and compares the output exactly (after stripping
//! leading and trailing newlines).
//!
//! ## Architecture
//!
//! - **FixtureStore**: case discovery and loading from `cases/`
//! - **BackendRegistry**: backends that passed the start-up probe
//! - **ExclusionTable**: per-backend cases that are never run
//! - **CaseGenerator**: lazy, restartable (case, backend) enumeration
//! - **CaseRunner**: load, process, normalise, compare
//! - **TestRunner** / **TestLogger**: suite execution and result lines
//! - **Report**: JSON and Markdown summaries
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pugjs_conformance::prelude::*;
//!
//! let config = HarnessConfig::load_or_default(None)?;
//! let suite = Suite::from_config(&config)?;
//! let summary = suite.run(&mut TestLogger::new())?;
//! assert!(summary.is_success());
//! ```

#![forbid(unsafe_code)]


// Re-export the backends under test for convenience
pub use pug_backends;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{ConfigError, HarnessConfig};
    pub use crate::harness::{
        BackendRegistry, CaseGenerator, CaseRunner, CompareResult, ExclusionTable, FixtureError,
        FixtureResult, FixtureStore, Invocation, LogLevel, Mismatch, NullSink, Outcome,
        OutputComparator, OutputFormat, RegistryError, Report, ReportFormat, ResultSink, RunError,
        RunStatus, Suite, SuiteError, TestLogger, TestRunResult, TestRunner, TestSummary,
    };
    pub use pug_backends::{Backend, BackendError, BackendKind, BackendUnavailable, FnBackend};
}
