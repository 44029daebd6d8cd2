//! # lintweave_core
//!
//! Lint-result reconciliation engine for lintweave.
//!
//! This crate provides:
//! - The `LintRunner` orchestrating one lint pass per file
//! - Engine module discovery with workspace trust
//! - Lint configuration discovery and caching
//! - The position-keyed `ProblemStore`
//! - Reconciliation of overlapping fixes
//!
//! ## Example
//!
//! ```rust,ignore
//! use lintweave_core::{LintRunner, LintSource, RunConfiguration};
//!
//! let mut runner = LintRunner::with_node();
//! let result = runner.run(path, LintSource::Text(&content), &RunConfiguration::default())?;
//! for failure in &result.failures {
//!     println!("{}: {} ({})", failure.start, failure.message, failure.rule());
//! }
//! ```

pub mod config;
pub mod engine;
mod error;
pub mod exclusion;
mod failure;
pub mod locator;
pub mod process;
mod problems;
mod reconcile;
mod runner;
pub mod trust;
mod workdir;

pub use config::{
    ConfigDiscovery, ConfigResolver, DiscoveredConfiguration, FsConfigDiscovery,
    LintConfiguration, ResolvedConfiguration,
};
pub use engine::{EngineLoader, EngineWarnings, LintEngine, LintOutput, LintRequest};
pub use error::LintError;
pub use failure::{Failure, Replacement, filter_failures_for_file, normalize_path};
pub use locator::{LibraryLocator, ModuleResolver, PackageManager};
pub use problems::{Problem, ProblemStore};
pub use reconcile::{AppliedFixes, apply_replacements, non_overlapping_replacements};
pub use runner::{
    LintRunner, LintSource, ProgramView, RunConfiguration, RunOutcome, RunResult, TraceLevel,
    install_failure_message,
};
pub use trust::WorkspaceTrust;
pub use workdir::WorkingDirectoryGuard;
