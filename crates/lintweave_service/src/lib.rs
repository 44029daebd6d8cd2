//! # lintweave_service
//!
//! Language service decoration for lintweave.
//!
//! This crate provides:
//! - The host model (`LanguageService`, `ProjectHost`, diagnostics, fixes)
//! - Plugin `Settings` validated against an embedded schema
//! - The decorated language service serving lint diagnostics and code fixes
//! - Watches on lint and project configuration files
//!
//! ## Example
//!
//! ```rust,ignore
//! use lintweave_service::{LintPlugin, Settings};
//!
//! let plugin = LintPlugin::new(host.clone(), Settings::default());
//! let service = plugin.decorate(service);
//! let diagnostics = service.semantic_diagnostics("/work/src/main.ts");
//! ```

mod adapter;
pub mod conversion;
mod error;
pub mod fixes;
pub mod host;
mod plugin;
mod settings;
mod state;
mod watcher;

pub use adapter::DecoratedLanguageService;
pub use error::ServiceError;
pub use host::{
    CodeFixAction, CombinedCodeActions, CombinedCodeFixScope, Diagnostic, DiagnosticCategory,
    Disposable, FileTextChanges, FileWatchEvent, LanguageService, ProjectHost, TextChange,
    TextSpan, WatchCallback,
};
pub use plugin::LintPlugin;
pub use settings::{PLUGIN_NAMES, Settings};
pub use watcher::ConfigFileWatcher;
