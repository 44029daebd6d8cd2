//! Plugin composition root.

use std::sync::Arc;

use lintweave_core::LintRunner;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info};

use crate::ServiceError;
use crate::adapter::DecoratedLanguageService;
use crate::host::{LanguageService, ProjectHost};
use crate::settings::Settings;
use crate::state::{PluginState, SharedState};
use crate::watcher::{ConfigFileWatcher, reload_settings};

/// One plugin instance per host project.
pub struct LintPlugin {
    host: Arc<dyn ProjectHost>,
    state: SharedState,
    watcher: Arc<ConfigFileWatcher>,
}

impl LintPlugin {
    /// Plugin running the engine through `node`.
    pub fn new(host: Arc<dyn ProjectHost>, settings: Settings) -> Self {
        Self::with_runner(host, settings, LintRunner::with_node())
    }

    pub fn with_runner(host: Arc<dyn ProjectHost>, settings: Settings, runner: LintRunner) -> Self {
        let state = Arc::new(Mutex::new(PluginState::new(settings, runner)));
        let watcher = Arc::new(ConfigFileWatcher::new(
            Arc::downgrade(&host),
            Arc::downgrade(&state),
        ));
        Self {
            host,
            state,
            watcher,
        }
    }

    /// Plugin configured from the project configuration's plugin entry,
    /// with defaults when the entry is missing. The project configuration is
    /// watched for later changes.
    pub fn from_project_config(
        host: Arc<dyn ProjectHost>,
        runner: LintRunner,
    ) -> Result<Self, ServiceError> {
        let settings = match host.project_config_path() {
            Some(path) => reload_settings(host.as_ref(), &path)?.unwrap_or_default(),
            None => Settings::default(),
        };
        let plugin = Self::with_runner(host, settings, runner);
        plugin.watcher.watch_project_config();
        Ok(plugin)
    }

    /// Wraps `service` with lint results. A service that is already decorated
    /// is returned as is.
    pub fn decorate(&self, service: Arc<dyn LanguageService>) -> Arc<dyn LanguageService> {
        if service.is_lint_decorated() {
            debug!("Language service is already decorated");
            return service;
        }

        info!("Decorating language service");
        Arc::new(DecoratedLanguageService::new(
            service,
            Arc::clone(&self.host),
            Arc::clone(&self.state),
            Arc::clone(&self.watcher),
        ))
    }

    /// Replaces the settings from a plugin settings block and refreshes
    /// diagnostics.
    pub fn configure(&self, value: &Value) -> Result<(), ServiceError> {
        let settings = Settings::from_value(value, &self.host.current_directory())?;
        self.set_settings(settings);
        Ok(())
    }

    pub fn set_settings(&self, settings: Settings) {
        info!("Plugin settings changed");
        self.state.lock().settings = settings;
        self.host.refresh_diagnostics();
    }

    pub fn settings(&self) -> Settings {
        self.state.lock().settings.clone()
    }

    pub fn watcher(&self) -> &ConfigFileWatcher {
        &self.watcher
    }
}

impl Drop for LintPlugin {
    fn drop(&mut self) {
        self.watcher.dispose_all();
    }
}
