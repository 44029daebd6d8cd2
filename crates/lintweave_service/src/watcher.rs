//! File watches on lint configuration files and the project configuration.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Weak;

use jsonc_parser::ParseOptions;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::ServiceError;
use crate::host::{Disposable, FileWatchEvent, ProjectHost};
use crate::settings::Settings;
use crate::state::PluginState;

/// Registers each watched file with the host exactly once.
///
/// Callbacks hold weak references only, so a disposed plugin never keeps the
/// host alive.
pub struct ConfigFileWatcher {
    host: Weak<dyn ProjectHost>,
    state: Weak<Mutex<PluginState>>,
    watched: Mutex<HashMap<PathBuf, Box<dyn Disposable>>>,
}

impl ConfigFileWatcher {
    pub(crate) fn new(host: Weak<dyn ProjectHost>, state: Weak<Mutex<PluginState>>) -> Self {
        Self {
            host,
            state,
            watched: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_watching(&self, path: &Path) -> bool {
        self.watched.lock().contains_key(path)
    }

    /// Watches a lint configuration file. A change flushes the runner's
    /// configuration cache and refreshes diagnostics.
    pub fn ensure_watching(&self, path: &Path) {
        let mut watched = self.watched.lock();
        if watched.contains_key(path) {
            return;
        }
        let Some(host) = self.host.upgrade() else {
            return;
        };

        debug!("Watching lint configuration {}", path.display());
        let weak_host = self.host.clone();
        let weak_state = self.state.clone();
        let handle = host.watch_file(
            path,
            Box::new(move |changed, event| {
                if event != FileWatchEvent::Changed {
                    return;
                }
                let (Some(host), Some(state)) = (weak_host.upgrade(), weak_state.upgrade()) else {
                    return;
                };
                state.lock().runner.on_config_file_change(changed);
                host.refresh_diagnostics();
            }),
        );
        watched.insert(path.to_path_buf(), handle);
    }

    /// Watches the project configuration. A change re-reads the plugin entry
    /// and replaces the settings.
    pub fn watch_project_config(&self) {
        let Some(host) = self.host.upgrade() else {
            return;
        };
        let Some(path) = host.project_config_path() else {
            debug!("No project configuration to watch");
            return;
        };

        let mut watched = self.watched.lock();
        if watched.contains_key(&path) {
            return;
        }

        info!("Watching project configuration {}", path.display());
        let weak_host = self.host.clone();
        let weak_state = self.state.clone();
        let handle = host.watch_file(
            &path,
            Box::new(move |changed, event| {
                if event != FileWatchEvent::Changed {
                    return;
                }
                let (Some(host), Some(state)) = (weak_host.upgrade(), weak_state.upgrade()) else {
                    return;
                };
                match reload_settings(host.as_ref(), changed) {
                    Ok(Some(settings)) => {
                        info!("Plugin settings reloaded from {}", changed.display());
                        state.lock().settings = settings;
                        host.refresh_diagnostics();
                    }
                    Ok(None) => debug!("No plugin entry in {}", changed.display()),
                    Err(e) => warn!("{}", e),
                }
            }),
        );
        watched.insert(path, handle);
    }

    /// Drops every watch.
    pub fn dispose_all(&self) {
        for (_, mut handle) in self.watched.lock().drain() {
            handle.dispose();
        }
    }
}

/// Reads the plugin entry of the project configuration at `path`.
pub(crate) fn reload_settings(
    host: &dyn ProjectHost,
    path: &Path,
) -> Result<Option<Settings>, ServiceError> {
    let project_config_error = |message: String| ServiceError::ProjectConfig {
        path: path.display().to_string(),
        message,
    };

    let text = host
        .read_project_config(path)
        .map_err(|e| project_config_error(e.to_string()))?;
    let value = jsonc_parser::parse_to_serde_value(&text, &ParseOptions::default())
        .map_err(|e| project_config_error(e.to_string()))?
        .unwrap_or(Value::Null);

    Settings::find_plugin_entry(&value)
        .map(|entry| Settings::from_value(entry, &host.current_directory()))
        .transpose()
}
