//! Lint configuration discovery, parsing and caching.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use jsonc_parser::ParseOptions;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::LintError;

/// Rules that corrupt the host's diagnostic bookkeeping when run inside a
/// long-lived language service process.
pub const UNSTABLE_RULES: &[&str] = &["no-unused-variable"];

/// A string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

/// `jsRules` is either a rule map or `true` to reuse compatible `rules`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsRules {
    Inherit(bool),
    Rules(Map<String, Value>),
}

impl Default for JsRules {
    fn default() -> Self {
        JsRules::Rules(Map::new())
    }
}

/// Engine options embedded in a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinterOptions {
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A parsed lint rule configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<OneOrMany>,
    #[serde(default)]
    pub rules: Map<String, Value>,
    #[serde(default)]
    pub js_rules: JsRules,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linter_options: Option<LinterOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_directory: Option<OneOrMany>,
    /// Fields the resolver does not interpret, passed through to the engine.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LintConfiguration {
    /// The engine's built-in configuration, used when no file is found.
    pub fn recommended() -> Self {
        Self {
            extends: Some(OneOrMany::One("tslint:recommended".to_string())),
            ..Self::default()
        }
    }

    /// Removes `rule` from both the primary and the JS rule sets.
    pub fn remove_rule(&mut self, rule: &str) {
        self.rules.remove(rule);
        if let JsRules::Rules(js_rules) = &mut self.js_rules {
            js_rules.remove(rule);
        }
    }

    /// Rewrites relative `linterOptions.exclude` and `rulesDirectory` entries
    /// as absolute paths under `dir`, the directory of the configuration file.
    pub fn resolve_relative_paths(&mut self, dir: &Path) {
        if let Some(options) = self.linter_options.as_mut() {
            for pattern in &mut options.exclude {
                *pattern = resolve_against(dir, pattern);
            }
        }
        if let Some(directories) = self.rules_directory.take() {
            self.rules_directory = Some(OneOrMany::Many(
                directories
                    .into_vec()
                    .iter()
                    .map(|d| resolve_against(dir, d))
                    .collect(),
            ));
        }
    }

    /// Layers `self` over `base`.
    ///
    /// Rules of `self` replace rules of the same name, linter options are
    /// combined key by key, and rule directories and unresolved `extends`
    /// entries accumulate.
    pub fn extending(self, base: LintConfiguration) -> LintConfiguration {
        let mut rules = base.rules;
        rules.extend(self.rules);

        let js_rules = match (base.js_rules, self.js_rules) {
            (base, JsRules::Rules(own)) if own.is_empty() => base,
            (JsRules::Rules(mut base), JsRules::Rules(own)) => {
                base.extend(own);
                JsRules::Rules(base)
            }
            (_, own) => own,
        };

        let linter_options = match (base.linter_options, self.linter_options) {
            (Some(mut base), Some(own)) => {
                if !own.exclude.is_empty() {
                    base.exclude = own.exclude;
                }
                base.other.extend(own.other);
                Some(base)
            }
            (base, own) => own.or(base),
        };

        let concat = |a: Option<OneOrMany>, b: Option<OneOrMany>| -> Option<OneOrMany> {
            let joined: Vec<String> = a
                .into_iter()
                .chain(b)
                .flat_map(OneOrMany::into_vec)
                .collect();
            (!joined.is_empty()).then_some(OneOrMany::Many(joined))
        };

        let mut extra = base.extra;
        extra.extend(self.extra);

        LintConfiguration {
            extends: concat(base.extends, self.extends),
            rules,
            js_rules,
            linter_options,
            rules_directory: concat(base.rules_directory, self.rules_directory),
            extra,
        }
    }

    /// `linterOptions.exclude` patterns, if any.
    pub fn excluded_patterns(&self) -> &[String] {
        self.linter_options
            .as_ref()
            .map(|o| o.exclude.as_slice())
            .unwrap_or_default()
    }

    /// Parses a configuration file (JSON with comments or YAML).
    pub fn from_file(path: &Path) -> Result<Self, LintError> {
        let content = fs::read_to_string(path).map_err(|e| {
            LintError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml(&content),
            Some("json") | None => Self::from_json(&content),
            Some(other) => Err(LintError::config(format!(
                "Unsupported configuration file type '.{}': {}",
                other,
                path.display()
            ))),
        }
    }

    /// Parses JSON configuration; comments and trailing commas are accepted.
    pub fn from_json(json: &str) -> Result<Self, LintError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| LintError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_else(|| Value::Object(Map::new()));

        serde_json::from_value(value)
            .map_err(|e| LintError::config(format!("Invalid configuration: {}", e)))
    }

    /// Parses YAML configuration.
    pub fn from_yaml(yaml: &str) -> Result<Self, LintError> {
        serde_yaml::from_str(yaml)
            .map_err(|e| LintError::config(format!("Invalid YAML: {}", e)))
    }
}

/// Joins a relative `path` onto `dir`, dropping `.` and folding `..` segments.
fn resolve_against(dir: &Path, path: &str) -> String {
    let path = Path::new(path);
    if path.is_absolute() {
        return path.to_string_lossy().into_owned();
    }

    let mut resolved = dir.to_path_buf();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }
    resolved.to_string_lossy().into_owned()
}

/// A configuration found by a [`ConfigDiscovery`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoveredConfiguration {
    pub configuration: Option<LintConfiguration>,
    pub path: Option<PathBuf>,
}

/// The engine's configuration-discovery facility.
pub trait ConfigDiscovery {
    /// Path of the configuration file that applies to `file`, if any.
    fn find_configuration_path(&self, override_path: Option<&Path>, file: &Path) -> Option<PathBuf>;

    /// Loads the configuration that applies to `file`, falling back to the
    /// engine's default when no file exists.
    fn find_configuration(
        &self,
        override_path: Option<&Path>,
        file: &Path,
    ) -> Result<DiscoveredConfiguration, LintError>;
}

/// Filesystem discovery of `tslint.json` / `tslint.yaml` files.
///
/// Search order: the override path, then every directory from the file's
/// parent up to the root, then the user's home directory.
///
/// `extends` entries naming a file (`./base.json`, `../shared`, an absolute
/// path) are loaded and merged here. Built-in and package configurations such
/// as `tslint:recommended` stay in `extends` for the engine to load.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsConfigDiscovery;

impl FsConfigDiscovery {
    /// Recognized configuration file names, in priority order.
    pub const CONFIG_FILES: &'static [&'static str] = &["tslint.json", "tslint.yaml", "tslint.yml"];

    fn find_in(dir: &Path) -> Option<PathBuf> {
        Self::CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// The file an `extends` entry refers to, or `None` for built-in and
    /// package configurations.
    fn extended_file(name: &str, dir: &Path) -> Option<PathBuf> {
        let is_path = name.starts_with("./") || name.starts_with("../") || Path::new(name).is_absolute();
        if !is_path {
            return None;
        }

        let path = PathBuf::from(resolve_against(dir, name));
        if path.extension().is_none() {
            let with_json = path.with_extension("json");
            if with_json.is_file() {
                return Some(with_json);
            }
        }
        Some(path)
    }

    /// Loads `path` with its file-based `extends` chain merged in.
    fn load(path: &Path, chain: &mut Vec<PathBuf>) -> Result<LintConfiguration, LintError> {
        if chain.iter().any(|p| p == path) {
            return Err(LintError::config(format!(
                "Circular extends through {}",
                path.display()
            )));
        }
        chain.push(path.to_path_buf());

        let mut own = LintConfiguration::from_file(path)?;
        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        own.resolve_relative_paths(dir);

        let mut merged = LintConfiguration::default();
        let mut unresolved = Vec::new();
        for name in own.extends.take().map(OneOrMany::into_vec).unwrap_or_default() {
            match Self::extended_file(&name, dir) {
                Some(base_path) => {
                    debug!("{} extends {}", path.display(), base_path.display());
                    merged = Self::load(&base_path, chain)?.extending(merged);
                }
                None => unresolved.push(name),
            }
        }
        if !unresolved.is_empty() {
            own.extends = Some(OneOrMany::Many(unresolved));
        }

        chain.pop();
        Ok(own.extending(merged))
    }
}

impl ConfigDiscovery for FsConfigDiscovery {
    fn find_configuration_path(&self, override_path: Option<&Path>, file: &Path) -> Option<PathBuf> {
        if let Some(path) = override_path {
            return Some(path.to_path_buf());
        }

        if let Some(found) = file.ancestors().skip(1).find_map(Self::find_in) {
            return Some(found);
        }

        dirs::home_dir().and_then(|home| Self::find_in(&home))
    }

    fn find_configuration(
        &self,
        override_path: Option<&Path>,
        file: &Path,
    ) -> Result<DiscoveredConfiguration, LintError> {
        match self.find_configuration_path(override_path, file) {
            Some(path) => {
                if !path.is_file() {
                    return Err(LintError::config(format!(
                        "Could not find config file at: {}",
                        path.display()
                    )));
                }
                debug!("Loading lint configuration from {}", path.display());
                let configuration = Self::load(&path, &mut Vec::new())?;
                Ok(DiscoveredConfiguration {
                    configuration: Some(configuration),
                    path: Some(path),
                })
            }
            None => Ok(DiscoveredConfiguration {
                configuration: Some(LintConfiguration::recommended()),
                path: None,
            }),
        }
    }
}

/// The configuration resolved for one file.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfiguration {
    pub configuration: Option<LintConfiguration>,
    /// True when no project-level configuration was found.
    pub is_default: bool,
    pub path: Option<PathBuf>,
}

/// Resolves configurations through a capacity-1 cache keyed by file path.
///
/// Asking for the same file again returns the cached `Arc` untouched; asking for
/// another file or calling [`ConfigResolver::flush`] forces rediscovery.
#[derive(Debug)]
pub struct ConfigResolver {
    cache: Option<(PathBuf, Arc<ResolvedConfiguration>)>,
    strip_unstable_rules: bool,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self {
            cache: None,
            strip_unstable_rules: true,
        }
    }

    /// Toggles removal of [`UNSTABLE_RULES`]; a change flushes the cache.
    pub fn set_strip_unstable_rules(&mut self, strip: bool) {
        if self.strip_unstable_rules != strip {
            self.strip_unstable_rules = strip;
            self.flush();
        }
    }

    pub fn resolve(
        &mut self,
        discovery: &dyn ConfigDiscovery,
        file: &Path,
        override_path: Option<&Path>,
    ) -> Result<Arc<ResolvedConfiguration>, LintError> {
        if let Some((cached_file, resolved)) = &self.cache
            && cached_file == file
        {
            return Ok(Arc::clone(resolved));
        }

        let is_default = discovery
            .find_configuration_path(override_path, file)
            .is_none();
        let discovered = discovery.find_configuration(override_path, file)?;

        let mut configuration = discovered.configuration;
        if self.strip_unstable_rules
            && let Some(config) = configuration.as_mut()
        {
            for rule in UNSTABLE_RULES {
                config.remove_rule(rule);
            }
        }

        let resolved = Arc::new(ResolvedConfiguration {
            configuration,
            is_default,
            path: discovered.path,
        });

        if let Some(path) = &resolved.path {
            info!("Using lint configuration {}", path.display());
        }

        self.cache = Some((file.to_path_buf(), Arc::clone(&resolved)));
        Ok(resolved)
    }

    /// The most recently resolved configuration.
    pub fn cached(&self) -> Option<&Arc<ResolvedConfiguration>> {
        self.cache.as_ref().map(|(_, resolved)| resolved)
    }

    pub fn flush(&mut self) {
        self.cache = None;
    }
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}
