//! Discovery of the installed lint engine module.
//!
//! Resolution order for a file: the `nodePath` setting (when it exists), the
//! file's own directory (workspace), then the global root of the configured
//! package manager. Results are memoized twice: loaded engines by resolved
//! module path, and resolutions by file path in a bounded LRU cache.

use std::collections::HashMap;
use std::env;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use lru::LruCache;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::LintError;
use crate::engine::{EngineLoader, LintEngine};
use crate::process;
use crate::trust::modules_root;

/// Package name of the engine.
pub const MODULE_NAME: &str = "tslint";

/// Capacity of the per-file resolution cache.
pub const LIBRARY_CACHE_CAPACITY: usize = 100;

/// Default bound on each resolution subprocess.
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Package manager used to find the global engine and to phrase install hints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
}

impl PackageManager {
    pub fn as_str(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
        }
    }

    /// Command that installs the engine into the workspace.
    pub fn local_install_command(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm install tslint",
            PackageManager::Pnpm => "pnpm add tslint",
            PackageManager::Yarn => "yarn add tslint",
        }
    }

    /// Command that installs the engine globally.
    pub fn global_install_command(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm install -g tslint",
            PackageManager::Pnpm => "pnpm add -g tslint",
            PackageManager::Yarn => "yarn global add tslint",
        }
    }

    fn global_root_args(self) -> &'static [&'static str] {
        match self {
            PackageManager::Npm | PackageManager::Pnpm => &["root", "-g"],
            PackageManager::Yarn => &["global", "dir"],
        }
    }
}

/// Resolves the engine module inside an isolated Node environment.
pub trait ModuleResolver: Send + Sync {
    /// Path of the engine's entry module as seen from `cwd`, with
    /// `search_path` prepended to the module search path.
    fn resolve_module(&self, search_path: Option<&Path>, cwd: &Path) -> Option<PathBuf>;

    /// Global module root of `package_manager`.
    fn global_root(&self, package_manager: PackageManager) -> Option<PathBuf>;
}

/// [`ModuleResolver`] backed by the `node` executable and package managers on
/// `PATH`. Every subprocess is bounded by a timeout; a timeout means "not found".
#[derive(Debug, Clone)]
pub struct NodeModuleResolver {
    node: Option<PathBuf>,
    timeout: Duration,
}

impl NodeModuleResolver {
    pub fn new() -> Self {
        Self {
            node: which::which("node").ok(),
            timeout: DEFAULT_RESOLVE_TIMEOUT,
        }
    }

    /// Resolver using an explicit `node` executable.
    pub fn with_node(node: impl Into<PathBuf>) -> Self {
        Self {
            node: Some(node.into()),
            timeout: DEFAULT_RESOLVE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn stdout_of(&self, command: &mut Command) -> Option<String> {
        match process::run(command, None, Some(self.timeout)) {
            Ok(output) if output.success() => {
                let out = output.stdout.trim();
                (!out.is_empty()).then(|| out.to_string())
            }
            Ok(output) => {
                debug!("Resolution command failed: {}", output.stderr.trim());
                None
            }
            Err(LintError::Timeout(ms)) => {
                warn!("Module resolution timed out after {} ms", ms);
                None
            }
            Err(e) => {
                debug!("Resolution command could not run: {}", e);
                None
            }
        }
    }
}

impl Default for NodeModuleResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleResolver for NodeModuleResolver {
    fn resolve_module(&self, search_path: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
        let node = self.node.as_ref()?;

        let mut command = Command::new(node);
        command
            .arg("-e")
            .arg(format!("console.log(require.resolve('{MODULE_NAME}'))"));
        if cwd.is_dir() {
            command.current_dir(cwd);
        }

        if let Some(search_path) = search_path {
            let mut paths = vec![search_path.to_path_buf()];
            if let Some(existing) = env::var_os("NODE_PATH") {
                paths.extend(env::split_paths(&existing));
            }
            match env::join_paths(paths) {
                Ok(joined) => {
                    debug!("NODE_PATH value is: {}", joined.to_string_lossy());
                    command.env("NODE_PATH", joined);
                }
                Err(e) => warn!("Cannot extend NODE_PATH: {}", e),
            }
        }

        self.stdout_of(&mut command).map(PathBuf::from)
    }

    fn global_root(&self, package_manager: PackageManager) -> Option<PathBuf> {
        let program = which::which(package_manager.as_str()).ok()?;
        let mut command = Command::new(program);
        command.args(package_manager.global_root_args());

        let root = PathBuf::from(self.stdout_of(&mut command)?);
        Some(match package_manager {
            PackageManager::Yarn => root.join("node_modules"),
            PackageManager::Npm | PackageManager::Pnpm => root,
        })
    }
}

/// Where a located engine came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibrarySource {
    NodePath,
    Workspace,
    Global,
}

/// A resolved engine module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedLibrary {
    pub module_path: PathBuf,
    pub source: LibrarySource,
}

/// Inputs that decide where to look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocateOptions {
    pub node_path: Option<PathBuf>,
    pub package_manager: PackageManager,
    /// When false only the global installation is considered.
    pub allow_workspace: bool,
}

#[derive(Debug, Clone)]
struct CachedResolution {
    options: LocateOptions,
    located: Option<LocatedLibrary>,
}

/// Locates and loads the engine for each file.
pub struct LibraryLocator {
    resolver: Box<dyn ModuleResolver>,
    loader: Box<dyn EngineLoader>,
    engines: HashMap<PathBuf, Option<Arc<dyn LintEngine>>>,
    recent: LruCache<PathBuf, CachedResolution>,
    global_roots: HashMap<PackageManager, Option<PathBuf>>,
}

impl LibraryLocator {
    pub fn new(resolver: Box<dyn ModuleResolver>, loader: Box<dyn EngineLoader>) -> Self {
        let capacity = NonZeroUsize::new(LIBRARY_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            resolver,
            loader,
            engines: HashMap::new(),
            recent: LruCache::new(capacity),
            global_roots: HashMap::new(),
        }
    }

    /// Resolves the engine module for `file`.
    ///
    /// Warnings about the settings are appended to `warnings` only when the
    /// resolution is not served from the cache.
    pub fn locate(
        &mut self,
        file: &Path,
        options: &LocateOptions,
        warnings: &mut Vec<String>,
    ) -> Option<LocatedLibrary> {
        if let Some(cached) = self.recent.get(file)
            && cached.options == *options
        {
            return cached.located.clone();
        }

        let located = self.resolve(file, options, warnings);
        match &located {
            Some(library) => info!(
                "Resolved {} for {} ({:?})",
                library.module_path.display(),
                file.display(),
                library.source
            ),
            None => info!("No {} library found for {}", MODULE_NAME, file.display()),
        }

        self.recent.put(
            file.to_path_buf(),
            CachedResolution {
                options: options.clone(),
                located: located.clone(),
            },
        );
        located
    }

    fn resolve(
        &mut self,
        file: &Path,
        options: &LocateOptions,
        warnings: &mut Vec<String>,
    ) -> Option<LocatedLibrary> {
        let directory = file.parent().unwrap_or(Path::new("."));

        if !options.allow_workspace {
            return self.resolve_global(options.package_manager);
        }

        if let Some(node_path) = &options.node_path {
            if node_path.exists() {
                if let Some(module_path) = self.resolver.resolve_module(Some(node_path), node_path) {
                    return Some(LocatedLibrary {
                        module_path,
                        source: LibrarySource::NodePath,
                    });
                }
                return self.resolve_global_from(options.package_manager, directory);
            }
            warnings.push(LintError::InvalidNodePath(node_path.clone()).to_string());
        }

        if let Some(module_path) = self.resolver.resolve_module(None, directory) {
            let source = if is_workspace_module(&module_path, directory) {
                LibrarySource::Workspace
            } else {
                LibrarySource::Global
            };
            return Some(LocatedLibrary {
                module_path,
                source,
            });
        }

        self.resolve_global_from(options.package_manager, directory)
    }

    /// Global engine, resolved from the global root so that workspace
    /// installs are invisible.
    fn resolve_global(&mut self, package_manager: PackageManager) -> Option<LocatedLibrary> {
        let root = self.global_root(package_manager)?;
        self.resolver
            .resolve_module(Some(&root), &root)
            .map(|module_path| LocatedLibrary {
                module_path,
                source: LibrarySource::Global,
            })
    }

    fn resolve_global_from(
        &mut self,
        package_manager: PackageManager,
        directory: &Path,
    ) -> Option<LocatedLibrary> {
        let root = self.global_root(package_manager)?;
        self.resolver
            .resolve_module(Some(&root), directory)
            .map(|module_path| LocatedLibrary {
                module_path,
                source: LibrarySource::Global,
            })
    }

    fn global_root(&mut self, package_manager: PackageManager) -> Option<PathBuf> {
        let resolver = &self.resolver;
        self.global_roots
            .entry(package_manager)
            .or_insert_with(|| {
                debug!("Resolving global root for {}", package_manager.as_str());
                resolver.global_root(package_manager)
            })
            .clone()
    }

    /// Loads (or returns the memoized) engine for `module_path`.
    ///
    /// Load failures are memoized as well.
    pub fn engine(&mut self, module_path: &Path) -> Option<Arc<dyn LintEngine>> {
        if let Some(engine) = self.engines.get(module_path) {
            return engine.clone();
        }

        let engine = match self.loader.load(module_path) {
            Ok(engine) => Some(engine),
            Err(e) => {
                warn!("Failed to load {}: {}", module_path.display(), e);
                None
            }
        };
        self.engines.insert(module_path.to_path_buf(), engine.clone());
        engine
    }

    /// Number of files with a cached resolution.
    pub fn cached_files(&self) -> usize {
        self.recent.len()
    }
}

/// True when `module_path` is installed in a `node_modules` directory of
/// `directory` or one of its ancestors.
fn is_workspace_module(module_path: &Path, directory: &Path) -> bool {
    modules_root(module_path)
        .and_then(|root| root.parent().map(Path::to_path_buf))
        .is_some_and(|owner| directory.starts_with(owner))
}
