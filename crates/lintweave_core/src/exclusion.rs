//! File exclusion policy.

use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};
use tracing::warn;

/// True for TypeScript declaration files.
pub fn is_definition_file(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".d.ts")
}

/// True for JavaScript sources (`.js`, `.jsx`, `.mjs`, `.cjs`).
pub fn is_js_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            matches!(
                ext.to_ascii_lowercase().as_str(),
                "js" | "jsx" | "mjs" | "cjs"
            )
        })
}

/// A compiled list of exclusion globs.
///
/// `*` does not cross path separators and dotfiles are matched like any other
/// file.
#[derive(Debug, Clone, Default)]
pub struct ExclusionPatterns {
    matchers: Vec<GlobMatcher>,
}

impl ExclusionPatterns {
    /// Compiles `patterns`; invalid globs are logged and ignored.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let matchers = patterns
            .iter()
            .filter_map(|pattern| {
                let pattern = pattern.as_ref();
                match GlobBuilder::new(pattern).literal_separator(true).build() {
                    Ok(glob) => Some(glob.compile_matcher()),
                    Err(e) => {
                        warn!("Ignoring invalid exclude pattern '{}': {}", pattern, e);
                        None
                    }
                }
            })
            .collect();

        Self { matchers }
    }

    /// Tests `file` relative to `cwd` (when given) and as an absolute path;
    /// either match excludes it.
    pub fn is_excluded(&self, file: &Path, cwd: Option<&Path>) -> bool {
        if self.matchers.is_empty() {
            return false;
        }

        if let Some(relative) = cwd.and_then(|cwd| pathdiff::diff_paths(file, cwd))
            && relative.as_path() != file
            && self.matchers.iter().any(|m| m.is_match(&relative))
        {
            return true;
        }

        self.matchers.iter().any(|m| m.is_match(file))
    }
}
