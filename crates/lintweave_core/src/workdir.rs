//! Scoped change of the process working directory.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, MutexGuard, const_mutex};
use tracing::{debug, warn};

static CWD_LOCK: Mutex<()> = const_mutex(());

/// Holds the process working directory at `dir` until dropped.
///
/// Guards are serialized by a process-wide lock, so a second guard blocks until
/// the first one has restored the previous directory.
#[derive(Debug)]
pub struct WorkingDirectoryGuard {
    previous: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl WorkingDirectoryGuard {
    pub fn change_to(dir: &Path) -> io::Result<Self> {
        let lock = CWD_LOCK.lock();
        let previous = env::current_dir()?;
        env::set_current_dir(dir)?;
        debug!("Changed directory to {}", dir.display());

        Ok(Self {
            previous,
            _lock: lock,
        })
    }

    /// Directory restored on drop.
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for WorkingDirectoryGuard {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.previous) {
            warn!(
                "Failed to restore working directory {}: {}",
                self.previous.display(),
                e
            );
        }
    }
}
