//! Scratch-file guard for one run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Owns a run's scratch directory and the temporary files registered in it.
///
/// Everything is removed on drop, whichever way the run exits. Cleanup
/// failures are logged, never raised, so they cannot mask the error that
/// ended the run.
#[derive(Debug)]
pub struct WorkingScope {
    dir: PathBuf,
    files: Vec<PathBuf>,
    created_dir: bool,
}

impl WorkingScope {
    pub fn create(dir: &Path) -> io::Result<Self> {
        let created_dir = !dir.exists();
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            files: Vec::new(),
            created_dir,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a new temporary file inside the scope, registered for removal.
    pub fn temp_path(&mut self, name: &str) -> PathBuf {
        let path = self.dir.join(name);
        self.register(path.clone());
        path
    }

    pub fn register(&mut self, path: PathBuf) {
        if !self.files.contains(&path) {
            self.files.push(path);
        }
    }

    pub fn registered(&self) -> &[PathBuf] {
        &self.files
    }
}

impl Drop for WorkingScope {
    fn drop(&mut self) {
        for path in self.files.drain(..) {
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "removed temporary file"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "failed to remove temporary file"),
            }
        }
        if self.created_dir
            && let Err(e) = fs::remove_dir_all(&self.dir)
            && e.kind() != io::ErrorKind::NotFound
        {
            warn!(dir = %self.dir.display(), error = %e, "failed to remove working directory");
        }
    }
}
