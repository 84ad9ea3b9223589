//! PID file guarding against a second resident service

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tracing::{debug, warn};

const PID_FILE_NAME: &str = "texta.pid";

/// PID file for the resident service
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// PID file in `$XDG_RUNTIME_DIR`, or the temp dir
    pub fn new() -> Self {
        let dir = dirs::runtime_dir().unwrap_or_else(std::env::temp_dir);
        Self {
            path: dir.join(PID_FILE_NAME),
        }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the PID file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// PID of a live service holding this file, removing stale files
    pub fn is_running(&self) -> Option<u32> {
        let contents = fs::read_to_string(&self.path).ok()?;
        let pid: u32 = contents.trim().parse().ok()?;
        if pid == process::id() {
            return None;
        }

        // Signal 0 only probes for existence
        match kill(Pid::from_raw(pid as i32), None::<Signal>) {
            Ok(()) => Some(pid),
            Err(Errno::ESRCH) => {
                debug!(pid, path = %self.path.display(), "Removing stale PID file");
                let _ = fs::remove_file(&self.path);
                None
            }
            Err(Errno::EPERM) => Some(pid),
            Err(e) => {
                warn!(pid, error = %e, "Could not probe PID file owner");
                None
            }
        }
    }

    /// Write our PID, failing if another service is alive
    pub fn acquire(&self) -> Result<(), PidFileError> {
        if let Some(pid) = self.is_running() {
            return Err(PidFileError::AlreadyRunning(pid));
        }

        fs::write(&self.path, process::id().to_string())
            .map_err(|e| PidFileError::WriteFailed(e.to_string()))
    }

    /// Remove the file if it still holds our PID
    pub fn release(&self) -> Result<(), PidFileError> {
        let ours = fs::read_to_string(&self.path)
            .ok()
            .and_then(|c| c.trim().parse::<u32>().ok())
            == Some(process::id());
        if ours {
            fs::remove_file(&self.path).map_err(|e| PidFileError::RemoveFailed(e.to_string()))?;
        }
        Ok(())
    }
}

impl Default for PidFile {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

/// PID file errors
#[derive(Debug, thiserror::Error)]
pub enum PidFileError {
    #[error("Another Texta service is already running (PID: {0})")]
    AlreadyRunning(u32),

    #[error("Failed to write PID file: {0}")]
    WriteFailed(String),

    #[error("Failed to remove PID file: {0}")]
    RemoveFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_path_ends_with_file_name() {
        assert!(PidFile::new().path().ends_with(PID_FILE_NAME));
    }

    #[test]
    fn is_running_returns_none_for_missing_file() {
        let dir = TempDir::new().unwrap();
        let pid_file = PidFile::with_path(dir.path().join("missing.pid"));
        assert!(pid_file.is_running().is_none());
    }

    #[test]
    fn acquire_then_release() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("texta.pid");
        let pid_file = PidFile::with_path(&path);

        pid_file.acquire().unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            process::id().to_string()
        );

        pid_file.release().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn garbage_pid_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("texta.pid");
        fs::write(&path, "not-a-pid").unwrap();

        let pid_file = PidFile::with_path(&path);
        assert!(pid_file.is_running().is_none());
        pid_file.acquire().unwrap();
    }

    #[test]
    fn release_leaves_foreign_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("texta.pid");
        fs::write(&path, "1").unwrap();

        let pid_file = PidFile::with_path(&path);
        pid_file.release().unwrap();
        assert!(path.exists());
    }
}
