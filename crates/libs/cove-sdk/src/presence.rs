//! Host installation detection.
//!
//! Presence is a trait so the session can be exercised in tests without a
//! real shell install on disk.

use std::path::PathBuf;

/// Answers "is the Cove shell installed on this machine?".
pub trait HostPresence: Send + Sync {
    fn is_installed(&self) -> bool;
}

/// Production probe: the shell is considered installed when its bundle
/// exists at the configured path.
#[derive(Clone, Debug)]
pub struct InstallProbe {
    path: PathBuf,
}

impl InstallProbe {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HostPresence for InstallProbe {
    fn is_installed(&self) -> bool {
        self.path.exists()
    }
}

/// Test double that reports a fixed answer.
#[derive(Clone, Copy, Debug)]
pub struct FixedPresence(pub bool);

impl HostPresence for FixedPresence {
    fn is_installed(&self) -> bool {
        self.0
    }
}
