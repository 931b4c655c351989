use std::path::PathBuf;
use std::time::Duration;

/// Well-known name of the shell's IPC endpoint.
pub const SERVICE_NAME: &str = "com.cove-shell.extension";

/// Where the shell installs itself by default.
pub const DEFAULT_INSTALL_PATH: &str = "/Applications/Cove.app";

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Connection settings for one application's session with the shell.
///
/// `application_id` identifies the caller to the host; it rides along on
/// every dismiss request so the host can scope lookups per application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostConfig {
    pub application_id: String,
    /// Filesystem location probed to decide whether the shell is installed.
    pub install_path: PathBuf,
    /// Unix socket the shell listens on.
    pub socket_path: PathBuf,
    /// Upper bound on how long any single request may wait for a reply.
    pub request_timeout_ms: u64,
}

impl HostConfig {
    pub fn new(application_id: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            install_path: PathBuf::from(DEFAULT_INSTALL_PATH),
            socket_path: PathBuf::from(format!("/tmp/{SERVICE_NAME}.sock")),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }

    pub fn with_socket_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.socket_path = path.into();
        self
    }

    pub fn with_install_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.install_path = path.into();
        self
    }

    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
