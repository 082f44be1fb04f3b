// Runtime settings for probe execution
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Environment variable holding the per-command timeout in milliseconds
pub const TIMEOUT_ENV: &str = "MACHINE_FINGERPRINT_TIMEOUT_MS";

/// Environment variable overriding the filesystem root used for `/proc` and `/sys` reads
pub const SYSTEM_ROOT_ENV: &str = "MACHINE_FINGERPRINT_SYSTEM_ROOT";

const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintConfig {
    /// Upper bound for every external command a probe runs
    pub command_timeout: Duration,
    /// Root under which pseudo-filesystems are read (Linux only)
    pub system_root: PathBuf,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        FingerprintConfig {
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            system_root: PathBuf::from("/"),
        }
    }
}

impl FingerprintConfig {
    /// Load settings from the process environment, keeping defaults for
    /// anything missing or malformed.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = FingerprintConfig::default();

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(millis) if millis > 0 => {
                    config.command_timeout = Duration::from_millis(millis);
                }
                _ => {
                    warn!(
                        variable = TIMEOUT_ENV,
                        value = %raw,
                        "ignoring invalid command timeout, expected positive milliseconds"
                    );
                }
            }
        }

        if let Some(raw) = lookup(SYSTEM_ROOT_ENV) {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                warn!(variable = SYSTEM_ROOT_ENV, "ignoring empty system root");
            } else {
                config.system_root = PathBuf::from(trimmed);
            }
        }

        config
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn with_system_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.system_root = root.into();
        self
    }
}
