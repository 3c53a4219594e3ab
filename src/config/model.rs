// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::types::{Facility, Severity};

/// Local syslog sockets tried in order, first as datagram sockets and then as
/// stream sockets.
pub const DEFAULT_SOCKET_PATHS: &[&str] = &[
    "/run/systemd/journal/syslog",
    "/dev/log",
    "/var/run/syslog",
    "/var/run/log",
];

pub const DEFAULT_MAX_LINE: usize = 8 * 1024;
pub const DEFAULT_TAG: &str = "logexec";
pub const DEFAULT_EOF_GRACE_MS: u64 = 200;

/// Optional configuration file as read from TOML.
///
/// ```toml
/// facility = "local3"
/// stdout_level = "info"
/// stderr_level = "err"
/// tag = "myapp"
/// max_line = 4096
/// ignore_signals = false
/// eof_grace_ms = 200
/// socket_paths = ["/dev/log"]
/// ```
///
/// Every key is optional; anything missing falls back to the CLI flag or the
/// built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub facility: Option<Facility>,

    #[serde(default)]
    pub stdout_level: Option<Severity>,

    #[serde(default)]
    pub stderr_level: Option<Severity>,

    #[serde(default)]
    pub tag: Option<String>,

    /// Maximum bytes of text logged per line.
    #[serde(default)]
    pub max_line: Option<usize>,

    /// Do not pass signals on to the child.
    #[serde(default)]
    pub ignore_signals: Option<bool>,

    /// How long a premature EOF waits for the child's exit to show up
    /// before it is treated as fatal.
    #[serde(default)]
    pub eof_grace_ms: Option<u64>,

    #[serde(default)]
    pub socket_paths: Option<Vec<PathBuf>>,
}

/// Fully resolved settings for one supervised run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorConfig {
    pub facility: Facility,
    pub stdout_level: Severity,
    pub stderr_level: Severity,
    pub tag: String,
    pub max_line: usize,
    pub ignore_signals: bool,
    pub eof_grace: Duration,
    pub socket_paths: Vec<PathBuf>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            facility: Facility::Local0,
            stdout_level: Severity::Info,
            stderr_level: Severity::Warning,
            tag: DEFAULT_TAG.to_string(),
            max_line: DEFAULT_MAX_LINE,
            ignore_signals: false,
            eof_grace: Duration::from_millis(DEFAULT_EOF_GRACE_MS),
            socket_paths: DEFAULT_SOCKET_PATHS.iter().map(PathBuf::from).collect(),
        }
    }
}

/// Values given on the command line; they win over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub facility: Option<Facility>,
    pub stdout_level: Option<Severity>,
    pub stderr_level: Option<Severity>,
    pub tag: Option<String>,
    pub max_line: Option<usize>,
    pub ignore_signals: bool,
}

impl SupervisorConfig {
    /// Layer the config file and CLI overrides on top of the defaults.
    pub fn resolve(file: ConfigFile, overrides: ConfigOverrides) -> Self {
        let defaults = SupervisorConfig::default();

        Self {
            facility: overrides
                .facility
                .or(file.facility)
                .unwrap_or(defaults.facility),
            stdout_level: overrides
                .stdout_level
                .or(file.stdout_level)
                .unwrap_or(defaults.stdout_level),
            stderr_level: overrides
                .stderr_level
                .or(file.stderr_level)
                .unwrap_or(defaults.stderr_level),
            tag: overrides.tag.or(file.tag).unwrap_or(defaults.tag),
            max_line: overrides
                .max_line
                .or(file.max_line)
                .unwrap_or(defaults.max_line),
            // A bare flag can only switch this on.
            ignore_signals: overrides.ignore_signals
                || file.ignore_signals.unwrap_or(defaults.ignore_signals),
            eof_grace: file
                .eof_grace_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.eof_grace),
            socket_paths: file.socket_paths.unwrap_or(defaults.socket_paths),
        }
    }
}
