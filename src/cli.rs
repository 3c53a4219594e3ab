// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Flag names follow the long-standing `logexec` spelling (`--stdoutLevel`,
//! `--maxline`, `--ignoresig`) so existing service units keep working.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::ConfigOverrides;
use crate::types::{Facility, Severity};

/// Command-line arguments for `logexec`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "logexec",
    version,
    about = "Run a command, sending its stdout and stderr to syslog.",
    long_about = None
)]
pub struct CliArgs {
    /// Syslog facility (e.g. local0, daemon, user).
    #[arg(long, value_name = "FACILITY")]
    pub facility: Option<Facility>,

    /// Syslog severity for lines read from the command's stdout.
    #[arg(long = "stdoutLevel", value_name = "SEVERITY")]
    pub stdout_level: Option<Severity>,

    /// Syslog severity for lines read from the command's stderr.
    #[arg(long = "stderrLevel", value_name = "SEVERITY")]
    pub stderr_level: Option<Severity>,

    /// Tag for all log messages.
    #[arg(long, value_name = "TAG")]
    pub tag: Option<String>,

    /// Maximum amount of text to log in a line.
    #[arg(long = "maxline", value_name = "BYTES")]
    pub max_line: Option<usize>,

    /// Do not pass signals on to the child process.
    #[arg(long = "ignoresig")]
    pub ignore_signals: bool,

    /// Optional TOML config file; CLI flags take precedence over it.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level for logexec's own diagnostics.
    ///
    /// If omitted, `LOGEXEC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Command to run, followed by its arguments.
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

impl CliArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            facility: self.facility,
            stdout_level: self.stdout_level,
            stderr_level: self.stderr_level,
            tag: self.tag.clone(),
            max_line: self.max_line,
            ignore_signals: self.ignore_signals,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
