// src/errors.rs

//! Crate-wide error types.
//!
//! - [`LogexecError`] covers everything that can go wrong before the
//!   supervisor loop starts (config, syslog connection, spawning).
//! - [`StreamError`] is the terminal condition of a stream forwarder. A
//!   forwarder has no "clean" exit, so every forwarder ends with one of these.

use std::io;

use nix::errno::Errno;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogexecError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Syslog connection error: {0}")]
    SyslogError(String),

    #[error("Failed to start command '{command}': {source}")]
    SpawnError {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Startup error: {0}")]
    StartupError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, LogexecError>;

/// Why a stream forwarder stopped.
#[derive(Error, Debug)]
pub enum StreamError {
    /// The pipe reached end of stream while the forwarder was still expected
    /// to be running.
    #[error("Error reading: got EOF. Exiting")]
    PrematureEof,

    #[error("Error reading: {0}")]
    Read(#[source] io::Error),

    #[error("Error writing to log: {0}")]
    Write(#[source] io::Error),
}

impl StreamError {
    /// The descriptor was already closed underneath us, which only happens
    /// once the child is gone.
    pub fn is_bad_descriptor(&self) -> bool {
        match self {
            StreamError::Read(e) | StreamError::Write(e) => {
                e.raw_os_error() == Some(Errno::EBADF as i32)
            }
            StreamError::PrematureEof => false,
        }
    }

    pub fn is_premature_eof(&self) -> bool {
        matches!(self, StreamError::PrematureEof)
    }
}
