// src/exec/mod.rs

//! Process layer.
//!
//! This module is responsible for actually starting the supervised command
//! with `tokio::process::Command`, waiting on it, and delivering signals.
//!
//! - [`spawn`] starts the child with inherited stdin and piped output.
//! - [`child`] provides the `ChildControl` trait, the `ProcessHandle` used in
//!   production, and the child-wait task.
//! - [`signals`] intercepts the signals that are relayed to the child.

pub mod child;
pub mod signals;
pub mod spawn;

pub use child::{spawn_wait, ChildControl, ProcessHandle};
pub use signals::{spawn_signal_relay, RELAYED_SIGNALS};
pub use spawn::{spawn_command, SpawnedChild};
