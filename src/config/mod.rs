// src/config/mod.rs

//! Configuration loading and validation for logexec.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and resolved settings (`model.rs`).
//! - Load an optional config file and merge CLI overrides (`loader.rs`).
//! - Validate basic invariants like the minimum line cap (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigFile, ConfigOverrides, SupervisorConfig};
pub use validate::validate_config;
