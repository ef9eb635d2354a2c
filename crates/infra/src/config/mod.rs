//! Configuration loading
//!
//! Reads [`calcache_domain::Config`] from the environment or a config file.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
