//! Configuration module
//!
//! Loads the optional YAML settings file and layers CLI/environment
//! overrides on top of it to produce the effective [`Settings`].

pub mod loader;
pub mod schema;

pub use loader::{ConfigLoader, LoaderOptions};
pub use schema::{DurationValue, FileConfig, Overrides, Settings};
