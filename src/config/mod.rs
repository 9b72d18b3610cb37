// src/config/mod.rs

//! Configuration loading and validation.
//!
//! - `model.rs`: TOML-backed data model.
//! - `loader.rs`: read a config file from disk.
//! - `validate.rs`: turn a `RawConfigFile` into a checked `ConfigFile`.
//! - `duration.rs`: `"500ms"`-style duration strings.

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{load_and_validate, load_from_path};
pub use model::{
    ConfigFile, ControllerSection, KeysSection, PromptSection, RawConfigFile, RawWorkflowSection,
};
