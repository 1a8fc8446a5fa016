// src/config/mod.rs

//! Job profile loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a profile from disk (`loader.rs`).
//! - Validate parameter ranges and the prompt source (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{DEFAULT_CONFIG_FILE, default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{
    EnvSection, JobProfile, JobSection, ParamsSection, PromptSection, PromptSource, RawJobProfile,
};
