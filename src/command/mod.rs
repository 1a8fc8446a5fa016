// src/command/mod.rs

//! Turning a validated [`JobProfile`](crate::config::JobProfile) into the
//! shell line the supervisor runs.
//!
//! - [`builder`] assembles the displayable command string.
//! - [`staging`] writes an inline prompt to its staging file before launch.

pub mod builder;
pub mod staging;

pub use builder::build_command;
pub use staging::{stage_prompt, stage_prompt_or_log};
