// src/env/mod.rs

//! Environment handling for launched jobs.
//!
//! [`resolver`] merges three layers into the final table handed to the
//! child process:
//!
//! 1. the ambient environment of `launchdeck` itself,
//! 2. the base variables declared in the job profile (`[env].vars`),
//! 3. the free-form `KEY=VALUE` override text (`[env].extra` plus `--env`).

pub mod resolver;

pub use resolver::{ResolvedEnvironment, parse_overrides, resolve};
