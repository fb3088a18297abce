//! Core types, configuration, and error handling for diffscribe.
//!
//! This crate provides the shared foundation used by the other diffscribe crates:
//! - [`DiffscribeError`] — unified error type using `thiserror`
//! - [`Settings`] — the required values read once from the environment
//! - [`DiffscribeConfig`] — optional tunables loaded from `.diffscribe.toml`

mod config;
mod error;
mod settings;

pub use config::{DiffscribeConfig, GitHubConfig, LlmConfig, ReviewConfig};
pub use error::DiffscribeError;
pub use settings::{Settings, REQUIRED_VARS};
