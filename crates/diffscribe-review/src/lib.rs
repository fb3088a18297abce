//! Review orchestration for diffscribe.
//!
//! Provides the GitHub client, the LLM client, prompt and comment
//! templates, and the pipeline that ties them together.

pub mod github;
pub mod llm;
pub mod pipeline;
pub mod prompt;
