use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DiffscribeError;

/// Optional tunables loaded from `.diffscribe.toml`.
///
/// Every field has a default, so an absent or empty file reproduces the
/// stock behavior: Python files only, `gpt-5-nano`, public GitHub.
///
/// # Examples
///
/// ```
/// use diffscribe_core::DiffscribeConfig;
///
/// let config = DiffscribeConfig::default();
/// assert_eq!(config.review.file_marker, ".py");
/// assert_eq!(config.review.max_diff_chars, 10_000);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiffscribeConfig {
    /// GitHub API settings.
    #[serde(default)]
    pub github: GitHubConfig,
    /// LLM provider settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Review behavior settings.
    #[serde(default)]
    pub review: ReviewConfig,
    /// Per-request timeout in seconds. Unset means requests never time out.
    pub http_timeout_secs: Option<u64>,
}

impl DiffscribeConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DiffscribeError::Io`] if the file cannot be read, or
    /// [`DiffscribeError::Toml`] if the content is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self, DiffscribeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`DiffscribeError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use diffscribe_core::DiffscribeConfig;
    ///
    /// let toml = r#"
    /// [review]
    /// file_marker = ".rs"
    /// language = "Rust"
    /// "#;
    /// let config = DiffscribeConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.review.file_marker, ".rs");
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, DiffscribeError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// GitHub REST API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// API root, without a trailing slash.
    #[serde(default = "default_github_api_url")]
    pub api_url: String,
    /// Value of the `User-Agent` header; GitHub rejects requests without one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_github_api_url() -> String {
    "https://api.github.com".into()
}

fn default_user_agent() -> String {
    "diffscribe".into()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_github_api_url(),
            user_agent: default_user_agent(),
        }
    }
}

/// LLM provider configuration.
///
/// # Examples
///
/// ```
/// use diffscribe_core::LlmConfig;
///
/// let config = LlmConfig::default();
/// assert_eq!(config.model, "gpt-5-nano");
/// assert_eq!(config.max_completion_tokens, 1500);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Upper bound on generated tokens.
    #[serde(default = "default_max_completion_tokens")]
    pub max_completion_tokens: u32,
}

fn default_base_url() -> String {
    "https://api.openai.com".into()
}

fn default_model() -> String {
    "gpt-5-nano".into()
}

fn default_temperature() -> f64 {
    0.3
}

fn default_max_completion_tokens() -> u32 {
    1500
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_completion_tokens: default_max_completion_tokens(),
        }
    }
}

/// Review behavior configuration.
///
/// # Examples
///
/// ```
/// use diffscribe_core::ReviewConfig;
///
/// let config = ReviewConfig::default();
/// assert_eq!(config.language, "Python");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Substring a `diff --git` header must contain for its section to be kept.
    #[serde(default = "default_file_marker")]
    pub file_marker: String,
    /// Language name used in the prompts and the skip message.
    #[serde(default = "default_language")]
    pub language: String,
    /// Characters of filtered diff sent to the model; the rest is dropped.
    #[serde(default = "default_max_diff_chars")]
    pub max_diff_chars: usize,
}

fn default_file_marker() -> String {
    ".py".into()
}

fn default_language() -> String {
    "Python".into()
}

fn default_max_diff_chars() -> usize {
    10_000
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            file_marker: default_file_marker(),
            language: default_language(),
            max_diff_chars: default_max_diff_chars(),
        }
    }
}
