use std::ffi::OsString;

use crate::error::DiffscribeError;

/// Names of the environment variables a run cannot start without, in the
/// order they are checked.
pub const REQUIRED_VARS: [&str; 6] = [
    "GITHUB_TOKEN",
    "OPENAI_API_KEY",
    "PR_NUMBER",
    "REPO_NAME",
    "BASE_SHA",
    "HEAD_SHA",
];

/// Required per-run values, read once from the environment.
///
/// Values are only checked for presence. The PR number and commit SHAs are
/// passed through to the API untouched.
///
/// # Examples
///
/// ```
/// use diffscribe_core::Settings;
///
/// let settings = Settings::from_lookup(|name| Some(format!("value-of-{name}"))).unwrap();
/// assert_eq!(settings.repo_name, "value-of-REPO_NAME");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// Token for the GitHub REST API.
    pub github_token: String,
    /// Key for the chat completions API.
    pub openai_api_key: String,
    /// Pull request number the comment is posted to.
    pub pr_number: String,
    /// Repository in `owner/name` form.
    pub repo_name: String,
    /// Base commit of the comparison.
    pub base_sha: String,
    /// Head commit of the comparison.
    pub head_sha: String,
}

impl Settings {
    /// Read all required values from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`DiffscribeError::MissingEnv`] naming the first variable
    /// that is unset or empty, or [`DiffscribeError::NonUnicodeEnv`] if it
    /// is set to something that is not UTF-8.
    pub fn from_env() -> Result<Self, DiffscribeError> {
        Self::from_os_lookup(|name| std::env::var_os(name))
    }

    /// Build settings from an arbitrary name → value lookup.
    ///
    /// # Errors
    ///
    /// Returns [`DiffscribeError::MissingEnv`] naming the first variable in
    /// [`REQUIRED_VARS`] order for which `lookup` yields nothing or an
    /// empty string.
    ///
    /// # Examples
    ///
    /// ```
    /// use diffscribe_core::{DiffscribeError, Settings};
    ///
    /// let err = Settings::from_lookup(|name| {
    ///     (name != "PR_NUMBER").then(|| "x".to_string())
    /// })
    /// .unwrap_err();
    /// assert!(matches!(err, DiffscribeError::MissingEnv("PR_NUMBER")));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DiffscribeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_os_lookup(|name| lookup(name).map(OsString::from))
    }

    /// Build settings from a lookup returning raw OS strings.
    ///
    /// # Errors
    ///
    /// Same as [`Settings::from_env`], checked in [`REQUIRED_VARS`] order.
    pub fn from_os_lookup<F>(lookup: F) -> Result<Self, DiffscribeError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let require = |name: &'static str| -> Result<String, DiffscribeError> {
            match lookup(name) {
                Some(value) if !value.is_empty() => value
                    .into_string()
                    .map_err(|_| DiffscribeError::NonUnicodeEnv(name)),
                _ => Err(DiffscribeError::MissingEnv(name)),
            }
        };

        Ok(Self {
            github_token: require("GITHUB_TOKEN")?,
            openai_api_key: require("OPENAI_API_KEY")?,
            pr_number: require("PR_NUMBER")?,
            repo_name: require("REPO_NAME")?,
            base_sha: require("BASE_SHA")?,
            head_sha: require("HEAD_SHA")?,
        })
    }
}

// Tokens stay out of debug output.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("github_token", &"<redacted>")
            .field("openai_api_key", &"<redacted>")
            .field("pr_number", &self.pr_number)
            .field("repo_name", &self.repo_name)
            .field("base_sha", &self.base_sha)
            .field("head_sha", &self.head_sha)
            .finish()
    }
}
