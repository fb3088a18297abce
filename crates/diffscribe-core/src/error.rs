/// Errors that can occur while producing a review.
///
/// Library crates use this type directly. It implements
/// [`miette::Diagnostic`], so the binary can propagate it with `?`.
///
/// # Examples
///
/// ```
/// use diffscribe_core::DiffscribeError;
///
/// let err = DiffscribeError::MissingEnv("GITHUB_TOKEN");
/// assert_eq!(err.to_string(), "GITHUB_TOKEN environment variable not set");
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum DiffscribeError {
    /// A required environment variable is absent or empty.
    #[error("{0} environment variable not set")]
    #[diagnostic(code(diffscribe::missing_env))]
    MissingEnv(&'static str),

    /// A required environment variable is set but not valid UTF-8.
    #[error("{0} environment variable is not valid UTF-8")]
    #[diagnostic(code(diffscribe::non_unicode_env))]
    NonUnicodeEnv(&'static str),

    /// Invalid configuration file or client setup.
    #[error("configuration error: {0}")]
    #[diagnostic(code(diffscribe::config))]
    Config(String),

    /// GitHub API transport or status failure.
    #[error("GitHub error: {0}")]
    #[diagnostic(
        code(diffscribe::github),
        help("check GITHUB_TOKEN scopes and that REPO_NAME, BASE_SHA and HEAD_SHA exist")
    )]
    GitHub(String),

    /// LLM API or response error.
    #[error("LLM error: {0}")]
    #[diagnostic(code(diffscribe::llm))]
    Llm(String),

    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    #[diagnostic(help("see the [github], [llm] and [review] tables in .diffscribe.toml"))]
    Toml(#[from] toml::de::Error),
}
