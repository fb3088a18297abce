/// Heading that opens every posted comment.
pub const COMMENT_HEADING: &str = "## \u{1f916} AI Code Review";

/// Attribution line that closes every posted comment.
pub const COMMENT_FOOTER: &str = "*Automated review by AI assistant*";

/// Build the system prompt for the given language.
///
/// # Examples
///
/// ```
/// use diffscribe_review::prompt::build_system_prompt;
///
/// assert_eq!(
///     build_system_prompt("Python"),
///     "You are an expert Python code reviewer."
/// );
/// ```
pub fn build_system_prompt(language: &str) -> String {
    format!("You are an expert {language} code reviewer.")
}

/// Build the user prompt around the first `max_chars` characters of `diff`.
///
/// Anything past the limit is dropped without a marker.
///
/// # Examples
///
/// ```
/// use diffscribe_review::prompt::build_review_prompt;
///
/// let prompt = build_review_prompt("+new line", "Python", 10_000);
/// assert!(prompt.contains("```diff\n+new line\n```"));
/// ```
pub fn build_review_prompt(diff: &str, language: &str, max_chars: usize) -> String {
    let diff = truncate_chars(diff, max_chars);
    format!(
        "Review this {language} code diff and provide:
1. Overall quality rating (A-F)
2. Key issues in style, functionality, and security
3. Specific recommendations

CODE DIFF:
```diff
{diff}
```

Be concise and actionable."
    )
}

/// The first `max_chars` characters of `text`, never splitting a character.
///
/// # Examples
///
/// ```
/// use diffscribe_review::prompt::truncate_chars;
///
/// assert_eq!(truncate_chars("héllo", 2), "hé");
/// assert_eq!(truncate_chars("hi", 10), "hi");
/// ```
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Wrap the model's review in the comment template posted to the PR.
///
/// # Examples
///
/// ```
/// use diffscribe_review::prompt::render_comment;
///
/// let comment = render_comment("Looks good.");
/// assert!(comment.contains("\n\nLooks good.\n\n---\n"));
/// ```
pub fn render_comment(review: &str) -> String {
    format!("{COMMENT_HEADING}\n\n{review}\n\n---\n{COMMENT_FOOTER}")
}
