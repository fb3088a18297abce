//! Marker-based file section filtering.
//!
//! A file section starts at a `diff --git` line and runs until the next
//! one. The header is matched with a raw substring test, so a path such
//! as `lib.pyc` or a directory called `tools.py/` also matches `.py`.

use diffscribe_core::ReviewConfig;

/// Prefix that opens a new file section in git's unified diff output.
pub const FILE_HEADER_PREFIX: &str = "diff --git";

/// Keeps only the file sections whose header contains a marker.
///
/// # Examples
///
/// ```
/// use diffscribe_difflens::filter::DiffFilter;
///
/// let filter = DiffFilter::new(".py");
/// assert!(filter.matches_header("diff --git a/app.py b/app.py"));
/// assert!(!filter.matches_header("diff --git a/README.md b/README.md"));
/// ```
#[derive(Debug, Clone)]
pub struct DiffFilter {
    marker: String,
}

impl DiffFilter {
    /// Create a filter for the given marker.
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// Create a filter from review configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use diffscribe_core::ReviewConfig;
    /// use diffscribe_difflens::filter::DiffFilter;
    ///
    /// let filter = DiffFilter::from_config(&ReviewConfig::default());
    /// assert_eq!(filter.marker(), ".py");
    /// ```
    pub fn from_config(config: &ReviewConfig) -> Self {
        Self::new(config.file_marker.clone())
    }

    /// The substring headers are matched against.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Whether a file section header line selects its section.
    pub fn matches_header(&self, header: &str) -> bool {
        header.contains(self.marker.as_str())
    }

    /// Filter a unified diff down to the matching file sections.
    ///
    /// Lines before the first header are dropped. Kept lines are returned
    /// unmodified and in their original order, joined with `\n`.
    ///
    /// # Examples
    ///
    /// ```
    /// use diffscribe_difflens::filter::DiffFilter;
    ///
    /// let diff = "diff --git a/a.py b/a.py\n+x\ndiff --git a/b.md b/b.md\n+y";
    /// let kept = DiffFilter::new(".py").filter(diff);
    /// assert_eq!(kept, "diff --git a/a.py b/a.py\n+x");
    /// ```
    pub fn filter(&self, diff: &str) -> String {
        let (kept, _) = diff.split('\n').fold(
            (Vec::new(), false),
            |(mut kept, include), line| {
                let include = if line.starts_with(FILE_HEADER_PREFIX) {
                    self.matches_header(line)
                } else {
                    include
                };
                if include {
                    kept.push(line);
                }
                (kept, include)
            },
        );
        kept.join("\n")
    }
}

/// Count the file sections in a diff.
///
/// # Examples
///
/// ```
/// use diffscribe_difflens::filter::count_file_sections;
///
/// assert_eq!(count_file_sections("diff --git a/x b/x\n+1\ndiff --git a/y b/y"), 2);
/// assert_eq!(count_file_sections(""), 0);
/// ```
pub fn count_file_sections(diff: &str) -> usize {
    diff.split('\n')
        .filter(|line| line.starts_with(FILE_HEADER_PREFIX))
        .count()
}
