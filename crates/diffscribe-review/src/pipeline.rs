use std::io::IsTerminal;
use std::time::Duration;

use diffscribe_core::{DiffscribeConfig, DiffscribeError, ReviewConfig, Settings};
use diffscribe_difflens::filter::{count_file_sections, DiffFilter};

use crate::github::GitHubClient;
use crate::llm::{ChatMessage, LlmClient, Role};
use crate::prompt;

const BANNER_WIDTH: usize = 60;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No file in the diff matched the marker; nothing was sent or posted.
    Skipped,
    /// The review was posted as a PR comment.
    Posted {
        /// Full Markdown body that was posted.
        comment: String,
    },
    /// The review was generated but only printed.
    DryRun {
        /// Full Markdown body that would have been posted.
        comment: String,
    },
}

/// Drives one review: fetch and filter the diff, ask the model, post the result.
///
/// Every step runs to completion before the next starts, and the first
/// error ends the run.
pub struct ReviewPipeline {
    github: GitHubClient,
    llm: LlmClient,
    filter: DiffFilter,
    config: ReviewConfig,
    dry_run: bool,
    verbose: bool,
}

impl ReviewPipeline {
    /// Create a pipeline from its clients and review config.
    pub fn new(github: GitHubClient, llm: LlmClient, config: ReviewConfig) -> Self {
        Self {
            github,
            llm,
            filter: DiffFilter::from_config(&config),
            config,
            dry_run: false,
            verbose: false,
        }
    }

    /// Build both clients from configuration and the run's settings.
    ///
    /// # Errors
    ///
    /// Returns an error if either HTTP client cannot be built.
    pub fn from_config(
        config: &DiffscribeConfig,
        settings: &Settings,
    ) -> Result<Self, DiffscribeError> {
        let timeout = config.http_timeout_secs.map(Duration::from_secs);
        let github = GitHubClient::new(&config.github, settings.github_token.clone(), timeout)?;
        let llm = LlmClient::new(&config.llm, settings.openai_api_key.clone(), timeout)?;
        Ok(Self::new(github, llm, config.review.clone()))
    }

    /// Print the comment instead of posting it.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Report diff statistics on stderr.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Fetch the comparison diff and keep only the sections matching the marker.
    ///
    /// # Errors
    ///
    /// Returns [`DiffscribeError::GitHub`] if the diff cannot be fetched.
    pub async fn fetch_filtered_diff(&self, settings: &Settings) -> Result<String, DiffscribeError> {
        println!("Fetching diff from GitHub...");
        let raw = self
            .github
            .compare_diff(&settings.repo_name, &settings.base_sha, &settings.head_sha)
            .await?;
        let filtered = self.filter.filter(&raw);

        if self.verbose {
            eprintln!(
                "Diff: {} file sections, {} matching '{}' ({} chars)",
                count_file_sections(&raw),
                count_file_sections(&filtered),
                self.filter.marker(),
                filtered.chars().count(),
            );
        }

        Ok(filtered)
    }

    /// Ask the model to review the filtered diff.
    ///
    /// # Errors
    ///
    /// Returns [`DiffscribeError::Llm`] if the completion call fails.
    pub async fn request_review(&self, diff: &str) -> Result<String, DiffscribeError> {
        let messages = vec![
            ChatMessage::new(Role::System, prompt::build_system_prompt(&self.config.language)),
            ChatMessage::new(
                Role::User,
                prompt::build_review_prompt(diff, &self.config.language, self.config.max_diff_chars),
            ),
        ];

        println!("Requesting AI review...");
        if self.verbose {
            eprintln!("Model: {}", self.llm.model());
        }

        let spinner = if std::io::stderr().is_terminal() {
            let pb = indicatif::ProgressBar::new_spinner();
            if let Ok(style) =
                indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
            {
                pb.set_style(style);
            }
            pb.set_message("Waiting for the model...");
            pb.enable_steady_tick(Duration::from_millis(120));
            Some(pb)
        } else {
            None
        };

        let review = self.llm.chat(messages).await;

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        review
    }

    /// Post the review as a PR comment and return the posted body.
    ///
    /// # Errors
    ///
    /// Returns [`DiffscribeError::GitHub`] if the comment is rejected.
    pub async fn post_review(
        &self,
        settings: &Settings,
        review: &str,
    ) -> Result<String, DiffscribeError> {
        let comment = prompt::render_comment(review);
        println!("Posting review comment...");
        self.github
            .post_issue_comment(&settings.repo_name, &settings.pr_number, &comment)
            .await?;
        println!("\u{2705} Review posted successfully!");
        Ok(comment)
    }

    /// Run the whole review for one pull request.
    ///
    /// # Errors
    ///
    /// Returns the first error from any step; later steps are not attempted.
    pub async fn run(&self, settings: &Settings) -> Result<RunOutcome, DiffscribeError> {
        print_banner(&format!("AI Code Review - PR #{}", settings.pr_number));

        let diff = self.fetch_filtered_diff(settings).await?;
        if diff.trim().is_empty() {
            println!(
                "No {} files changed. Skipping review.",
                self.config.language
            );
            return Ok(RunOutcome::Skipped);
        }

        let review = self.request_review(&diff).await?;

        let outcome = if self.dry_run {
            let comment = prompt::render_comment(&review);
            println!("Dry run: comment not posted.\n");
            println!("{comment}");
            RunOutcome::DryRun { comment }
        } else {
            let comment = self.post_review(settings, &review).await?;
            RunOutcome::Posted { comment }
        };

        print_banner("Review complete!");
        Ok(outcome)
    }
}

fn print_banner(title: &str) {
    let rule = "=".repeat(BANNER_WIDTH);
    println!("{rule}");
    println!("{title}");
    println!("{rule}");
}

#[cfg(test)]
mod tests {
    use diffscribe_core::{GitHubConfig, LlmConfig};
    use mockito::{Matcher, Server, ServerGuard};

    use super::*;

    const COMPARE_PATH: &str = "/repos/acme/api/compare/base1...head2";
    const COMMENTS_PATH: &str = "/repos/acme/api/issues/7/comments";
    const COMPLETIONS_PATH: &str = "/v1/chat/completions";

    const PY_DIFF: &str = "\
diff --git a/app.py b/app.py
--- a/app.py
+++ b/app.py
@@ -1 +1,2 @@
 import os
+import sys
diff --git a/notes.txt b/notes.txt
--- a/notes.txt
+++ b/notes.txt
@@ -1 +1 @@
-a
+b
";

    fn settings() -> Settings {
        Settings::from_lookup(|name| {
            Some(
                match name {
                    "GITHUB_TOKEN" => "gh-token",
                    "OPENAI_API_KEY" => "sk-test",
                    "PR_NUMBER" => "7",
                    "REPO_NAME" => "acme/api",
                    "BASE_SHA" => "base1",
                    "HEAD_SHA" => "head2",
                    _ => return None,
                }
                .to_string(),
            )
        })
        .unwrap()
    }

    fn pipeline(github: &ServerGuard, llm: &ServerGuard) -> ReviewPipeline {
        let config = DiffscribeConfig {
            github: GitHubConfig {
                api_url: github.url(),
                ..GitHubConfig::default()
            },
            llm: LlmConfig {
                base_url: llm.url(),
                ..LlmConfig::default()
            },
            ..DiffscribeConfig::default()
        };
        ReviewPipeline::from_config(&config, &settings()).unwrap()
    }

    fn completion(text: &str) -> String {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": text } }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn happy_path_posts_filtered_review() {
        let mut github = Server::new_async().await;
        let mut llm = Server::new_async().await;

        let fetch = github
            .mock("GET", COMPARE_PATH)
            .match_header("authorization", "token gh-token")
            .with_status(200)
            .with_body(PY_DIFF)
            .create_async()
            .await;
        let review = llm
            .mock("POST", COMPLETIONS_PATH)
            .match_body(Matcher::Regex("import sys".into()))
            .with_status(200)
            .with_body(completion("Rating: A"))
            .expect(1)
            .create_async()
            .await;
        let expected_comment = prompt::render_comment("Rating: A");
        let post = github
            .mock("POST", COMMENTS_PATH)
            .match_body(Matcher::Json(serde_json::json!({ "body": &expected_comment })))
            .with_status(201)
            .expect(1)
            .create_async()
            .await;

        let outcome = pipeline(&github, &llm).run(&settings()).await.unwrap();

        fetch.assert_async().await;
        review.assert_async().await;
        post.assert_async().await;
        assert_eq!(
            outcome,
            RunOutcome::Posted {
                comment: expected_comment
            }
        );
    }

    #[tokio::test]
    async fn non_matching_diff_skips_review_and_post() {
        let mut github = Server::new_async().await;
        let mut llm = Server::new_async().await;

        let _fetch = github
            .mock("GET", COMPARE_PATH)
            .with_status(200)
            .with_body("diff --git a/README.md b/README.md\n+docs\n")
            .create_async()
            .await;
        let review = llm
            .mock("POST", COMPLETIONS_PATH)
            .expect(0)
            .create_async()
            .await;
        let post = github
            .mock("POST", COMMENTS_PATH)
            .expect(0)
            .create_async()
            .await;

        let outcome = pipeline(&github, &llm).run(&settings()).await.unwrap();

        assert_eq!(outcome, RunOutcome::Skipped);
        review.assert_async().await;
        post.assert_async().await;
    }

    #[tokio::test]
    async fn empty_diff_skips_review_and_post() {
        let mut github = Server::new_async().await;
        let mut llm = Server::new_async().await;

        let _fetch = github
            .mock("GET", COMPARE_PATH)
            .with_status(200)
            .with_body("")
            .create_async()
            .await;
        let review = llm
            .mock("POST", COMPLETIONS_PATH)
            .expect(0)
            .create_async()
            .await;

        let outcome = pipeline(&github, &llm).run(&settings()).await.unwrap();

        assert_eq!(outcome, RunOutcome::Skipped);
        review.assert_async().await;
    }

    #[tokio::test]
    async fn failed_fetch_stops_before_review_and_post() {
        let mut github = Server::new_async().await;
        let mut llm = Server::new_async().await;

        let _fetch = github
            .mock("GET", COMPARE_PATH)
            .with_status(500)
            .create_async()
            .await;
        let review = llm
            .mock("POST", COMPLETIONS_PATH)
            .expect(0)
            .create_async()
            .await;
        let post = github
            .mock("POST", COMMENTS_PATH)
            .expect(0)
            .create_async()
            .await;

        let err = pipeline(&github, &llm).run(&settings()).await.unwrap_err();

        assert!(matches!(err, DiffscribeError::GitHub(_)));
        review.assert_async().await;
        post.assert_async().await;
    }

    #[tokio::test]
    async fn failed_review_stops_before_post() {
        let mut github = Server::new_async().await;
        let mut llm = Server::new_async().await;

        let _fetch = github
            .mock("GET", COMPARE_PATH)
            .with_status(200)
            .with_body(PY_DIFF)
            .create_async()
            .await;
        let _review = llm
            .mock("POST", COMPLETIONS_PATH)
            .with_status(401)
            .with_body(r#"{"error":{"message":"invalid api key"}}"#)
            .create_async()
            .await;
        let post = github
            .mock("POST", COMMENTS_PATH)
            .expect(0)
            .create_async()
            .await;

        let err = pipeline(&github, &llm).run(&settings()).await.unwrap_err();

        assert!(matches!(err, DiffscribeError::Llm(_)));
        post.assert_async().await;
    }

    #[tokio::test]
    async fn dry_run_does_not_post() {
        let mut github = Server::new_async().await;
        let mut llm = Server::new_async().await;

        let _fetch = github
            .mock("GET", COMPARE_PATH)
            .with_status(200)
            .with_body(PY_DIFF)
            .create_async()
            .await;
        let _review = llm
            .mock("POST", COMPLETIONS_PATH)
            .with_status(200)
            .with_body(completion("Rating: C"))
            .create_async()
            .await;
        let post = github
            .mock("POST", COMMENTS_PATH)
            .expect(0)
            .create_async()
            .await;

        let outcome = pipeline(&github, &llm)
            .dry_run(true)
            .run(&settings())
            .await
            .unwrap();

        post.assert_async().await;
        assert_eq!(
            outcome,
            RunOutcome::DryRun {
                comment: prompt::render_comment("Rating: C")
            }
        );
    }

    #[tokio::test]
    async fn long_diff_is_cut_at_max_diff_chars_in_prompt() {
        let mut github = Server::new_async().await;
        let mut llm = Server::new_async().await;

        // The header plus "\n+" is 30 chars, so a 40-char limit keeps "0123456789".
        let _fetch = github
            .mock("GET", COMPARE_PATH)
            .with_status(200)
            .with_body("diff --git a/big.py b/big.py\n+0123456789ABCDEFGHIJ\n")
            .create_async()
            .await;
        // JSON escapes newlines, so the diff block appears as `...\n```\n\nBe concise`.
        let review = llm
            .mock("POST", COMPLETIONS_PATH)
            .match_body(Matcher::Regex(
                r"```diff\\ndiff --git a/big\.py b/big\.py\\n\+0123456789\\n```\\n\\nBe concise"
                    .into(),
            ))
            .with_status(200)
            .with_body(completion("ok"))
            .expect(1)
            .create_async()
            .await;

        let config = DiffscribeConfig {
            github: GitHubConfig {
                api_url: github.url(),
                ..GitHubConfig::default()
            },
            llm: LlmConfig {
                base_url: llm.url(),
                ..LlmConfig::default()
            },
            review: ReviewConfig {
                max_diff_chars: 40,
                ..ReviewConfig::default()
            },
            ..DiffscribeConfig::default()
        };
        let runner = ReviewPipeline::from_config(&config, &settings()).unwrap();

        let diff = runner.fetch_filtered_diff(&settings()).await.unwrap();
        assert!(diff.contains("ABCDEFGHIJ"));
        let text = runner.request_review(&diff).await.unwrap();

        assert_eq!(text, "ok");
        review.assert_async().await;
    }
}
