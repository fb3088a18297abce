use std::path::{Path, PathBuf};

use clap::Parser;
use miette::{Result, WrapErr};

use diffscribe_core::{DiffscribeConfig, Settings};
use diffscribe_review::pipeline::ReviewPipeline;

const DEFAULT_CONFIG: &str = ".diffscribe.toml";

#[derive(Parser)]
#[command(
    name = "diffscribe",
    version,
    about = "Review a pull request diff with an LLM and post the result as a PR comment",
    long_about = "Review a pull request diff with an LLM and post the result as a PR comment.\n\n\
                   Fetches the diff between BASE_SHA and HEAD_SHA, keeps only the files whose\n\
                   diff header contains the configured marker (\".py\" by default), asks the\n\
                   model for a review, and posts it on PR_NUMBER.\n\n\
                   Required environment variables:\n  \
                     GITHUB_TOKEN    GitHub token with permission to comment\n  \
                     OPENAI_API_KEY  API key for the chat completions endpoint\n  \
                     PR_NUMBER       Pull request number\n  \
                     REPO_NAME       Repository as owner/name\n  \
                     BASE_SHA        Base commit of the comparison\n  \
                     HEAD_SHA        Head commit of the comparison"
)]
struct Cli {
    /// Path to configuration file (default: .diffscribe.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the review instead of posting it
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

fn load_config(path: Option<&Path>) -> Result<DiffscribeConfig> {
    match path {
        Some(path) => DiffscribeConfig::from_file(path)
            .wrap_err(format!("loading {}", path.display())),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG);
            if default_path.exists() {
                DiffscribeConfig::from_file(default_path)
                    .wrap_err(format!("loading {DEFAULT_CONFIG}"))
            } else {
                Ok(DiffscribeConfig::default())
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    // Must run before any file or network access.
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            println!("Error: {e}");
            std::process::exit(1);
        }
    };

    let config = load_config(cli.config.as_deref())?;

    if cli.verbose {
        eprintln!(
            "repo: {} | compare: {}...{} | marker: {}",
            settings.repo_name, settings.base_sha, settings.head_sha, config.review.file_marker,
        );
    }

    let pipeline = ReviewPipeline::from_config(&config, &settings)?
        .dry_run(cli.dry_run)
        .verbose(cli.verbose);
    pipeline.run(&settings).await?;

    Ok(())
}
