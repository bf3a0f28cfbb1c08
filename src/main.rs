use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use release_tagger::cli::{self, run_release_workflow, ReleaseWorkflowArgs};
use release_tagger::config;
use release_tagger::git::{Git2Repository, Repository};
use release_tagger::host::{FsAssetReader, GithubClient};
use release_tagger::inputs::{self, ActionInputs};
use release_tagger::ui;

#[derive(clap::Parser)]
#[command(
    name = "release-tagger",
    about = "Validate a SemVer release and publish it with its vX.Y and vX alias tags"
)]
struct Args {
    #[arg(long, env = "INPUT_VERSION", help = "Version to release, e.g. 1.2.3")]
    version_number: Option<String>,

    #[arg(long, help = "Read the version from a file when no version number is given")]
    version_file: Option<String>,

    #[arg(
        long,
        env = "INPUT_VALIDATE",
        default_value = "false",
        help = "Only validate; do not create tags or a release (true/false)"
    )]
    validate: String,

    #[arg(
        long,
        env = "INPUT_FILES",
        default_value = "",
        help = "Newline-separated files to attach to the release"
    )]
    files: String,

    #[arg(long, env = "INPUT_BODY", default_value = "", help = "Release notes")]
    body: String,

    #[arg(long, env = "GITHUB_SHA", help = "Commit to release (defaults to HEAD)")]
    sha: Option<String>,

    #[arg(
        long,
        env = "GITHUB_REPOSITORY",
        help = "Repository as owner/name (defaults to the configured remote)"
    )]
    repository: Option<String>,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, help = "GitHub API token")]
    token: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let version_number = match (&args.version_number, &args.version_file) {
        (Some(number), _) => number.trim().to_string(),
        (None, Some(path)) => match inputs::read_version_file(path) {
            Ok(number) => number,
            Err(e) => {
                ui::display_error(&format!("Failed to read version from {}: {}", path, e));
                std::process::exit(1);
            }
        },
        (None, None) => String::new(),
    };

    let validate_only = match inputs::parse_bool_input(&args.validate) {
        Ok(flag) => flag,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    // A checkout is only needed when the sha or repository must be inferred
    let local_repo = match Git2Repository::open(".") {
        Ok(repo) => Some(repo),
        Err(e) => {
            tracing::debug!("No local git repository: {}", e);
            None
        }
    };
    let local_repo = local_repo.as_ref().map(|repo| repo as &dyn Repository);

    let sha = match cli::resolve_commit_sha(args.sha.as_deref(), local_repo) {
        Ok(sha) => sha,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let slug = match cli::resolve_repo_slug(
        args.repository.as_deref(),
        local_repo,
        &config.git.remote,
    ) {
        Ok(slug) => slug,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let token = args.token.filter(|t| !t.trim().is_empty());
    if token.is_none() {
        tracing::warn!("No GitHub token provided; write requests will be rejected");
    }

    let client = GithubClient::new(&config.github, slug, token)
        .context("Failed to build GitHub client")?;

    ui::display_status(&format!(
        "Releasing {} at {} in {}",
        version_number,
        sha,
        client.repo()
    ));

    let workflow_args = ReleaseWorkflowArgs {
        inputs: ActionInputs {
            version_number,
            sha,
            files: inputs::parse_file_list(&args.files),
            body: args.body,
            validate_only,
        },
        per_page: config.github.per_page,
    };

    let outcome = run_release_workflow(&client, &FsAssetReader, &workflow_args).await;
    ui::display_outcome(&outcome);

    if !outcome.is_success() {
        std::process::exit(1);
    }

    Ok(())
}
