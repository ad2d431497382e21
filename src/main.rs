use anstream::{eprintln, println};
use clap::Parser;
use github_fetcher::cli::Command;
use github_fetcher::{Cli, Config, Fetcher, GitHubFetcher};
use miette::{IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::Path;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let settings = Config::load()?;

    if cli.token.is_none()
        && let Some(token) = settings.read_token()
    {
        cli.token = Some(token);
    }

    if cli.token.is_some() && cli.username.is_none() && cli.quiet == 0 {
        eprintln!(
            "{}: a token is only sent together with --username",
            "warning".yellow().bold()
        );
    }

    let fetcher = GitHubFetcher::new(cli.fetch_configuration(), settings);

    match &cli.command {
        Command::Content { output, metadata } => {
            fetch_content(&fetcher, output.as_deref(), *metadata).await
        }
        Command::Files => list_files(&fetcher).await,
    }
}

fn init_tracing(verbose: u8, quiet: u8) {
    let level = match (verbose, quiet) {
        (_, 2..) => LevelFilter::OFF,
        (_, 1) => LevelFilter::ERROR,
        (0, _) => LevelFilter::WARN,
        (1, _) => LevelFilter::INFO,
        (2, _) => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

async fn fetch_content(fetcher: &impl Fetcher, output: Option<&Path>, metadata: bool) -> Result<()> {
    let resource = fetcher.fetch().await?;

    if metadata && let Some(metadata) = &resource.metadata {
        let json = serde_json::to_string_pretty(metadata).into_diagnostic()?;
        eprintln!("{json}");
    }

    let Some(content) = resource.content else {
        eprintln!("{}: GitHub returned no content", "warning".yellow().bold());
        return Ok(());
    };

    match output {
        Some(path) => fs_err::tokio::write(path, &content).await.into_diagnostic()?,
        None => std::io::stdout().write_all(&content).into_diagnostic()?,
    }

    Ok(())
}

async fn list_files(fetcher: &impl Fetcher) -> Result<()> {
    for path in fetcher.files().await? {
        println!("{path}");
    }
    Ok(())
}
