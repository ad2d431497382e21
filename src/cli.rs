use crate::config::FetchConfiguration;
use clap::builder::styling::{AnsiColor, Color, Style};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "github-fetcher",
    version,
    about = "Fetch a file or list files from a GitHub repository",
    long_about = "github-fetcher reads a single file through the GitHub contents API, or lists the files under a directory through the git trees API"
)]
#[command(styles = get_styles())]
pub struct Cli {
    /// GitHub API base url
    #[arg(
        long,
        env = "GITHUB_API_URL",
        default_value = "https://api.github.com",
        value_name = "URL"
    )]
    pub api_url: String,

    /// Repository owner (user or organization)
    #[arg(long, value_name = "OWNER")]
    pub owner: String,

    /// Repository name
    #[arg(long, value_name = "REPO")]
    pub repo: String,

    /// Absolute path inside the repository
    ///
    /// Example: /docs/swagger.yml
    #[arg(long, value_name = "PATH")]
    pub path: String,

    /// Branch, tag or commit sha
    ///
    /// Required by the files command.
    #[arg(long = "ref", value_name = "REF")]
    pub git_ref: Option<String>,

    /// GitHub username for basic authentication
    #[arg(long, env = "GITHUB_USERNAME", value_name = "USER")]
    pub username: Option<String>,

    /// GitHub personal access token
    ///
    /// Can also be set via GITHUB_TOKEN environment variable.
    /// Used together with --username.
    #[arg(long, env = "GITHUB_TOKEN", value_name = "TOKEN")]
    pub token: Option<String>,

    /// Route requests through the configured proxy
    #[arg(long)]
    pub system_proxy: bool,

    /// Connect and read timeout in milliseconds
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Use verbose output
    ///
    /// Use multiple times for more verbosity (e.g., -vv)
    #[arg(long, short, action = ArgAction::Count, conflicts_with = "quiet", global = true)]
    pub verbose: u8,

    /// Use quiet output
    ///
    /// Use multiple times for less output (e.g., -qq for silent)
    #[arg(long, short, action = ArgAction::Count, conflicts_with = "verbose", global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the file at --path
    Content {
        /// Write the content to this file instead of stdout
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print the file metadata as JSON on stderr
        #[arg(long)]
        metadata: bool,
    },

    /// List the files under --path
    Files,
}

impl Cli {
    /// Builds the fetch configuration described by the command line.
    pub fn fetch_configuration(&self) -> FetchConfiguration {
        FetchConfiguration {
            github_url: self.api_url.clone(),
            owner: self.owner.clone(),
            repository: self.repo.clone(),
            filepath: self.path.clone(),
            branch_or_tag: self.git_ref.clone(),
            username: self.username.clone(),
            personal_access_token: self.token.clone(),
            use_system_proxy: self.system_proxy,
            timeout_millis: self.timeout,
        }
    }
}

fn get_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .usage(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
        .header(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
        .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
        .invalid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .error(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .valid(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::White))))
}
