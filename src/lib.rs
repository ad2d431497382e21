pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod provider;
pub mod resource;
pub mod url;

pub use cli::Cli;
pub use config::{Config, FetchConfiguration};
pub use error::FetchError;
pub use provider::{Fetcher, GitHubFetcher};
pub use resource::Resource;
