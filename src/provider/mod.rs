mod github;

pub use github::GitHubFetcher;

use crate::error::FetchError;
use crate::resource::Resource;

pub trait Fetcher {
    /// Fetches the configured file.
    fn fetch(&self) -> impl std::future::Future<Output = Result<Resource, FetchError>> + Send;

    /// Lists the files under the configured path.
    fn files(&self) -> impl std::future::Future<Output = Result<Vec<String>, FetchError>> + Send;
}
