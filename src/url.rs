use crate::config::FetchConfiguration;
use crate::error::FetchError;

/// The two GitHub REST endpoints this crate talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET /repos/{owner}/{repo}/contents{path}[?ref=]`
    Contents,
    /// `GET /repos/{owner}/{repo}/git/trees/{ref}?recursive=1`
    Trees,
}

/// Builds the request url for `endpoint`.
///
/// Segments are concatenated as given, without escaping, so callers must pass
/// already-safe values. The trees endpoint needs a ref.
pub fn request_url(config: &FetchConfiguration, endpoint: Endpoint) -> Result<String, FetchError> {
    config.validate()?;

    let repo_root = format!(
        "{}/repos/{}/{}",
        config.github_url, config.owner, config.repository
    );

    match endpoint {
        Endpoint::Contents => {
            let query = config
                .git_ref()
                .map(|r| format!("?ref={r}"))
                .unwrap_or_default();
            Ok(format!("{repo_root}/contents{}{query}", config.filepath))
        }
        Endpoint::Trees => {
            let git_ref = config.git_ref().ok_or(FetchError::MissingRef)?;
            Ok(format!("{repo_root}/git/trees/{git_ref}?recursive=1"))
        }
    }
}
