use crate::error::FetchError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

const DEFAULT_TIMEOUT_MILLIS: u64 = 10_000;
const DEFAULT_PROXY_HOST: &str = "localhost";
const DEFAULT_PROXY_PORT: u16 = 3128;

/// What to fetch from GitHub, and as whom.
///
/// `github_url`, `owner`, `repository` and `filepath` are required; `filepath` is
/// absolute-style (`/path/to/file`) and is appended to the API url as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FetchConfiguration {
    pub github_url: String,
    pub owner: String,
    pub repository: String,
    pub filepath: String,
    pub branch_or_tag: Option<String>,
    pub username: Option<String>,
    pub personal_access_token: Option<String>,
    pub use_system_proxy: bool,
    /// Overrides [`Config::timeout_millis`] for this fetch.
    pub timeout_millis: Option<u64>,
}

impl FetchConfiguration {
    pub fn new(
        github_url: impl Into<String>,
        owner: impl Into<String>,
        repository: impl Into<String>,
        filepath: impl Into<String>,
    ) -> Self {
        Self {
            github_url: github_url.into(),
            owner: owner.into(),
            repository: repository.into(),
            filepath: filepath.into(),
            ..Self::default()
        }
    }

    pub fn with_branch_or_tag(mut self, git_ref: impl Into<String>) -> Self {
        self.branch_or_tag = Some(git_ref.into());
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        personal_access_token: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.personal_access_token = Some(personal_access_token.into());
        self
    }

    pub fn with_system_proxy(mut self, use_system_proxy: bool) -> Self {
        self.use_system_proxy = use_system_proxy;
        self
    }

    pub fn with_timeout_millis(mut self, timeout_millis: u64) -> Self {
        self.timeout_millis = Some(timeout_millis);
        self
    }

    /// Fails with the list of required fields that are empty.
    pub fn validate(&self) -> Result<(), FetchError> {
        let fields: Vec<&'static str> = [
            ("githubUrl", &self.github_url),
            ("owner", &self.owner),
            ("repository", &self.repository),
            ("filepath", &self.filepath),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();

        if fields.is_empty() {
            Ok(())
        } else {
            Err(FetchError::MissingConfiguration { fields })
        }
    }

    /// Returns the branch, tag or sha, treating an empty string as unset.
    pub fn git_ref(&self) -> Option<&str> {
        self.branch_or_tag.as_deref().filter(|r| !r.is_empty())
    }

    /// Returns the basic-auth pair when both halves are non-blank.
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().filter(|s| !s.trim().is_empty())?;
        let token = self
            .personal_access_token
            .as_deref()
            .filter(|s| !s.trim().is_empty())?;
        Some((username, token))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProxyType {
    #[default]
    Http,
    Socks5,
}

impl ProxyType {
    fn url_scheme(self) -> &'static str {
        match self {
            ProxyType::Http => "http",
            ProxyType::Socks5 => "socks5",
        }
    }
}

/// A proxy endpoint used for one target scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySettings {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl ProxySettings {
    /// Reads the proxy advertised by the environment for `scheme` (`http` or `https`).
    pub fn from_env(scheme: &str) -> Self {
        let lower = format!("{scheme}_proxy");
        let upper = lower.to_uppercase();
        let value = std::env::var(&lower)
            .or_else(|_| std::env::var(&upper))
            .ok();
        Self::from_proxy_url(value.as_deref())
    }

    /// Takes host and port from a proxy url such as `http://proxy.corp:8080`.
    ///
    /// A value without a scheme is read as `http://`. Anything missing or
    /// unparseable falls back to `localhost:3128`.
    pub fn from_proxy_url(value: Option<&str>) -> Self {
        let parsed = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .and_then(|v| {
                let candidate = if v.contains("://") {
                    Cow::Borrowed(v)
                } else {
                    Cow::Owned(format!("http://{v}"))
                };
                let parsed = url::Url::parse(&candidate)
                    .ok()
                    .filter(|u| u.host_str().is_some());
                if parsed.is_none() {
                    warn!(proxy = v, "ignoring unparseable proxy setting");
                }
                parsed
            });

        let host = parsed
            .as_ref()
            .and_then(|u| u.host_str())
            .unwrap_or(DEFAULT_PROXY_HOST)
            .to_string();
        let port = parsed
            .as_ref()
            .and_then(|u| u.port())
            .unwrap_or(DEFAULT_PROXY_PORT);

        Self {
            host,
            port,
            username: None,
            password: None,
        }
    }

    /// The proxy url handed to the HTTP client.
    pub fn url(&self, proxy_type: ProxyType) -> String {
        format!("{}://{}:{}", proxy_type.url_scheme(), self.host, self.port)
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().filter(|s| !s.is_empty())?;
        Some((username, self.password.as_deref().unwrap_or_default()))
    }
}

/// Process-wide HTTP client settings for github-fetcher.
///
/// Stored at `~/.config/github-fetcher/config.json`. A missing file or missing
/// fields fall back to the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub timeout_millis: u64,
    pub proxy_type: ProxyType,
    pub http_proxy: ProxySettings,
    pub https_proxy: ProxySettings,
    /// Accept any server certificate.
    pub trust_all_certificates: bool,
    pub github_token_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
        Self {
            timeout_millis: DEFAULT_TIMEOUT_MILLIS,
            proxy_type: ProxyType::Http,
            http_proxy: ProxySettings::from_env("http"),
            https_proxy: ProxySettings::from_env("https"),
            trust_all_certificates: true,
            github_token_path: home.join(".github").join("token"),
        }
    }
}

impl Config {
    /// Loads configuration from the default location, or defaults if there is none.
    pub fn load() -> Result<Self, FetchError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, FetchError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents =
            fs_err::read_to_string(path).map_err(|e| FetchError::ConfigLoad { source: e })?;

        serde_json::from_str(&contents).map_err(|e| FetchError::ConfigParse { source: e })
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".config")
            })
            .join("github-fetcher")
            .join("config.json")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_millis)
    }

    /// Selects the proxy endpoint for a target scheme; anything but `https` uses the http one.
    pub fn proxy_for(&self, scheme: &str) -> &ProxySettings {
        if scheme.eq_ignore_ascii_case("https") {
            &self.https_proxy
        } else {
            &self.http_proxy
        }
    }

    /// Reads the GitHub token from the configured `github_token_path`, if present.
    pub fn read_token(&self) -> Option<String> {
        std::fs::read_to_string(&self.github_token_path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}
