pub mod redirect;

use crate::config::{Config, FetchConfiguration};
use crate::error::FetchError;
use bytes::Bytes;
use reqwest::header::{ACCEPT, LOCATION, USER_AGENT};
use reqwest::{Client, Method, Proxy, StatusCode};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

pub const GITHUB_V3_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// Redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 5;

/// Performs one GET exchange and returns the body of a 200 response.
pub trait HttpExchanger {
    fn exchange(
        &self,
        url: &str,
        config: &FetchConfiguration,
    ) -> impl Future<Output = Result<Bytes, FetchError>> + Send;
}

/// `reqwest`-backed exchanger.
///
/// Every exchange builds its own client with an empty idle pool, so the connection
/// is closed once the exchange returns, whatever the outcome. Redirects are followed
/// by hand through [`redirect::next_request`].
#[derive(Debug, Clone)]
pub struct ReqwestExchanger {
    settings: Config,
    max_redirects: usize,
}

impl ReqwestExchanger {
    pub fn new(settings: Config) -> Self {
        Self {
            settings,
            max_redirects: MAX_REDIRECTS,
        }
    }

    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    fn client(&self, config: &FetchConfiguration) -> Result<Client, FetchError> {
        let timeout = config
            .timeout_millis
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.settings.timeout());

        let mut builder = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(timeout)
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .danger_accept_invalid_certs(self.settings.trust_all_certificates)
            .no_proxy();

        if config.use_system_proxy {
            builder = builder.proxy(self.proxy("http")?).proxy(self.proxy("https")?);
        }

        builder.build().map_err(|source| FetchError::Client { source })
    }

    /// Proxy applied to targets of `scheme` only.
    fn proxy(&self, scheme: &'static str) -> Result<Proxy, FetchError> {
        let endpoint = self.settings.proxy_for(scheme);
        let proxy_url = endpoint.url(self.settings.proxy_type);

        let proxy = match scheme {
            "https" => Proxy::https(proxy_url.as_str()),
            _ => Proxy::http(proxy_url.as_str()),
        }
        .map_err(|source| FetchError::Proxy { scheme, source })?;

        Ok(match endpoint.credentials() {
            Some((username, password)) => proxy.basic_auth(username, password),
            None => proxy,
        })
    }
}

impl HttpExchanger for ReqwestExchanger {
    async fn exchange(&self, url: &str, config: &FetchConfiguration) -> Result<Bytes, FetchError> {
        let origin = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let client = self.client(config)?;

        let mut method = Method::GET;
        let mut target = origin.clone();
        let mut hops = 0;

        loop {
            debug!(
                %method,
                url = %target,
                port = target.port_or_known_default(),
                "sending request"
            );

            let mut request = client
                .request(method.clone(), target.clone())
                .header(ACCEPT, GITHUB_V3_MEDIA_TYPE)
                .header(USER_AGENT, config.owner.as_str());

            // Credentials never leave the origin they were configured for.
            if let Some((username, token)) = config.basic_auth()
                && same_origin(&target, &origin)
            {
                request = request.basic_auth(username, Some(token));
            }

            let response = request
                .send()
                .await
                .map_err(|source| transport_error(&target, source))?;
            let status = response.status();

            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok());

                if let Some(next) =
                    redirect::next_request(status.as_u16(), location, &method, &target)
                {
                    hops += 1;
                    if hops > self.max_redirects {
                        error!(url, limit = self.max_redirects, "redirect limit reached");
                        return Err(FetchError::TooManyRedirects {
                            url: url.to_string(),
                            limit: self.max_redirects,
                        });
                    }

                    debug!(
                        status = status.as_u16(),
                        location = %next.url,
                        host = %next.host,
                        port = next.port,
                        tls = next.tls,
                        "following redirect"
                    );
                    method = next.method;
                    target = next.url;
                    continue;
                }
            }

            if status != StatusCode::OK {
                let err = FetchError::HttpStatus {
                    url: url.to_string(),
                    status_code: status.as_u16(),
                    status_message: status.canonical_reason().unwrap_or_default().to_string(),
                };
                error!(url, status = status.as_u16(), "{err}");
                return Err(err);
            }

            return response
                .bytes()
                .await
                .map_err(|source| transport_error(&target, source));
        }
    }
}

/// Scheme, host and effective port all match.
fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

fn transport_error(url: &Url, source: reqwest::Error) -> FetchError {
    error!(url = %url, error = %source, "request failed");
    FetchError::Transport {
        url: url.to_string(),
        source,
    }
}
