use reqwest::Method;
use url::Url;

/// The request to issue after following a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextRequest {
    pub method: Method,
    pub url: Url,
    pub host: String,
    pub port: u16,
    pub tls: bool,
}

/// Decides whether a response redirects, and where to.
///
/// Only 301, 302, 303, 307 and 308 with a `Location` are followed. The location is
/// resolved against `request_url`. 301/302/303 turn the next request into a GET,
/// 307/308 keep `method`. Schemes must end in `p` (plain, port 80) or `s` (TLS,
/// port 443); anything else stops following.
pub fn next_request(
    status: u16,
    location: Option<&str>,
    method: &Method,
    request_url: &Url,
) -> Option<NextRequest> {
    let location = location?;

    let method = match status {
        301..=303 => Method::GET,
        307 | 308 => method.clone(),
        _ => return None,
    };

    let url = request_url.join(location).ok()?;

    let (tls, default_port) = match url.scheme().chars().last() {
        Some('p') => (false, 80),
        Some('s') => (true, 443),
        _ => return None,
    };

    let host = url.host_str()?.to_string();
    let port = url.port().unwrap_or(default_port);

    Some(NextRequest {
        method,
        url,
        host,
        port,
        tls,
    })
}
