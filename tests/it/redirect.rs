use github_fetcher::http::redirect::next_request;
use reqwest::Method;
use url::Url;

fn origin() -> Url {
    Url::parse("https://api.github.com/repos/owner/myrepo/contents/file?ref=main").unwrap()
}

#[test]
fn see_other_statuses_switch_to_get() {
    for status in [301, 302, 303] {
        let next = next_request(status, Some("/moved"), &Method::POST, &origin()).unwrap();
        assert_eq!(next.method, Method::GET, "status {status}");
    }
}

#[test]
fn temporary_and_permanent_redirects_keep_method() {
    for status in [307, 308] {
        let next = next_request(status, Some("/moved"), &Method::POST, &origin()).unwrap();
        assert_eq!(next.method, Method::POST, "status {status}");
    }
}

#[test]
fn relative_location_resolves_against_request() {
    let next = next_request(302, Some("/other/path?x=1"), &Method::GET, &origin()).unwrap();
    assert_eq!(next.url.as_str(), "https://api.github.com/other/path?x=1");
    assert_eq!(next.host, "api.github.com");
    assert_eq!(next.port, 443);
    assert!(next.tls);
}

#[test]
fn scheme_change_rederives_port() {
    let next = next_request(301, Some("http://mirror.local/file"), &Method::GET, &origin()).unwrap();
    assert_eq!(next.host, "mirror.local");
    assert_eq!(next.port, 80);
    assert!(!next.tls);
}

#[test]
fn explicit_port_is_kept() {
    let next = next_request(
        307,
        Some("https://mirror.local:8443/file"),
        &Method::GET,
        &origin(),
    )
    .unwrap();
    assert_eq!(next.port, 8443);
    assert!(next.tls);
}

#[test]
fn unknown_scheme_stops_following() {
    assert!(next_request(302, Some("mailto:someone@example.com"), &Method::GET, &origin()).is_none());
    assert!(next_request(302, Some("gopher://example.com/1"), &Method::GET, &origin()).is_none());
}

#[test]
fn missing_location_stops_following() {
    assert!(next_request(302, None, &Method::GET, &origin()).is_none());
}

#[test]
fn other_statuses_are_not_redirects() {
    for status in [200, 300, 304, 305, 404] {
        assert!(
            next_request(status, Some("/moved"), &Method::GET, &origin()).is_none(),
            "status {status}"
        );
    }
}
