use github_fetcher::config::{ProxySettings, ProxyType};
use github_fetcher::{Config, FetchConfiguration, FetchError};
use std::fs;
use std::io::Write;
use std::time::Duration;

fn proxy(host: &str, port: u16) -> ProxySettings {
    ProxySettings {
        host: host.to_string(),
        port,
        username: None,
        password: None,
    }
}

#[test]
fn config_default_values() {
    let config = Config::default();
    assert_eq!(config.timeout_millis, 10_000);
    assert_eq!(config.timeout(), Duration::from_secs(10));
    assert_eq!(config.proxy_type, ProxyType::Http);
    assert!(config.trust_all_certificates);
}

#[test]
fn config_load_missing_file_returns_defaults() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = Config::load_from(&temp_dir.path().join("config.json")).unwrap();
    assert_eq!(config.timeout_millis, 10_000);
}

#[test]
fn config_load_fills_missing_fields_with_defaults() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(
        &path,
        r#"{
            "timeout_millis": 2500,
            "proxy_type": "SOCKS5",
            "https_proxy": { "host": "proxy.corp", "port": 8443, "username": "me", "password": "secret" }
        }"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();

    assert_eq!(config.timeout_millis, 2500);
    assert_eq!(config.proxy_type, ProxyType::Socks5);
    assert_eq!(config.https_proxy.host, "proxy.corp");
    assert_eq!(config.https_proxy.credentials(), Some(("me", "secret")));
    assert_eq!(
        config.https_proxy.url(config.proxy_type),
        "socks5://proxy.corp:8443"
    );
    assert!(config.trust_all_certificates);
}

#[test]
fn config_load_rejects_invalid_json() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    let result = Config::load_from(&path);
    assert!(matches!(result, Err(FetchError::ConfigParse { .. })));
}

#[test]
fn proxy_is_selected_by_target_scheme() {
    let config = Config {
        http_proxy: proxy("plain.proxy", 3128),
        https_proxy: proxy("secure.proxy", 8443),
        ..Config::default()
    };

    assert_eq!(config.proxy_for("https").host, "secure.proxy");
    assert_eq!(config.proxy_for("HTTPS").host, "secure.proxy");
    assert_eq!(config.proxy_for("http").host, "plain.proxy");
}

#[test]
fn proxy_url_falls_back_to_localhost() {
    assert_eq!(ProxySettings::from_proxy_url(None), proxy("localhost", 3128));
    assert_eq!(
        ProxySettings::from_proxy_url(Some("   ")),
        proxy("localhost", 3128)
    );
    assert_eq!(
        ProxySettings::from_proxy_url(Some("::not a url::")),
        proxy("localhost", 3128)
    );
}

#[test]
fn proxy_url_takes_host_and_port() {
    assert_eq!(
        ProxySettings::from_proxy_url(Some("http://proxy.corp:8080")),
        proxy("proxy.corp", 8080)
    );
    assert_eq!(
        ProxySettings::from_proxy_url(Some("http://proxy.corp")),
        proxy("proxy.corp", 3128)
    );
    assert_eq!(
        ProxySettings::from_proxy_url(Some("proxy.corp:8080")),
        proxy("proxy.corp", 8080)
    );
    assert_eq!(
        ProxySettings::from_proxy_url(Some(" proxy.corp ")),
        proxy("proxy.corp", 3128)
    );
}

#[test]
fn proxy_credentials_need_a_username() {
    let mut settings = proxy("proxy.corp", 8080);
    assert!(settings.credentials().is_none());

    settings.password = Some("secret".to_string());
    assert!(settings.credentials().is_none());

    settings.username = Some("me".to_string());
    assert_eq!(settings.credentials(), Some(("me", "secret")));
}

#[test]
fn basic_auth_requires_both_non_blank() {
    let config = FetchConfiguration::new("http://localhost", "owner", "repo", "/file");
    assert!(config.basic_auth().is_none());

    let config = config.with_credentials("user", "   ");
    assert!(config.basic_auth().is_none());

    let config = config.with_credentials("user", "ghp_token");
    assert_eq!(config.basic_auth(), Some(("user", "ghp_token")));
}

#[test]
fn config_read_token_returns_none_if_missing() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = Config {
        github_token_path: temp_dir.path().join("nonexistent_token"),
        ..Config::default()
    };

    assert!(config.read_token().is_none());
}

#[test]
fn config_read_token_returns_trimmed_content() {
    let temp_dir = tempfile::tempdir().unwrap();
    let token_path = temp_dir.path().join("token");

    let mut file = fs::File::create(&token_path).unwrap();
    writeln!(file, "  ghp_test_token_123  ").unwrap();

    let config = Config {
        github_token_path: token_path,
        ..Config::default()
    };

    assert_eq!(config.read_token(), Some("ghp_test_token_123".to_string()));
}

#[test]
fn config_read_token_returns_none_for_whitespace_only() {
    let temp_dir = tempfile::tempdir().unwrap();
    let token_path = temp_dir.path().join("token");

    let mut file = fs::File::create(&token_path).unwrap();
    writeln!(file, "   \n\t  ").unwrap();

    let config = Config {
        github_token_path: token_path,
        ..Config::default()
    };

    assert!(config.read_token().is_none());
}
