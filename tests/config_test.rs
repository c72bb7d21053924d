//! Config and secrets loading from disk, plus builder wiring.

use std::fs;
use std::path::Path;

use heimdall::{Config, HeimdallBuilder, HeimdallError, Secrets};

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn load_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "config.toml",
        r#"
[cache]
namespace = "jobs"
ttl_secs = 60

[providers]
priority = ["groq", "openai"]

[providers.groq]
model = "llama-3.1-8b-instant"

[limits]
request_timeout_secs = 5
"#,
    );

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.cache.namespace, "jobs");
    assert_eq!(config.cache.ttl_secs, 60);
    assert!(config.cache.enabled);
    assert_eq!(config.providers.priority, vec!["groq", "openai"]);
    assert_eq!(
        config.providers.groq.model.as_deref(),
        Some("llama-3.1-8b-instant")
    );
    assert_eq!(config.request_timeout().as_secs(), 5);
    assert!(config.providers.openai.probe_availability);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(Some(&dir.path().join("absent.toml")));
    assert!(matches!(result, Err(HeimdallError::Configuration(_))));
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "config.toml", "[cache\nenabled = ");
    let result = Config::load_from_file(&path);
    match result {
        Err(HeimdallError::Configuration(msg)) => assert!(msg.contains("parse")),
        other => panic!("expected Configuration error, got {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn secrets_with_private_permissions_load() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "secrets.toml",
        "[anthropic]\napi_key = \"ant_from_file\"\n",
    );
    fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

    let secrets = Secrets::load_from_file(&path).unwrap();
    assert_eq!(secrets.api_key("anthropic").as_deref(), Some("ant_from_file"));
}

#[cfg(unix)]
#[test]
fn world_readable_secrets_are_rejected() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "secrets.toml", "[openai]\napi_key = \"sk\"\n");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

    match Secrets::load_from_file(&path) {
        Err(HeimdallError::Configuration(msg)) => assert!(msg.contains("insecure permissions")),
        other => panic!("expected Configuration error, got {other:?}"),
    }
}

#[tokio::test]
async fn from_config_uses_memory_cache_by_default() {
    let gateway = HeimdallBuilder::from_config(&Config::default(), &Secrets::default())
        .await
        .build()
        .unwrap();

    assert!(gateway.cache().is_connected());
    assert_eq!(gateway.cache().config().namespace, "ai");
}

#[tokio::test]
async fn from_config_without_cache() {
    let mut config = Config::default();
    config.cache.enabled = false;

    let gateway = HeimdallBuilder::from_config(&config, &Secrets::default())
        .await
        .build()
        .unwrap();

    assert!(!gateway.cache().is_connected());
    assert!(!gateway.health().cache_connected);
}
