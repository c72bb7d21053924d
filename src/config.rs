//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. explicit path (the CLI's `--config`)
//! 2. `~/.heimdall/config.toml` (user)
//! 3. `/etc/heimdall/config.toml` (system)
//! 4. built-in defaults
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.heimdall/secrets.toml` (user, must be 0600 or 0400)
//! 2. `/etc/heimdall/secrets.toml` (system, must be 0600 or 0400)
//!
//! Each key falls back to its environment variable.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::providers::DEFAULT_PRIORITY;
use crate::{HeimdallError, Result};

/// Gateway configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Response cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Cache responses at all (default: true).
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Key prefix (default: "ai").
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Entry lifetime in seconds (default: 3600).
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
    /// Capacity of the in-memory store (default: 10000).
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    /// Redis server; the in-memory store is used when absent.
    #[serde(default)]
    pub redis_url: Option<String>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            namespace: default_namespace(),
            ttl_secs: default_ttl(),
            max_entries: default_max_entries(),
            redis_url: None,
        }
    }
}

impl CacheSettings {
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .namespace(self.namespace.clone())
            .ttl(Duration::from_secs(self.ttl_secs))
            .max_entries(self.max_entries)
    }
}

fn default_true() -> bool {
    true
}

fn default_namespace() -> String {
    "ai".to_string()
}

fn default_ttl() -> u64 {
    3600
}

fn default_max_entries() -> u64 {
    10_000
}

/// Resource limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Deadline for one gateway operation in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Per-HTTP-request timeout; none when absent.
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_timeout(),
            http_timeout_secs: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// Provider configurations.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvidersConfig {
    /// Fallback order (default: openai, anthropic, groq).
    #[serde(default = "default_priority")]
    pub priority: Vec<String>,
    #[serde(default)]
    pub openai: OpenAiSettings,
    #[serde(default)]
    pub anthropic: BackendSettings,
    #[serde(default)]
    pub groq: BackendSettings,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            priority: default_priority(),
            openai: OpenAiSettings::default(),
            anthropic: BackendSettings::default(),
            groq: BackendSettings::default(),
        }
    }
}

fn default_priority() -> Vec<String> {
    DEFAULT_PRIORITY.iter().map(|s| s.to_string()).collect()
}

/// OpenAI adapter settings.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub embedding_model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    /// Probe `GET /models` when checking availability (default: true).
    #[serde(default = "default_true")]
    pub probe_availability: bool,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            model: None,
            embedding_model: None,
            base_url: None,
            probe_availability: true,
        }
    }
}

/// Settings shared by the completion-only adapters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendSettings {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Secrets configuration (API keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub openai: Option<ApiKeySecret>,
    #[serde(default)]
    pub anthropic: Option<ApiKeySecret>,
    #[serde(default)]
    pub groq: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

/// Provider name → environment variable name mapping.
const PROVIDER_ENV_VARS: &[(&str, &str)] = &[
    ("openai", "OPENAI_API_KEY"),
    ("anthropic", "ANTHROPIC_API_KEY"),
    ("groq", "GROQ_API_KEY"),
];

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Falls back to defaults when no file exists; an explicit path that
    /// does not exist is an error.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a specific config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HeimdallError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            HeimdallError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(HeimdallError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".heimdall").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/heimdall/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Per-operation deadline.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.limits.request_timeout_secs)
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Returns empty secrets if no file exists (keys may come from env vars).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".heimdall").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/heimdall/secrets.toml");
        if system_secrets.exists() {
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Parse a specific secrets file after checking its permissions.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            HeimdallError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            HeimdallError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            HeimdallError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(HeimdallError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// Get API key for a provider, falling back to the corresponding environment variable.
    pub fn api_key(&self, provider: &str) -> Option<String> {
        self.file_key(provider).or_else(|| {
            PROVIDER_ENV_VARS
                .iter()
                .find(|(name, _)| *name == provider)
                .and_then(|(_, env_var)| std::env::var(env_var).ok())
                .filter(|key| !key.is_empty())
        })
    }

    fn file_key(&self, provider: &str) -> Option<String> {
        match provider {
            "openai" => self.openai.as_ref(),
            "anthropic" => self.anthropic.as_ref(),
            "groq" => self.groq.as_ref(),
            _ => None,
        }
        .map(|s| s.api_key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert!(config.cache.enabled);
        assert_eq!(config.cache.namespace, "ai");
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(config.cache.max_entries, 10_000);
        assert_eq!(config.limits.request_timeout_secs, 30);
        assert_eq!(config.providers.priority, vec!["openai", "anthropic", "groq"]);
        assert!(config.providers.openai.probe_availability);
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [cache]
            ttl_secs = 60
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.cache.ttl_secs, 60);
        // Defaults preserved
        assert_eq!(config.cache.namespace, "ai");
        assert_eq!(config.providers.priority.len(), 3);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [cache]
            enabled = true
            namespace = "jobs"
            redis_url = "redis://localhost:6379"

            [providers]
            priority = ["groq", "openai"]

            [providers.openai]
            model = "gpt-4o-mini"
            probe_availability = false

            [providers.groq]
            base_url = "http://localhost:8080/openai/v1"

            [limits]
            request_timeout_secs = 60
            http_timeout_secs = 20
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.cache.namespace, "jobs");
        assert_eq!(
            config.cache.redis_url.as_deref(),
            Some("redis://localhost:6379")
        );
        assert_eq!(config.providers.priority, vec!["groq", "openai"]);
        assert_eq!(config.providers.openai.model.as_deref(), Some("gpt-4o-mini"));
        assert!(!config.providers.openai.probe_availability);
        assert_eq!(
            config.providers.groq.base_url.as_deref(),
            Some("http://localhost:8080/openai/v1")
        );
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert_eq!(config.limits.http_timeout_secs, Some(20));
    }

    #[test]
    fn cache_settings_map_to_cache_config() {
        let settings = CacheSettings {
            namespace: "x".into(),
            ttl_secs: 5,
            ..CacheSettings::default()
        };
        let config = settings.cache_config();
        assert_eq!(config.namespace, "x");
        assert_eq!(config.ttl, Duration::from_secs(5));
    }

    #[test]
    fn parse_secrets() {
        let toml = r#"
            [openai]
            api_key = "sk-test-key"

            [groq]
            api_key = "gsk-test-key"
        "#;
        let secrets: Secrets = toml::from_str(toml).unwrap();
        assert_eq!(secrets.openai.as_ref().unwrap().api_key, "sk-test-key");
        assert_eq!(secrets.groq.as_ref().unwrap().api_key, "gsk-test-key");
        assert!(secrets.anthropic.is_none());
    }

    #[test]
    fn api_key_from_secrets() {
        let secrets = Secrets {
            openai: Some(ApiKeySecret {
                api_key: "from-file".to_string(),
            }),
            ..Default::default()
        };
        assert_eq!(secrets.api_key("openai"), Some("from-file".to_string()));
        // Unknown provider returns None
        assert_eq!(secrets.api_key("nonexistent"), None);
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }
}
