//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Read a `.env` file if one is present (`dotenvy`)
//! 2. Use environment variables when `CHICA_REDIRECT_URI` is set
//! 3. Otherwise load the first config file found by [`probe_config_paths`]
//! 4. With no file either, fall back to [`Config::default`]
//!
//! ## Environment Variables
//! - `CHICA_REDIRECT_URI`: OAuth redirect URI (required for env loading)
//! - `CHICA_CLIENT_NAME`: Application name registered with instances
//! - `CHICA_WEBSITE`: Application website
//! - `CHICA_SCOPES`: Space- or comma-separated OAuth scopes
//! - `CHICA_INSTANCE_SCHEME`: `https` (default) or `http`
//! - `CHICA_REQUEST_TIMEOUT_SECS`: Total request timeout
//! - `CHICA_CONNECT_TIMEOUT_SECS`: Connect timeout
//! - `CHICA_USER_AGENT`: User-Agent header
//! - `CHICA_KEYCHAIN_SERVICE`: Keychain service name
//! - `CHICA_REJECTED_DOMAINS`: Comma-separated instances to refuse
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.toml` or `./config.json` (current working directory)
//! 2. `./chica.toml` or `./chica.json` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use chica_domain::{
    ChicaError, Config, KeychainConfig, OAuthAppConfig, PolicyConfig, Result, TransportConfig,
};

const CONFIG_FILE_NAMES: [&str; 4] = ["config.toml", "config.json", "chica.toml", "chica.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `ChicaError::Config` if the environment or the file that was
/// found is invalid. A missing file is not an error.
pub fn load() -> Result<Config> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            tracing::warn!(error = %err, "Ignoring unreadable .env file");
        }
    }

    if std::env::var_os("CHICA_REDIRECT_URI").is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::info!("No configuration found; using defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from environment variables
///
/// `CHICA_REDIRECT_URI` must be present; every other variable falls back to
/// its default.
///
/// # Errors
/// Returns `ChicaError::Config` if the required variable is missing or a
/// value is invalid.
pub fn load_from_env() -> Result<Config> {
    let defaults = Config::default();

    let oauth = OAuthAppConfig {
        redirect_uri: env_var("CHICA_REDIRECT_URI")?,
        client_name: env_or("CHICA_CLIENT_NAME", defaults.oauth.client_name),
        website: env_or("CHICA_WEBSITE", defaults.oauth.website),
        scopes: env_list("CHICA_SCOPES").unwrap_or(defaults.oauth.scopes),
        instance_scheme: env_or("CHICA_INSTANCE_SCHEME", defaults.oauth.instance_scheme),
    };

    let transport = TransportConfig {
        request_timeout_secs: env_secs(
            "CHICA_REQUEST_TIMEOUT_SECS",
            defaults.transport.request_timeout_secs,
        )?,
        connect_timeout_secs: env_secs(
            "CHICA_CONNECT_TIMEOUT_SECS",
            defaults.transport.connect_timeout_secs,
        )?,
        user_agent: std::env::var("CHICA_USER_AGENT").ok(),
    };

    let keychain = KeychainConfig {
        service_name: env_or("CHICA_KEYCHAIN_SERVICE", defaults.keychain.service_name),
    };

    let policy = PolicyConfig {
        rejected_domains: env_list("CHICA_REJECTED_DOMAINS").unwrap_or_default(),
    };

    let config = Config { oauth, transport, keychain, policy };
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ChicaError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid or a value fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ChicaError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ChicaError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ChicaError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ChicaError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ChicaError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(ChicaError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Reject values the client cannot work with
fn validate(config: &Config) -> Result<()> {
    let scheme = config.oauth.instance_scheme.as_str();
    if scheme != "https" && scheme != "http" {
        return Err(ChicaError::Config(format!("Unsupported instance scheme: {scheme}")));
    }

    let redirect = &config.oauth.redirect_uri;
    if !redirect.split_once("://").is_some_and(|(s, _)| !s.is_empty()) {
        return Err(ChicaError::Config(format!("Redirect URI has no scheme: {redirect}")));
    }

    if config.oauth.scopes.is_empty() {
        return Err(ChicaError::Config("At least one OAuth scope is required".into()));
    }

    if config.transport.request_timeout_secs == 0 || config.transport.connect_timeout_secs == 0 {
        return Err(ChicaError::Config("Timeouts must be at least one second".into()));
    }

    if config.keychain.service_name.trim().is_empty() {
        return Err(ChicaError::Config("Keychain service name must not be empty".into()));
    }

    Ok(())
}

/// Probe multiple paths for configuration files
///
/// Searches the working directory, its two parents, then the same three
/// levels relative to the executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `ChicaError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| ChicaError::Config(format!("Missing required environment variable: {}", key)))
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty()).unwrap_or(default)
}

/// Split a list variable on commas and whitespace; `None` when unset or empty
fn env_list(key: &str) -> Option<Vec<String>> {
    let items: Vec<String> = std::env::var(key)
        .ok()?
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    (!items.is_empty()).then_some(items)
}

fn env_secs(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|e| ChicaError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
pub(crate) fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::{Builder, NamedTempFile};

    use super::*;

    pub(crate) static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ENV_KEYS: [&str; 10] = [
        "CHICA_REDIRECT_URI",
        "CHICA_CLIENT_NAME",
        "CHICA_WEBSITE",
        "CHICA_SCOPES",
        "CHICA_INSTANCE_SCHEME",
        "CHICA_REQUEST_TIMEOUT_SECS",
        "CHICA_CONNECT_TIMEOUT_SECS",
        "CHICA_USER_AGENT",
        "CHICA_KEYCHAIN_SERVICE",
        "CHICA_REJECTED_DOMAINS",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    fn temp_config(extension: &str, contents: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(&format!(".{extension}")).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("CHICA_TEST_BOOL_TRUE", "YES");
        std::env::set_var("CHICA_TEST_BOOL_FALSE", "off");
        std::env::remove_var("CHICA_TEST_BOOL_MISSING");

        assert!(env_bool("CHICA_TEST_BOOL_TRUE", false));
        assert!(!env_bool("CHICA_TEST_BOOL_FALSE", true));
        assert!(env_bool("CHICA_TEST_BOOL_MISSING", true));
        assert!(!env_bool("CHICA_TEST_BOOL_MISSING", false));

        std::env::remove_var("CHICA_TEST_BOOL_TRUE");
        std::env::remove_var("CHICA_TEST_BOOL_FALSE");
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("CHICA_REDIRECT_URI", "myapp://oauth");
        std::env::set_var("CHICA_CLIENT_NAME", "My App");
        std::env::set_var("CHICA_SCOPES", "read,write");
        std::env::set_var("CHICA_INSTANCE_SCHEME", "http");
        std::env::set_var("CHICA_REQUEST_TIMEOUT_SECS", "12");
        std::env::set_var("CHICA_USER_AGENT", "MyApp/2.0");
        std::env::set_var("CHICA_KEYCHAIN_SERVICE", "MyApp.credentials");
        std::env::set_var("CHICA_REJECTED_DOMAINS", "bad.example, worse.example");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.oauth.redirect_uri, "myapp://oauth");
        assert_eq!(config.oauth.url_scheme(), "myapp");
        assert_eq!(config.oauth.client_name, "My App");
        assert_eq!(config.oauth.scopes, vec!["read", "write"]);
        assert_eq!(config.oauth.instance_scheme, "http");
        assert_eq!(config.transport.request_timeout_secs, 12);
        assert_eq!(config.transport.connect_timeout_secs, 10);
        assert_eq!(config.transport.user_agent.as_deref(), Some("MyApp/2.0"));
        assert_eq!(config.keychain.service_name, "MyApp.credentials");
        assert_eq!(config.policy.rejected_domains, vec!["bad.example", "worse.example"]);
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, ChicaError::Config(ref msg) if msg.contains("CHICA_REDIRECT_URI")));
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("CHICA_REDIRECT_URI", "myapp://oauth");
        std::env::set_var("CHICA_CONNECT_TIMEOUT_SECS", "soon");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(ChicaError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_load_from_env_rejects_unknown_scheme() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("CHICA_REDIRECT_URI", "myapp://oauth");
        std::env::set_var("CHICA_INSTANCE_SCHEME", "gopher");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(ChicaError::Config(msg)) if msg.contains("gopher")));
    }

    #[test]
    fn test_load_from_file_toml() {
        let file = temp_config(
            "toml",
            r#"
[oauth]
client_name = "Starlight Beta"
redirect_uri = "starlight-beta://oauth"

[policy]
rejected_domains = ["bad.example"]
"#,
        );

        let config = load_from_file(Some(file.path().to_path_buf())).expect("toml config");

        assert_eq!(config.oauth.client_name, "Starlight Beta");
        assert_eq!(config.oauth.url_scheme(), "starlight-beta");
        assert_eq!(config.oauth.scopes, vec!["read", "write", "follow", "push"]);
        assert!(config.policy.is_rejected("BAD.example"));
        assert_eq!(config.transport, TransportConfig::default());
    }

    #[test]
    fn test_load_from_file_json() {
        let file = temp_config(
            "json",
            r#"{ "transport": { "request_timeout_secs": 5, "user_agent": "Starlight/1.0" } }"#,
        );

        let config = load_from_file(Some(file.path().to_path_buf())).expect("json config");

        assert_eq!(config.transport.request_timeout_secs, 5);
        assert_eq!(config.transport.user_agent.as_deref(), Some("Starlight/1.0"));
        assert_eq!(config.oauth, OAuthAppConfig::default());
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(matches!(result, Err(ChicaError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let file = temp_config("json", r#"{ "this is": "not valid json" "#);
        assert!(load_from_file(Some(file.path().to_path_buf())).is_err());
    }

    #[test]
    fn test_load_from_file_rejects_zero_timeout() {
        let file = temp_config("toml", "[transport]\nconnect_timeout_secs = 0\n");
        let result = load_from_file(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(ChicaError::Config(msg)) if msg.contains("Timeouts")));
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", &PathBuf::from("test.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }
}
