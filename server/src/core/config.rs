use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL_SECS,
    DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SESSION_TTL_HOURS, SQLITE_MAX_CONNECTIONS,
};

// =============================================================================
// File Config Structs (all optional, from JSON config file)
// =============================================================================

/// Server configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Auth configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AuthFileConfig {
    pub enabled: Option<bool>,
    pub bootstrap_token: Option<String>,
    pub session_ttl_hours: Option<u32>,
}

/// Database configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    pub path: Option<String>,
    pub max_connections: Option<u32>,
}

/// Cache configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CacheFileConfig {
    pub max_entries: Option<u64>,
    pub ttl_secs: Option<u64>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub auth: Option<AuthFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub cache: Option<CacheFileConfig>,
    pub debug: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Unknown top-level keys collected by the flattened `extra`
    fn unknown_fields(&self) -> Vec<&str> {
        match &self.extra {
            serde_json::Value::Object(map) => map.keys().map(|k| k.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        let keys = self.unknown_fields();
        if !keys.is_empty() {
            tracing::warn!(
                fields = %keys.join(", "),
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        // Server
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        // Auth
        if let Some(auth) = other.auth {
            let current = self.auth.get_or_insert_with(AuthFileConfig::default);
            if auth.enabled.is_some() {
                tracing::trace!(enabled = ?auth.enabled, "Merging auth.enabled");
                current.enabled = auth.enabled;
            }
            if auth.bootstrap_token.is_some() {
                tracing::trace!(bootstrap_token = "***", "Merging auth.bootstrap_token");
                current.bootstrap_token = auth.bootstrap_token;
            }
            if auth.session_ttl_hours.is_some() {
                tracing::trace!(session_ttl_hours = ?auth.session_ttl_hours, "Merging auth.session_ttl_hours");
                current.session_ttl_hours = auth.session_ttl_hours;
            }
        }

        // Database
        if let Some(database) = other.database {
            let current = self.database.get_or_insert_with(DatabaseFileConfig::default);
            if database.path.is_some() {
                tracing::trace!(path = ?database.path, "Merging database.path");
                current.path = database.path;
            }
            if database.max_connections.is_some() {
                tracing::trace!(max_connections = ?database.max_connections, "Merging database.max_connections");
                current.max_connections = database.max_connections;
            }
        }

        // Cache
        if let Some(cache) = other.cache {
            let current = self.cache.get_or_insert_with(CacheFileConfig::default);
            if cache.max_entries.is_some() {
                tracing::trace!(max_entries = ?cache.max_entries, "Merging cache.max_entries");
                current.max_entries = cache.max_entries;
            }
            if cache.ttl_secs.is_some() {
                tracing::trace!(ttl_secs = ?cache.ttl_secs, "Merging cache.ttl_secs");
                current.ttl_secs = cache.ttl_secs;
            }
        }

        // Debug
        if other.debug.is_some() {
            tracing::trace!(debug = ?other.debug, "Merging debug");
            self.debug = other.debug;
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Admin authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub enabled: bool,
    /// Fixed bootstrap token; a random one is generated per start when unset
    pub bootstrap_token: Option<String>,
    pub session_ttl_hours: u32,
}

/// SQLite configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database file; `None` places it in the data directory
    pub path: Option<String>,
    pub max_connections: u32,
}

/// Reference-data cache configuration (used by CacheService)
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub max_entries: u64,
    /// TTL applied when a caller does not pass one
    pub ttl_secs: u64,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            auth: AuthConfig {
                enabled: true,
                bootstrap_token: None,
                session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            },
            database: DatabaseConfig {
                path: None,
                max_connections: SQLITE_MAX_CONNECTIONS,
            },
            cache: CacheConfig {
                max_entries: DEFAULT_CACHE_MAX_ENTRIES,
                ttl_secs: DEFAULT_CACHE_TTL_SECS,
            },
            debug: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.vitrina/vitrina.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Profile dir - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::layer(file_config, cli);
        config.validate()?;
        Ok(config)
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn layer(file_config: FileConfig, cli: &CliConfig) -> Self {
        let defaults = Self::default();
        let file_server = file_config.server.unwrap_or_default();
        let file_auth = file_config.auth.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();
        let file_cache = file_config.cache.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or(defaults.server.host);
        let port = cli.port.or(file_server.port).unwrap_or(defaults.server.port);

        // auth.enabled: file config sets default, --no-auth CLI flag disables
        let auth_enabled = if cli.no_auth {
            false
        } else {
            file_auth.enabled.unwrap_or(defaults.auth.enabled)
        };

        Self {
            server: ServerConfig { host, port },
            auth: AuthConfig {
                enabled: auth_enabled,
                bootstrap_token: cli
                    .bootstrap_token
                    .clone()
                    .or(file_auth.bootstrap_token)
                    .filter(|t| !t.trim().is_empty()),
                session_ttl_hours: cli
                    .session_ttl_hours
                    .or(file_auth.session_ttl_hours)
                    .unwrap_or(defaults.auth.session_ttl_hours),
            },
            database: DatabaseConfig {
                path: cli.db_path.clone().or(file_database.path),
                max_connections: file_database
                    .max_connections
                    .unwrap_or(defaults.database.max_connections),
            },
            cache: CacheConfig {
                max_entries: cli
                    .cache_max_entries
                    .or(file_cache.max_entries)
                    .unwrap_or(defaults.cache.max_entries),
                ttl_secs: cli
                    .cache_ttl_secs
                    .or(file_cache.ttl_secs)
                    .unwrap_or(defaults.cache.ttl_secs),
            },
            // debug: CLI/env flag takes precedence, then file config
            debug: cli.debug || file_config.debug.unwrap_or(false),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }
        // Port 0 would bind to a random port
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }
        if self.auth.session_ttl_hours == 0 {
            anyhow::bail!("Configuration error: auth.session_ttl_hours must be greater than 0");
        }
        if self.database.max_connections == 0 {
            anyhow::bail!("Configuration error: database.max_connections must be greater than 0");
        }
        if self.cache.max_entries == 0 {
            anyhow::bail!("Configuration error: cache.max_entries must be greater than 0");
        }

        if !self.auth.enabled && is_all_interfaces(&self.server.host) {
            tracing::warn!(
                host = %self.server.host,
                "Authentication is disabled while listening on all interfaces"
            );
        }

        Ok(())
    }
}

/// Get the profile config path (~/.vitrina/vitrina.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
pub(crate) fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_config_parse_full() {
        let json = r#"{
            "server": {"host": "0.0.0.0", "port": 9000},
            "auth": {"enabled": false, "bootstrap_token": "abc", "session_ttl_hours": 4},
            "database": {"path": "/tmp/v.db", "max_connections": 2},
            "cache": {"max_entries": 50, "ttl_secs": 10},
            "debug": true
        }"#;
        let config = FileConfig::parse(json).unwrap();
        let server = config.server.unwrap();
        assert_eq!(server.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(server.port, Some(9000));
        let auth = config.auth.unwrap();
        assert_eq!(auth.enabled, Some(false));
        assert_eq!(auth.session_ttl_hours, Some(4));
        assert_eq!(config.database.unwrap().max_connections, Some(2));
        assert_eq!(config.cache.unwrap().ttl_secs, Some(10));
        assert_eq!(config.debug, Some(true));
    }

    #[test]
    fn test_file_config_parse_empty() {
        let config = FileConfig::parse("{}").unwrap();
        assert!(config.server.is_none());
        assert!(config.unknown_fields().is_empty());
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let config = FileConfig::parse(r#"{"server": {"port": 1}, "sever": {}}"#).unwrap();
        assert_eq!(config.unknown_fields(), vec!["sever"]);
    }

    #[test]
    fn test_file_config_merge() {
        let mut base =
            FileConfig::parse(r#"{"server": {"host": "a", "port": 1}, "cache": {"ttl_secs": 5}}"#)
                .unwrap();
        let overlay =
            FileConfig::parse(r#"{"server": {"port": 2}, "auth": {"enabled": false}}"#).unwrap();
        base.merge(overlay);

        let server = base.server.unwrap();
        assert_eq!(server.host.as_deref(), Some("a"));
        assert_eq!(server.port, Some(2));
        assert_eq!(base.auth.unwrap().enabled, Some(false));
        assert_eq!(base.cache.unwrap().ttl_secs, Some(5));
    }

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::layer(FileConfig::default(), &CliConfig::default());
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert!(config.auth.enabled);
        assert_eq!(config.auth.session_ttl_hours, DEFAULT_SESSION_TTL_HOURS);
        assert!(config.auth.bootstrap_token.is_none());
        assert!(config.database.path.is_none());
        assert!(!config.debug);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_app_config_cli_override() {
        let file = FileConfig::parse(
            r#"{"server": {"host": "file.host", "port": 7000}, "auth": {"session_ttl_hours": 2}}"#,
        )
        .unwrap();
        let cli = CliConfig {
            port: Some(3000),
            no_auth: true,
            debug: true,
            session_ttl_hours: Some(6),
            db_path: Some("/tmp/x.db".to_string()),
            ..Default::default()
        };
        let config = AppConfig::layer(file, &cli);

        assert_eq!(config.server.host, "file.host");
        assert_eq!(config.server.port, 3000);
        assert!(!config.auth.enabled);
        assert_eq!(config.auth.session_ttl_hours, 6);
        assert_eq!(config.database.path.as_deref(), Some("/tmp/x.db"));
        assert!(config.debug);
    }

    #[test]
    fn test_blank_bootstrap_token_ignored() {
        let cli = CliConfig {
            bootstrap_token: Some("  ".to_string()),
            ..Default::default()
        };
        let config = AppConfig::layer(FileConfig::default(), &cli);
        assert!(config.auth.bootstrap_token.is_none());
    }

    #[test]
    fn test_app_config_validation() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.server.host = String::new();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.auth.session_ttl_hours = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{"server": {"port": 6123}}"#).unwrap();

        let cli = CliConfig {
            config: Some(path),
            ..Default::default()
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.server.port, 6123);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/vitrina.json")),
            ..Default::default()
        };
        assert!(AppConfig::load(&cli).is_err());
    }

    #[test]
    fn test_is_all_interfaces() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("::"));
        assert!(!is_all_interfaces("127.0.0.1"));
    }
}
