//! Configuration loading and types

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::{WrapErr, eyre};
use racinv_inventory::{Criteria, Selection};
use serde::{Deserialize, Serialize};

use crate::cli::Args;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "RACINV_CONFIG";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Controller connection settings
    #[serde(default)]
    pub connection: ConnectionConfig,
    /// Record selection
    #[serde(default)]
    pub filter: FilterConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Controller connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// iDRAC FQDN or IP address
    pub host: Option<String>,
    /// SSH port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Login user
    #[serde(default = "default_user")]
    pub user: String,
    /// Login password
    #[serde(default = "default_password")]
    pub password: String,
    /// Inventory command timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: default_port(),
            user: default_user(),
            password: default_password(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_port() -> u16 {
    22
}

fn default_user() -> String {
    "root".to_string()
}

// Factory default of every iDRAC
fn default_password() -> String {
    "calvin".to_string()
}

fn default_timeout_secs() -> u64 {
    racinv_inventory::DEFAULT_TIMEOUT.as_secs()
}

/// Record selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Device types, `all` for every type
    #[serde(default = "default_types")]
    pub types: Vec<String>,
    /// Field names, `all` for every field
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            types: default_types(),
            fields: default_fields(),
        }
    }
}

fn default_types() -> Vec<String> {
    vec!["NIC".to_string(), "FC".to_string()]
}

fn default_fields() -> Vec<String> {
    vec![racinv_inventory::WILDCARD.to_string()]
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `tracing` filter directive
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .wrap_err_with(|| format!("invalid config file {}", path.display()))
    }

    /// Find the config file to use
    ///
    /// An explicit path wins, then `RACINV_CONFIG`, then `./racinv.toml`, then
    /// `racinv/racinv.toml` under the user config directory. Returns `None`
    /// when no file applies.
    ///
    /// # Errors
    /// Returns error if an explicitly named file does not exist
    pub fn locate(explicit: Option<&Path>) -> eyre::Result<Option<PathBuf>> {
        let named = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        if let Some(path) = named {
            if !path.exists() {
                return Err(eyre!("config file {} does not exist", path.display()));
            }
            return Ok(Some(path));
        }

        let candidates = [
            Some(PathBuf::from("racinv.toml")),
            dirs::config_dir().map(|p| p.join("racinv/racinv.toml")),
        ];

        Ok(candidates.into_iter().flatten().find(|p| p.exists()))
    }

    /// Override file values with the flags given on the command line
    pub fn apply_args(&mut self, args: &Args) {
        let conn = &mut self.connection;
        if let Some(host) = &args.idrac {
            conn.host = Some(host.clone());
        }
        if let Some(user) = &args.user {
            conn.user.clone_from(user);
        }
        if let Some(password) = &args.password {
            conn.password.clone_from(password);
        }
        if let Some(port) = args.port {
            conn.port = port;
        }
        if let Some(timeout) = args.timeout {
            conn.timeout_secs = timeout;
        }
        if let Some(types) = &args.types {
            self.filter.types.clone_from(types);
        }
        if let Some(fields) = &args.fields {
            self.filter.fields.clone_from(fields);
        }
        if args.verbose {
            self.logging.level = "debug".to_string();
        }
    }

    /// Host to connect to
    ///
    /// # Errors
    /// Returns error if no host was configured
    pub fn host(&self) -> eyre::Result<&str> {
        self.connection
            .host
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| eyre!("no iDRAC host given; pass --idrac or set connection.host"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.connection.timeout_secs)
    }

    /// Selection criteria for the filter
    pub fn criteria(&self) -> Criteria {
        Criteria::new(
            Selection::from_values(self.filter.types.iter().cloned()),
            Selection::from_values(self.filter.fields.iter().cloned()),
        )
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.connection.user, "root");
        assert_eq!(config.connection.password, "calvin");
        assert_eq!(config.connection.port, 22);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(
            config.criteria(),
            Criteria::new(Selection::from_values(["NIC", "FC"]), Selection::All)
        );
        assert!(config.host().is_err());
    }

    #[test]
    fn test_parse_partial_file() {
        let config: Config = toml::from_str(
            r#"
            [connection]
            host = "idrac-r640.lab"
            user = "inventory"

            [filter]
            types = ["all"]
            "#,
        )
        .unwrap();

        assert_eq!(config.host().unwrap(), "idrac-r640.lab");
        assert_eq!(config.connection.user, "inventory");
        assert_eq!(config.connection.password, "calvin");
        assert_eq!(config.filter.fields, ["all"]);
        assert!(config.criteria().types.is_all());
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_args_override_file() {
        let mut config: Config = toml::from_str(
            r#"
            [connection]
            host = "idrac-r640.lab"
            port = 2222

            [filter]
            types = ["CPU"]
            fields = ["Model"]
            "#,
        )
        .unwrap();

        let args = Args::parse_from([
            "racinv",
            "--idrac",
            "10.1.1.20",
            "-t",
            "NIC",
            "-p",
            "s3cret",
            "-v",
        ]);
        config.apply_args(&args);

        assert_eq!(config.host().unwrap(), "10.1.1.20");
        assert_eq!(config.connection.port, 2222);
        assert_eq!(config.connection.password, "s3cret");
        assert_eq!(config.filter.types, ["NIC"]);
        assert_eq!(config.filter.fields, ["Model"]);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_debug_redacts_password() {
        let mut config = Config::default();
        config.apply_args(&Args {
            idrac: Some("10.1.1.20".to_string()),
            password: Some("s3cret".to_string()),
            ..Args::default()
        });

        let debug = format!("{config:?}");
        assert!(debug.contains("10.1.1.20"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn test_blank_host_rejected() {
        let mut config = Config::default();
        config.apply_args(&Args {
            idrac: Some("  ".to_string()),
            ..Args::default()
        });

        assert!(config.host().is_err());
    }

    #[test]
    fn test_locate_missing_explicit_file() {
        let err = Config::locate(Some(Path::new("/nonexistent/racinv.toml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_load_reports_path() {
        let path = std::env::temp_dir().join(format!("racinv-test-{}.toml", std::process::id()));
        std::fs::write(&path, "[connection\nhost = 1").unwrap();

        let err = Config::load(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(err.to_string().contains("invalid config file"));
    }
}
