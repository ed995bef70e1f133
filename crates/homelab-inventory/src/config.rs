//! Plugin configuration loading and types

use std::path::{Path, PathBuf};

use homelab_db::{ConnectionInfo, DEFAULT_COLLECTION};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::builder::TagScope;
use crate::error::ConfigError;

/// Name the `plugin` option must carry
pub const PLUGIN_NAME: &str = "homelab_inventory";

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "HOMELAB_INVENTORY_CONFIG";

/// Check if this plugin handles the file at `path`
///
/// Only `.yaml` and `.yml` files are accepted.
#[must_use]
pub fn accepts(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}

/// Validated plugin configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    /// Record store connection
    pub connection: ConnectionInfo,
    /// Only include machines tagged with this group
    pub target_group: Option<String>,
    /// Which records have their tags applied
    pub tag_scope: TagScope,
}

/// Options as they appear in the YAML file
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    plugin: Option<String>,
    user: Option<String>,
    password: Option<String>,
    host: Option<String>,
    port: Option<PortValue>,
    database: Option<String>,
    collection: Option<String>,
    target_group: Option<String>,
    tag_scope: Option<TagScope>,
}

/// `port` may be written as a number or a quoted string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PortValue {
    Number(i64),
    Text(String),
}

impl PortValue {
    fn to_port(&self) -> Result<u16, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidOption {
            option: "port",
            reason,
        };

        match self {
            PortValue::Number(n) => {
                u16::try_from(*n).map_err(|_| invalid(format!("{n} is not a valid port")))
            }
            PortValue::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| invalid(format!("{s:?} is not a valid port"))),
        }
    }
}

fn required<T>(value: Option<T>, option: &'static str) -> Result<T, ConfigError> {
    value.ok_or(ConfigError::MissingOption(option))
}

impl PluginConfig {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns an error if the file is not YAML, cannot be read, or does not
    /// hold a valid configuration for this plugin.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !accepts(path) {
            return Err(ConfigError::UnsupportedFile(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config = Self::from_yaml_str(&content)?;
        debug!(connection = ?config.connection, "configuration loaded");
        Ok(config)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    /// Returns an error on malformed YAML, a missing required option, a
    /// foreign `plugin` name, or an invalid port.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = if content.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?
        };

        let plugin = required(raw.plugin, "plugin")?;
        if plugin != PLUGIN_NAME {
            return Err(ConfigError::WrongPlugin {
                expected: PLUGIN_NAME,
                found: plugin,
            });
        }

        let user = required(raw.user, "user")?;
        let password = required(raw.password, "password")?;
        let host = required(raw.host, "host")?;
        let port = required(raw.port, "port")?.to_port()?;
        let database = required(raw.database, "database")?;

        let connection = ConnectionInfo::new(user, password, host, port, database)
            .with_collection(raw.collection.unwrap_or_else(|| DEFAULT_COLLECTION.to_string()));

        Ok(Self {
            connection,
            target_group: raw.target_group.filter(|g| !g.is_empty()),
            tag_scope: raw.tag_scope.unwrap_or_default(),
        })
    }

    /// Locate a configuration file
    ///
    /// Checks `HOMELAB_INVENTORY_CONFIG`, then `homelab_inventory.yml` in the
    /// working directory, `/etc/homelab/`, and the user config directory.
    ///
    /// # Errors
    /// Returns `NotFound` listing the paths tried.
    pub fn discover() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }

        let mut paths = vec![
            PathBuf::from("homelab_inventory.yml"),
            PathBuf::from("/etc/homelab/homelab_inventory.yml"),
        ];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("homelab/homelab_inventory.yml"));
        }

        if let Some(path) = paths.iter().find(|p| p.exists()) {
            return Ok(path.clone());
        }

        let tried: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        Err(ConfigError::NotFound(tried.join(", ")))
    }

    /// Target group, if one is set
    #[must_use]
    pub fn target_group(&self) -> Option<&str> {
        self.target_group.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const VALID: &str = "\
plugin: homelab_inventory
user: ansible
password: s3cret
host: db.lab
port: 27017
database: homelab
";

    #[test]
    fn test_accepts() {
        assert!(accepts(Path::new("inventory/homelab.yml")));
        assert!(accepts(Path::new("homelab.yaml")));
        assert!(!accepts(Path::new("homelab.json")));
        assert!(!accepts(Path::new("homelab.YML")));
        assert!(!accepts(Path::new("yml")));
    }

    #[test]
    fn test_parse_minimal() {
        let config = PluginConfig::from_yaml_str(VALID).unwrap();

        assert_eq!(config.connection.user, "ansible");
        assert_eq!(config.connection.port, 27017);
        assert_eq!(config.connection.collection, "machines");
        assert_eq!(config.target_group(), None);
        assert_eq!(config.tag_scope, TagScope::EveryRecord);
    }

    #[test]
    fn test_parse_optional_options() {
        let yaml = format!(
            "{VALID}target_group: web\ncollection: hosts\ntag_scope: last_record\nextra: ignored\n"
        );
        let config = PluginConfig::from_yaml_str(&yaml).unwrap();

        assert_eq!(config.target_group(), Some("web"));
        assert_eq!(config.connection.collection, "hosts");
        assert_eq!(config.tag_scope, TagScope::LastRecord);
    }

    #[test]
    fn test_empty_target_group_is_unset() {
        let yaml = format!("{VALID}target_group: \"\"\n");
        let config = PluginConfig::from_yaml_str(&yaml).unwrap();

        assert_eq!(config.target_group(), None);
    }

    #[test]
    fn test_port_as_string() {
        let yaml = VALID.replace("port: 27017", "port: \"27018\"");
        let config = PluginConfig::from_yaml_str(&yaml).unwrap();

        assert_eq!(config.connection.port, 27018);
    }

    #[test]
    fn test_invalid_port() {
        for port in ["port: 70000", "port: \"mongo\"", "port: -1"] {
            let yaml = VALID.replace("port: 27017", port);
            let err = PluginConfig::from_yaml_str(&yaml).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidOption { option: "port", .. }),
                "{port}: {err}"
            );
        }
    }

    #[test]
    fn test_missing_required_option() {
        for option in ["plugin", "user", "password", "host", "port", "database"] {
            let yaml: String = VALID
                .lines()
                .filter(|line| !line.starts_with(&format!("{option}:")))
                .map(|line| format!("{line}\n"))
                .collect();

            let err = PluginConfig::from_yaml_str(&yaml).unwrap_err();
            assert!(
                matches!(err, ConfigError::MissingOption(name) if name == option),
                "{option}: {err}"
            );
        }
    }

    #[test]
    fn test_wrong_plugin() {
        let yaml = VALID.replace("homelab_inventory", "aws_ec2");
        let err = PluginConfig::from_yaml_str(&yaml).unwrap_err();

        assert!(matches!(err, ConfigError::WrongPlugin { found, .. } if found == "aws_ec2"));
    }

    #[test]
    fn test_empty_file() {
        let err = PluginConfig::from_yaml_str("").unwrap_err();
        assert!(matches!(err, ConfigError::MissingOption("plugin")));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = PluginConfig::from_yaml_str("plugin: [unterminated").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(VALID.as_bytes()).unwrap();

        let config = PluginConfig::load(file.path()).unwrap();
        assert_eq!(config.connection.database, "homelab");
    }

    #[test]
    fn test_load_rejects_other_extensions() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(VALID.as_bytes()).unwrap();

        let err = PluginConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFile(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PluginConfig::load(&dir.path().join("absent.yaml")).unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
