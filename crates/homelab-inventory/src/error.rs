//! Error types for homelab-inventory

use homelab_db::StoreError;
use thiserror::Error;

/// Errors raised while loading plugin configuration
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    /// File is not a YAML file this plugin handles
    #[error("unsupported inventory file: {0}")]
    UnsupportedFile(String),

    /// No configuration file was found
    #[error("no configuration file found (tried {0})")]
    NotFound(String),

    /// File could not be read
    #[error("failed to read {path}: {reason}")]
    Read {
        /// File path
        path: String,
        /// I/O error message
        reason: String,
    },

    /// File is not valid YAML for this plugin
    #[error("YAML parse error: {0}")]
    Parse(String),

    /// Required option is absent
    #[error("missing required option `{0}`")]
    MissingOption(&'static str),

    /// `plugin` names a different plugin
    #[error("configuration is for plugin `{found}`, expected `{expected}`")]
    WrongPlugin {
        /// This plugin's name
        expected: &'static str,
        /// Name found in the file
        found: String,
    },

    /// Option is present but unusable
    #[error("invalid option `{option}`: {reason}")]
    InvalidOption {
        /// Option name
        option: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Errors that can occur while building an inventory
#[derive(Error, Debug, Clone)]
pub enum InventoryError {
    /// Configuration was rejected before touching the store
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Record store failed
    #[error("record store error: {0}")]
    Store(#[from] StoreError),

    /// Host referenced before it was added
    #[error("host not found: {0}")]
    UnknownHost(String),

    /// Group referenced before it was added
    #[error("group not found: {0}")]
    UnknownGroup(String),

    /// Host name cannot be used
    #[error("invalid host name: {0:?}")]
    InvalidHostName(String),

    /// Group name cannot be used
    #[error("invalid group name: {0:?}")]
    InvalidGroupName(String),
}

impl InventoryError {
    /// Check if the store could not be reached
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(self, InventoryError::Store(e) if e.is_connectivity())
    }

    /// Check if a fetched record was malformed
    #[must_use]
    pub fn is_record_error(&self) -> bool {
        matches!(self, InventoryError::Store(e) if e.is_record_error())
    }

    /// Check if the run stopped on configuration
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, InventoryError::Config(_))
    }
}
