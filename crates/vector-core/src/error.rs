//! Error types for configuration and command handling.
//!
//! Display strings double as the chat messages sent back to a command
//! sender, so they follow the plugin's user-facing wording.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::{ConfigKey, ValueType};
use crate::permission::Permission;

/// Errors raised while reading, validating or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read or written.
    #[error("Cannot read/write to {}: {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The key is not one of the known config keys.
    #[error("Unrecognized key: '{0}'")]
    UnknownKey(String),

    /// The value could not be parsed as the key's type.
    #[error("Unrecognized value: '{value}'")]
    UnrecognizedValue {
        /// Key being set
        key: ConfigKey,
        /// Raw value as given
        value: String,
    },

    /// The value parsed but lies outside the key's allowed range.
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    OutOfRange {
        /// Key being set
        key: ConfigKey,
        /// Raw value as given
        value: String,
        /// Human-readable constraint
        reason: &'static str,
    },

    /// The item name is not known to the item registry.
    #[error("Unrecognized item: '{0}'")]
    UnknownItem(String),

    /// A typed value was supplied for a key of another type.
    #[error("Invalid value for {key}: expected {expected}")]
    TypeMismatch {
        /// Key being set
        key: ConfigKey,
        /// Type the key holds
        expected: ValueType,
    },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true for I/O failures, which are logged rather than only
    /// reported to the sender.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Errors raised while handling `/vector`.
#[derive(Debug, Error)]
pub enum CommandError {
    /// `config` was given without a key.
    #[error("Required: key, value")]
    MissingArguments,

    /// Arguments that match no subcommand, or trailing extras.
    #[error("Unrecognized args: '{0}'")]
    UnrecognizedArgs(String),

    /// The sender lacks a permission node.
    #[error("Missing permission: {0}")]
    PermissionDenied(Permission),

    /// A configuration operation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
