//! The `/vector` command grammar and tab completion.
//!
//! ```text
//! /vector                            toggle on/off
//! /vector help                       usage
//! /vector config reset               restore the default file
//! /vector config <key>               describe a key
//! /vector config <key> <value>       change a key
//! ```
//!
//! Parsing is pure; [`VectorPlugin::on_command`] performs permission checks
//! and runs the parsed command.
//!
//! [`VectorPlugin::on_command`]: crate::plugin::VectorPlugin::on_command

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{ConfigKey, ValueType};
use crate::entity::EntityId;
use crate::error::{CommandError, ConfigError};
use crate::item::ItemRegistry;
use crate::permission::Permission;
use crate::world_view::WorldView;

/// Usage text for `/vector help`.
pub const HELP_TEXT: &str = "===== Command <vector> =====\n\
                             /vector -> Toggles vector feature\n\
                             /vector help -> Shows vector help\n\
                             /vector config <key|reset> [value] -> Updates plugin.yml";

/// Who issued a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandSender {
    /// The server console; holds every permission
    Console,
    /// A player
    Player(EntityId),
}

impl CommandSender {
    /// Whether the sender holds `permission`.
    #[must_use]
    pub fn has_permission(self, view: &dyn WorldView, permission: Permission) -> bool {
        match self {
            Self::Console => true,
            Self::Player(player) => view.has_permission(player, permission),
        }
    }
}

impl fmt::Display for CommandSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Console => write!(f, "console"),
            Self::Player(id) => write!(f, "player {id}"),
        }
    }
}

/// A parsed `config` subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Restore the default file
    Reset,
    /// Describe a key and show its current value
    Show(ConfigKey),
    /// Change a key
    Set {
        /// Key to change
        key: ConfigKey,
        /// Raw value, validated when applied
        value: String,
    },
}

/// A parsed `/vector` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VectorCommand {
    /// Flip the activation state
    Toggle,
    /// Show usage
    Help,
    /// A config subcommand
    Config(ConfigCommand),
}

impl VectorCommand {
    /// Parses command arguments (without the `/vector` label).
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::MissingArguments`] for a bare `config`,
    /// [`CommandError::UnrecognizedArgs`] for unknown words or extra
    /// arguments, and [`ConfigError::UnknownKey`] for unknown keys.
    ///
    /// # Example
    ///
    /// ```
    /// use vector_core::command::{ConfigCommand, VectorCommand};
    /// use vector_core::config::ConfigKey;
    ///
    /// assert_eq!(VectorCommand::parse(&[]).unwrap(), VectorCommand::Toggle);
    /// assert_eq!(
    ///     VectorCommand::parse(&["config", "max-velocity-double", "4"]).unwrap(),
    ///     VectorCommand::Config(ConfigCommand::Set {
    ///         key: ConfigKey::MaxVelocity,
    ///         value: "4".into(),
    ///     }),
    /// );
    /// ```
    pub fn parse(args: &[&str]) -> Result<Self, CommandError> {
        let Some(first) = args.first() else {
            return Ok(Self::Toggle);
        };
        if is_help_word(first) {
            return Ok(Self::Help);
        }
        if !is_config_word(first) {
            return Err(CommandError::UnrecognizedArgs((*first).to_string()));
        }

        match args {
            [_] => Err(CommandError::MissingArguments),
            [_, name] if name.to_lowercase().contains("reset") => Ok(Self::Config(ConfigCommand::Reset)),
            [_, name] => Ok(Self::Config(ConfigCommand::Show(known_key(name)?))),
            [_, name, value] => Ok(Self::Config(ConfigCommand::Set {
                key: known_key(name)?,
                value: (*value).to_string(),
            })),
            [_, _, _, extra @ ..] => Err(CommandError::UnrecognizedArgs(extra.join(" "))),
            [] => Ok(Self::Toggle),
        }
    }

    /// Permission needed before parsing continues, judged from the first
    /// argument alone.
    #[must_use]
    pub fn required_permission(args: &[&str]) -> Option<Permission> {
        match args.first() {
            None => Some(Permission::Toggle),
            Some(first) if is_help_word(first) => None,
            Some(first) if is_config_word(first) => Some(Permission::Config),
            Some(_) => None,
        }
    }
}

fn known_key(name: &str) -> Result<ConfigKey, ConfigError> {
    ConfigKey::from_name(name).ok_or_else(|| ConfigError::UnknownKey(name.to_string()))
}

fn is_help_word(word: &str) -> bool {
    word.to_lowercase().contains("help")
}

/// Any word containing `conf` or `set`, ignoring case.
fn is_config_word(word: &str) -> bool {
    let word = word.to_lowercase();
    word.contains("conf") || word.contains("set")
}

fn starts_with_ignore_case(candidate: &str, prefix: &str) -> bool {
    candidate.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// Suggestions for the argument being typed.
///
/// `args` holds every argument so far, the last one possibly partial.
///
/// ```
/// use vector_core::command::tab_complete;
/// use vector_core::item::StaticItemRegistry;
///
/// let registry = StaticItemRegistry::default();
/// assert_eq!(tab_complete(&["c"], &registry), vec!["config"]);
/// assert_eq!(tab_complete(&["config", "use-both-hands", "T"], &registry), vec!["true"]);
/// ```
#[must_use]
pub fn tab_complete(args: &[&str], registry: &dyn ItemRegistry) -> Vec<String> {
    let candidates: Vec<String> = match args {
        [_] => vec!["config".to_string(), "help".to_string()],
        [word, _] if is_config_word(word) => ConfigKey::ALL
            .iter()
            .map(|key| key.as_str().to_string())
            .chain(std::iter::once("reset".to_string()))
            .collect(),
        [word, name, _] if is_config_word(word) => match ConfigKey::from_name(name).map(ConfigKey::value_type) {
            Some(ValueType::Item) => registry.names(),
            Some(ValueType::Bool) => vec!["true".to_string(), "false".to_string()],
            Some(ValueType::Double) | None => Vec::new(),
        },
        _ => Vec::new(),
    };

    let Some(prefix) = args.last() else {
        return Vec::new();
    };
    candidates
        .into_iter()
        .filter(|candidate| starts_with_ignore_case(candidate, prefix))
        .collect()
}
