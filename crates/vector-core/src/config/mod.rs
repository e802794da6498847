//! Tunable plugin parameters.
//!
//! [`Config`] is the in-memory record every component reads. It is only
//! replaced by the reload poller ([`ConfigWatcher`]) once the backing file
//! ([`ConfigFile`]) changes.
//!
//! Keys encode their value type by naming convention: keys containing
//! `double` hold numbers, keys containing `item` hold item names, and every
//! other key holds `true`/`false`.
//!
//! # Example
//!
//! ```
//! use vector_core::config::{Config, ConfigKey, ConfigValue};
//! use vector_core::item::StaticItemRegistry;
//!
//! let registry = StaticItemRegistry::default();
//! let value = Config::parse_value(ConfigKey::MaxVelocity, "10", &registry).unwrap();
//!
//! let mut config = Config::default();
//! config.set(ConfigKey::MaxVelocity, value).unwrap();
//! assert_eq!(config.max_velocity, 10.0);
//!
//! assert!(Config::parse_value(ConfigKey::MaxVelocity, "-5", &registry).is_err());
//! ```

pub mod file;
pub mod watcher;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;
use crate::item::{ItemRegistry, ItemType};

pub use file::{ConfigFile, CONFIG_FILE_NAME};
pub use watcher::ConfigWatcher;

// ============================================================================
// Keys
// ============================================================================

/// The value type a key holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// `true` or `false`
    Bool,
    /// Floating-point number
    Double,
    /// Item type name
    Item,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "true or false"),
            Self::Double => write!(f, "a number"),
            Self::Item => write!(f, "an item name"),
        }
    }
}

/// One configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConfigKey {
    /// `vector-item`
    VectorItem,
    /// `use-both-hands`
    UseBothHands,
    /// `set-single-time`
    SetSingleTime,
    /// `hitbox-expansion-double`
    HitboxExpansion,
    /// `visibility-length-double`
    VisibilityLength,
    /// `velocity-modifier-double`
    VelocityModifier,
    /// `max-velocity-double`
    MaxVelocity,
}

impl ConfigKey {
    /// Every key, in file order.
    pub const ALL: [Self; 7] = [
        Self::VectorItem,
        Self::UseBothHands,
        Self::SetSingleTime,
        Self::HitboxExpansion,
        Self::VisibilityLength,
        Self::VelocityModifier,
        Self::MaxVelocity,
    ];

    /// The key as written in the config file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VectorItem => "vector-item",
            Self::UseBothHands => "use-both-hands",
            Self::SetSingleTime => "set-single-time",
            Self::HitboxExpansion => "hitbox-expansion-double",
            Self::VisibilityLength => "visibility-length-double",
            Self::VelocityModifier => "velocity-modifier-double",
            Self::MaxVelocity => "max-velocity-double",
        }
    }

    /// Looks up a key by its exact file name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }

    /// Value type, derived from the key name.
    #[must_use]
    pub fn value_type(self) -> ValueType {
        let name = self.as_str();
        if name.contains("double") {
            ValueType::Double
        } else if name.contains("item") {
            ValueType::Item
        } else {
            ValueType::Bool
        }
    }

    /// Comment lines written above the key in the default file.
    #[must_use]
    pub const fn description(self) -> [&'static str; 3] {
        match self {
            Self::VectorItem => [
                "Item used to select and pull entities.",
                "Must be a valid item name, such as BLAZE_ROD.",
                "Default: BLAZE_ROD",
            ],
            Self::UseBothHands => [
                "If true, right click selects an entity and left click pulls it.",
                "If false, right click pulls, or selects when nothing is selected.",
                "Default: false",
            ],
            Self::SetSingleTime => [
                "If true, the selection is released after a single pull.",
                "If false, the selection stays until replaced or invalidated.",
                "Default: false",
            ],
            Self::HitboxExpansion => [
                "Factor applied to entity hit boxes when selecting.",
                "Values above 1 make entities easier to select. Must be at least 1.",
                "Default: 1.5",
            ],
            Self::VisibilityLength => [
                "Distance to the aim point when no block is in the way.",
                "Must be greater than 0.",
                "Default: 20.0",
            ],
            Self::VelocityModifier => [
                "Velocity per block of distance between the entity and the aim point.",
                "Must be greater than 0.",
                "Default: 0.5",
            ],
            Self::MaxVelocity => [
                "Upper bound on the pull velocity.",
                "Must not be negative.",
                "Default: 2.0",
            ],
        }
    }

    /// Checks a numeric value against the key's range.
    fn check_range(self, raw: &str, value: f64) -> Result<f64, ConfigError> {
        let out_of_range = |reason| ConfigError::OutOfRange {
            key: self,
            value: raw.to_string(),
            reason,
        };

        if !value.is_finite() {
            return Err(out_of_range("must be a finite number"));
        }
        match self {
            Self::HitboxExpansion if value < 1.0 => Err(out_of_range("must be at least 1")),
            Self::VisibilityLength | Self::VelocityModifier if value <= 0.0 => {
                Err(out_of_range("must be greater than 0"))
            }
            Self::MaxVelocity if value < 0.0 => Err(out_of_range("must not be negative")),
            _ => Ok(value),
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Values
// ============================================================================

/// A typed configuration value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfigValue {
    /// Boolean value
    Bool(bool),
    /// Numeric value
    Double(f64),
    /// Item value
    Item(ItemType),
}

impl ConfigValue {
    /// The value's type.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Bool,
            Self::Double(_) => ValueType::Double,
            Self::Item(_) => ValueType::Item,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            // Debug keeps the trailing ".0" on whole numbers
            Self::Double(value) => write!(f, "{value:?}"),
            Self::Item(item) => write!(f, "{item}"),
        }
    }
}

// ============================================================================
// Config
// ============================================================================

/// The plugin's tunable parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Item that triggers selection and pulling
    pub vector_item: ItemType,
    /// Split selection (right click) and pulling (left click)
    pub use_both_hands: bool,
    /// Release the selection after one pull
    pub single_use: bool,
    /// Hit box scale factor used by the picker (at least 1)
    pub hitbox_expansion: f64,
    /// Maximum aim distance (positive)
    pub visibility_length: f64,
    /// Velocity per block of offset (positive)
    pub velocity_modifier: f64,
    /// Velocity cap (non-negative)
    pub max_velocity: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vector_item: ItemType::default(),
            use_both_hands: false,
            single_use: false,
            hitbox_expansion: 1.5,
            visibility_length: 20.0,
            velocity_modifier: 0.5,
            max_velocity: 2.0,
        }
    }
}

impl Config {
    /// Parses and validates a raw value for `key`.
    ///
    /// Booleans must be exactly `true` or `false`. Numbers must be finite
    /// and inside the key's range. Items must be known to `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnrecognizedValue`], [`ConfigError::OutOfRange`]
    /// or [`ConfigError::UnknownItem`] describing the rejected value.
    pub fn parse_value(key: ConfigKey, raw: &str, registry: &dyn ItemRegistry) -> Result<ConfigValue, ConfigError> {
        let trimmed = raw.trim();
        match key.value_type() {
            ValueType::Bool => match trimmed {
                "true" => Ok(ConfigValue::Bool(true)),
                "false" => Ok(ConfigValue::Bool(false)),
                _ => Err(ConfigError::UnrecognizedValue {
                    key,
                    value: raw.to_string(),
                }),
            },
            ValueType::Double => {
                let value = trimmed.parse::<f64>().map_err(|_| ConfigError::UnrecognizedValue {
                    key,
                    value: raw.to_string(),
                })?;
                key.check_range(raw, value).map(ConfigValue::Double)
            }
            ValueType::Item => registry
                .lookup(trimmed)
                .map(ConfigValue::Item)
                .ok_or_else(|| ConfigError::UnknownItem(raw.to_string())),
        }
    }

    /// Reads the value stored for `key`.
    #[must_use]
    pub fn get(&self, key: ConfigKey) -> ConfigValue {
        match key {
            ConfigKey::VectorItem => ConfigValue::Item(self.vector_item.clone()),
            ConfigKey::UseBothHands => ConfigValue::Bool(self.use_both_hands),
            ConfigKey::SetSingleTime => ConfigValue::Bool(self.single_use),
            ConfigKey::HitboxExpansion => ConfigValue::Double(self.hitbox_expansion),
            ConfigKey::VisibilityLength => ConfigValue::Double(self.visibility_length),
            ConfigKey::VelocityModifier => ConfigValue::Double(self.velocity_modifier),
            ConfigKey::MaxVelocity => ConfigValue::Double(self.max_velocity),
        }
    }

    /// Stores a value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TypeMismatch`] when `value` has the wrong type
    /// and [`ConfigError::OutOfRange`] when a number is outside the key's
    /// range. The config is unchanged on error.
    pub fn set(&mut self, key: ConfigKey, value: ConfigValue) -> Result<(), ConfigError> {
        let mismatch = || ConfigError::TypeMismatch {
            key,
            expected: key.value_type(),
        };

        match (key, value) {
            (ConfigKey::VectorItem, ConfigValue::Item(item)) => self.vector_item = item,
            (ConfigKey::UseBothHands, ConfigValue::Bool(flag)) => self.use_both_hands = flag,
            (ConfigKey::SetSingleTime, ConfigValue::Bool(flag)) => self.single_use = flag,
            (key, ConfigValue::Double(value)) if key.value_type() == ValueType::Double => {
                let value = key.check_range(&format!("{value:?}"), value)?;
                match key {
                    ConfigKey::HitboxExpansion => self.hitbox_expansion = value,
                    ConfigKey::VisibilityLength => self.visibility_length = value,
                    ConfigKey::VelocityModifier => self.velocity_modifier = value,
                    _ => self.max_velocity = value,
                }
            }
            _ => return Err(mismatch()),
        }
        Ok(())
    }

    /// Applies `key: value` lines from config file text on top of `self`.
    ///
    /// Comment lines (`#`) and blank lines are skipped. Keys missing from
    /// the text keep their current value, as do keys whose value fails
    /// validation; the latter are returned alongside the merged config.
    /// Unknown keys are reported too and otherwise ignored.
    #[must_use]
    pub fn merge_text(&self, text: &str, registry: &dyn ItemRegistry) -> (Self, Vec<ConfigError>) {
        let mut merged = self.clone();
        let mut rejected = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((name, raw)) = line.split_once(':') else {
                rejected.push(ConfigError::UnknownKey(line.to_string()));
                continue;
            };
            let Some(key) = ConfigKey::from_name(name.trim()) else {
                rejected.push(ConfigError::UnknownKey(name.trim().to_string()));
                continue;
            };

            let raw = raw.trim().trim_matches(|c: char| c == '"' || c == '\'');
            match Self::parse_value(key, raw, registry).and_then(|value| merged.set(key, value)) {
                Ok(()) => {}
                Err(err) => rejected.push(err),
            }
        }

        (merged, rejected)
    }

    /// Offset length at which the pull switches from proportional to capped.
    #[must_use]
    pub fn crossover_distance(&self) -> f64 {
        self.max_velocity / self.velocity_modifier
    }
}
