//! Modification-time polling for hot reload.

use std::time::SystemTime;

use tracing::{info, warn};

use super::{Config, ConfigFile};
use crate::error::ConfigError;
use crate::item::ItemRegistry;

/// Polls a [`ConfigFile`] once per tick and re-parses it on change.
///
/// The check is a single `stat`; parsing only happens when the modification
/// time differs from the last one seen, or after [`invalidate`] was called.
///
/// [`invalidate`]: ConfigWatcher::invalidate
#[derive(Debug, Clone)]
pub struct ConfigWatcher {
    file: ConfigFile,
    last_modified: Option<SystemTime>,
    force: bool,
    missing_reported: bool,
}

impl ConfigWatcher {
    /// Creates a watcher whose first poll always loads the file.
    #[must_use]
    pub fn new(file: ConfigFile) -> Self {
        Self {
            file,
            last_modified: None,
            force: true,
            missing_reported: false,
        }
    }

    /// The watched file.
    #[must_use]
    pub fn file(&self) -> &ConfigFile {
        &self.file
    }

    /// Forces a reload on the next poll.
    ///
    /// Used after the plugin itself rewrites the file, since two writes in
    /// the same timestamp granule would otherwise look unchanged.
    pub fn invalidate(&mut self) {
        self.force = true;
    }

    /// Checks the file and returns a new config if it changed.
    ///
    /// Rejected values are logged and the corresponding entries of
    /// `current` are kept. A missing file is reported once and leaves
    /// `current` in place.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file changed but could not be read.
    pub fn poll(&mut self, current: &Config, registry: &dyn ItemRegistry) -> Result<Option<Config>, ConfigError> {
        let Some(modified) = self.file.modified() else {
            if !self.missing_reported {
                warn!(path = %self.file.path().display(), "config file missing, keeping current values");
                self.missing_reported = true;
            }
            return Ok(None);
        };
        self.missing_reported = false;

        if !self.force && self.last_modified == Some(modified) {
            return Ok(None);
        }
        self.last_modified = Some(modified);
        self.force = false;

        let (config, rejected) = self.file.load(current, registry)?;
        for err in &rejected {
            warn!(error = %err, "ignoring config value");
        }
        info!(
            item = %config.vector_item,
            both_hands = config.use_both_hands,
            single_use = config.single_use,
            visibility = config.visibility_length,
            modifier = config.velocity_modifier,
            max_velocity = config.max_velocity,
            "config reloaded"
        );
        Ok(Some(config))
    }
}
