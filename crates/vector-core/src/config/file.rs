//! The line-oriented `config.yml` backing the [`Config`].
//!
//! Entries are located by substring match on the key and rewritten as
//! `<key>: <value>`; every other line is preserved verbatim. Writes go to a
//! sibling temporary file which is then renamed over the original, so a
//! failed write never leaves a partial file behind.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use super::{Config, ConfigKey, ConfigValue};
use crate::error::ConfigError;
use crate::item::ItemRegistry;

/// File name inside the plugin's data directory.
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Handle to the config file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    /// Uses the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses [`CONFIG_FILE_NAME`] inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CONFIG_FILE_NAME))
    }

    /// Path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Text of the default file: three comment lines above each key.
    #[must_use]
    pub fn default_text() -> String {
        let defaults = Config::default();
        let mut text = String::new();
        for (index, key) in ConfigKey::ALL.into_iter().enumerate() {
            if index > 0 {
                text.push('\n');
            }
            for line in key.description() {
                text.push_str("# ");
                text.push_str(line);
                text.push('\n');
            }
            text.push_str(&format!("{key}: {}\n", defaults.get(key)));
        }
        text
    }

    /// Writes the default file unless one already exists.
    ///
    /// Returns true if the file was written.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the directory or file cannot be
    /// created.
    pub fn save_default(&self) -> Result<bool, ConfigError> {
        if self.path.exists() {
            return Ok(false);
        }
        self.write_atomic(&Self::default_text())?;
        debug!(path = %self.path.display(), "wrote default config");
        Ok(true)
    }

    /// Replaces the file with the default text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be written.
    pub fn reset(&self) -> Result<(), ConfigError> {
        self.write_atomic(&Self::default_text())
    }

    /// Reads the whole file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read.
    pub fn read_text(&self) -> Result<String, ConfigError> {
        fs::read_to_string(&self.path).map_err(|err| ConfigError::io(&self.path, err))
    }

    /// Parses the file on top of `base`.
    ///
    /// Returns the merged config and every value that was rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read.
    pub fn load(&self, base: &Config, registry: &dyn ItemRegistry) -> Result<(Config, Vec<ConfigError>), ConfigError> {
        let text = self.read_text()?;
        Ok(base.merge_text(&text, registry))
    }

    /// Description of `key` for `/vector config <key>`.
    ///
    /// Collects the comment lines directly above the key's entry (at most
    /// three, `#` stripped) followed by `Current <key>: <value>` taken from
    /// `current`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read.
    pub fn describe(&self, key: ConfigKey, current: &Config) -> Result<String, ConfigError> {
        let text = self.read_text()?;
        let lines: Vec<&str> = text.lines().collect();

        let mut message = Vec::new();
        if let Some(at) = lines.iter().position(|line| is_entry_for(line, key)) {
            let comments: Vec<&str> = lines[..at]
                .iter()
                .rev()
                .take(3)
                .take_while(|line| line.trim_start().starts_with('#'))
                .map(|line| strip_comment(line))
                .collect();
            message.extend(comments.into_iter().rev().map(str::to_string));
            message.push(String::new());
        }
        message.push(format!("Current {key}: {}", current.get(key)));
        Ok(message.join("\n"))
    }

    /// Validates `raw` for `key` and rewrites the file.
    ///
    /// Every entry line containing the key is replaced with
    /// `<key>: <value>`; if none exists the entry is appended. Returns the
    /// parsed value and the rewritten lines. On a validation error the file
    /// is not touched.
    ///
    /// # Errors
    ///
    /// Returns the validation error from [`Config::parse_value`], or
    /// [`ConfigError::Io`] if the file cannot be read or written.
    pub fn set(
        &self,
        key: ConfigKey,
        raw: &str,
        registry: &dyn ItemRegistry,
    ) -> Result<(ConfigValue, Vec<String>), ConfigError> {
        let value = Config::parse_value(key, raw, registry)?;
        let entry = format!("{key}: {value}");

        let text = self.read_text()?;
        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        let mut rewritten = Vec::new();
        for line in &mut lines {
            if is_entry_for(line, key) {
                line.clone_from(&entry);
                rewritten.push(entry.clone());
            }
        }
        if rewritten.is_empty() {
            lines.push(entry.clone());
            rewritten.push(entry);
        }

        let mut updated = lines.join("\n");
        updated.push('\n');
        self.write_atomic(&updated)?;
        Ok((value, rewritten))
    }

    /// Modification time of the file, or `None` if it cannot be read.
    #[must_use]
    pub fn modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|meta| meta.modified()).ok()
    }

    fn write_atomic(&self, text: &str) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| ConfigError::io(parent, err))?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, text).map_err(|err| ConfigError::io(&tmp, err))?;
        fs::rename(&tmp, &self.path).map_err(|err| {
            let _ = fs::remove_file(&tmp);
            ConfigError::io(&self.path, err)
        })
    }
}

fn is_entry_for(line: &str, key: ConfigKey) -> bool {
    !line.trim_start().starts_with('#') && line.contains(key.as_str())
}

fn strip_comment(line: &str) -> &str {
    let rest = line.trim_start().trim_start_matches('#');
    rest.strip_prefix(' ').unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::StaticItemRegistry;
    use tempfile::TempDir;

    fn fresh() -> (TempDir, ConfigFile) {
        let dir = TempDir::new().unwrap();
        let file = ConfigFile::in_dir(dir.path().join("vector"));
        assert!(file.save_default().unwrap());
        (dir, file)
    }

    #[test]
    fn default_text_parses_to_defaults() {
        let (merged, rejected) =
            Config::default().merge_text(&ConfigFile::default_text(), &StaticItemRegistry::default());
        assert!(rejected.is_empty());
        assert_eq!(merged, Config::default());
    }

    #[test]
    fn save_default_keeps_existing_file() {
        let (_dir, file) = fresh();
        fs::write(file.path(), "use-both-hands: true\n").unwrap();
        assert!(!file.save_default().unwrap());
        assert_eq!(file.read_text().unwrap(), "use-both-hands: true\n");
    }

    #[test]
    fn set_rewrites_only_the_entry() {
        let (_dir, file) = fresh();
        let registry = StaticItemRegistry::default();
        let (value, rewritten) = file.set(ConfigKey::MaxVelocity, "10", &registry).unwrap();

        assert_eq!(value, ConfigValue::Double(10.0));
        assert_eq!(rewritten, vec!["max-velocity-double: 10.0".to_string()]);

        let text = file.read_text().unwrap();
        assert!(text.contains("max-velocity-double: 10.0\n"));
        assert!(text.contains("# Upper bound on the pull velocity."));
        assert_eq!(text.lines().count(), ConfigFile::default_text().lines().count());

        let (loaded, _) = file.load(&Config::default(), &registry).unwrap();
        assert_eq!(loaded.max_velocity, 10.0);
    }

    #[test]
    fn rejected_value_leaves_file_unchanged() {
        let (_dir, file) = fresh();
        let before = file.read_text().unwrap();
        let err = file
            .set(ConfigKey::MaxVelocity, "-5", &StaticItemRegistry::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for max-velocity-double: '-5' (must not be negative)"
        );
        assert_eq!(file.read_text().unwrap(), before);
    }

    #[test]
    fn set_appends_missing_entry() {
        let (_dir, file) = fresh();
        fs::write(file.path(), "# nothing here\n").unwrap();
        file.set(ConfigKey::UseBothHands, "true", &StaticItemRegistry::default())
            .unwrap();
        assert_eq!(file.read_text().unwrap(), "# nothing here\nuse-both-hands: true\n");
    }

    #[test]
    fn item_values_are_upper_cased() {
        let (_dir, file) = fresh();
        let (_, rewritten) = file
            .set(ConfigKey::VectorItem, "stick", &StaticItemRegistry::default())
            .unwrap();
        assert_eq!(rewritten, vec!["vector-item: STICK".to_string()]);
    }

    #[test]
    fn describe_shows_comments_and_current_value() {
        let (_dir, file) = fresh();
        let text = file.describe(ConfigKey::MaxVelocity, &Config::default()).unwrap();
        assert_eq!(
            text,
            "Upper bound on the pull velocity.\n\
             Must not be negative.\n\
             Default: 2.0\n\
             \n\
             Current max-velocity-double: 2.0"
        );
    }

    #[test]
    fn reset_restores_default_text() {
        let (_dir, file) = fresh();
        file.set(ConfigKey::SetSingleTime, "true", &StaticItemRegistry::default())
            .unwrap();
        file.reset().unwrap();
        assert_eq!(file.read_text().unwrap(), ConfigFile::default_text());
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let file = ConfigFile::in_dir(dir.path());
        assert!(file.modified().is_none());
        let err = file.read_text().unwrap_err();
        assert!(err.is_io());
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }
}
