//! Theme and language flags behind an injected key-value store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const THEME_KEY: &str = "theme";
pub const LANGUAGE_KEY: &str = "language";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid preferences file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Read/write interface for persisted preference pairs.
pub trait PreferenceStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Store kept only in memory; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl PreferenceStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Flat `key = "value"` TOML file, rewritten on every write.
#[derive(Debug)]
pub struct TomlFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl TomlFileStore {
    /// Opens the file at `path`; a missing file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => toml::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for TomlFileStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string(&self.values)?)?;
        Ok(())
    }
}

/// `$XDG_CONFIG_HOME/thumbgrab/preferences.toml`
pub fn preferences_path() -> anyhow::Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("thumbgrab")?;
    Ok(xdg_dirs.place_config_file("preferences.toml")?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Theme> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// User preferences, read once at startup and written back on each change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub language: String,
}

impl Preferences {
    /// Stored values win; otherwise the theme follows the system and the
    /// language falls back to `default_language`.
    pub fn load(store: &dyn PreferenceStore, system_dark: bool, default_language: &str) -> Self {
        let theme = store
            .read(THEME_KEY)
            .and_then(|t| Theme::parse(&t))
            .unwrap_or(if system_dark { Theme::Dark } else { Theme::Light });
        let language = store
            .read(LANGUAGE_KEY)
            .unwrap_or_else(|| default_language.to_string());
        Self { theme, language }
    }

    pub fn toggle_theme(&mut self, store: &mut dyn PreferenceStore) -> Result<Theme, StoreError> {
        self.theme = self.theme.toggled();
        store.write(THEME_KEY, self.theme.as_str())?;
        tracing::debug!(theme = self.theme.as_str(), "theme preference saved");
        Ok(self.theme)
    }

    /// Language codes are stored as given; unknown ones fall back at lookup time.
    pub fn set_language(
        &mut self,
        language: &str,
        store: &mut dyn PreferenceStore,
    ) -> Result<(), StoreError> {
        self.language = language.to_string();
        store.write(LANGUAGE_KEY, language)?;
        tracing::debug!(language, "language preference saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_system_theme_and_config_language() {
        let store = MemoryStore::default();
        let prefs = Preferences::load(&store, true, "en");
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.language, "en");
        assert_eq!(Preferences::load(&store, false, "de").theme, Theme::Light);
    }

    #[test]
    fn stored_values_win() {
        let mut store = MemoryStore::default();
        store.write(THEME_KEY, "light").unwrap();
        store.write(LANGUAGE_KEY, "fr").unwrap();
        let prefs = Preferences::load(&store, true, "en");
        assert_eq!(prefs.theme, Theme::Light);
        assert_eq!(prefs.language, "fr");
    }

    #[test]
    fn unknown_stored_theme_is_ignored() {
        let mut store = MemoryStore::default();
        store.write(THEME_KEY, "sepia").unwrap();
        assert_eq!(Preferences::load(&store, false, "en").theme, Theme::Light);
    }

    #[test]
    fn toggle_writes_through() {
        let mut store = MemoryStore::default();
        let mut prefs = Preferences::load(&store, false, "en");
        assert_eq!(prefs.toggle_theme(&mut store).unwrap(), Theme::Dark);
        assert_eq!(store.read(THEME_KEY).as_deref(), Some("dark"));
        prefs.toggle_theme(&mut store).unwrap();
        assert_eq!(store.read(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn language_is_not_validated() {
        let mut store = MemoryStore::default();
        let mut prefs = Preferences::load(&store, false, "en");
        prefs.set_language("xx-unknown", &mut store).unwrap();
        assert_eq!(store.read(LANGUAGE_KEY).as_deref(), Some("xx-unknown"));
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.toml");

        let mut store = TomlFileStore::open(&path).unwrap();
        assert_eq!(store.read(THEME_KEY), None);
        let mut prefs = Preferences::load(&store, false, "en");
        prefs.toggle_theme(&mut store).unwrap();
        prefs.set_language("es", &mut store).unwrap();

        let reopened = TomlFileStore::open(&path).unwrap();
        let prefs = Preferences::load(&reopened, false, "en");
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.language, "es");
    }

    #[test]
    fn file_store_rejects_broken_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        fs::write(&path, "theme = [unterminated").unwrap();
        assert!(matches!(TomlFileStore::open(&path), Err(StoreError::Parse(_))));
    }
}
