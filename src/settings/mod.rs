use std::cell::{Cell, RefCell};
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, alias = "darkMode")]
    pub dark_mode: bool,
}

impl Settings {
    pub fn theme(&self) -> Theme {
        if self.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to encode settings: {source}")]
    Encode {
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to write settings: {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub trait SettingsStore {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Settings>, SettingsError>;

    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}

pub fn default_settings_path() -> Option<PathBuf> {
    Some(config::home_dir()?.join(".memdir").join("settings.yml"))
}

#[derive(Clone, Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Option<Settings>, SettingsError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(None),
            Ok(contents) => serde_yaml::from_str::<Settings>(&contents)
                .map(Some)
                .map_err(|source| SettingsError::Parse {
                    path: self.path.display().to_string(),
                    source,
                }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SettingsError::Read {
                path: self.path.display().to_string(),
                source,
            }),
        }
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let contents =
            serde_yaml::to_string(settings).map_err(|source| SettingsError::Encode { source })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: parent.display().to_string(),
                source,
            })?;
        }
        std::fs::write(&self.path, contents).map_err(|source| SettingsError::Write {
            path: self.path.display().to_string(),
            source,
        })
    }
}

#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    slot: RefCell<Option<Settings>>,
    saves: Cell<usize>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(settings: Settings) -> Self {
        Self {
            slot: RefCell::new(Some(settings)),
            saves: Cell::new(0),
        }
    }

    pub fn stored(&self) -> Option<Settings> {
        self.slot.borrow().clone()
    }

    pub fn saves(&self) -> usize {
        self.saves.get()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Option<Settings>, SettingsError> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        *self.slot.borrow_mut() = Some(settings.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

impl<T: SettingsStore + ?Sized> SettingsStore for &T {
    fn load(&self) -> Result<Option<Settings>, SettingsError> {
        (**self).load()
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        (**self).save(settings)
    }
}

impl<T: SettingsStore + ?Sized> SettingsStore for Box<T> {
    fn load(&self) -> Result<Option<Settings>, SettingsError> {
        (**self).load()
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        (**self).save(settings)
    }
}

#[derive(Debug)]
pub struct ThemeSettings<S> {
    store: S,
    settings: Settings,
}

impl<S: SettingsStore> ThemeSettings<S> {
    pub fn init(store: S) -> Result<Self, SettingsError> {
        let settings = store.load()?.unwrap_or_default();
        tracing::debug!(theme = %settings.theme(), "theme loaded");
        Ok(Self { store, settings })
    }

    pub fn theme(&self) -> Theme {
        self.settings.theme()
    }

    pub fn set(&mut self, theme: Theme) -> Result<(), SettingsError> {
        if theme == self.theme() {
            return Ok(());
        }
        let next = Settings {
            dark_mode: theme.is_dark(),
        };
        self.store.save(&next)?;
        self.settings = next;
        tracing::info!(theme = %theme, "theme changed");
        Ok(())
    }

    pub fn toggle(&mut self) -> Result<Theme, SettingsError> {
        let next = self.theme().toggled();
        self.set(next)?;
        Ok(next)
    }
}
