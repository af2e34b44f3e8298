use std::fs;
use std::path::{Path, PathBuf};

use crate::io::lock::StoreLock;
use crate::io::todo_store::{StoreError, atomic_write};
use crate::model::settings::{AppSettings, Platform};

/// Persisted user settings, read and written as one blob
pub trait SettingsStore {
    /// Saved settings deep-merged over the platform defaults
    fn get_settings(&self) -> Result<AppSettings, StoreError>;
    fn set_settings(&mut self, settings: &AppSettings) -> Result<(), StoreError>;
    /// Forget everything that was saved
    fn reset_settings(&mut self) -> Result<(), StoreError>;
}

impl<T: SettingsStore + ?Sized> SettingsStore for Box<T> {
    fn get_settings(&self) -> Result<AppSettings, StoreError> {
        (**self).get_settings()
    }

    fn set_settings(&mut self, settings: &AppSettings) -> Result<(), StoreError> {
        (**self).set_settings(settings)
    }

    fn reset_settings(&mut self) -> Result<(), StoreError> {
        (**self).reset_settings()
    }
}

/// Settings kept in a TOML file. Writes edit the existing document in place
/// so comments and keys this version does not know about survive.
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    path: PathBuf,
    platform: Platform,
}

impl TomlSettingsStore {
    pub fn new(path: impl Into<PathBuf>, platform: Platform) -> Self {
        TomlSettingsStore {
            path: path.into(),
            platform,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_text(&self) -> Result<String, StoreError> {
        if !self.path.exists() {
            return Ok(String::new());
        }
        fs::read_to_string(&self.path).map_err(|e| StoreError::ReadError {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl SettingsStore for TomlSettingsStore {
    fn get_settings(&self) -> Result<AppSettings, StoreError> {
        let text = self.read_text()?;
        let saved: AppSettings = toml::from_str(&text)?;
        Ok(AppSettings::merged_with_defaults(saved, self.platform))
    }

    fn set_settings(&mut self, settings: &AppSettings) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| StoreError::WriteError {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }
        let _lock = StoreLock::acquire_default(&self.path)?;
        let text = self.read_text()?;
        let mut doc: toml_edit::DocumentMut = text.parse()?;
        write_keybindings(&mut doc, settings);
        atomic_write(&self.path, doc.to_string().as_bytes()).map_err(|e| {
            StoreError::WriteError {
                path: self.path.clone(),
                source: e,
            }
        })
    }

    fn reset_settings(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::WriteError {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}

/// Update `[keybindings.<namespace>]` tables value by value
fn write_keybindings(doc: &mut toml_edit::DocumentMut, settings: &AppSettings) {
    if !doc.contains_key("keybindings") {
        let mut table = toml_edit::Table::new();
        table.set_implicit(true);
        doc["keybindings"] = toml_edit::Item::Table(table);
    }
    for (ns, entries) in &settings.keybindings.0 {
        if doc["keybindings"].get(ns).is_none() {
            doc["keybindings"][ns.as_str()] = toml_edit::Item::Table(toml_edit::Table::new());
        }
        for (key, value) in entries {
            doc["keybindings"][ns.as_str()][key.as_str()] = toml_edit::value(value.as_str());
        }
    }
}

/// Settings store that never touches disk
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct MemorySettingsStore {
    pub saved: Option<AppSettings>,
    pub platform: Platform,
    pub writes: usize,
}

#[cfg(test)]
impl MemorySettingsStore {
    pub fn new(platform: Platform) -> Self {
        MemorySettingsStore {
            saved: None,
            platform,
            writes: 0,
        }
    }
}

#[cfg(test)]
impl SettingsStore for MemorySettingsStore {
    fn get_settings(&self) -> Result<AppSettings, StoreError> {
        Ok(AppSettings::merged_with_defaults(
            self.saved.clone().unwrap_or_default(),
            self.platform,
        ))
    }

    fn set_settings(&mut self, settings: &AppSettings) -> Result<(), StoreError> {
        self.writes += 1;
        self.saved = Some(settings.clone());
        Ok(())
    }

    fn reset_settings(&mut self) -> Result<(), StoreError> {
        self.saved = None;
        Ok(())
    }
}
