use crate::io::settings_store::SettingsStore;
use crate::io::todo_store::StoreError;
use crate::keymap::shortcut::{Shortcut, ShortcutParseError};
use crate::model::settings::{AppSettings, BindingId, Keybindings, Namespace, Platform};

/// Error type for registry operations
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown command path: {0}")]
    UnknownPath(String),
    #[error("shortcut must not be empty (use `keys clear` to unbind)")]
    EmptyShortcut,
    #[error("invalid shortcut: {0}")]
    InvalidShortcut(#[from] ShortcutParseError),
    /// The in-memory change stands; only the save failed
    #[error("could not save settings: {0}")]
    Persist(#[from] StoreError),
}

/// Result of a successful `set`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SetOutcome {
    /// Another command that held the same shortcut
    pub conflict: Option<String>,
    /// Whether that command was unbound to make room
    pub unbound: bool,
}

/// Registers app-wide (OS level) shortcuts. Called with the full tree
/// whenever a `global.*` binding changes.
pub trait ShortcutHost {
    fn register_globals(&mut self, keybindings: &Keybindings);
}

/// Host with no OS integration: it records what would be registered in
/// the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingShortcutHost;

impl ShortcutHost for LoggingShortcutHost {
    fn register_globals(&mut self, keybindings: &Keybindings) {
        for (path, shortcut) in keybindings.iter_paths() {
            if path.starts_with("global.") {
                if shortcut.is_empty() {
                    log::info!("global shortcut {} unbound", path);
                } else {
                    log::info!("registering global shortcut {} = {}", path, shortcut);
                }
            }
        }
    }
}

/// Logical command → shortcut mapping, backed by a settings store.
pub struct CommandRegistry<S: SettingsStore, H: ShortcutHost> {
    settings: AppSettings,
    store: S,
    host: H,
    platform: Platform,
}

impl<S: SettingsStore, H: ShortcutHost> CommandRegistry<S, H> {
    /// Load saved bindings (merged over defaults) and register globals.
    pub fn load(store: S, mut host: H, platform: Platform) -> Result<Self, StoreError> {
        let settings = store.get_settings()?;
        host.register_globals(&settings.keybindings);
        Ok(CommandRegistry {
            settings,
            store,
            host,
            platform,
        })
    }

    /// Like `load`, but an unreadable settings file falls back to the
    /// defaults. The read error is handed back for reporting.
    pub fn load_or_default(store: S, mut host: H, platform: Platform) -> (Self, Option<StoreError>) {
        let (settings, error) = match store.get_settings() {
            Ok(s) => (s, None),
            Err(e) => {
                log::error!("could not load settings, using defaults: {}", e);
                (AppSettings::defaults(platform), Some(e))
            }
        };
        host.register_globals(&settings.keybindings);
        let registry = CommandRegistry {
            settings,
            store,
            host,
            platform,
        };
        (registry, error)
    }

    pub fn bindings(&self) -> &Keybindings {
        &self.settings.keybindings
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn get(&self, id: BindingId) -> &str {
        self.settings.keybindings.get(id)
    }

    /// First path other than `excluding` bound to `shortcut`.
    ///
    /// Shortcuts that parse are compared by meaning (`n` and `N` are the
    /// same binding); anything else falls back to string equality.
    pub fn validate(&self, shortcut: &str, excluding: Option<&str>) -> Option<String> {
        let shortcut = shortcut.trim();
        if shortcut.is_empty() {
            return None;
        }
        let parsed = Shortcut::parse(shortcut).ok();
        self.settings
            .keybindings
            .iter_paths()
            .filter(|(path, bound)| Some(path.as_str()) != excluding && !bound.is_empty())
            .find(|(_, bound)| match (&parsed, Shortcut::parse(bound)) {
                (Some(a), Ok(b)) => a.same_as(&b),
                _ => *bound == shortcut,
            })
            .map(|(path, _)| path)
    }

    /// Bind `shortcut` to `path` and save.
    ///
    /// A conflict never blocks the assignment. If both commands are in the
    /// navigation namespace the previous holder is unbound.
    pub fn set(&mut self, path: &str, shortcut: &str) -> Result<SetOutcome, RegistryError> {
        let id = BindingId::from_path(path).ok_or_else(|| RegistryError::UnknownPath(path.into()))?;
        let shortcut = shortcut.trim();
        if shortcut.is_empty() {
            return Err(RegistryError::EmptyShortcut);
        }
        Shortcut::parse(shortcut)?;

        let mut outcome = SetOutcome {
            conflict: self.validate(shortcut, Some(path)),
            unbound: false,
        };
        if let Some(other) = &outcome.conflict {
            let other_ns = BindingId::from_path(other).map(|b| b.namespace());
            if id.namespace() == Namespace::Navigation && other_ns == Some(Namespace::Navigation) {
                self.settings.keybindings.insert_path(other, "");
                outcome.unbound = true;
                log::warn!("{} now bound to {}; unbinding {}", shortcut, path, other);
            } else {
                log::warn!("{} is also bound to {}", shortcut, other);
            }
        }

        self.settings.keybindings.insert_path(path, shortcut);
        self.after_change(id)?;
        Ok(outcome)
    }

    /// Unbind `path`
    pub fn clear(&mut self, path: &str) -> Result<(), RegistryError> {
        let id = BindingId::from_path(path).ok_or_else(|| RegistryError::UnknownPath(path.into()))?;
        self.settings.keybindings.insert_path(path, "");
        self.after_change(id)
    }

    /// Restore platform defaults and save them right away
    pub fn reset(&mut self) -> Result<(), RegistryError> {
        self.settings = AppSettings::defaults(self.platform);
        self.store.reset_settings()?;
        self.store.set_settings(&self.settings)?;
        self.host.register_globals(&self.settings.keybindings);
        log::info!("keybindings reset to {} defaults", self.platform);
        Ok(())
    }

    /// Re-read the store after an outside change
    pub fn reload(&mut self) -> Result<(), StoreError> {
        let settings = self.store.get_settings()?;
        let globals_changed = BindingId::ALL
            .into_iter()
            .filter(|b| b.namespace() == Namespace::Global)
            .any(|b| settings.keybindings.get(b) != self.settings.keybindings.get(b));
        self.settings = settings;
        if globals_changed {
            self.host.register_globals(&self.settings.keybindings);
        }
        Ok(())
    }

    fn after_change(&mut self, id: BindingId) -> Result<(), RegistryError> {
        if id.namespace() == Namespace::Global {
            self.host.register_globals(&self.settings.keybindings);
        }
        if let Err(e) = self.store.set_settings(&self.settings) {
            log::error!("saving keybindings failed: {}", e);
            return Err(e.into());
        }
        Ok(())
    }
}
