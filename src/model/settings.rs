use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Host platform family. Selects the primary modifier for default shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Mac,
    Windows,
    Linux,
}

impl Platform {
    /// Detect the running platform. `DAYLIST_PLATFORM` overrides detection.
    pub fn current() -> Self {
        std::env::var("DAYLIST_PLATFORM")
            .ok()
            .and_then(|s| Platform::from_os(&s))
            .unwrap_or_else(|| Platform::from_os(std::env::consts::OS).unwrap_or(Platform::Linux))
    }

    /// Accepts both Rust (`macos`) and Node-style (`darwin`, `win32`) names
    pub fn from_os(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mac" | "macos" | "darwin" => Some(Platform::Mac),
            "windows" | "win32" => Some(Platform::Windows),
            "linux" | "freebsd" | "openbsd" | "netbsd" => Some(Platform::Linux),
            _ => None,
        }
    }

    /// Modifier name used in default status and preferences shortcuts
    pub fn primary_modifier(self) -> &'static str {
        match self {
            Platform::Mac => "Cmd",
            _ => "Ctrl",
        }
    }

    /// Display name of the Alt key
    pub fn alt_name(self) -> &'static str {
        match self {
            Platform::Mac => "Option",
            _ => "Alt",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Mac => write!(f, "mac"),
            Platform::Windows => write!(f, "windows"),
            Platform::Linux => write!(f, "linux"),
        }
    }
}

/// Keybinding namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Global,
    Navigation,
    System,
}

impl Namespace {
    pub const ALL: [Namespace; 3] = [Namespace::Global, Namespace::Navigation, Namespace::System];

    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Global => "global",
            Namespace::Navigation => "navigation",
            Namespace::System => "system",
        }
    }
}

/// Every rebindable logical command, in preferences display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingId {
    ToggleApp,
    NewTodo,
    EditMode,
    DeleteSelected,
    TodayView,
    CheckUpdates,
    PreviousDay,
    NextDay,
    MarkImportant,
    MarkInProgress,
    MarkOnHold,
    MarkCompleted,
    MarkCancelled,
    Preferences,
    DevTools,
}

impl BindingId {
    pub const ALL: [BindingId; 15] = [
        BindingId::ToggleApp,
        BindingId::NewTodo,
        BindingId::EditMode,
        BindingId::DeleteSelected,
        BindingId::TodayView,
        BindingId::CheckUpdates,
        BindingId::PreviousDay,
        BindingId::NextDay,
        BindingId::MarkImportant,
        BindingId::MarkInProgress,
        BindingId::MarkOnHold,
        BindingId::MarkCompleted,
        BindingId::MarkCancelled,
        BindingId::Preferences,
        BindingId::DevTools,
    ];

    pub fn namespace(self) -> Namespace {
        match self {
            BindingId::ToggleApp => Namespace::Global,
            BindingId::Preferences | BindingId::DevTools => Namespace::System,
            _ => Namespace::Navigation,
        }
    }

    /// Key within the namespace, as stored in the settings file
    pub fn key(self) -> &'static str {
        match self {
            BindingId::ToggleApp => "toggleApp",
            BindingId::NewTodo => "newTodo",
            BindingId::EditMode => "editMode",
            BindingId::DeleteSelected => "deleteSelected",
            BindingId::TodayView => "todayView",
            BindingId::CheckUpdates => "checkUpdates",
            BindingId::PreviousDay => "previousDay",
            BindingId::NextDay => "nextDay",
            BindingId::MarkImportant => "markImportant",
            BindingId::MarkInProgress => "markInProgress",
            BindingId::MarkOnHold => "markOnHold",
            BindingId::MarkCompleted => "markCompleted",
            BindingId::MarkCancelled => "markCancelled",
            BindingId::Preferences => "preferences",
            BindingId::DevTools => "devTools",
        }
    }

    /// Dotted path, e.g. `navigation.newTodo`
    pub fn path(self) -> String {
        format!("{}.{}", self.namespace().as_str(), self.key())
    }

    pub fn from_path(path: &str) -> Option<Self> {
        BindingId::ALL.into_iter().find(|b| b.path() == path)
    }

    /// Human label for the preferences panel
    pub fn label(self) -> &'static str {
        match self {
            BindingId::ToggleApp => "Show / hide app",
            BindingId::NewTodo => "New todo",
            BindingId::EditMode => "Edit todo",
            BindingId::DeleteSelected => "Delete todo",
            BindingId::TodayView => "Jump to today",
            BindingId::CheckUpdates => "Check for updates",
            BindingId::PreviousDay => "Previous day",
            BindingId::NextDay => "Next day",
            BindingId::MarkImportant => "Mark important",
            BindingId::MarkInProgress => "Mark in progress",
            BindingId::MarkOnHold => "Mark on hold",
            BindingId::MarkCompleted => "Mark completed",
            BindingId::MarkCancelled => "Mark cancelled",
            BindingId::Preferences => "Preferences",
            BindingId::DevTools => "Key debug overlay",
        }
    }

    /// Built-in shortcut for this command on `platform`
    pub fn default_shortcut(self, platform: Platform) -> String {
        let m = platform.primary_modifier();
        match self {
            BindingId::ToggleApp => "Alt+T".into(),
            BindingId::NewTodo => "n".into(),
            BindingId::EditMode => "e".into(),
            BindingId::DeleteSelected => "Delete".into(),
            BindingId::TodayView => "t".into(),
            BindingId::CheckUpdates => "u".into(),
            BindingId::PreviousDay => "ArrowLeft".into(),
            BindingId::NextDay => "ArrowRight".into(),
            BindingId::MarkImportant => format!("{m}+I"),
            BindingId::MarkInProgress => format!("{m}+P"),
            BindingId::MarkOnHold => format!("{m}+H"),
            BindingId::MarkCompleted => format!("{m}+C"),
            BindingId::MarkCancelled => format!("{m}+X"),
            BindingId::Preferences => format!("{m}+,"),
            BindingId::DevTools => match platform {
                Platform::Mac => "Cmd+Option+I".into(),
                _ => "F12".into(),
            },
        }
    }
}

/// The keybinding tree: namespace → command → shortcut string.
/// An empty string means the command is unbound.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keybindings(pub IndexMap<String, IndexMap<String, String>>);

impl Keybindings {
    /// Platform defaults for every enumerated command
    pub fn defaults(platform: Platform) -> Self {
        let mut tree: IndexMap<String, IndexMap<String, String>> = IndexMap::new();
        for ns in Namespace::ALL {
            tree.insert(ns.as_str().to_string(), IndexMap::new());
        }
        for id in BindingId::ALL {
            tree.entry(id.namespace().as_str().to_string())
                .or_default()
                .insert(id.key().to_string(), id.default_shortcut(platform));
        }
        Keybindings(tree)
    }

    /// Shortcut bound at a dotted path
    pub fn get_path(&self, path: &str) -> Option<&str> {
        let (ns, key) = path.split_once('.')?;
        self.0.get(ns)?.get(key).map(|s| s.as_str())
    }

    pub fn get(&self, id: BindingId) -> &str {
        self.0
            .get(id.namespace().as_str())
            .and_then(|ns| ns.get(id.key()))
            .map_or("", |s| s.as_str())
    }

    /// Store a shortcut at a dotted path, creating the namespace if needed
    pub fn insert_path(&mut self, path: &str, shortcut: &str) -> bool {
        let Some((ns, key)) = path.split_once('.') else {
            return false;
        };
        self.0
            .entry(ns.to_string())
            .or_default()
            .insert(key.to_string(), shortcut.to_string());
        true
    }

    /// Overlay `other` on top of `self`, key by key
    pub fn merge(&mut self, other: &Keybindings) {
        for (ns, entries) in &other.0 {
            let target = self.0.entry(ns.clone()).or_default();
            for (key, value) in entries {
                target.insert(key.clone(), value.clone());
            }
        }
    }

    /// Walk every `(path, shortcut)` pair in tree order
    pub fn iter_paths(&self) -> impl Iterator<Item = (String, &str)> {
        self.0.iter().flat_map(|(ns, entries)| {
            entries
                .iter()
                .map(move |(key, value)| (format!("{}.{}", ns, key), value.as_str()))
        })
    }
}

/// User settings. Only keybindings are configurable today.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub keybindings: Keybindings,
}

impl AppSettings {
    pub fn defaults(platform: Platform) -> Self {
        AppSettings {
            keybindings: Keybindings::defaults(platform),
        }
    }

    /// Deep-merge a possibly partial saved configuration over the platform
    /// defaults, so every enumerated command has an entry.
    pub fn merged_with_defaults(saved: AppSettings, platform: Platform) -> Self {
        let mut settings = AppSettings::defaults(platform);
        settings.keybindings.merge(&saved.keybindings);
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_binding() {
        for platform in [Platform::Mac, Platform::Windows, Platform::Linux] {
            let kb = Keybindings::defaults(platform);
            for id in BindingId::ALL {
                assert!(!kb.get(id).is_empty(), "{} missing on {}", id.path(), platform);
            }
        }
    }

    #[test]
    fn status_defaults_follow_platform_modifier() {
        let mac = Keybindings::defaults(Platform::Mac);
        let linux = Keybindings::defaults(Platform::Linux);
        assert_eq!(mac.get(BindingId::MarkImportant), "Cmd+I");
        assert_eq!(linux.get(BindingId::MarkImportant), "Ctrl+I");
        assert_eq!(mac.get(BindingId::Preferences), "Cmd+,");
        assert_eq!(linux.get(BindingId::Preferences), "Ctrl+,");
        assert_eq!(mac.get(BindingId::DevTools), "Cmd+Option+I");
        assert_eq!(linux.get(BindingId::DevTools), "F12");
        assert_eq!(mac.get(BindingId::NewTodo), "n");
    }

    #[test]
    fn paths_round_trip() {
        for id in BindingId::ALL {
            assert_eq!(BindingId::from_path(&id.path()), Some(id));
        }
        assert_eq!(BindingId::NewTodo.path(), "navigation.newTodo");
        assert_eq!(BindingId::ToggleApp.path(), "global.toggleApp");
        assert!(BindingId::from_path("navigation.nope").is_none());
    }

    #[test]
    fn partial_settings_merge_over_defaults() {
        let saved: AppSettings = toml::from_str(
            r#"
[keybindings.navigation]
newTodo = "a"
"#,
        )
        .unwrap();
        let merged = AppSettings::merged_with_defaults(saved, Platform::Linux);
        assert_eq!(merged.keybindings.get(BindingId::NewTodo), "a");
        assert_eq!(merged.keybindings.get(BindingId::EditMode), "e");
        assert_eq!(merged.keybindings.get(BindingId::ToggleApp), "Alt+T");
        assert_eq!(merged.keybindings.get(BindingId::DevTools), "F12");
    }

    #[test]
    fn empty_settings_file_yields_defaults() {
        let saved: AppSettings = toml::from_str("").unwrap();
        let merged = AppSettings::merged_with_defaults(saved, Platform::Mac);
        assert_eq!(merged, AppSettings::defaults(Platform::Mac));
    }

    #[test]
    fn platform_names() {
        assert_eq!(Platform::from_os("darwin"), Some(Platform::Mac));
        assert_eq!(Platform::from_os("win32"), Some(Platform::Windows));
        assert_eq!(Platform::from_os("linux"), Some(Platform::Linux));
        assert_eq!(Platform::from_os("plan9"), None);
    }

    #[test]
    fn iter_paths_walks_tree_in_order() {
        let kb = Keybindings::defaults(Platform::Linux);
        let paths: Vec<String> = kb.iter_paths().map(|(p, _)| p).collect();
        assert_eq!(paths.first().map(String::as_str), Some("global.toggleApp"));
        assert_eq!(paths.last().map(String::as_str), Some("system.devTools"));
        assert_eq!(paths.len(), BindingId::ALL.len());
    }
}
