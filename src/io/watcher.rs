use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::io::paths::{Paths, SETTINGS_FILE, TODOS_FILE};

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataEvent {
    /// `todos.json` was written by someone (possibly us)
    TodosChanged,
    /// `settings.toml` was written or removed
    SettingsChanged,
}

/// Watches the data and config directories for changes to the store files.
pub struct DataWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<DataEvent>,
}

impl DataWatcher {
    /// Start watching. Missing directories are created first so there is
    /// something to watch on a fresh install.
    pub fn start(paths: &Paths) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(e) => {
                        log::debug!("watch error: {}", e);
                        return;
                    }
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                let mut todos = false;
                let mut settings = false;
                for path in &event.paths {
                    match classify(path) {
                        Some(DataEvent::TodosChanged) => todos = true,
                        Some(DataEvent::SettingsChanged) => settings = true,
                        None => {}
                    }
                }
                if todos {
                    let _ = tx.send(DataEvent::TodosChanged);
                }
                if settings {
                    let _ = tx.send(DataEvent::SettingsChanged);
                }
            },
            Config::default(),
        )?;

        let mut dirs: Vec<&PathBuf> = vec![&paths.data_dir];
        if paths.config_dir != paths.data_dir {
            dirs.push(&paths.config_dir);
        }
        for dir in dirs {
            std::fs::create_dir_all(dir).map_err(notify::Error::io)?;
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
        }

        Ok(DataWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll for pending events, with duplicates collapsed.
    pub fn poll(&self) -> Vec<DataEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.rx.try_recv() {
            if !events.contains(&evt) {
                events.push(evt);
            }
        }
        events
    }
}

/// Which store file a path refers to. Lock files, temp files from atomic
/// writes and the log are ignored.
fn classify(path: &Path) -> Option<DataEvent> {
    match path.file_name()?.to_str()? {
        TODOS_FILE => Some(DataEvent::TodosChanged),
        SETTINGS_FILE => Some(DataEvent::SettingsChanged),
        _ => None,
    }
}
