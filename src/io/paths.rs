use std::path::{Path, PathBuf};

pub const TODOS_FILE: &str = "todos.json";
pub const SETTINGS_FILE: &str = "settings.toml";
pub const LOG_FILE: &str = "daylist.log";

/// Where todos, settings and the log file live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub data_dir: PathBuf,
    pub config_dir: PathBuf,
}

impl Paths {
    /// Resolve directories. An explicit override (the `--data-dir` flag)
    /// wins, then `DAYLIST_DIR`; both put data and settings in one place.
    /// Otherwise the XDG locations are used.
    pub fn resolve(override_dir: Option<&Path>) -> Self {
        if let Some(dir) = override_dir {
            return Paths::single(dir);
        }
        if let Ok(dir) = std::env::var("DAYLIST_DIR")
            && !dir.is_empty()
        {
            return Paths::single(Path::new(&dir));
        }
        let data_home = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home_dir().join(".local").join("share"));
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home_dir().join(".config"));
        Paths {
            data_dir: data_home.join("daylist"),
            config_dir: config_home.join("daylist"),
        }
    }

    /// Data and settings in the same directory
    pub fn single(dir: &Path) -> Self {
        Paths {
            data_dir: dir.to_path_buf(),
            config_dir: dir.to_path_buf(),
        }
    }

    pub fn todos_file(&self) -> PathBuf {
        self.data_dir.join(TODOS_FILE)
    }

    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

/// Get the user's home directory
fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}
