use std::fs::OpenOptions;

use env_logger::{Builder, Env, Target};

use crate::io::paths::Paths;

/// Environment variable holding the log filter (`debug`, `daylist=trace`, ...)
pub const LOG_ENV: &str = "DAYLIST_LOG";

/// CLI logging: stderr, warnings and errors unless `DAYLIST_LOG` says otherwise.
pub fn init_cli_logging() {
    let _ = Builder::from_env(Env::new().filter_or(LOG_ENV, "warn"))
        .format_timestamp(None)
        .target(Target::Stderr)
        .try_init();
}

/// TUI logging: the terminal belongs to the UI, so records go to
/// `daylist.log` in the data directory. Falls back to discarding output
/// when the file cannot be opened.
pub fn init_tui_logging(paths: &Paths) {
    let mut builder = Builder::from_env(Env::new().filter_or(LOG_ENV, "info"));
    let file = std::fs::create_dir_all(&paths.data_dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(paths.log_file())
    });
    match file {
        Ok(f) => {
            builder.target(Target::Pipe(Box::new(f)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    let _ = builder.try_init();
}
