pub mod lock;
pub mod logging;
pub mod paths;
pub mod settings_store;
pub mod todo_store;
pub mod watcher;
