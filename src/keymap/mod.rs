pub mod dispatch;
pub mod registry;
pub mod shortcut;

pub use dispatch::{Command, DispatchState, Mode, resolve};
pub use registry::{CommandRegistry, LoggingShortcutHost, RegistryError, SetOutcome, ShortcutHost};
pub use shortcut::{KeyPress, Modifiers, Shortcut, ShortcutParseError};
