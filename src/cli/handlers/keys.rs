use std::error::Error;

use crate::cli::commands::{KeysAction, KeysCmd};
use crate::cli::output::BindingJson;
use crate::io::paths::Paths;
use crate::io::settings_store::TomlSettingsStore;
use crate::keymap::registry::{CommandRegistry, LoggingShortcutHost};
use crate::keymap::shortcut::Shortcut;
use crate::model::settings::{BindingId, Platform};

pub fn cmd_keys(cmd: KeysCmd, paths: &Paths, platform: Platform) -> Result<(), Box<dyn Error>> {
    let store = TomlSettingsStore::new(paths.settings_file(), platform);
    let mut registry = CommandRegistry::load(store, LoggingShortcutHost, platform)?;

    match cmd.action {
        KeysAction::List(args) => {
            if args.json {
                let bindings: Vec<BindingJson> = BindingId::ALL
                    .into_iter()
                    .map(|id| BindingJson {
                        path: id.path(),
                        label: id.label().to_string(),
                        shortcut: registry.get(id).to_string(),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&bindings)?);
            } else {
                for id in BindingId::ALL {
                    let shortcut = registry.get(id);
                    let shown = if shortcut.is_empty() { "(unbound)" } else { shortcut };
                    println!("{:<28} {}", id.path(), shown);
                }
            }
        }
        KeysAction::Set { path, shortcut } => {
            let outcome = registry.set(&path, &shortcut)?;
            println!("{} = {}", path, registry.bindings().get_path(&path).unwrap_or(""));
            if let Some(other) = outcome.conflict {
                if outcome.unbound {
                    println!("unbound {} (it had the same shortcut)", other);
                } else {
                    println!("note: {} uses the same shortcut", other);
                }
            }
        }
        KeysAction::Clear { path } => {
            registry.clear(&path)?;
            println!("{} unbound", path);
        }
        KeysAction::Check { shortcut, except } => {
            Shortcut::parse(&shortcut)?;
            match registry.validate(&shortcut, except.as_deref()) {
                Some(path) => return Err(format!("{} is already bound to {}", shortcut, path).into()),
                None => println!("{} is free", shortcut),
            }
        }
        KeysAction::Reset => {
            registry.reset()?;
            println!("keybindings reset to {} defaults", platform);
        }
    }
    Ok(())
}
