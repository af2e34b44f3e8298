use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "daylist", about = concat!("daylist v", env!("CARGO_PKG_VERSION"), " - one list per day, unfinished work rolls forward"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Day to operate on, as YYYY-MM-DD (default: today)
    #[arg(long, global = true)]
    pub date: Option<String>,

    /// Keep todos and settings in this directory
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the day's todos in display order
    List(ListArgs),
    /// Add a todo
    Add(AddArgs),
    /// Replace a todo's text (empty text deletes it)
    Edit(EditArgs),
    /// Toggle a todo between completed and pending
    Toggle(TargetArgs),
    /// Set a todo's status
    Status(StatusArgs),
    /// Delete a todo
    Rm(TargetArgs),
    /// List days that have todos
    Dates(DatesArgs),
    /// Carry unfinished todos from the last populated day forward
    Rollover(RolloverArgs),
    /// Inspect or change keyboard shortcuts
    Keys(KeysCmd),
}

// ---------------------------------------------------------------------------
// Todo command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Todo text
    pub text: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Position (1-based) or id prefix
    pub target: String,
    /// New text
    pub text: String,
}

#[derive(Args)]
pub struct TargetArgs {
    /// Position (1-based) or id prefix
    pub target: String,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Position (1-based) or id prefix
    pub target: String,
    /// pending, important, in-progress, on-hold, completed or cancelled
    pub status: String,
}

#[derive(Args)]
pub struct DatesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct RolloverArgs {
    /// Show what would be carried without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

// ---------------------------------------------------------------------------
// Keybinding args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct KeysCmd {
    #[command(subcommand)]
    pub action: KeysAction,
}

#[derive(Subcommand)]
pub enum KeysAction {
    /// Show every command and its shortcut
    List(ListArgs),
    /// Bind a shortcut to a command path (e.g. navigation.newTodo Ctrl+N)
    Set {
        path: String,
        #[arg(allow_hyphen_values = true)]
        shortcut: String,
    },
    /// Unbind a command
    Clear { path: String },
    /// Report which command already holds a shortcut
    Check {
        #[arg(allow_hyphen_values = true)]
        shortcut: String,
        /// Ignore this command path
        #[arg(long)]
        except: Option<String>,
    },
    /// Restore the platform defaults
    Reset,
}
