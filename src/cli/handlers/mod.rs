mod keys;
pub use keys::cmd_keys;

use std::error::Error;

use chrono::{Local, NaiveDate, Utc};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::paths::Paths;
use crate::io::todo_store::{JsonTodoStore, MemoryTodoStore, TodoStore};
use crate::model::settings::Platform;
use crate::model::todo::{Todo, TodoStatus, date_key, parse_date};
use crate::ops::ordering::sort_todos;
use crate::ops::rollover::{RolloverReport, rollover};
use crate::ops::todo_ops::{self, EditOutcome};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, paths: &Paths) -> Result<(), Box<dyn Error>> {
    let today = Local::now().date_naive();
    let date = match cli.date.as_deref() {
        Some(s) => parse_date(s).ok_or_else(|| format!("invalid date '{}' (expected YYYY-MM-DD)", s))?,
        None => today,
    };

    let Some(command) = cli.command else {
        return Ok(());
    };

    // Keybindings never touch the todo store
    if let Commands::Keys(cmd) = command {
        return cmd_keys(cmd, paths, Platform::current());
    }

    let mut store = JsonTodoStore::new(paths.todos_file());
    match command {
        Commands::Rollover(args) => cmd_rollover(&mut store, date, args),
        other => {
            // Same behaviour as opening the app: catch up on the day first
            if let Err(e) = rollover(&mut store, today) {
                log::error!("rollover failed: {}", e);
            }
            match other {
                Commands::List(args) => cmd_list(&store, date, args.json),
                Commands::Add(args) => cmd_add(&mut store, date, &args.text),
                Commands::Edit(args) => cmd_edit(&mut store, date, &args.target, &args.text),
                Commands::Toggle(args) => cmd_toggle(&mut store, date, &args.target),
                Commands::Status(args) => cmd_status(&mut store, date, &args.target, &args.status),
                Commands::Rm(args) => cmd_rm(&mut store, date, &args.target),
                Commands::Dates(args) => cmd_dates(&store, args.json),
                Commands::Rollover(_) | Commands::Keys(_) => Ok(()),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The day's bucket in display order
fn load_day(store: &dyn TodoStore, date: NaiveDate) -> Result<Vec<Todo>, Box<dyn Error>> {
    let mut todos = store.get_bucket(date)?;
    sort_todos(&mut todos);
    Ok(todos)
}

fn print_todo(todos: &[Todo], idx: usize) {
    if let Some(todo) = todos.get(idx) {
        println!("{}", format_todo_line(idx + 1, todo));
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(store: &dyn TodoStore, date: NaiveDate, json: bool) -> Result<(), Box<dyn Error>> {
    let todos = load_day(store, date)?;
    if json {
        let day = DayJson {
            date: date_key(date),
            todos: todos
                .iter()
                .enumerate()
                .map(|(i, t)| todo_to_json(i + 1, t))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&day)?);
    } else if todos.is_empty() {
        println!("(no todos for {})", date_key(date));
    } else {
        for (i, todo) in todos.iter().enumerate() {
            println!("{}", format_todo_line(i + 1, todo));
        }
    }
    Ok(())
}

fn cmd_dates(store: &dyn TodoStore, json: bool) -> Result<(), Box<dyn Error>> {
    let mut summaries = Vec::new();
    for date in store.list_dates()? {
        let todos = store.get_bucket(date)?;
        summaries.push(DateSummaryJson {
            date: date_key(date),
            total: todos.len(),
            completed: todos.iter().filter(|t| t.is_completed()).count(),
        });
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for s in &summaries {
            println!("{}  {}/{} done", s.date, s.completed, s.total);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(store: &mut dyn TodoStore, date: NaiveDate, text: &str) -> Result<(), Box<dyn Error>> {
    let mut todos = load_day(store, date)?;
    let idx = todo_ops::add_todo(&mut todos, text, date).ok_or("todo text must not be empty")?;
    store.set_bucket(date, &todos)?;
    print_todo(&todos, idx);
    Ok(())
}

fn cmd_edit(
    store: &mut dyn TodoStore,
    date: NaiveDate,
    target: &str,
    text: &str,
) -> Result<(), Box<dyn Error>> {
    let mut todos = load_day(store, date)?;
    let idx = todo_ops::resolve_target(&todos, target)?;
    let id = todos[idx].id.clone();
    let outcome = todo_ops::edit_todo(&mut todos, &id, text)?;
    store.set_bucket(date, &todos)?;
    match outcome {
        EditOutcome::Edited(new_idx) => print_todo(&todos, new_idx),
        EditOutcome::Deleted => println!("deleted {} (empty text)", id.short()),
    }
    Ok(())
}

fn cmd_toggle(store: &mut dyn TodoStore, date: NaiveDate, target: &str) -> Result<(), Box<dyn Error>> {
    let mut todos = load_day(store, date)?;
    let idx = todo_ops::resolve_target(&todos, target)?;
    let id = todos[idx].id.clone();
    todo_ops::toggle_completed(&mut todos, &id, idx, Utc::now())?;
    store.set_bucket(date, &todos)?;
    if let Some(new_idx) = todo_ops::find_index(&todos, &id) {
        print_todo(&todos, new_idx);
    }
    Ok(())
}

fn cmd_status(
    store: &mut dyn TodoStore,
    date: NaiveDate,
    target: &str,
    status: &str,
) -> Result<(), Box<dyn Error>> {
    let status: TodoStatus = status.parse()?;
    let mut todos = load_day(store, date)?;
    let idx = todo_ops::resolve_target(&todos, target)?;
    let id = todos[idx].id.clone();
    let new_idx = todo_ops::set_status(&mut todos, &id, status, Utc::now())?;
    store.set_bucket(date, &todos)?;
    print_todo(&todos, new_idx);
    Ok(())
}

fn cmd_rm(store: &mut dyn TodoStore, date: NaiveDate, target: &str) -> Result<(), Box<dyn Error>> {
    let mut todos = load_day(store, date)?;
    let idx = todo_ops::resolve_target(&todos, target)?;
    let id = todos[idx].id.clone();
    let removed = todo_ops::delete_todo(&mut todos, &id)?;
    store.set_bucket(date, &todos)?;
    println!("removed {} {}", removed.id.short(), removed.text);
    Ok(())
}

// ---------------------------------------------------------------------------
// Rollover
// ---------------------------------------------------------------------------

fn cmd_rollover(
    store: &mut JsonTodoStore,
    date: NaiveDate,
    args: RolloverArgs,
) -> Result<(), Box<dyn Error>> {
    let report = if args.dry_run {
        let mut scratch = MemoryTodoStore::from_document(store.read_document()?);
        rollover(&mut scratch, date)?
    } else {
        rollover(store, date)?
    };
    let prefix = if args.dry_run { "would carry" } else { "carried" };
    match report {
        RolloverReport::AlreadyRan => println!("already rolled over for {}", date_key(date)),
        RolloverReport::NothingToCarry { source: Some(src) } => {
            println!("nothing unfinished on {}", date_key(src))
        }
        RolloverReport::NothingToCarry { source: None } => println!("no earlier days with todos"),
        RolloverReport::Carried { source, carried } => println!(
            "{} {} todo(s) from {} to {}",
            prefix,
            carried,
            date_key(source),
            date_key(date)
        ),
    }
    Ok(())
}
