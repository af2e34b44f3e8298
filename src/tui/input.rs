use std::time::Instant;

use chrono::{Days, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode};

use crate::keymap::dispatch::{Command, Mode, resolve};
use crate::keymap::shortcut::{KeyPress, Modifiers, code_for_key};
use crate::model::settings::BindingId;
use crate::model::todo::TodoStatus;
use crate::ops::todo_ops::{self, EditOutcome, clamp_selection};

use super::app::App;
use super::text_input::TextInput;

/// Convert a crossterm key event into a `KeyPress`. Returns `None` for keys
/// with no name in the shortcut language.
pub fn key_press(key: &KeyEvent) -> Option<KeyPress> {
    let m = key.modifiers;
    let modifiers = Modifiers {
        ctrl: m.contains(KeyModifiers::CONTROL),
        meta: m.contains(KeyModifiers::SUPER) || m.contains(KeyModifiers::META),
        alt: m.contains(KeyModifiers::ALT),
        shift: m.contains(KeyModifiers::SHIFT),
    };
    let name: String = match key.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Escape".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Delete => "Delete".into(),
        KeyCode::Insert => "Insert".into(),
        KeyCode::Tab | KeyCode::BackTab => "Tab".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::Up => "ArrowUp".into(),
        KeyCode::Down => "ArrowDown".into(),
        KeyCode::Left => "ArrowLeft".into(),
        KeyCode::Right => "ArrowRight".into(),
        KeyCode::F(n) => format!("F{}", n),
        KeyCode::Modifier(mk) => match mk {
            ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => "Shift".into(),
            ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => "Control".into(),
            ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => "Alt".into(),
            _ => "Meta".into(),
        },
        _ => return None,
    };
    let code = code_for_key(&name);
    Some(KeyPress::new(&name, &code, modifiers))
}

/// Handle a key event
pub fn handle_key(app: &mut App, key: KeyEvent) {
    let Some(press) = key_press(&key) else {
        return;
    };
    handle_key_press(app, press);
}

/// Resolve a key press against the current bindings and apply the result.
/// Keys that resolve to nothing are typed into the input line in add/edit
/// mode and ignored otherwise.
pub fn handle_key_press(app: &mut App, press: KeyPress) {
    let command = resolve(
        &press,
        &app.dispatch_state(),
        app.registry.bindings(),
        app.platform,
    );
    if app.show_key_debug {
        app.last_key = Some(press.clone());
        app.last_command = command.clone();
    }
    match command {
        Some(cmd) => {
            if !matches!(cmd, Command::AssignShortcut { .. } | Command::ClearShortcut(_)) {
                app.status_message = None;
            }
            apply(app, cmd, Instant::now());
        }
        None => {
            if matches!(app.mode, Mode::Add | Mode::Edit)
                && app.recording.is_none()
                && !app.preferences_open
            {
                edit_input(&mut app.input, &press);
            }
        }
    }
}

/// Handle a bracketed paste. Only the input line accepts text.
pub fn handle_paste(app: &mut App, text: &str) {
    if matches!(app.mode, Mode::Add | Mode::Edit) && !app.preferences_open && !text.is_empty() {
        app.input.insert_str(text);
    }
}

/// Line-editing keys for the input line
fn edit_input(input: &mut TextInput, press: &KeyPress) {
    let m = press.modifiers;
    match press.key.as_str() {
        "Backspace" if m.ctrl || m.alt => input.delete_word_back(),
        "Backspace" => input.backspace(),
        "Delete" => input.delete(),
        "ArrowLeft" => input.move_left(),
        "ArrowRight" => input.move_right(),
        "Home" => input.home(),
        "End" => input.end(),
        "a" if m.ctrl => input.home(),
        "e" if m.ctrl => input.end(),
        "u" if m.ctrl => input.delete_to_start(),
        "w" if m.ctrl => input.delete_word_back(),
        key if !m.ctrl && !m.meta => {
            let mut chars = key.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                input.insert_char(c);
            }
        }
        _ => {}
    }
}

/// Apply a logical command to the app
pub fn apply(app: &mut App, command: Command, now: Instant) {
    match command {
        // -------------------------------------------------------------------
        // Recorder
        // -------------------------------------------------------------------
        Command::AssignShortcut { id, shortcut } => {
            app.recording = None;
            match app.registry.set(&id.path(), &shortcut) {
                Ok(outcome) => {
                    app.status_message = Some(match outcome.conflict {
                        Some(other) if outcome.unbound => {
                            format!("{} assigned to {}; {} unbound", shortcut, id.label(), other)
                        }
                        Some(other) => {
                            format!("{} assigned to {} (also bound to {})", shortcut, id.label(), other)
                        }
                        None => format!("{} assigned to {}", shortcut, id.label()),
                    });
                }
                Err(e) => app.status_message = Some(e.to_string()),
            }
        }
        Command::CancelRecording => app.recording = None,
        Command::ClearShortcut(id) => {
            app.recording = None;
            app.status_message = Some(match app.registry.clear(&id.path()) {
                Ok(()) => format!("{} unbound", id.label()),
                Err(e) => e.to_string(),
            });
        }

        // -------------------------------------------------------------------
        // Preferences
        // -------------------------------------------------------------------
        Command::OpenPreferences => {
            app.preferences_open = true;
            app.prefs_cursor = 0;
        }
        Command::ClosePreferences => {
            app.preferences_open = false;
            app.recording = None;
        }
        Command::PreferencesUp => app.prefs_cursor = app.prefs_cursor.saturating_sub(1),
        Command::PreferencesDown => {
            app.prefs_cursor = clamp_selection(app.prefs_cursor + 1, BindingId::ALL.len());
        }
        Command::StartRecording => {
            app.recording = BindingId::ALL.get(app.prefs_cursor).copied();
        }
        Command::ResetBindings => {
            app.status_message = Some(match app.registry.reset() {
                Ok(()) => "Shortcuts reset to defaults".into(),
                Err(e) => e.to_string(),
            });
        }
        Command::ToggleKeyDebug => {
            app.show_key_debug = !app.show_key_debug;
            app.last_key = None;
            app.last_command = None;
        }

        // -------------------------------------------------------------------
        // Text entry
        // -------------------------------------------------------------------
        Command::Submit => submit(app),
        Command::CancelInput => app.cancel_input(),
        Command::NewTodo => {
            app.mode = Mode::Add;
            app.editing_id = None;
            app.input.clear();
        }
        Command::EditMode => {
            if let Some(todo) = app.selected_todo().cloned() {
                app.input = TextInput::with_text(&todo.text);
                app.editing_id = Some(todo.id);
                app.mode = Mode::Edit;
            }
        }

        // -------------------------------------------------------------------
        // Navigation
        // -------------------------------------------------------------------
        Command::MoveUp => app.selected = app.selected.saturating_sub(1),
        Command::MoveDown => app.selected = clamp_selection(app.selected + 1, app.todos.len()),
        Command::PreviousDay => {
            if let Some(date) = app.current_date.checked_sub_days(Days::new(1)) {
                app.go_to_date(date);
            }
        }
        Command::NextDay => {
            if let Some(date) = app.current_date.checked_add_days(Days::new(1)) {
                app.go_to_date(date);
            }
        }
        Command::TodayView => {
            let today = app.refresh_today();
            app.go_to_date(today);
        }
        Command::HideWindow => app.should_quit = true,
        Command::CheckUpdates => app.update_tracker.check(app.updates.as_mut(), now),

        // -------------------------------------------------------------------
        // Todo mutations
        // -------------------------------------------------------------------
        Command::DeleteSelected => {
            if let Some(id) = app.selected_todo().map(|t| t.id.clone())
                && todo_ops::delete_todo(&mut app.todos, &id).is_ok()
            {
                app.selected = clamp_selection(app.selected, app.todos.len());
                app.save_todos();
            }
        }
        Command::ToggleCompleted | Command::ToggleStatus(TodoStatus::Completed) => {
            if let Some(id) = app.selected_todo().map(|t| t.id.clone())
                && let Ok(sel) = todo_ops::toggle_completed(&mut app.todos, &id, app.selected, Utc::now())
            {
                app.selected = sel;
                app.save_todos();
            }
        }
        Command::ToggleStatus(status) => {
            if let Some(id) = app.selected_todo().map(|t| t.id.clone())
                && let Ok(sel) = todo_ops::toggle_status(&mut app.todos, &id, status, Utc::now())
            {
                app.selected = sel;
                app.save_todos();
            }
        }
    }
}

fn submit(app: &mut App) {
    let text = app.input.as_str().to_string();
    match app.mode {
        Mode::Add => {
            if let Some(idx) = todo_ops::add_todo(&mut app.todos, &text, app.current_date) {
                app.selected = idx;
                app.save_todos();
            }
        }
        Mode::Edit => {
            if let Some(id) = app.editing_id.clone() {
                match todo_ops::edit_todo(&mut app.todos, &id, &text) {
                    Ok(EditOutcome::Edited(idx)) => {
                        app.selected = idx;
                        app.save_todos();
                    }
                    Ok(EditOutcome::Deleted) => {
                        app.selected = clamp_selection(app.selected, app.todos.len());
                        app.save_todos();
                    }
                    Err(e) => app.status_message = Some(e.to_string()),
                }
            }
        }
        Mode::View => {}
    }
    app.cancel_input();
}
