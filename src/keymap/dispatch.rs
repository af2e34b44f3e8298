//! Key event → logical command resolution.
//!
//! `resolve` is a pure function of the event, the UI state and the current
//! bindings. The caller applies whatever command comes back.

use crate::keymap::shortcut::{KeyPress, Modifiers, RecordOutcome, Shortcut, record};
use crate::model::settings::{BindingId, Keybindings, Platform};
use crate::model::todo::TodoStatus;

/// What the todo panel is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    View,
    Add,
    Edit,
}

/// UI state the dispatcher needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchState {
    pub mode: Mode,
    /// Command whose shortcut is being recorded, if any
    pub recording: Option<BindingId>,
    pub preferences_open: bool,
}

/// A logical command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Shortcut recorder
    AssignShortcut { id: BindingId, shortcut: String },
    CancelRecording,
    ClearShortcut(BindingId),

    // Preferences panel
    ClosePreferences,
    PreferencesUp,
    PreferencesDown,
    StartRecording,
    ResetBindings,

    // Text entry
    Submit,
    CancelInput,

    // Fixed view keys
    MoveUp,
    MoveDown,
    PreviousDay,
    NextDay,
    ToggleCompleted,
    HideWindow,

    // Configurable commands
    NewTodo,
    EditMode,
    DeleteSelected,
    TodayView,
    CheckUpdates,
    ToggleStatus(TodoStatus),
    OpenPreferences,
    ToggleKeyDebug,
}

/// Configurable commands in match order
const CONFIGURABLE: [(BindingId, Command); 14] = [
    (BindingId::NewTodo, Command::NewTodo),
    (BindingId::EditMode, Command::EditMode),
    (BindingId::DeleteSelected, Command::DeleteSelected),
    (BindingId::TodayView, Command::TodayView),
    (BindingId::CheckUpdates, Command::CheckUpdates),
    (BindingId::PreviousDay, Command::PreviousDay),
    (BindingId::NextDay, Command::NextDay),
    (BindingId::MarkImportant, Command::ToggleStatus(TodoStatus::Important)),
    (BindingId::MarkInProgress, Command::ToggleStatus(TodoStatus::InProgress)),
    (BindingId::MarkOnHold, Command::ToggleStatus(TodoStatus::OnHold)),
    (BindingId::MarkCompleted, Command::ToggleStatus(TodoStatus::Completed)),
    (BindingId::MarkCancelled, Command::ToggleStatus(TodoStatus::Cancelled)),
    (BindingId::Preferences, Command::OpenPreferences),
    (BindingId::DevTools, Command::ToggleKeyDebug),
];

/// Resolve `event` to at most one command. First match wins:
/// recorder, preferences panel, text entry, fixed view keys, then the
/// configurable bindings.
pub fn resolve(
    event: &KeyPress,
    state: &DispatchState,
    bindings: &Keybindings,
    platform: Platform,
) -> Option<Command> {
    if let Some(id) = state.recording {
        return match record(event, platform) {
            RecordOutcome::Captured(shortcut) => Some(Command::AssignShortcut { id, shortcut }),
            RecordOutcome::Cancelled => Some(Command::CancelRecording),
            RecordOutcome::Cleared => Some(Command::ClearShortcut(id)),
            RecordOutcome::Pending => None,
        };
    }

    let key = event.key_name();
    let bare = !event.modifiers.has_command_modifier();

    if state.preferences_open {
        return match key.as_str() {
            "Escape" => Some(Command::ClosePreferences),
            "ArrowUp" if bare => Some(Command::PreferencesUp),
            "ArrowDown" if bare => Some(Command::PreferencesDown),
            "Enter" if bare => Some(Command::StartRecording),
            "r" if bare && !event.modifiers.shift => Some(Command::ResetBindings),
            _ => None,
        };
    }

    match state.mode {
        Mode::Add | Mode::Edit => {
            return match key.as_str() {
                "Enter" => Some(Command::Submit),
                "Escape" => Some(Command::CancelInput),
                _ => None,
            };
        }
        Mode::View => {}
    }

    if bare {
        let fixed = match key.as_str() {
            "ArrowUp" => Some(Command::MoveUp),
            "ArrowDown" => Some(Command::MoveDown),
            "ArrowLeft" => Some(Command::PreviousDay),
            "ArrowRight" => Some(Command::NextDay),
            "Enter" | "Space" => Some(Command::ToggleCompleted),
            "Escape" => Some(Command::HideWindow),
            _ => None,
        };
        if fixed.is_some() {
            return fixed;
        }
    }

    // Cmd+Backspace (Ctrl+Backspace off Mac) always deletes, next to the
    // rebindable deleteSelected
    if key == "Backspace" && event.modifiers == primary_modifier(platform) {
        return Some(Command::DeleteSelected);
    }

    CONFIGURABLE.iter().find_map(|(id, command)| {
        let bound = bindings.get(*id);
        if bound.is_empty() {
            return None;
        }
        match Shortcut::parse(bound) {
            Ok(shortcut) if shortcut.matches(event) => Some(command.clone()),
            Ok(_) => None,
            Err(e) => {
                log::debug!("ignoring unparseable binding {} = {:?}: {}", id.path(), bound, e);
                None
            }
        }
    })
}

fn primary_modifier(platform: Platform) -> Modifiers {
    match platform {
        Platform::Mac => Modifiers::meta(),
        _ => Modifiers::ctrl(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> DispatchState {
        DispatchState::default()
    }

    fn linux() -> Keybindings {
        Keybindings::defaults(Platform::Linux)
    }

    fn go(event: KeyPress, state: DispatchState, bindings: &Keybindings) -> Option<Command> {
        resolve(&event, &state, bindings, Platform::Linux)
    }

    #[test]
    fn fixed_key_beats_user_binding() {
        let mut kb = linux();
        kb.insert_path("navigation.newTodo", "ArrowDown");
        assert_eq!(go(KeyPress::plain("ArrowDown"), view(), &kb), Some(Command::MoveDown));
    }

    #[test]
    fn fixed_view_keys() {
        let kb = linux();
        assert_eq!(go(KeyPress::plain("ArrowUp"), view(), &kb), Some(Command::MoveUp));
        assert_eq!(go(KeyPress::plain("ArrowLeft"), view(), &kb), Some(Command::PreviousDay));
        assert_eq!(go(KeyPress::plain("ArrowRight"), view(), &kb), Some(Command::NextDay));
        assert_eq!(go(KeyPress::plain("Enter"), view(), &kb), Some(Command::ToggleCompleted));
        assert_eq!(go(KeyPress::plain(" "), view(), &kb), Some(Command::ToggleCompleted));
        assert_eq!(go(KeyPress::plain("Escape"), view(), &kb), Some(Command::HideWindow));
    }

    #[test]
    fn primary_backspace_deletes() {
        let kb = linux();
        let ctrl_bs = KeyPress::from_key("Backspace", Modifiers::ctrl());
        assert_eq!(go(ctrl_bs.clone(), view(), &kb), Some(Command::DeleteSelected));
        assert_eq!(go(KeyPress::plain("Backspace"), view(), &kb), None);

        let mac = Keybindings::defaults(Platform::Mac);
        let cmd_bs = KeyPress::from_key("Backspace", Modifiers::meta());
        assert_eq!(
            resolve(&cmd_bs, &view(), &mac, Platform::Mac),
            Some(Command::DeleteSelected)
        );
        assert_eq!(resolve(&ctrl_bs, &view(), &mac, Platform::Mac), None);

        // Still a text-editing key in add mode
        let add = DispatchState {
            mode: Mode::Add,
            ..view()
        };
        assert_eq!(go(ctrl_bs, add, &kb), None);
    }

    #[test]
    fn configurable_defaults() {
        let kb = linux();
        assert_eq!(go(KeyPress::plain("n"), view(), &kb), Some(Command::NewTodo));
        assert_eq!(go(KeyPress::plain("e"), view(), &kb), Some(Command::EditMode));
        assert_eq!(go(KeyPress::plain("Delete"), view(), &kb), Some(Command::DeleteSelected));
        assert_eq!(go(KeyPress::plain("t"), view(), &kb), Some(Command::TodayView));
        assert_eq!(go(KeyPress::plain("u"), view(), &kb), Some(Command::CheckUpdates));
        assert_eq!(
            go(KeyPress::from_key("i", Modifiers::ctrl()), view(), &kb),
            Some(Command::ToggleStatus(TodoStatus::Important))
        );
        assert_eq!(
            go(KeyPress::from_key("c", Modifiers::ctrl()), view(), &kb),
            Some(Command::ToggleStatus(TodoStatus::Completed))
        );
        assert_eq!(
            go(KeyPress::from_key(",", Modifiers::ctrl()), view(), &kb),
            Some(Command::OpenPreferences)
        );
        assert_eq!(go(KeyPress::plain("F12"), view(), &kb), Some(Command::ToggleKeyDebug));
        assert_eq!(go(KeyPress::plain("q"), view(), &kb), None);
    }

    #[test]
    fn mac_defaults_use_cmd() {
        let kb = Keybindings::defaults(Platform::Mac);
        let ev = KeyPress::from_key("p", Modifiers::meta());
        assert_eq!(
            resolve(&ev, &view(), &kb, Platform::Mac),
            Some(Command::ToggleStatus(TodoStatus::InProgress))
        );
        let ev = KeyPress::from_key("p", Modifiers::ctrl());
        assert_eq!(resolve(&ev, &view(), &kb, Platform::Mac), None);
    }

    #[test]
    fn rebinding_takes_effect_immediately() {
        let mut kb = linux();
        kb.insert_path("navigation.newTodo", "a");
        assert_eq!(go(KeyPress::plain("a"), view(), &kb), Some(Command::NewTodo));
        assert_eq!(go(KeyPress::plain("n"), view(), &kb), None);
    }

    #[test]
    fn empty_binding_never_matches() {
        let mut kb = linux();
        kb.insert_path("navigation.newTodo", "");
        assert_eq!(go(KeyPress::plain("n"), view(), &kb), None);
    }

    #[test]
    fn first_configured_match_wins() {
        let mut kb = linux();
        kb.insert_path("navigation.editMode", "n");
        assert_eq!(go(KeyPress::plain("n"), view(), &kb), Some(Command::NewTodo));
    }

    #[test]
    fn modified_arrows_fall_through_to_bindings() {
        let mut kb = linux();
        kb.insert_path("navigation.todayView", "Ctrl+ArrowDown");
        let ev = KeyPress::from_key("ArrowDown", Modifiers::ctrl());
        assert_eq!(go(ev, view(), &kb), Some(Command::TodayView));
    }

    #[test]
    fn text_entry_only_submits_or_cancels() {
        let kb = linux();
        let add = DispatchState {
            mode: Mode::Add,
            ..view()
        };
        assert_eq!(go(KeyPress::plain("Enter"), add, &kb), Some(Command::Submit));
        assert_eq!(go(KeyPress::plain("Escape"), add, &kb), Some(Command::CancelInput));
        assert_eq!(go(KeyPress::plain("n"), add, &kb), None);
        assert_eq!(go(KeyPress::plain("ArrowDown"), add, &kb), None);
        let edit = DispatchState {
            mode: Mode::Edit,
            ..view()
        };
        assert_eq!(go(KeyPress::plain("Delete"), edit, &kb), None);
    }

    #[test]
    fn preferences_panel_keys() {
        let kb = linux();
        let prefs = DispatchState {
            preferences_open: true,
            ..view()
        };
        assert_eq!(go(KeyPress::plain("Escape"), prefs, &kb), Some(Command::ClosePreferences));
        assert_eq!(go(KeyPress::plain("ArrowDown"), prefs, &kb), Some(Command::PreferencesDown));
        assert_eq!(go(KeyPress::plain("ArrowUp"), prefs, &kb), Some(Command::PreferencesUp));
        assert_eq!(go(KeyPress::plain("Enter"), prefs, &kb), Some(Command::StartRecording));
        assert_eq!(go(KeyPress::plain("r"), prefs, &kb), Some(Command::ResetBindings));
        assert_eq!(go(KeyPress::plain("n"), prefs, &kb), None);
    }

    #[test]
    fn recording_consumes_everything() {
        let kb = linux();
        let rec = DispatchState {
            recording: Some(BindingId::EditMode),
            preferences_open: true,
            ..view()
        };
        assert_eq!(
            go(KeyPress::plain("n"), rec, &kb),
            Some(Command::AssignShortcut {
                id: BindingId::EditMode,
                shortcut: "N".into()
            })
        );
        assert_eq!(go(KeyPress::plain("Escape"), rec, &kb), Some(Command::CancelRecording));
        assert_eq!(
            go(KeyPress::plain("Backspace"), rec, &kb),
            Some(Command::ClearShortcut(BindingId::EditMode))
        );
        let shift = KeyPress::new("Shift", "ShiftLeft", Modifiers::shift());
        assert_eq!(go(shift, rec, &kb), None);
    }
}
