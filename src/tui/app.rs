use std::io;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::logging::init_tui_logging;
use crate::io::paths::Paths;
use crate::io::settings_store::{SettingsStore, TomlSettingsStore};
use crate::io::todo_store::{JsonTodoStore, TodoStore};
use crate::io::watcher::{DataEvent, DataWatcher};
use crate::keymap::dispatch::{Command, DispatchState, Mode};
use crate::keymap::registry::{CommandRegistry, LoggingShortcutHost};
use crate::keymap::shortcut::KeyPress;
use crate::model::settings::{BindingId, Platform};
use crate::model::todo::{Todo, TodoId};
use crate::ops::ordering::sort_todos;
use crate::ops::rollover::rollover;
use crate::ops::todo_ops::clamp_selection;
use crate::update::{DisabledUpdates, UpdateSource, UpdateTracker};

use super::input;
use super::render;
use super::text_input::TextInput;
use super::theme::Theme;

pub type Registry = CommandRegistry<Box<dyn SettingsStore>, LoggingShortcutHost>;

/// Main application state
pub struct App {
    pub store: Box<dyn TodoStore>,
    pub registry: Registry,
    pub updates: Box<dyn UpdateSource>,
    pub update_tracker: UpdateTracker,
    pub platform: Platform,
    pub theme: Theme,
    /// Current local day, refreshed from `clock`
    pub today: NaiveDate,
    pub clock: fn() -> NaiveDate,
    /// Day being viewed
    pub current_date: NaiveDate,
    /// Todos of `current_date`, in display order
    pub todos: Vec<Todo>,
    pub selected: usize,
    pub mode: Mode,
    /// Todo being edited in `Mode::Edit`
    pub editing_id: Option<TodoId>,
    pub input: TextInput,
    pub preferences_open: bool,
    /// Row cursor in the preferences panel (index into `BindingId::ALL`)
    pub prefs_cursor: usize,
    pub recording: Option<BindingId>,
    pub show_key_debug: bool,
    pub last_key: Option<KeyPress>,
    pub last_command: Option<Command>,
    /// Transient message for the footer (errors, conflicts)
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        store: Box<dyn TodoStore>,
        settings: Box<dyn SettingsStore>,
        updates: Box<dyn UpdateSource>,
        platform: Platform,
        today: NaiveDate,
    ) -> Self {
        let (registry, error) =
            CommandRegistry::load_or_default(settings, LoggingShortcutHost, platform);
        let status_message = error.map(|e| format!("Settings not loaded: {}", e));

        let mut app = App {
            store,
            registry,
            updates,
            update_tracker: UpdateTracker::new(Instant::now()),
            platform,
            theme: Theme::default(),
            today,
            clock: local_today,
            current_date: today,
            todos: Vec::new(),
            selected: 0,
            mode: Mode::View,
            editing_id: None,
            input: TextInput::new(),
            preferences_open: false,
            prefs_cursor: 0,
            recording: None,
            show_key_debug: false,
            last_key: None,
            last_command: None,
            status_message,
            should_quit: false,
        };
        app.load_todos();
        app
    }

    pub fn dispatch_state(&self) -> DispatchState {
        DispatchState {
            mode: self.mode,
            recording: self.recording,
            preferences_open: self.preferences_open,
        }
    }

    pub fn is_today(&self) -> bool {
        self.current_date == self.today
    }

    pub fn selected_todo(&self) -> Option<&Todo> {
        self.todos.get(self.selected)
    }

    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.is_completed()).count()
    }

    pub fn version(&self) -> &str {
        self.updates.current_version()
    }

    /// Read the current day's bucket from the store
    pub fn load_todos(&mut self) {
        match self.store.get_bucket(self.current_date) {
            Ok(mut todos) => {
                sort_todos(&mut todos);
                self.todos = todos;
            }
            Err(e) => {
                log::error!("loading todos for {} failed: {}", self.current_date, e);
                self.status_message = Some(format!("Load failed: {}", e));
                self.todos.clear();
            }
        }
        self.selected = clamp_selection(self.selected, self.todos.len());
    }

    /// Persist the current day's bucket. In-memory state stands either way.
    pub fn save_todos(&mut self) {
        if let Err(e) = self.store.set_bucket(self.current_date, &self.todos) {
            log::error!("saving todos for {} failed: {}", self.current_date, e);
            self.status_message = Some(format!("Save failed: {}", e));
        }
    }

    /// Switch days: reload and put the cursor at the top
    pub fn go_to_date(&mut self, date: NaiveDate) {
        self.current_date = date;
        self.selected = 0;
        self.load_todos();
    }

    /// Pick up a change made by another process
    pub fn reload_todos(&mut self) {
        let selected_id = self.selected_todo().map(|t| t.id.clone());
        self.load_todos();
        if let Some(id) = selected_id
            && let Some(idx) = self.todos.iter().position(|t| t.id == id)
        {
            self.selected = idx;
        }
        if self.mode == Mode::Edit
            && let Some(id) = &self.editing_id
            && !self.todos.iter().any(|t| &t.id == id)
        {
            self.cancel_input();
            self.status_message = Some("Todo was removed elsewhere".into());
        }
    }

    pub fn reload_settings(&mut self) {
        if let Err(e) = self.registry.reload() {
            log::error!("reloading settings failed: {}", e);
            self.status_message = Some(format!("Settings not reloaded: {}", e));
        }
    }

    /// Leave add/edit mode without saving
    pub fn cancel_input(&mut self) {
        self.mode = Mode::View;
        self.editing_id = None;
        self.input.clear();
    }

    /// Re-read the clock; returns the new day
    pub fn refresh_today(&mut self) -> NaiveDate {
        let today = (self.clock)();
        if today != self.today {
            log::debug!("day changed: {} -> {}", self.today, today);
            self.today = today;
        }
        today
    }

    /// Advance timers and collect update answers
    pub fn tick(&mut self, now: Instant) {
        self.refresh_today();
        if let Some(status) = self.updates.poll() {
            self.update_tracker.report(status, now);
        }
        self.update_tracker.tick(now);
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Run the TUI application
pub fn run(paths: &Paths, platform: Platform) -> Result<(), Box<dyn std::error::Error>> {
    init_tui_logging(paths);
    let today = local_today();

    let mut store = JsonTodoStore::new(paths.todos_file());
    if let Err(e) = rollover(&mut store, today) {
        log::error!("rollover failed: {}", e);
    }

    let settings = TomlSettingsStore::new(paths.settings_file(), platform);
    let mut app = App::new(
        Box::new(store),
        Box::new(settings),
        Box::new(DisabledUpdates::default()),
        platform,
        today,
    );

    let watcher = match DataWatcher::start(paths) {
        Ok(w) => Some(w),
        Err(e) => {
            log::warn!("file watching disabled: {}", e);
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    // Without this, Ctrl+I / Ctrl+H / Ctrl+M are indistinguishable from
    // Tab / Backspace / Enter
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if enhanced {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    // Restore terminal
    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&DataWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if let Some(watcher) = watcher {
            for evt in watcher.poll() {
                match evt {
                    DataEvent::TodosChanged => app.reload_todos(),
                    DataEvent::SettingsChanged => app.reload_settings(),
                }
            }
        }

        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
