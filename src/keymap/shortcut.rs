//! Shortcut strings: a modifier set plus one primary key.
//!
//! Shortcuts are written the way people read them (`Ctrl+I`, `Cmd+,`,
//! `ArrowLeft`, `n`) and matched against [`KeyPress`] events. A key press
//! carries two names for the physical key: the printable `key` (which depends
//! on layout, case and Alt/Option composition) and the positional `code`.
//! A shortcut matches if either name fits, so a shortcut recorded under one
//! layout still fires under another.

use std::fmt;
use std::str::FromStr;

use crate::model::settings::Platform;

/// State of the four modifier keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        meta: false,
        alt: false,
        shift: false,
    };

    pub fn ctrl() -> Self {
        Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        }
    }

    pub fn meta() -> Self {
        Modifiers {
            meta: true,
            ..Modifiers::NONE
        }
    }

    pub fn shift() -> Self {
        Modifiers {
            shift: true,
            ..Modifiers::NONE
        }
    }

    /// Ctrl, Cmd or Alt held (Shift alone does not count)
    pub fn has_command_modifier(self) -> bool {
        self.ctrl || self.meta || self.alt
    }

    fn without_shift(self) -> Self {
        Modifiers {
            shift: false,
            ..self
        }
    }
}

/// A raw key press as delivered by the terminal or window layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    /// Printable key (`"n"`, `"N"`, `","`) or key name (`"ArrowDown"`, `"Escape"`)
    pub key: String,
    /// Positional code (`"KeyN"`, `"Comma"`, `"ArrowDown"`)
    pub code: String,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: &str, code: &str, modifiers: Modifiers) -> Self {
        KeyPress {
            key: key.to_string(),
            code: code.to_string(),
            modifiers,
        }
    }

    /// Key press whose code is derived from the key (US layout)
    pub fn from_key(key: &str, modifiers: Modifiers) -> Self {
        KeyPress::new(key, &code_for_key(key), modifiers)
    }

    pub fn plain(key: &str) -> Self {
        KeyPress::from_key(key, Modifiers::NONE)
    }

    /// Canonical name of the printable key
    pub fn key_name(&self) -> String {
        canonical_key(&self.key).unwrap_or_else(|| self.key.clone())
    }

    /// Whether this is a press of a modifier key on its own
    pub fn is_bare_modifier(&self) -> bool {
        matches!(
            self.key.as_str(),
            "Control" | "Meta" | "Alt" | "Shift" | "Super" | "Hyper" | "AltGraph"
        )
    }
}

/// Named (non-printable) keys, in canonical spelling
const NAMED_KEYS: &[&str] = &[
    "ArrowUp",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "Enter",
    "Escape",
    "Space",
    "Tab",
    "Backspace",
    "Delete",
    "Insert",
    "Home",
    "End",
    "PageUp",
    "PageDown",
];

/// Canonical key name for a key token, or `None` if it is not a key.
/// Single characters are returned unchanged.
fn canonical_key(token: &str) -> Option<String> {
    if token == " " {
        return Some("Space".into());
    }
    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(c.to_string());
    }
    let lower = token.to_ascii_lowercase();
    let alias = match lower.as_str() {
        "up" => Some("ArrowUp"),
        "down" => Some("ArrowDown"),
        "left" => Some("ArrowLeft"),
        "right" => Some("ArrowRight"),
        "esc" => Some("Escape"),
        "return" => Some("Enter"),
        "del" => Some("Delete"),
        "ins" => Some("Insert"),
        "pgup" => Some("PageUp"),
        "pgdn" => Some("PageDown"),
        "plus" => Some("+"),
        _ => None,
    };
    if let Some(a) = alias {
        return Some(a.to_string());
    }
    if let Some(named) = NAMED_KEYS.iter().find(|k| k.to_ascii_lowercase() == lower) {
        return Some(named.to_string());
    }
    if let Some(n) = lower.strip_prefix('f')
        && let Ok(num) = n.parse::<u8>()
        && (1..=24).contains(&num)
    {
        return Some(format!("F{}", num));
    }
    None
}

/// Key name implied by a positional code, if the code is a known one
fn key_for_code(code: &str) -> Option<String> {
    if let Some(letter) = code.strip_prefix("Key")
        && letter.len() == 1
    {
        return Some(letter.to_string());
    }
    if let Some(digit) = code
        .strip_prefix("Digit")
        .or_else(|| code.strip_prefix("Numpad").filter(|d| d.len() == 1))
    {
        return Some(digit.to_string());
    }
    let punct = match code {
        "Comma" => ",",
        "Period" => ".",
        "Slash" => "/",
        "Semicolon" => ";",
        "Quote" => "'",
        "BracketLeft" => "[",
        "BracketRight" => "]",
        "Backslash" => "\\",
        "Minus" => "-",
        "Equal" => "=",
        "Backquote" => "`",
        _ => "",
    };
    if !punct.is_empty() {
        return Some(punct.to_string());
    }
    // Named keys share their name with their code ("ArrowDown", "F5", "Space")
    canonical_key(code).filter(|k| k.chars().count() > 1)
}

/// Positional code for a key on a US layout (best effort)
pub fn code_for_key(key: &str) -> String {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return format!("Key{}", c.to_ascii_uppercase());
        }
        if c.is_ascii_digit() {
            return format!("Digit{}", c);
        }
        let code = match c {
            ' ' => "Space",
            ',' | '<' => "Comma",
            '.' | '>' => "Period",
            '/' | '?' => "Slash",
            ';' | ':' => "Semicolon",
            '\'' | '"' => "Quote",
            '[' | '{' => "BracketLeft",
            ']' | '}' => "BracketRight",
            '\\' | '|' => "Backslash",
            '-' | '_' => "Minus",
            '=' | '+' => "Equal",
            '`' | '~' => "Backquote",
            '!' => "Digit1",
            '@' => "Digit2",
            '#' => "Digit3",
            '$' => "Digit4",
            '%' => "Digit5",
            '^' => "Digit6",
            '&' => "Digit7",
            '*' => "Digit8",
            '(' => "Digit9",
            ')' => "Digit0",
            _ => "",
        };
        return code.to_string();
    }
    canonical_key(key).unwrap_or_else(|| key.to_string())
}

/// Error parsing a shortcut string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShortcutParseError {
    #[error("empty shortcut")]
    Empty,
    #[error("no key in shortcut '{0}' (only modifiers)")]
    NoKey(String),
    #[error("unknown modifier '{modifier}' in shortcut '{shortcut}'")]
    UnknownModifier { modifier: String, shortcut: String },
    #[error("duplicate modifier '{modifier}' in shortcut '{shortcut}'")]
    DuplicateModifier { modifier: String, shortcut: String },
    #[error("unknown key '{key}' in shortcut '{shortcut}'")]
    UnknownKey { key: String, shortcut: String },
    #[error("more than one key in shortcut '{0}'")]
    MultipleKeys(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModifierKind {
    Ctrl,
    Meta,
    Alt,
    Shift,
}

fn parse_modifier(token: &str) -> Option<ModifierKind> {
    match token.to_ascii_lowercase().as_str() {
        "ctrl" | "control" => Some(ModifierKind::Ctrl),
        "cmd" | "command" | "meta" | "super" | "win" => Some(ModifierKind::Meta),
        "alt" | "option" | "opt" => Some(ModifierKind::Alt),
        "shift" => Some(ModifierKind::Shift),
        _ => None,
    }
}

/// A parsed shortcut
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shortcut {
    pub modifiers: Modifiers,
    /// Canonical key: a single character (case as written) or a key name
    pub key: String,
}

impl Shortcut {
    pub fn new(modifiers: Modifiers, key: &str) -> Self {
        Shortcut {
            modifiers,
            key: canonical_key(key).unwrap_or_else(|| key.to_string()),
        }
    }

    pub fn parse(s: &str) -> Result<Self, ShortcutParseError> {
        s.parse()
    }

    /// Format with platform modifier names (`Option` on mac)
    pub fn format_for(&self, platform: Platform) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if self.modifiers.ctrl {
            parts.push("Ctrl");
        }
        if self.modifiers.meta {
            parts.push("Cmd");
        }
        if self.modifiers.alt {
            parts.push(platform.alt_name());
        }
        if self.modifiers.shift {
            parts.push("Shift");
        }
        parts.push(&self.key);
        parts.join("+")
    }

    /// Same modifiers and same key, ignoring letter case
    pub fn same_as(&self, other: &Shortcut) -> bool {
        self.modifiers == other.modifiers && self.key_matches(&other.key)
    }

    /// True for a single printable non-alphanumeric key such as `,` or `?`
    fn is_symbol(&self) -> bool {
        let mut chars = self.key.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if !c.is_alphanumeric())
    }

    fn key_matches(&self, name: &str) -> bool {
        if self.key.chars().count() == 1 && name.chars().count() == 1 {
            self.key.to_lowercase() == name.to_lowercase()
        } else {
            self.key.eq_ignore_ascii_case(name)
        }
    }

    /// Does `event` trigger this shortcut?
    ///
    /// Modifiers must match exactly, except that Shift is ignored for symbol
    /// keys when the shortcut does not name it (the symbol already implies
    /// it). The key may match either the printable key or the positional code.
    pub fn matches(&self, event: &KeyPress) -> bool {
        let mods_equal = |m: Modifiers| {
            if self.is_symbol() && !self.modifiers.shift {
                m.without_shift() == self.modifiers
            } else {
                m == self.modifiers
            }
        };
        if !mods_equal(event.modifiers) {
            return false;
        }
        if self.key_matches(&event.key_name()) {
            return true;
        }
        key_for_code(&event.code).is_some_and(|k| self.key_matches(&k))
    }
}

impl FromStr for Shortcut {
    type Err = ShortcutParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let shortcut = s.trim();
        if shortcut.is_empty() {
            return Err(ShortcutParseError::Empty);
        }

        // The '+' key itself: "+" or "Ctrl++"
        let (mods_part, key_part) = if shortcut == "+" {
            ("", "+")
        } else if let Some(prefix) = shortcut.strip_suffix("++") {
            (prefix, "+")
        } else {
            match shortcut.rsplit_once('+') {
                Some((m, k)) => (m, k.trim()),
                None => ("", shortcut),
            }
        };

        let mut modifiers = Modifiers::NONE;
        for token in mods_part.split('+').map(str::trim).filter(|t| !t.is_empty()) {
            let Some(kind) = parse_modifier(token) else {
                if canonical_key(token).is_some() {
                    return Err(ShortcutParseError::MultipleKeys(shortcut.to_string()));
                }
                return Err(ShortcutParseError::UnknownModifier {
                    modifier: token.to_string(),
                    shortcut: shortcut.to_string(),
                });
            };
            let slot = match kind {
                ModifierKind::Ctrl => &mut modifiers.ctrl,
                ModifierKind::Meta => &mut modifiers.meta,
                ModifierKind::Alt => &mut modifiers.alt,
                ModifierKind::Shift => &mut modifiers.shift,
            };
            if *slot {
                return Err(ShortcutParseError::DuplicateModifier {
                    modifier: token.to_string(),
                    shortcut: shortcut.to_string(),
                });
            }
            *slot = true;
        }

        if key_part.is_empty() || parse_modifier(key_part).is_some() {
            return Err(ShortcutParseError::NoKey(shortcut.to_string()));
        }
        let key = canonical_key(key_part).ok_or_else(|| ShortcutParseError::UnknownKey {
            key: key_part.to_string(),
            shortcut: shortcut.to_string(),
        })?;
        Ok(Shortcut { modifiers, key })
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_for(Platform::Linux))
    }
}

/// What a key press means while a shortcut is being recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A complete shortcut, formatted for the platform
    Captured(String),
    /// Escape: stop recording, keep the old binding
    Cancelled,
    /// Backspace/Delete: unbind the command
    Cleared,
    /// A bare modifier; keep waiting
    Pending,
}

/// Turn a key press into a shortcut string while recording.
///
/// Letters, digits, arrows and function keys are taken from the positional
/// code so that Alt/Option compositions (Option+T typing `†`) still record
/// as `Option+T`.
pub fn record(event: &KeyPress, platform: Platform) -> RecordOutcome {
    match event.key.as_str() {
        "Escape" => return RecordOutcome::Cancelled,
        "Backspace" | "Delete" => return RecordOutcome::Cleared,
        _ => {}
    }
    if event.is_bare_modifier() {
        return RecordOutcome::Pending;
    }

    let code = event.code.as_str();
    let from_code = (code.starts_with("Key") || code.starts_with("Digit"))
        .then(|| key_for_code(code))
        .flatten()
        .or_else(|| {
            (code.starts_with("Arrow") || is_function_key(code)).then(|| code.to_string())
        });
    let key = from_code.unwrap_or_else(|| event.key_name());

    RecordOutcome::Captured(Shortcut::new(event.modifiers, &key).format_for(platform))
}

fn is_function_key(code: &str) -> bool {
    code.strip_prefix('F')
        .and_then(|n| n.parse::<u8>().ok())
        .is_some_and(|n| (1..=12).contains(&n))
}
