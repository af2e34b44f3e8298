use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Single-line input buffer with a grapheme-aware cursor.
/// `cursor` is a byte offset that always sits on a grapheme boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    text: String,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        TextInput::default()
    }

    /// Buffer holding `text` with the cursor at the end
    pub fn with_text(text: &str) -> Self {
        TextInput {
            text: text.to_string(),
            cursor: text.len(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Cursor position in terminal cells
    pub fn cursor_col(&self) -> usize {
        UnicodeWidthStr::width(&self.text[..self.cursor])
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert pasted text. Line breaks become spaces.
    pub fn insert_str(&mut self, s: &str) {
        let clean: String = s
            .chars()
            .filter(|c| *c != '\r')
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        self.text.insert_str(self.cursor, &clean);
        self.cursor += clean.len();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.text.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.text.replace_range(self.cursor..next, "");
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Delete from the start of the previous word to the cursor
    pub fn delete_word_back(&mut self) {
        let graphemes: Vec<(usize, &str)> = self.text[..self.cursor].grapheme_indices(true).collect();
        let is_space = |g: &str| g.chars().all(char::is_whitespace);
        let mut idx = graphemes.len();
        while idx > 0 && is_space(graphemes[idx - 1].1) {
            idx -= 1;
        }
        while idx > 0 && !is_space(graphemes[idx - 1].1) {
            idx -= 1;
        }
        let start = graphemes.get(idx).map_or(self.cursor, |(i, _)| *i);
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    /// Delete everything before the cursor
    pub fn delete_to_start(&mut self) {
        self.text.replace_range(..self.cursor, "");
        self.cursor = 0;
    }

    fn next_boundary(&self) -> Option<usize> {
        let rest = &self.text[self.cursor..];
        let g = rest.graphemes(true).next()?;
        Some(self.cursor + g.len())
    }

    fn prev_boundary(&self) -> Option<usize> {
        let g = self.text[..self.cursor].graphemes(true).next_back()?;
        Some(self.cursor - g.len())
    }
}
