//! UTF-8 safe single-line text input state with cursor management.
//!
//! Used by the file browser's path field. Editing primitives keep the cursor
//! on a character boundary; column helpers map between byte offsets and
//! terminal cells so mouse clicks land where the user expects.

use unicode_width::UnicodeWidthChar;

#[derive(Clone, Debug, Default)]
pub struct TextInputState {
    /// The underlying text buffer
    input: String,
    /// Cursor byte index into `input` (always on a UTF-8 boundary)
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.input.trim().is_empty()
    }

    pub fn set_input<S: Into<String>>(&mut self, s: S) {
        self.input = s.into();
        self.cursor = self.input.len();
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        let mut cursor = cursor.min(self.input.len());
        while !self.input.is_char_boundary(cursor) {
            cursor -= 1;
        }
        self.cursor = cursor;
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    /// Move cursor one Unicode scalar to the left.
    pub fn move_left(&mut self) {
        if let Some(prev) = self.input[..self.cursor].chars().last() {
            self.cursor -= prev.len_utf8();
        }
    }

    /// Move cursor one Unicode scalar to the right.
    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    /// Insert a char at the cursor.
    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert a string at the cursor, dropping line breaks.
    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars().filter(|c| *c != '\n' && *c != '\r') {
            self.insert_char(c);
        }
    }

    /// Backspace the char immediately before the cursor.
    pub fn backspace(&mut self) {
        let Some(prev) = self.input[..self.cursor].chars().last() else {
            return;
        };
        let start = self.cursor - prev.len_utf8();
        self.input.drain(start..self.cursor);
        self.cursor = start;
    }

    /// Delete the char under the cursor.
    pub fn delete(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            let end = self.cursor + next.len_utf8();
            self.input.drain(self.cursor..end);
        }
    }

    /// Terminal cells occupied by the text before the cursor.
    pub fn cursor_columns(&self) -> usize {
        self.input[..self.cursor].chars().map(|c| c.width().unwrap_or(0)).sum()
    }

    /// Byte index of the character rendered at `column`, clamped to the end of input.
    pub fn cursor_index_for_column(&self, column: u16) -> usize {
        let target = column as usize;
        let mut columns = 0;
        for (index, c) in self.input.char_indices() {
            let width = c.width().unwrap_or(0);
            if columns + width > target {
                return index;
            }
            columns += width;
        }
        self.input.len()
    }
}
