//! Single-line input field for the prompt and feedback boxes.
//!
//! A lightweight editing buffer with a grapheme-aware cursor. It supports
//! the subset of operations the two text boxes need; multi-line editing is
//! intentionally out.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Editable single-line text field with a byte-offset cursor.
///
/// The cursor always sits on a grapheme boundary.
#[derive(Debug, Clone, Default)]
pub struct InputField {
    text: String,
    cursor: usize,
}

impl InputField {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Returns the trimmed contents and clears the field.
    pub fn take(&mut self) -> String {
        let text = self.text.trim().to_string();
        self.clear();
        text
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Display width of the text left of the cursor, for cursor placement.
    pub fn cursor_column(&self) -> u16 {
        self.text[..self.cursor].width() as u16
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.cursor]
            .grapheme_indices(true)
            .last()
            .map(|(idx, _)| idx)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.text[self.cursor..]
            .graphemes(true)
            .next()
            .map(|g| self.cursor + g.len())
    }

    fn insert_char(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    fn delete_prev(&mut self) {
        if let Some(start) = self.prev_boundary() {
            self.text.replace_range(start..self.cursor, "");
            self.cursor = start;
        }
    }

    fn delete_next(&mut self) {
        if let Some(end) = self.next_boundary() {
            self.text.replace_range(self.cursor..end, "");
        }
    }

    /// Applies a key press to the field. Returns true when the key was
    /// consumed (so callers can fall through for unhandled keys).
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Char('a') if ctrl => {
                self.cursor = 0;
                true
            }
            KeyCode::Char('e') if ctrl => {
                self.cursor = self.text.len();
                true
            }
            KeyCode::Char('u') if ctrl => {
                self.text.replace_range(..self.cursor, "");
                self.cursor = 0;
                true
            }
            KeyCode::Char('k') if ctrl => {
                self.text.truncate(self.cursor);
                true
            }
            KeyCode::Char(ch) if !ctrl && !alt => {
                self.insert_char(ch);
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.text.len();
                true
            }
            KeyCode::Backspace => {
                self.delete_prev();
                true
            }
            KeyCode::Delete => {
                self.delete_next();
                true
            }
            KeyCode::Left => {
                if let Some(start) = self.prev_boundary() {
                    self.cursor = start;
                }
                true
            }
            KeyCode::Right => {
                if let Some(end) = self.next_boundary() {
                    self.cursor = end;
                }
                true
            }
            _ => false,
        }
    }
}
