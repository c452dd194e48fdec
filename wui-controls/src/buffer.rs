//! Line-oriented text storage with a cursor and a selection.
//!
//! [TextBuffer] knows nothing about drawing or events. Positions are
//! `(row, col)` pairs counted in characters; every position the buffer hands
//! out is valid for its current lines.

use std::cmp::Ordering;

use wui_core::utf8;

/// A character position inside a [TextBuffer].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextPosition {
    /// Line index.
    pub row: usize,
    /// Character index inside the line. Equal to the line length at its end.
    pub col: usize,
}

impl TextPosition {
    /// Create a new position.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Selection between two positions.
///
/// `start` is where the selection was anchored and `end` follows the cursor, so
/// `end` may come before `start`. The selection is empty when both are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    /// The anchored end.
    pub start: TextPosition,
    /// The end that moves with the cursor.
    pub end: TextPosition,
}

impl Selection {
    /// An empty selection at `position`.
    pub const fn collapsed(position: TextPosition) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The two ends in document order.
    pub fn ordered(&self) -> (TextPosition, TextPosition) {
        match self.start.cmp(&self.end) {
            Ordering::Greater => (self.end, self.start),
            _ => (self.start, self.end),
        }
    }

    /// Whether `position` lies inside the selection, end excluded.
    pub fn contains(&self, position: TextPosition) -> bool {
        let (first, last) = self.ordered();
        first <= position && position < last
    }
}

/// Editable text made of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    cursor: TextPosition,
    selection: Selection,
    multiline: bool,
}

impl TextBuffer {
    /// Create an empty buffer.
    pub fn new(multiline: bool) -> Self {
        Self {
            lines: vec![String::new()],
            cursor: TextPosition::default(),
            selection: Selection::default(),
            multiline,
        }
    }

    /// Create a buffer holding `text`.
    pub fn with_text(text: &str, multiline: bool) -> Self {
        let mut buffer = Self::new(multiline);
        buffer.set_text(text);
        buffer
    }

    /// Whether line breaks are kept.
    pub fn multiline(&self) -> bool {
        self.multiline
    }

    /// Switch between single- and multi-line storage.
    ///
    /// Going single-line joins all lines with spaces.
    pub fn set_multiline(&mut self, multiline: bool) {
        self.multiline = multiline;
        if !multiline && self.lines.len() > 1 {
            let joined = self.lines.join(" ");
            self.lines = vec![joined];
            self.cursor = TextPosition::default();
            self.selection = Selection::default();
        }
    }

    /// Replace the whole content. Cursor and selection go to the start.
    pub fn set_text(&mut self, text: &str) {
        let lines = utf8::split_lines(text);
        self.lines = if self.multiline {
            lines
        } else {
            vec![lines.join(" ")]
        };
        self.cursor = TextPosition::default();
        self.selection = Selection::default();
    }

    /// The content with lines joined by `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// The lines. Never empty.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// One line, if `row` exists.
    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Length of line `row` in characters, 0 if it doesn't exist.
    pub fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |line| utf8::char_len(line))
    }

    /// Characters in the buffer, line breaks included.
    pub fn char_count(&self) -> usize {
        self.lines.iter().map(|line| utf8::char_len(line)).sum::<usize>() + self.lines.len() - 1
    }

    /// Whether the buffer holds no text at all.
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// The cursor.
    pub fn cursor(&self) -> TextPosition {
        self.cursor
    }

    /// The selection.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Whether some text is selected.
    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// The last valid position.
    pub fn end_position(&self) -> TextPosition {
        let row = self.lines.len() - 1;
        TextPosition::new(row, self.line_len(row))
    }

    /// Nearest valid position to `position`.
    pub fn clamp(&self, position: TextPosition) -> TextPosition {
        let row = position.row.min(self.lines.len() - 1);
        TextPosition::new(row, position.col.min(self.line_len(row)))
    }

    /// Move the cursor to `position`.
    ///
    /// With `extend` the selection grows from its anchor to the new cursor;
    /// otherwise it collapses at the cursor.
    pub fn move_to(&mut self, position: TextPosition, extend: bool) {
        let position = self.clamp(position);
        if extend {
            if self.selection.is_empty() {
                self.selection.start = self.cursor;
            }
            self.selection.end = position;
        } else {
            self.selection = Selection::collapsed(position);
        }
        self.cursor = position;
    }

    /// Move the cursor and drop the selection.
    pub fn set_cursor(&mut self, position: TextPosition) {
        self.move_to(position, false);
    }

    /// Anchor a new, empty selection at `position` and put the cursor there.
    pub fn start_selection(&mut self, position: TextPosition) {
        self.set_cursor(position);
    }

    /// Move the moving end of the selection to `position`, keeping the anchor.
    pub fn extend_selection(&mut self, position: TextPosition) {
        let position = self.clamp(position);
        self.selection.end = position;
        self.cursor = position;
    }

    /// Collapse the selection at the cursor.
    pub fn clear_selection(&mut self) {
        self.selection = Selection::collapsed(self.cursor);
    }

    /// Select everything. The cursor ends after the last character.
    pub fn select_all(&mut self) {
        let end = self.end_position();
        self.selection = Selection {
            start: TextPosition::default(),
            end,
        };
        self.cursor = end;
    }

    /// Select the run of non-whitespace characters around `position`.
    pub fn select_word(&mut self, position: TextPosition) {
        let position = self.clamp(position);
        let chars: Vec<char> = self.lines[position.row].chars().collect();

        let mut start = position.col;
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        let mut end = position.col;
        while end < chars.len() && !chars[end].is_whitespace() {
            end += 1;
        }

        self.selection = Selection {
            start: TextPosition::new(position.row, start),
            end: TextPosition::new(position.row, end),
        };
        self.cursor = self.selection.end;
    }

    /// Number of characters selected, line breaks included.
    pub fn selected_len(&self) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        let (first, last) = self.selection.ordered();
        if first.row == last.row {
            return last.col - first.col;
        }
        let mut len = self.line_len(first.row) - first.col + 1;
        for row in first.row + 1..last.row {
            len += self.line_len(row) + 1;
        }
        len + last.col
    }

    /// The selected text with `\n` between lines.
    pub fn selected_text(&self) -> String {
        if self.selection.is_empty() {
            return String::new();
        }
        let (first, last) = self.selection.ordered();
        if first.row == last.row {
            return utf8::slice_chars(&self.lines[first.row], first.col, last.col).to_string();
        }

        let mut text = String::new();
        let head = &self.lines[first.row];
        text.push_str(utf8::slice_chars(head, first.col, utf8::char_len(head)));
        for line in &self.lines[first.row + 1..last.row] {
            text.push('\n');
            text.push_str(line);
        }
        text.push('\n');
        text.push_str(utf8::slice_chars(&self.lines[last.row], 0, last.col));
        text
    }

    /// Delete the selected text and put the cursor where it started.
    ///
    /// Returns `false` when nothing was selected.
    pub fn clear_selected_text(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let (first, last) = self.selection.ordered();
        if first.row == last.row {
            utf8::remove_range(&mut self.lines[first.row], first.col, last.col);
        } else {
            let tail = {
                let line = &self.lines[last.row];
                utf8::slice_chars(line, last.col, utf8::char_len(line)).to_string()
            };
            let head = &mut self.lines[first.row];
            let len = utf8::char_len(head);
            utf8::remove_range(head, first.col, len);
            head.push_str(&tail);
            self.lines.drain(first.row + 1..=last.row);
        }
        self.set_cursor(first);
        true
    }

    /// Insert `text` at the cursor, replacing the selection.
    ///
    /// Line breaks split the current line in a multi-line buffer; a single-line
    /// buffer keeps only the first line of `text`. Returns the number of
    /// characters inserted, line breaks included.
    pub fn insert_str(&mut self, text: &str) -> usize {
        self.clear_selected_text();
        let mut pieces = utf8::split_lines(text);
        if !self.multiline {
            pieces.truncate(1);
        }

        let row = self.cursor.row;
        let col = self.cursor.col;
        let inserted = pieces.iter().map(|piece| utf8::char_len(piece)).sum::<usize>() + pieces.len() - 1;

        if pieces.len() == 1 {
            let added = utf8::insert_at(&mut self.lines[row], col, &pieces[0]);
            self.set_cursor(TextPosition::new(row, col + added));
            return inserted;
        }

        let line = &mut self.lines[row];
        let tail = utf8::slice_chars(line, col, utf8::char_len(line)).to_string();
        let len = utf8::char_len(line);
        utf8::remove_range(line, col, len);
        line.push_str(&pieces[0]);

        let count = pieces.len();
        let last_col = utf8::char_len(&pieces[count - 1]);
        let mut rest: Vec<String> = pieces.drain(1..).collect();
        if let Some(last) = rest.last_mut() {
            last.push_str(&tail);
        }
        let at = row + 1;
        self.lines.splice(at..at, rest);
        self.set_cursor(TextPosition::new(row + count - 1, last_col));
        inserted
    }

    /// Insert a single character.
    pub fn insert_char(&mut self, ch: char) -> usize {
        let mut buf = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut buf))
    }

    /// Break the current line at the cursor, replacing the selection.
    ///
    /// Does nothing in a single-line buffer.
    pub fn split_line(&mut self) -> bool {
        if !self.multiline {
            return false;
        }
        self.clear_selected_text();
        let TextPosition { row, col } = self.cursor;
        let line = &mut self.lines[row];
        let len = utf8::char_len(line);
        let tail = utf8::slice_chars(line, col, len).to_string();
        utf8::remove_range(line, col, len);
        self.lines.insert(row + 1, tail);
        self.set_cursor(TextPosition::new(row + 1, 0));
        true
    }

    /// Delete the selection or the character before the cursor.
    ///
    /// At the start of a line the line is joined to the previous one.
    pub fn backspace(&mut self) -> bool {
        if self.clear_selected_text() {
            return true;
        }
        let TextPosition { row, col } = self.cursor;
        if col > 0 {
            utf8::remove_char_at(&mut self.lines[row], col - 1);
            self.set_cursor(TextPosition::new(row, col - 1));
            true
        } else if row > 0 {
            let line = self.lines.remove(row);
            let joined_at = utf8::char_len(&self.lines[row - 1]);
            self.lines[row - 1].push_str(&line);
            self.set_cursor(TextPosition::new(row - 1, joined_at));
            true
        } else {
            false
        }
    }

    /// Delete the selection or the character after the cursor.
    ///
    /// At the end of a line the next line is joined to it.
    pub fn delete(&mut self) -> bool {
        if self.clear_selected_text() {
            return true;
        }
        let TextPosition { row, col } = self.cursor;
        if col < self.line_len(row) {
            utf8::remove_char_at(&mut self.lines[row], col);
            self.clear_selection();
            true
        } else if row + 1 < self.lines.len() {
            let next = self.lines.remove(row + 1);
            self.lines[row].push_str(&next);
            self.clear_selection();
            true
        } else {
            false
        }
    }

    /// One character left, wrapping to the end of the previous line.
    pub fn move_left(&mut self, extend: bool) {
        let TextPosition { row, col } = self.cursor;
        let target = if col > 0 {
            TextPosition::new(row, col - 1)
        } else if row > 0 {
            TextPosition::new(row - 1, self.line_len(row - 1))
        } else {
            self.cursor
        };
        self.move_to(target, extend);
    }

    /// One character right, wrapping to the start of the next line.
    pub fn move_right(&mut self, extend: bool) {
        let TextPosition { row, col } = self.cursor;
        let target = if col < self.line_len(row) {
            TextPosition::new(row, col + 1)
        } else if row + 1 < self.lines.len() {
            TextPosition::new(row + 1, 0)
        } else {
            self.cursor
        };
        self.move_to(target, extend);
    }

    /// One line up, keeping the column where the line is long enough.
    pub fn move_up(&mut self, extend: bool) {
        self.move_rows_up(1, extend);
    }

    /// One line down, keeping the column where the line is long enough.
    pub fn move_down(&mut self, extend: bool) {
        self.move_rows_down(1, extend);
    }

    /// `rows` lines up, stopping at the first line.
    pub fn move_rows_up(&mut self, rows: usize, extend: bool) {
        let target = TextPosition::new(self.cursor.row.saturating_sub(rows), self.cursor.col);
        self.move_to(target, extend);
    }

    /// `rows` lines down, stopping at the last line.
    pub fn move_rows_down(&mut self, rows: usize, extend: bool) {
        let target = TextPosition::new(self.cursor.row.saturating_add(rows), self.cursor.col);
        self.move_to(target, extend);
    }

    /// Start of the current line.
    pub fn move_home(&mut self, extend: bool) {
        self.move_to(TextPosition::new(self.cursor.row, 0), extend);
    }

    /// End of the current line.
    pub fn move_end(&mut self, extend: bool) {
        let row = self.cursor.row;
        self.move_to(TextPosition::new(row, self.line_len(row)), extend);
    }

    /// Start of the text.
    pub fn move_text_start(&mut self, extend: bool) {
        self.move_to(TextPosition::default(), extend);
    }

    /// End of the text.
    pub fn move_text_end(&mut self, extend: bool) {
        self.move_to(self.end_position(), extend);
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new(true)
    }
}
