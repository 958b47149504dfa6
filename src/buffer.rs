use anyhow::Result;
use std::fs;
use std::path::Path;

/// Minimum gap allocated when the buffer grows.
const MIN_GAP: usize = 64;

/// A gap buffer over plain bytes (the editor is ASCII-only by design).
///
/// Storage is one contiguous `Vec<u8>` split into three regions:
/// `head = data[..gap_start]`, `gap = data[gap_start..gap_end]`,
/// `tail = data[gap_end..]`. The cursor sits at the head/gap boundary, so
/// `gap_start` doubles as the cursor's logical offset. Local edits are O(1);
/// relocating the cursor copies one byte per step across the gap.
#[derive(Debug, Clone)]
pub struct GapBuffer {
    data: Vec<u8>,
    gap_start: usize,
    gap_end: usize,
}

impl GapBuffer {
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Build a buffer from initial text with the gap (and cursor) at the end.
    pub fn from_text(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut data = Vec::with_capacity(bytes.len() + MIN_GAP);
        data.extend_from_slice(bytes);
        data.resize(bytes.len() + MIN_GAP, 0);
        Self {
            gap_start: bytes.len(),
            gap_end: data.len(),
            data,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        if content.contains('\0') {
            return Err(anyhow::anyhow!("Cannot open binary file"));
        }
        Ok(Self::from_text(&content))
    }

    // ========== Accessors ==========

    /// Logical text length (capacity minus the unused gap).
    pub fn len(&self) -> usize {
        self.data.len() - (self.gap_end - self.gap_start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total storage size, gap included.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Current gap size in bytes.
    pub fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Cursor position as a logical offset in `[0, len()]`.
    pub fn cursor(&self) -> usize {
        self.gap_start
    }

    /// Byte at a logical offset, mapped around the gap.
    pub fn get(&self, offset: usize) -> Option<u8> {
        if offset >= self.len() {
            return None;
        }
        Some(self.byte(offset))
    }

    fn byte(&self, offset: usize) -> u8 {
        if offset < self.gap_start {
            self.data[offset]
        } else {
            self.data[offset + self.gap_len()]
        }
    }

    /// Materialize a logical range as a string. Out-of-range parts are
    /// clamped away rather than erroring.
    pub fn substring(&self, offset: usize, len: usize) -> String {
        let start = offset.min(self.len());
        let end = offset.saturating_add(len).min(self.len());
        let mut s = String::with_capacity(end - start);
        for i in start..end {
            s.push(self.byte(i) as char);
        }
        s
    }

    /// The whole logical text.
    pub fn text(&self) -> String {
        self.substring(0, self.len())
    }

    // ========== Mutation ==========

    /// Insert one byte at the cursor, growing the gap when it is exhausted.
    pub fn insert(&mut self, c: u8) {
        if self.gap_start == self.gap_end {
            self.grow();
        }
        self.data[self.gap_start] = c;
        self.gap_start += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        for &b in text.as_bytes() {
            self.insert(b);
        }
    }

    /// Remove the byte before the cursor.
    /// Returns `(was_newline, removed)`; a no-op at buffer start.
    pub fn backspace(&mut self) -> (bool, bool) {
        if self.gap_start == 0 {
            return (false, false);
        }
        self.gap_start -= 1;
        (self.data[self.gap_start] == b'\n', true)
    }

    /// Remove the byte after the cursor.
    /// Returns `(was_newline, removed)`; a no-op at buffer end.
    pub fn delete_forward(&mut self) -> (bool, bool) {
        if self.gap_end == self.data.len() {
            return (false, false);
        }
        let c = self.data[self.gap_end];
        self.gap_end += 1;
        (c == b'\n', true)
    }

    /// Step the cursor one byte left or right by copying a byte across the
    /// gap. This is the only physical relocation primitive.
    pub fn move_cursor_by(&mut self, right: bool) -> bool {
        if right {
            if self.gap_end == self.data.len() {
                return false;
            }
            self.data[self.gap_start] = self.data[self.gap_end];
            self.gap_start += 1;
            self.gap_end += 1;
        } else {
            if self.gap_start == 0 {
                return false;
            }
            self.gap_start -= 1;
            self.gap_end -= 1;
            self.data[self.gap_end] = self.data[self.gap_start];
        }
        true
    }

    /// Relocate the cursor to a logical offset (clamped), one step at a
    /// time. O(distance).
    pub fn move_cursor_to(&mut self, offset: usize) {
        let target = offset.min(self.len());
        while self.gap_start < target {
            self.move_cursor_by(true);
        }
        while self.gap_start > target {
            self.move_cursor_by(false);
        }
    }

    /// Grow the gap geometrically: the new gap scales with the text size so
    /// reallocation cost stays amortized O(1) per insert.
    fn grow(&mut self) {
        let added = self.len().max(MIN_GAP);
        let mut data = Vec::with_capacity(self.data.len() + added);
        data.extend_from_slice(&self.data[..self.gap_start]);
        data.resize(self.gap_start + added, 0);
        data.extend_from_slice(&self.data[self.gap_end..]);
        self.gap_end = self.gap_start + added;
        self.data = data;
    }

    // ========== Scans ==========

    /// Offset of the first byte of the line containing `offset` (scans
    /// backward for the nearest newline; no line index is kept).
    pub fn find_line_start(&self, offset: usize) -> usize {
        let mut i = offset.min(self.len());
        while i > 0 && self.byte(i - 1) != b'\n' {
            i -= 1;
        }
        i
    }

    /// Offset of the newline ending the line containing `offset`, or the
    /// buffer end when the last line is unterminated.
    pub fn find_line_end(&self, offset: usize) -> usize {
        let mut i = offset.min(self.len());
        while i < self.len() && self.byte(i) != b'\n' {
            i += 1;
        }
        i
    }

    fn is_word_byte(c: u8) -> bool {
        c.is_ascii_alphanumeric() || c == b'_'
    }

    /// Next word boundary at or after `offset`: classify the byte under the
    /// cursor as word (alphanumeric or `_`) vs other, then scan forward
    /// while the class holds. Ctrl+Right semantics.
    pub fn find_next_word(&self, offset: usize) -> usize {
        let mut i = offset;
        if i >= self.len() {
            return self.len();
        }
        let in_word = Self::is_word_byte(self.byte(i));
        while i < self.len() && Self::is_word_byte(self.byte(i)) == in_word {
            i += 1;
        }
        i
    }

    /// Previous word boundary before `offset`. Ctrl+Left semantics.
    pub fn find_prev_word(&self, offset: usize) -> usize {
        let mut i = offset.min(self.len());
        if i == 0 {
            return 0;
        }
        let in_word = Self::is_word_byte(self.byte(i - 1));
        while i > 0 && Self::is_word_byte(self.byte(i - 1)) == in_word {
            i -= 1;
        }
        i
    }

    /// First occurrence of `needle` at or after `start`, by logical byte
    /// comparison. `None` when absent or when the remaining text cannot
    /// contain the needle.
    pub fn search(&self, start: usize, needle: &str) -> Option<usize> {
        let n = needle.len();
        if n == 0 || start + n > self.len() {
            return None;
        }
        let needle = needle.as_bytes();
        'outer: for i in start..=self.len() - n {
            for (j, &b) in needle.iter().enumerate() {
                if self.byte(i + j) != b {
                    continue 'outer;
                }
            }
            return Some(i);
        }
        None
    }
}

impl Default for GapBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays an edit script against both the gap buffer and a naive
    /// Vec<u8> model, checking the storage invariants after every step.
    fn check_against_model(script: &[(&str, u8)]) {
        let mut buf = GapBuffer::new();
        let mut model: Vec<u8> = Vec::new();
        let mut cur = 0usize;

        for &(op, arg) in script {
            match op {
                "insert" => {
                    buf.insert(arg);
                    model.insert(cur, arg);
                    cur += 1;
                }
                "backspace" => {
                    let (_, removed) = buf.backspace();
                    if removed {
                        cur -= 1;
                        model.remove(cur);
                    }
                }
                "delete" => {
                    let (_, removed) = buf.delete_forward();
                    if removed {
                        model.remove(cur);
                    }
                }
                "left" => {
                    if buf.move_cursor_by(false) {
                        cur -= 1;
                    }
                }
                "right" => {
                    if buf.move_cursor_by(true) {
                        cur += 1;
                    }
                }
                _ => unreachable!(),
            }

            // Storage accounting holds after every operation
            assert_eq!(buf.len() + buf.gap_len(), buf.capacity());
            assert_eq!(buf.len(), model.len());
            assert_eq!(buf.cursor(), cur);
            assert_eq!(
                buf.substring(0, buf.len()),
                String::from_utf8(model.clone()).unwrap()
            );
        }
    }

    #[test]
    fn edit_script_matches_naive_model() {
        check_against_model(&[
            ("insert", b'h'),
            ("insert", b'i'),
            ("insert", b'\n'),
            ("insert", b'x'),
            ("left", 0),
            ("left", 0),
            ("insert", b'!'),
            ("backspace", 0),
            ("right", 0),
            ("delete", 0),
            ("insert", b'y'),
        ]);
    }

    #[test]
    fn growth_preserves_text_and_cursor() {
        let mut buf = GapBuffer::from_text("abc");
        buf.move_cursor_to(1);
        // far more than the initial gap
        for _ in 0..500 {
            buf.insert(b'z');
        }
        assert_eq!(buf.len(), 503);
        assert_eq!(buf.cursor(), 501);
        assert!(buf.text().starts_with('a'));
        assert!(buf.text().ends_with("bc"));
        assert_eq!(buf.len() + buf.gap_len(), buf.capacity());
    }

    #[test]
    fn cursor_moves_are_clamped() {
        let mut buf = GapBuffer::from_text("hello");
        buf.move_cursor_to(999);
        assert_eq!(buf.cursor(), 5);
        buf.move_cursor_to(0);
        assert_eq!(buf.cursor(), 0);
        assert!(!buf.move_cursor_by(false));
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn backspace_and_delete_report_newlines() {
        let mut buf = GapBuffer::from_text("a\nb");
        assert_eq!(buf.backspace(), (false, true)); // removes 'b'
        assert_eq!(buf.backspace(), (true, true)); // removes '\n'
        assert_eq!(buf.backspace(), (false, true)); // removes 'a'
        assert_eq!(buf.backspace(), (false, false)); // empty

        let mut buf = GapBuffer::from_text("\nx");
        buf.move_cursor_to(0);
        assert_eq!(buf.delete_forward(), (true, true));
        assert_eq!(buf.delete_forward(), (false, true));
        assert_eq!(buf.delete_forward(), (false, false));
    }

    #[test]
    fn line_scans() {
        let buf = GapBuffer::from_text("ab\ncd");
        assert_eq!(buf.find_line_start(5), 3);
        assert_eq!(buf.find_line_end(0), 2);
        assert_eq!(buf.find_line_start(1), 0);
        assert_eq!(buf.find_line_end(3), 5);
    }

    #[test]
    fn line_scans_see_through_the_gap() {
        // Park the cursor mid-line so the gap splits the text physically
        let mut buf = GapBuffer::from_text("ab\ncd");
        buf.move_cursor_to(4);
        assert_eq!(buf.find_line_start(5), 3);
        assert_eq!(buf.find_line_end(0), 2);
    }

    #[test]
    fn word_boundaries() {
        let buf = GapBuffer::from_text("foo_1 +bar");
        assert_eq!(buf.find_next_word(0), 5); // past foo_1
        assert_eq!(buf.find_next_word(5), 7); // past " +"
        assert_eq!(buf.find_prev_word(10), 7); // back to b
        assert_eq!(buf.find_prev_word(7), 5); // back over " +"
        assert_eq!(buf.find_prev_word(0), 0);
        assert_eq!(buf.find_next_word(10), 10);
    }

    #[test]
    fn search_finds_first_occurrence() {
        let buf = GapBuffer::from_text("foo(bar)");
        assert_eq!(buf.search(0, "bar"), Some(4));
        assert_eq!(buf.search(5, "bar"), None);
        assert_eq!(buf.search(0, "baz"), None);
        // a match ending exactly at the buffer end is still a match
        assert_eq!(buf.search(0, "ar)"), Some(5));
        assert_eq!(buf.search(0, ""), None);
    }

    #[test]
    fn search_is_logical_not_physical() {
        let mut buf = GapBuffer::from_text("abcdef");
        buf.move_cursor_to(3); // gap sits in the middle of the match
        assert_eq!(buf.search(0, "cde"), Some(2));
    }

    #[test]
    fn substring_clamps() {
        let buf = GapBuffer::from_text("abc");
        assert_eq!(buf.substring(1, 100), "bc");
        assert_eq!(buf.substring(100, 5), "");
    }
}
