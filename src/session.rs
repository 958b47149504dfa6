use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::buffer::GapBuffer;
use crate::clipboard::Clipboard;
use crate::files::FileExplorer;
use crate::lexer::{self, Token};

const MIN_FONT_HEIGHT: u16 = 8;
const MAX_FONT_HEIGHT: u16 = 72;

/// Interaction mode. Exactly one is active; each variant carries its own
/// mode-local data so shared handlers never branch on stray flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Edit,
    Search {
        query: String,
        /// Offset of the previous hit, used to advance past it on repeat.
        last_match: Option<usize>,
    },
    Browse,
    NameFile {
        name: String,
    },
}

/// One discrete editor command, the unit of dispatch per input tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Insert(char),
    Backspace,
    DeleteForward,
    Newline,
    Tab,
    Left { word: bool, select: bool },
    Right { word: bool, select: bool },
    Up { select: bool },
    Down { select: bool },
    EnterSearch,
    FindNext,
    Escape,
    Copy,
    Cut,
    Paste,
    Save,
    OpenBrowser,
    NewFile,
    ZoomIn,
    ZoomOut,
    Quit,
}

/// The editing state machine: owns the buffer, the token cache, selection
/// and navigation state, and dispatches commands. Every dispatch ends with
/// a whole-buffer re-tokenization, so the token cache is never stale
/// relative to the text it indexes into.
pub struct EditSession {
    pub buffer: GapBuffer,
    pub tokens: Vec<Token>,
    pub mode: Mode,
    /// Fixed endpoint of the selection; the cursor is the moving one.
    pub selection_anchor: Option<usize>,
    /// Target column remembered across consecutive up/down motions.
    column_memory: Option<usize>,
    /// View-only zoom factor; no effect on editing semantics.
    pub font_height: u16,
    pub explorer: FileExplorer,
    pub clipboard: Clipboard,
    pub file_path: Option<PathBuf>,
    pub modified: bool,
    pub status: String,
    pub should_quit: bool,
    /// First buffer line shown by the editor view.
    pub scroll: usize,
    tab_width: usize,
}

impl EditSession {
    pub fn new(root: &Path, file: Option<&Path>, tab_width: usize) -> Result<Self> {
        let explorer = FileExplorer::new(root)?;
        let mut session = Self {
            buffer: GapBuffer::new(),
            tokens: Vec::new(),
            mode: Mode::Edit,
            selection_anchor: None,
            column_memory: None,
            font_height: 16,
            explorer,
            clipboard: Clipboard::new(),
            file_path: None,
            modified: false,
            status: String::new(),
            should_quit: false,
            scroll: 0,
            tab_width,
        };
        if let Some(path) = file {
            session.open_file(path);
        }
        session.retokenize();
        Ok(session)
    }

    // ========== Views ==========

    /// Active selection as `[start, end)`, or `None`.
    pub fn selection_range(&self) -> Option<(usize, usize)> {
        let anchor = self.selection_anchor?;
        let cursor = self.buffer.cursor();
        Some((anchor.min(cursor), anchor.max(cursor)))
    }

    pub fn filename(&self) -> String {
        self.file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| String::from("[untitled]"))
    }

    /// Adjust the scroll so the cursor line falls inside a viewport of
    /// `visible_height` lines.
    pub fn ensure_cursor_visible(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        let (line, _) = self.cursor_line_col();
        if line < self.scroll {
            self.scroll = line;
        } else if line >= self.scroll + visible_height {
            self.scroll = line - visible_height + 1;
        }
    }

    /// Cursor as (line, column), derived by scanning; no line index exists.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let cursor = self.buffer.cursor();
        let mut line = 0;
        for i in 0..cursor {
            if self.buffer.get(i) == Some(b'\n') {
                line += 1;
            }
        }
        (line, cursor - self.buffer.find_line_start(cursor))
    }

    // ========== Dispatch ==========

    pub fn dispatch(&mut self, cmd: Command) {
        // Any command other than a vertical motion ends the up/down run
        if !matches!(cmd, Command::Up { .. } | Command::Down { .. }) {
            self.column_memory = None;
        }

        match &self.mode {
            Mode::Edit => self.dispatch_edit(cmd),
            Mode::Search { .. } => self.dispatch_search(cmd),
            Mode::Browse => self.dispatch_browse(cmd),
            Mode::NameFile { .. } => self.dispatch_name_file(cmd),
        }

        // A stale token's offset may index into text that no longer exists,
        // so the cache is rebuilt from scratch after every command.
        self.retokenize();
    }

    fn retokenize(&mut self) {
        self.tokens = lexer::tokenize(&self.buffer);
    }

    // ========== Edit mode ==========

    fn dispatch_edit(&mut self, cmd: Command) {
        match cmd {
            Command::Insert(c) => self.insert_char(c),
            Command::Newline => self.insert_char('\n'),
            Command::Tab => {
                for _ in 0..self.tab_width {
                    self.insert_char(' ');
                }
            }
            Command::Backspace => {
                if !self.delete_selection() {
                    let (_, removed) = self.buffer.backspace();
                    self.modified |= removed;
                }
            }
            Command::DeleteForward => {
                if !self.delete_selection() {
                    let (_, removed) = self.buffer.delete_forward();
                    self.modified |= removed;
                }
            }
            Command::Left { word, select } => {
                self.update_anchor(select);
                if word {
                    let target = self.buffer.find_prev_word(self.buffer.cursor());
                    self.buffer.move_cursor_to(target);
                } else {
                    self.buffer.move_cursor_by(false);
                }
            }
            Command::Right { word, select } => {
                self.update_anchor(select);
                if word {
                    let target = self.buffer.find_next_word(self.buffer.cursor());
                    self.buffer.move_cursor_to(target);
                } else {
                    self.buffer.move_cursor_by(true);
                }
            }
            Command::Up { select } => {
                self.update_anchor(select);
                self.move_vertical(false);
            }
            Command::Down { select } => {
                self.update_anchor(select);
                self.move_vertical(true);
            }
            Command::EnterSearch => {
                self.mode = Mode::Search {
                    query: String::new(),
                    last_match: None,
                };
            }
            Command::Escape => self.selection_anchor = None,
            Command::Copy => self.copy_selection(),
            Command::Cut => {
                self.copy_selection();
                self.delete_selection();
            }
            Command::Paste => self.paste(),
            Command::Save => self.save(),
            Command::OpenBrowser => {
                if let Err(e) = self.explorer.refresh() {
                    self.status = format!("Browse failed: {e}");
                } else {
                    self.mode = Mode::Browse;
                }
            }
            Command::ZoomIn => {
                self.font_height = (self.font_height + 2).min(MAX_FONT_HEIGHT);
            }
            Command::ZoomOut => {
                self.font_height = self.font_height.saturating_sub(2).max(MIN_FONT_HEIGHT);
            }
            Command::Quit => self.should_quit = true,
            Command::FindNext | Command::NewFile => {}
        }
    }

    fn insert_char(&mut self, c: char) {
        if !c.is_ascii() || (c.is_ascii_control() && c != '\n') {
            return;
        }
        self.delete_selection();
        self.buffer.insert(c as u8);
        self.modified = true;
    }

    fn update_anchor(&mut self, select: bool) {
        if select {
            if self.selection_anchor.is_none() {
                self.selection_anchor = Some(self.buffer.cursor());
            }
        } else {
            self.selection_anchor = None;
        }
    }

    /// Delete the selected range by stepping the cursor toward the anchor,
    /// removing one character per step. Returns whether anything was
    /// deleted; always clears the anchor.
    fn delete_selection(&mut self) -> bool {
        let Some(anchor) = self.selection_anchor.take() else {
            return false;
        };
        let cursor = self.buffer.cursor();
        if anchor == cursor {
            return false;
        }
        if cursor > anchor {
            while self.buffer.cursor() > anchor {
                self.buffer.backspace();
            }
        } else {
            for _ in 0..anchor - cursor {
                self.buffer.delete_forward();
            }
        }
        self.modified = true;
        true
    }

    fn copy_selection(&mut self) {
        if let Some((start, end)) = self.selection_range() {
            let text = self.buffer.substring(start, end - start);
            self.clipboard.copy(&text);
            self.status = format!("Copied {} bytes", end - start);
        }
    }

    fn paste(&mut self) {
        let text = self.clipboard.paste();
        if text.is_empty() {
            return;
        }
        self.delete_selection();
        for c in text.chars().filter(|c| c.is_ascii() && (!c.is_ascii_control() || *c == '\n')) {
            self.buffer.insert(c as u8);
        }
        self.modified = true;
    }

    /// One line up or down, preserving the intended column across lines of
    /// different length via `column_memory`.
    fn move_vertical(&mut self, down: bool) {
        let cursor = self.buffer.cursor();
        let line_start = self.buffer.find_line_start(cursor);
        let col = cursor - line_start;
        let target_col = self.column_memory.map_or(col, |m| m.max(col));
        self.column_memory = Some(target_col);

        if down {
            let line_end = self.buffer.find_line_end(cursor);
            if line_end >= self.buffer.len() {
                // already on the last line
                self.buffer.move_cursor_to(self.buffer.len());
                return;
            }
            let next_start = line_end + 1;
            let next_len = self.buffer.find_line_end(next_start) - next_start;
            self.buffer.move_cursor_to(next_start + target_col.min(next_len));
        } else {
            if line_start == 0 {
                // already on the first line
                self.buffer.move_cursor_to(0);
                return;
            }
            let prev_start = self.buffer.find_line_start(line_start - 1);
            let prev_len = (line_start - 1) - prev_start;
            self.buffer.move_cursor_to(prev_start + target_col.min(prev_len));
        }
    }

    fn save(&mut self) {
        let Some(path) = self.file_path.clone() else {
            self.status = String::from("No file name (open with Ctrl+O)");
            return;
        };
        match fs::write(&path, self.buffer.text()) {
            Ok(()) => {
                self.modified = false;
                self.status = format!("Saved {}", path.display());
            }
            Err(e) => self.status = format!("Save failed: {e}"),
        }
    }

    // ========== Search mode ==========

    fn dispatch_search(&mut self, cmd: Command) {
        match cmd {
            Command::Insert(c) if c.is_ascii() && !c.is_ascii_control() => {
                if let Mode::Search { query, last_match } = &mut self.mode {
                    query.push(c);
                    *last_match = None;
                }
            }
            Command::Backspace => {
                if let Mode::Search { query, last_match } = &mut self.mode {
                    query.pop();
                    *last_match = None;
                }
            }
            Command::Newline | Command::FindNext => self.find_next(),
            Command::Escape => self.mode = Mode::Edit,
            Command::Save => self.save(),
            Command::Quit => self.should_quit = true,
            _ => {}
        }
    }

    /// Find-next without wrapping: start one past the previous hit when the
    /// cursor still sits exactly on it, otherwise start at the cursor.
    fn find_next(&mut self) {
        let cursor = self.buffer.cursor();
        let Mode::Search { query, last_match } = &mut self.mode else {
            return;
        };
        if query.is_empty() {
            return;
        }
        let start = match *last_match {
            Some(m) if m == cursor => m + 1,
            _ => cursor,
        };
        match self.buffer.search(start, query) {
            Some(hit) => {
                *last_match = Some(hit);
                self.status = String::new();
                self.buffer.move_cursor_to(hit);
            }
            None => self.status = format!("Not found: {query}"),
        }
    }

    // ========== Browse mode ==========

    fn dispatch_browse(&mut self, cmd: Command) {
        match cmd {
            Command::Up { .. } => self.explorer.move_up(),
            Command::Down { .. } => self.explorer.move_down(),
            Command::Newline => match self.explorer.enter() {
                Ok(Some(path)) => self.open_file(&path),
                Ok(None) => {}
                Err(e) => self.status = format!("Browse failed: {e}"),
            },
            Command::NewFile => {
                self.mode = Mode::NameFile {
                    name: String::new(),
                };
            }
            Command::Escape => self.mode = Mode::Edit,
            Command::Quit => self.should_quit = true,
            _ => {}
        }
    }

    /// Replace the buffer wholesale with a file's content. A failed open is
    /// logged and leaves the session unchanged.
    pub fn open_file(&mut self, path: &Path) {
        match GapBuffer::from_file(path) {
            Ok(buffer) => {
                self.buffer = buffer;
                self.file_path = Some(path.to_path_buf());
                self.modified = false;
                self.selection_anchor = None;
                self.column_memory = None;
                self.scroll = 0;
                self.mode = Mode::Edit;
                self.status = format!("Opened {}", path.display());
                self.retokenize();
            }
            Err(e) => self.status = format!("Open failed: {e}"),
        }
    }

    // ========== New-file naming mode ==========

    fn dispatch_name_file(&mut self, cmd: Command) {
        match cmd {
            Command::Insert(c) if c.is_ascii() && !c.is_ascii_control() => {
                if let Mode::NameFile { name } = &mut self.mode {
                    name.push(c);
                }
            }
            Command::Backspace => {
                if let Mode::NameFile { name } = &mut self.mode {
                    name.pop();
                }
            }
            Command::Newline => {
                let Mode::NameFile { name } = &self.mode else {
                    return;
                };
                let name = name.clone();
                match self.explorer.create_file(&name) {
                    Ok(path) => self.open_file(&path),
                    Err(e) => self.status = format!("Create failed: {e}"),
                }
            }
            Command::Escape => self.mode = Mode::Browse,
            Command::Quit => self.should_quit = true,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    fn session(text: &str) -> EditSession {
        let mut s = EditSession::new(&std::env::temp_dir(), None, 4).unwrap();
        s.buffer = GapBuffer::from_text(text);
        s.retokenize();
        s
    }

    #[test]
    fn selection_backspace_removes_whole_range() {
        let mut s = session("abcdef");
        s.buffer.move_cursor_to(6);
        s.selection_anchor = Some(2);
        s.dispatch(Command::Backspace);
        assert_eq!(s.buffer.text(), "ab");
        assert_eq!(s.buffer.cursor(), 2);
        assert_eq!(s.selection_anchor, None);
    }

    #[test]
    fn selection_delete_forward_with_anchor_after_cursor() {
        let mut s = session("abcdef");
        s.buffer.move_cursor_to(1);
        s.selection_anchor = Some(4);
        s.dispatch(Command::DeleteForward);
        assert_eq!(s.buffer.text(), "aef");
        assert_eq!(s.buffer.cursor(), 1);
        assert_eq!(s.selection_anchor, None);
    }

    #[test]
    fn plain_navigation_clears_the_anchor() {
        let mut s = session("abc");
        s.dispatch(Command::Left { word: false, select: true });
        assert!(s.selection_anchor.is_some());
        s.dispatch(Command::Left { word: false, select: false });
        assert_eq!(s.selection_anchor, None);
    }

    #[test]
    fn shift_extends_from_a_fixed_anchor() {
        let mut s = session("abcdef");
        s.buffer.move_cursor_to(3);
        s.dispatch(Command::Right { word: false, select: true });
        s.dispatch(Command::Right { word: false, select: true });
        assert_eq!(s.selection_range(), Some((3, 5)));
    }

    #[test]
    fn word_jump_moves_to_boundaries() {
        let mut s = session("foo bar");
        s.buffer.move_cursor_to(0);
        s.dispatch(Command::Right { word: true, select: false });
        assert_eq!(s.buffer.cursor(), 3);
        s.dispatch(Command::Right { word: true, select: false });
        assert_eq!(s.buffer.cursor(), 4);
        s.dispatch(Command::Left { word: true, select: false });
        assert_eq!(s.buffer.cursor(), 3);
    }

    #[test]
    fn vertical_memory_survives_short_lines() {
        // columns:      0123456
        let mut s = session("abcdefg\nxy\nabcdefg");
        s.buffer.move_cursor_to(5); // line 0, col 5
        s.dispatch(Command::Down { select: false });
        assert_eq!(s.buffer.cursor(), 10); // clamped to end of "xy"
        s.dispatch(Command::Down { select: false });
        assert_eq!(s.buffer.cursor(), 16); // col 5 again on line 2
    }

    #[test]
    fn down_then_up_returns_to_column() {
        let mut s = session("hello\nworld");
        s.buffer.move_cursor_to(3);
        s.dispatch(Command::Down { select: false });
        s.dispatch(Command::Up { select: false });
        assert_eq!(s.buffer.cursor(), 3);
    }

    #[test]
    fn column_memory_resets_on_other_commands() {
        let mut s = session("abcdefg\nxy\nabcdefg");
        s.buffer.move_cursor_to(5);
        s.dispatch(Command::Down { select: false });
        // a horizontal move ends the run; the next vertical starts fresh
        s.dispatch(Command::Left { word: false, select: false });
        let col_after_left = s.buffer.cursor() - s.buffer.find_line_start(s.buffer.cursor());
        s.dispatch(Command::Down { select: false });
        let col = s.buffer.cursor() - s.buffer.find_line_start(s.buffer.cursor());
        assert_eq!(col, col_after_left);
    }

    #[test]
    fn up_from_first_line_clamps_to_start() {
        let mut s = session("abc\ndef");
        s.buffer.move_cursor_to(2);
        s.dispatch(Command::Up { select: false });
        assert_eq!(s.buffer.cursor(), 0);
    }

    #[test]
    fn down_from_last_line_clamps_to_end() {
        let mut s = session("abc\ndef");
        s.buffer.move_cursor_to(5);
        s.dispatch(Command::Down { select: false });
        assert_eq!(s.buffer.cursor(), 7);
    }

    #[test]
    fn tab_inserts_four_spaces() {
        let mut s = session("");
        s.dispatch(Command::Tab);
        assert_eq!(s.buffer.text(), "    ");
    }

    #[test]
    fn typing_replaces_an_active_selection() {
        let mut s = session("abcdef");
        s.buffer.move_cursor_to(5);
        s.selection_anchor = Some(1);
        s.dispatch(Command::Insert('X'));
        assert_eq!(s.buffer.text(), "aXf");
    }

    #[test]
    fn search_mode_routes_characters_to_the_query() {
        let mut s = session("one two one");
        s.buffer.move_cursor_to(0);
        s.dispatch(Command::EnterSearch);
        for c in "one".chars() {
            s.dispatch(Command::Insert(c));
        }
        assert_eq!(s.buffer.text(), "one two one"); // buffer untouched
        assert!(matches!(&s.mode, Mode::Search { query, .. } if query == "one"));
    }

    #[test]
    fn find_next_advances_past_the_previous_match() {
        let mut s = session("one two one");
        s.buffer.move_cursor_to(0);
        s.dispatch(Command::EnterSearch);
        for c in "one".chars() {
            s.dispatch(Command::Insert(c));
        }
        s.dispatch(Command::FindNext);
        assert_eq!(s.buffer.cursor(), 0);
        s.dispatch(Command::FindNext);
        assert_eq!(s.buffer.cursor(), 8);
        // no wrap: a further find reports not-found and stays put
        s.dispatch(Command::FindNext);
        assert_eq!(s.buffer.cursor(), 8);
        assert!(s.status.starts_with("Not found"));
    }

    #[test]
    fn find_next_restarts_at_cursor_after_manual_move() {
        let mut s = session("one two one");
        s.dispatch(Command::EnterSearch);
        for c in "one".chars() {
            s.dispatch(Command::Insert(c));
        }
        s.buffer.move_cursor_to(2);
        s.dispatch(Command::FindNext);
        assert_eq!(s.buffer.cursor(), 8);
    }

    #[test]
    fn escape_leaves_search_mode() {
        let mut s = session("x");
        s.dispatch(Command::EnterSearch);
        s.dispatch(Command::Escape);
        assert_eq!(s.mode, Mode::Edit);
    }

    #[test]
    fn copy_cut_paste_round_trip() {
        let mut s = session("hello world");
        s.buffer.move_cursor_to(5);
        s.selection_anchor = Some(0);
        s.dispatch(Command::Cut);
        assert_eq!(s.buffer.text(), " world");
        s.buffer.move_cursor_to(6);
        s.dispatch(Command::Paste);
        assert_eq!(s.buffer.text(), " worldhello");
    }

    #[test]
    fn tokens_follow_every_edit() {
        let mut s = session("");
        for c in "int x;".chars() {
            s.dispatch(Command::Insert(c));
        }
        let kinds: Vec<TokenKind> = s.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Type,
                TokenKind::Symbol,
                TokenKind::Semicolon,
                TokenKind::End
            ]
        );
        s.dispatch(Command::Backspace);
        assert_eq!(s.tokens.last().unwrap().start, s.buffer.len());
    }

    #[test]
    fn zoom_is_clamped_and_view_only() {
        let mut s = session("abc");
        for _ in 0..100 {
            s.dispatch(Command::ZoomIn);
        }
        assert_eq!(s.font_height, 72);
        for _ in 0..100 {
            s.dispatch(Command::ZoomOut);
        }
        assert_eq!(s.font_height, 8);
        assert_eq!(s.buffer.text(), "abc");
    }

    #[test]
    fn cursor_line_col() {
        let mut s = session("ab\ncd");
        s.buffer.move_cursor_to(4);
        assert_eq!(s.cursor_line_col(), (1, 1));
    }
}
