use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::Command;

/// Identity of a key chord as the repeater table sees it.
pub type KeyId = (KeyCode, KeyModifiers);

/// Translate a key event into a command. Mode-independent: the session
/// decides what a command means in the current mode.
pub fn map_key(key: &KeyEvent) -> Option<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Char('q') if ctrl => Some(Command::Quit),
        KeyCode::Char('s') if ctrl => Some(Command::Save),
        KeyCode::Char('f') if ctrl => Some(Command::EnterSearch),
        KeyCode::Char('o') if ctrl => Some(Command::OpenBrowser),
        KeyCode::Char('n') if ctrl => Some(Command::NewFile),
        KeyCode::Char('c') if ctrl => Some(Command::Copy),
        KeyCode::Char('x') if ctrl => Some(Command::Cut),
        KeyCode::Char('v') if ctrl => Some(Command::Paste),
        KeyCode::Char('=') | KeyCode::Char('+') if ctrl => Some(Command::ZoomIn),
        KeyCode::Char('-') if ctrl => Some(Command::ZoomOut),
        KeyCode::Left => Some(Command::Left {
            word: ctrl,
            select: shift,
        }),
        KeyCode::Right => Some(Command::Right {
            word: ctrl,
            select: shift,
        }),
        KeyCode::Up => Some(Command::Up { select: shift }),
        KeyCode::Down => Some(Command::Down { select: shift }),
        KeyCode::Backspace => Some(Command::Backspace),
        KeyCode::Delete => Some(Command::DeleteForward),
        KeyCode::Enter => Some(Command::Newline),
        KeyCode::Tab => Some(Command::Tab),
        KeyCode::Esc => Some(Command::Escape),
        KeyCode::Char(c) if !ctrl => Some(Command::Insert(c)),
        _ => None,
    }
}

/// Per-frame key state built from press/release events; feeds the
/// repeater's edge and hold queries. Only usable when the terminal reports
/// key releases (kitty keyboard protocol).
pub struct InputState {
    down: Vec<KeyId>,
    just_pressed: Vec<KeyId>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            down: Vec::new(),
            just_pressed: Vec::new(),
        }
    }

    /// Forget the previous frame's press edges.
    pub fn begin_frame(&mut self) {
        self.just_pressed.clear();
    }

    pub fn on_key(&mut self, key: &KeyEvent) {
        let id = (key.code, key.modifiers);
        match key.kind {
            KeyEventKind::Press => {
                if !self.down.contains(&id) {
                    self.down.push(id);
                    self.just_pressed.push(id);
                }
            }
            KeyEventKind::Release => {
                // releases may arrive with different modifiers than the
                // press did (shift let go first), so match on the code
                self.down.retain(|(code, _)| *code != key.code);
            }
            KeyEventKind::Repeat => {}
        }
    }

    pub fn is_down(&self, id: &KeyId) -> bool {
        self.down.contains(id)
    }

    pub fn was_just_pressed(&self, id: &KeyId) -> bool {
        self.just_pressed.contains(id)
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
