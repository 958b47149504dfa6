mod browser;
mod editor;
mod status_bar;

use ratatui::prelude::*;

use crate::config::Config;
use crate::session::{EditSession, Mode};

pub fn render(frame: &mut Frame, session: &mut EditSession, config: &Config) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    match session.mode {
        Mode::Browse | Mode::NameFile { .. } => browser::render(frame, chunks[0], session, config),
        _ => editor::render(frame, chunks[0], session, config),
    }

    status_bar::render(frame, chunks[1], session, config);
}
