use ratatui::{prelude::*, text::Span, widgets::Paragraph};

use crate::config::Config;
use crate::session::{EditSession, Mode};

pub fn render(frame: &mut Frame, area: Rect, session: &EditSession, config: &Config) {
    let theme = &config.theme;

    let mode_str = match session.mode {
        Mode::Edit => " EDIT ",
        Mode::Search { .. } => " SEARCH ",
        Mode::Browse => " FILES ",
        Mode::NameFile { .. } => " NAME ",
    };
    let mode_style = Style::default()
        .bg(theme.ui.mode_badge_bg)
        .fg(theme.ui.mode_badge_fg)
        .add_modifier(Modifier::BOLD);

    let modified = if session.modified { " ●" } else { "" };
    let file_info = format!(" {}{} ", session.filename(), modified);

    // In search mode the query takes over the message slot.
    let status_msg = match &session.mode {
        Mode::Search { query, .. } => format!(" /{query} "),
        _ => format!(" {} ", session.status),
    };

    let (line, col) = session.cursor_line_col();
    let cursor_pos = format!(" Ln {}, Col {} ", line + 1, col + 1);
    let zoom = format!(" {}px ", session.font_height);

    let left_len = mode_str.len() + file_info.len() + status_msg.len();
    let right_len = cursor_pos.len() + zoom.len();
    let padding = (area.width as usize).saturating_sub(left_len + right_len).max(1);

    let line = Line::from(vec![
        Span::styled(mode_str, mode_style),
        Span::styled(
            file_info,
            Style::default()
                .bg(theme.ui.status_bar_bg)
                .fg(theme.ui.foreground),
        ),
        Span::styled(status_msg, Style::default().fg(theme.ui.status_bar_fg)),
        Span::raw(" ".repeat(padding)),
        Span::styled(zoom, Style::default().fg(theme.ui.status_bar_fg)),
        Span::styled(
            cursor_pos,
            Style::default()
                .bg(theme.ui.mode_badge_bg)
                .fg(theme.ui.mode_badge_fg),
        ),
    ]);

    let paragraph = Paragraph::new(line).style(Style::default().bg(theme.ui.status_bar_bg));
    frame.render_widget(paragraph, area);
}
