use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::config::Config;
use crate::session::{EditSession, Mode};

pub fn render(frame: &mut Frame, area: Rect, session: &EditSession, config: &Config) {
    let theme = &config.theme;
    let naming = matches!(session.mode, Mode::NameFile { .. });

    let chunks = if naming {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area)
    } else {
        Layout::default()
            .constraints([Constraint::Min(1)])
            .split(area)
    };

    if let Mode::NameFile { name } = &session.mode {
        let prompt = Line::from(vec![
            Span::styled(
                " New file: ",
                Style::default().fg(theme.ui.status_bar_fg),
            ),
            Span::styled(name.clone(), Style::default().fg(theme.ui.foreground)),
            Span::styled("█", Style::default().fg(theme.ui.foreground)),
        ]);
        frame.render_widget(
            Paragraph::new(prompt).style(Style::default().bg(theme.ui.status_bar_bg)),
            chunks[0],
        );
    }

    let list_area = if naming { chunks[1] } else { chunks[0] };

    let items: Vec<ListItem> = session
        .explorer
        .entries
        .iter()
        .map(|entry| {
            let (icon, color) = if entry.is_dir {
                ("▸ ", theme.ui.browser_dir)
            } else {
                ("  ", theme.ui.browser_file)
            };
            ListItem::new(Line::from(vec![
                Span::raw(icon),
                Span::styled(entry.name.clone(), Style::default().fg(color)),
            ]))
        })
        .collect();

    let title = format!(" {} ", session.explorer.cwd().display());
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(theme.ui.line_numbers)),
        )
        .style(
            Style::default()
                .bg(theme.ui.background)
                .fg(theme.ui.foreground),
        )
        .highlight_style(
            Style::default()
                .bg(theme.ui.browser_selected)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    state.select(Some(session.explorer.selected));
    frame.render_stateful_widget(list, list_area, &mut state);
}
