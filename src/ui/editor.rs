use ratatui::{prelude::*, widgets::Paragraph};

use crate::config::Config;
use crate::lexer::Token;
use crate::session::EditSession;
use crate::theme::Theme;

/// Walks the token list in step with the byte offsets being painted.
/// Offsets are visited in increasing order, so a single forward pointer
/// replaces a per-byte search.
struct TokenCursor<'a> {
    tokens: &'a [Token],
    idx: usize,
}

impl<'a> TokenCursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, idx: 0 }
    }

    fn color_at(&mut self, offset: usize, theme: &Theme) -> Color {
        while self.idx < self.tokens.len() {
            let tok = &self.tokens[self.idx];
            if tok.start + tok.len > offset {
                break;
            }
            self.idx += 1;
        }
        match self.tokens.get(self.idx) {
            Some(tok) if tok.start <= offset => theme.token_color(tok.kind),
            _ => theme.syntax.plain,
        }
    }
}

pub fn render(frame: &mut Frame, area: Rect, session: &mut EditSession, config: &Config) {
    let theme = &config.theme;
    let height = area.height as usize;
    session.ensure_cursor_visible(height);

    let len = session.buffer.len();
    let cursor = session.buffer.cursor();
    let selection = session.selection_range();

    let gutter = if config.editor.show_line_numbers {
        let total = 1 + (0..len)
            .filter(|&i| session.buffer.get(i) == Some(b'\n'))
            .count();
        total.to_string().len().max(3) + 1
    } else {
        0
    };

    let mut token_cursor = TokenCursor::new(&session.tokens);
    let mut out: Vec<Line> = Vec::with_capacity(height);

    // Skip lines above the scroll window.
    let mut start = 0usize;
    let mut line_no = 0usize;
    while line_no < session.scroll {
        let end = session.buffer.find_line_end(start);
        if end >= len {
            break;
        }
        start = end + 1;
        line_no += 1;
    }

    while out.len() < height && start <= len {
        let end = session.buffer.find_line_end(start);
        let mut spans: Vec<Span> = Vec::new();

        if gutter > 0 {
            spans.push(Span::styled(
                format!("{:>width$} ", line_no + 1, width = gutter - 1),
                Style::default().fg(theme.ui.line_numbers),
            ));
        }

        let mut run = String::new();
        let mut run_style = Style::default();
        for offset in start..end {
            let byte = match session.buffer.get(offset) {
                Some(b) => b,
                None => break,
            };
            let mut style = Style::default().fg(token_cursor.color_at(offset, theme));
            if let Some((sel_start, sel_end)) = selection {
                if offset >= sel_start && offset < sel_end {
                    style = style.bg(theme.ui.selection);
                }
            }
            if offset == cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if style != run_style && !run.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut run), run_style));
            }
            run_style = style;
            run.push(byte as char);
        }
        if !run.is_empty() {
            spans.push(Span::styled(run, run_style));
        }

        // Cursor sitting on the newline (or at end of buffer) gets a
        // phantom cell so it stays visible.
        if cursor == end {
            spans.push(Span::styled(
                " ",
                Style::default().add_modifier(Modifier::REVERSED),
            ));
        }

        out.push(Line::from(spans));
        if end >= len {
            break;
        }
        start = end + 1;
        line_no += 1;
    }

    let paragraph = Paragraph::new(out).style(
        Style::default()
            .bg(theme.ui.background)
            .fg(theme.ui.foreground),
    );
    frame.render_widget(paragraph, area);
}
