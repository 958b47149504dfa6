use ratatui::style::Color;

use crate::lexer::TokenKind;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub ui: UiColors,
    pub syntax: SyntaxColors,
}

#[derive(Debug, Clone)]
pub struct UiColors {
    pub background: Color,
    pub foreground: Color,
    pub line_numbers: Color,
    pub selection: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub mode_badge_bg: Color,
    pub mode_badge_fg: Color,
    pub browser_dir: Color,
    pub browser_file: Color,
    pub browser_selected: Color,
}

#[derive(Debug, Clone)]
pub struct SyntaxColors {
    pub keyword: Color,
    pub builtin_type: Color,
    pub number: Color,
    pub string: Color,
    pub comment: Color,
    pub preprocessor: Color,
    pub bracket: Color,
    pub operator: Color,
    pub invalid: Color,
    pub plain: Color,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: String::from("dark"),
            ui: UiColors {
                background: Color::Rgb(17, 17, 27),
                foreground: Color::Rgb(205, 214, 244),
                line_numbers: Color::Rgb(88, 91, 112),
                selection: Color::Rgb(69, 71, 90),
                status_bar_bg: Color::Rgb(30, 30, 46),
                status_bar_fg: Color::Rgb(205, 214, 244),
                mode_badge_bg: Color::Rgb(137, 180, 250),
                mode_badge_fg: Color::Rgb(17, 17, 27),
                browser_dir: Color::Rgb(137, 180, 250),
                browser_file: Color::Rgb(205, 214, 244),
                browser_selected: Color::Rgb(69, 71, 90),
            },
            syntax: SyntaxColors {
                keyword: Color::Rgb(230, 51, 76),
                builtin_type: Color::Rgb(255, 217, 51),
                number: Color::Rgb(255, 102, 255),
                string: Color::Rgb(102, 204, 51),
                comment: Color::Rgb(128, 128, 128),
                preprocessor: Color::Rgb(179, 153, 179),
                bracket: Color::Rgb(153, 179, 179),
                operator: Color::Rgb(102, 153, 217),
                invalid: Color::Rgb(243, 139, 168),
                plain: Color::Rgb(205, 214, 244),
            },
        }
    }

    pub fn light() -> Self {
        Self {
            name: String::from("light"),
            ui: UiColors {
                background: Color::Rgb(239, 241, 245),
                foreground: Color::Rgb(76, 79, 105),
                line_numbers: Color::Rgb(156, 160, 176),
                selection: Color::Rgb(204, 208, 218),
                status_bar_bg: Color::Rgb(220, 224, 232),
                status_bar_fg: Color::Rgb(76, 79, 105),
                mode_badge_bg: Color::Rgb(30, 102, 245),
                mode_badge_fg: Color::Rgb(239, 241, 245),
                browser_dir: Color::Rgb(30, 102, 245),
                browser_file: Color::Rgb(76, 79, 105),
                browser_selected: Color::Rgb(204, 208, 218),
            },
            syntax: SyntaxColors {
                keyword: Color::Rgb(210, 15, 57),
                builtin_type: Color::Rgb(223, 142, 29),
                number: Color::Rgb(136, 57, 239),
                string: Color::Rgb(64, 160, 43),
                comment: Color::Rgb(124, 127, 147),
                preprocessor: Color::Rgb(114, 135, 253),
                bracket: Color::Rgb(23, 146, 153),
                operator: Color::Rgb(30, 102, 245),
                invalid: Color::Rgb(230, 69, 83),
                plain: Color::Rgb(76, 79, 105),
            },
        }
    }

    /// Color for a token kind; the mapping every view of the token list
    /// shares.
    pub fn token_color(&self, kind: TokenKind) -> Color {
        let s = &self.syntax;
        match kind {
            TokenKind::Keyword => s.keyword,
            TokenKind::Type => s.builtin_type,
            TokenKind::Number => s.number,
            TokenKind::Str => s.string,
            TokenKind::Comment => s.comment,
            TokenKind::Preprocessor => s.preprocessor,
            TokenKind::OpenParen
            | TokenKind::CloseParen
            | TokenKind::OpenBrace
            | TokenKind::CloseBrace
            | TokenKind::Semicolon => s.bracket,
            TokenKind::Invalid => s.invalid,
            kind if kind.is_operator() => s.operator,
            _ => s.plain,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
