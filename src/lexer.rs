use crate::buffer::GapBuffer;

/// C/C++ keywords recognized by the highlighter. Matched by exact span
/// length, never by prefix.
const KEYWORDS: &[&str] = &[
    "auto", "break", "case", "const", "continue", "default", "do", "else",
    "enum", "extern", "for", "goto", "if", "register", "return", "signed",
    "sizeof", "static", "struct", "switch", "typedef", "union", "volatile",
    "while", "alignas", "alignof", "and", "and_eq", "asm", "bitand", "bitor",
    "bool", "catch", "class", "co_await", "co_return", "co_yield", "compl",
    "concept", "const_cast", "consteval", "constexpr", "constinit",
    "decltype", "delete", "dynamic_cast", "explicit", "export", "friend",
    "inline", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "override", "private", "protected",
    "public", "reinterpret_cast", "requires", "static_assert", "static_cast",
    "template", "this", "thread_local", "throw", "try", "typeid", "typename",
    "using", "virtual", "wchar_t", "xor", "xor_eq",
];

const BUILTIN_TYPES: &[&str] = &[
    "int", "short", "unsigned", "float", "char", "long", "double", "void",
];

/// Operator literals tried longest-first so `==` lexes as one token instead
/// of two assignments.
const OPERATORS: &[(&str, TokenKind)] = &[
    ("==", TokenKind::Eq),
    ("!=", TokenKind::Ne),
    (">=", TokenKind::Ge),
    ("<=", TokenKind::Le),
    ("&&", TokenKind::AndAnd),
    ("||", TokenKind::OrOr),
    ("::", TokenKind::Scope),
    ("=", TokenKind::Assign),
    ("!", TokenKind::Not),
    (">", TokenKind::Gt),
    ("<", TokenKind::Lt),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Zero-length marker emitted once the scan reaches the end of text.
    End,
    /// One unrecognized byte; guarantees forward progress.
    Invalid,
    Preprocessor,
    Symbol,
    Keyword,
    Type,
    Number,
    Str,
    Comment,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Semicolon,
    Assign,
    Not,
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Scope,
    AndAnd,
    OrOr,
}

impl TokenKind {
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            Self::Assign
                | Self::Not
                | Self::Eq
                | Self::Ne
                | Self::Gt
                | Self::Lt
                | Self::Ge
                | Self::Le
                | Self::Plus
                | Self::Minus
                | Self::Star
                | Self::Slash
                | Self::Percent
                | Self::Scope
                | Self::AndAnd
                | Self::OrOr
        )
    }
}

/// A classified span of the buffer's logical text. `start` is a logical
/// offset snapshot: any buffer mutation invalidates the whole token list,
/// which is why the session re-tokenizes after every edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub len: usize,
}

/// Single-pass scanner over the full buffer. Restart by constructing a new
/// one; `tokenize` is the usual entry point.
pub struct Lexer<'a> {
    text: &'a GapBuffer,
    idx: usize,
    /// Running line/column of the scan position, for view layers that want
    /// token positions without re-scanning.
    pub line: usize,
    pub line_start: usize,
}

/// Tokenize the whole buffer. The returned list covers the logical text with
/// non-overlapping spans in ascending order and ends with a zero-length
/// `End` token at `buf.len()`.
pub fn tokenize(buf: &GapBuffer) -> Vec<Token> {
    let mut lexer = Lexer::new(buf);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::End;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

fn is_symbol_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_symbol(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

fn is_num(c: u8) -> bool {
    // deliberately permissive: accepts literal suffixes and hex/float forms
    // without enforcing a strict numeric grammar
    c.is_ascii_digit() || matches!(c, b'.' | b'f' | b'u' | b'b' | b'x')
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a GapBuffer) -> Self {
        Self {
            text,
            idx: 0,
            line: 0,
            line_start: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.text.get(self.idx)
    }

    fn chop_char(&mut self) {
        if let Some(c) = self.peek() {
            self.idx += 1;
            if c == b'\n' {
                self.line += 1;
                self.line_start = self.idx;
            }
        }
    }

    fn trim_left(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.chop_char();
        }
    }

    fn starts_with(&self, prefix: &str) -> bool {
        prefix
            .bytes()
            .enumerate()
            .all(|(i, b)| self.text.get(self.idx + i) == Some(b))
    }

    /// Consume to end of line; `include_newline` also chops the terminator
    /// into the token when present.
    fn chop_line(&mut self, include_newline: bool) {
        while self.peek().is_some_and(|c| c != b'\n') {
            self.chop_char();
        }
        if include_newline && self.peek().is_some() {
            self.chop_char();
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.trim_left();
        let start = self.idx;
        let token = |kind, end: usize| Token {
            kind,
            start,
            len: end - start,
        };

        let Some(c) = self.peek() else {
            return token(TokenKind::End, start);
        };

        if c == b'#' {
            self.chop_line(true);
            return token(TokenKind::Preprocessor, self.idx);
        }

        let punct = match c {
            b'(' => Some(TokenKind::OpenParen),
            b')' => Some(TokenKind::CloseParen),
            b'{' => Some(TokenKind::OpenBrace),
            b'}' => Some(TokenKind::CloseBrace),
            b';' => Some(TokenKind::Semicolon),
            _ => None,
        };
        if let Some(kind) = punct {
            self.chop_char();
            return token(kind, self.idx);
        }

        if c == b'"' {
            self.chop_char();
            while self.peek().is_some_and(|c| c != b'"') {
                self.chop_char();
            }
            // closing quote, unless the string runs to end of buffer
            if self.peek().is_some() {
                self.chop_char();
            }
            return token(TokenKind::Str, self.idx);
        }

        if is_symbol_start(c) {
            while self.peek().is_some_and(is_symbol) {
                self.chop_char();
            }
            let word = self.text.substring(start, self.idx - start);
            let kind = if KEYWORDS.contains(&word.as_str()) {
                TokenKind::Keyword
            } else if BUILTIN_TYPES.contains(&word.as_str()) {
                TokenKind::Type
            } else {
                TokenKind::Symbol
            };
            return token(kind, self.idx);
        }

        if c.is_ascii_digit() {
            while self.peek().is_some_and(is_num) {
                self.chop_char();
            }
            return token(TokenKind::Number, self.idx);
        }

        if self.starts_with("//") {
            self.chop_line(false);
            return token(TokenKind::Comment, self.idx);
        }

        for &(op, kind) in OPERATORS {
            if self.starts_with(op) {
                for _ in 0..op.len() {
                    self.chop_char();
                }
                return token(kind, self.idx);
            }
        }

        self.chop_char();
        token(TokenKind::Invalid, self.idx)
    }
}
