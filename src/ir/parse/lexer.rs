//! Tokenizer for the textual IR subset.
//!
//! Line structure matters in IR text, so newlines are tokens. Comments run
//! from `;` to the end of the line and are dropped.

use crate::diagnostic::Diagnostic;
use crate::span::{Span, Spanned};

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// `%name` or `%0`.
    Local(String),
    /// `@name`.
    Global(String),
    /// Keywords, opcodes, types, predicates and bare label names.
    Word(String),
    Int(u64),
    Float(f64),
    Str(String),
    /// `#0` attribute group reference.
    Attr(String),
    /// `!dbg`, `!0` metadata reference.
    Meta(String),
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LAngle,
    RAngle,
    Comma,
    Equals,
    Colon,
    Star,
    Ellipsis,
    Newline,
    Eof,
}

impl Token {
    /// Short human-readable description for error messages.
    pub fn description(&self) -> String {
        match self {
            Token::Local(name) => format!("'%{}'", name),
            Token::Global(name) => format!("'@{}'", name),
            Token::Word(w) => format!("'{}'", w),
            Token::Int(n) => format!("integer {}", n),
            Token::Float(x) => format!("float {:?}", x),
            Token::Str(_) => "string".to_string(),
            Token::Attr(name) => format!("'#{}'", name),
            Token::Meta(name) => format!("'!{}'", name),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::LAngle => "'<'".to_string(),
            Token::RAngle => "'>'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Equals => "'='".to_string(),
            Token::Colon => "':'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Ellipsis => "'...'".to_string(),
            Token::Newline => "end of line".to_string(),
            Token::Eof => "end of file".to_string(),
        }
    }
}

pub struct Lexer<'src> {
    source: &'src [u8],
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

fn is_name_char(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, b'_' | b'.' | b'$' | b'-')
}

fn is_word_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || matches!(ch, b'_' | b'.' | b'$')
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn tokenize(mut self) -> (Vec<Spanned<Token>>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.node == Token::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    fn span(&self, start: usize) -> Span {
        Span::new(start as u32, self.pos as u32)
    }

    fn text(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.source[start..end]).into_owned()
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn next_token(&mut self) -> Spanned<Token> {
        loop {
            // Whitespace other than newline, and comments
            while let Some(ch) = self.peek(0) {
                if ch == b';' {
                    while self.peek(0).is_some_and(|c| c != b'\n') {
                        self.pos += 1;
                    }
                } else if ch != b'\n' && ch.is_ascii_whitespace() {
                    self.pos += 1;
                } else {
                    break;
                }
            }

            let start = self.pos;
            let Some(ch) = self.peek(0) else {
                return Spanned::new(Token::Eof, self.span(start));
            };

            let single = match ch {
                b'\n' => Some(Token::Newline),
                b'(' => Some(Token::LParen),
                b')' => Some(Token::RParen),
                b'{' => Some(Token::LBrace),
                b'}' => Some(Token::RBrace),
                b'[' => Some(Token::LBracket),
                b']' => Some(Token::RBracket),
                b'<' => Some(Token::LAngle),
                b'>' => Some(Token::RAngle),
                b',' => Some(Token::Comma),
                b'=' => Some(Token::Equals),
                b':' => Some(Token::Colon),
                b'*' => Some(Token::Star),
                _ => None,
            };
            if let Some(tok) = single {
                self.pos += 1;
                return Spanned::new(tok, self.span(start));
            }

            match ch {
                b'%' | b'@' => {
                    self.pos += 1;
                    let name = self.scan_name();
                    if name.is_empty() {
                        self.error(start, format!("expected a name after '{}'", ch as char));
                        continue;
                    }
                    let tok = if ch == b'%' {
                        Token::Local(name)
                    } else {
                        Token::Global(name)
                    };
                    return Spanned::new(tok, self.span(start));
                }
                b'#' | b'!' => {
                    self.pos += 1;
                    let name = self.scan_name();
                    let tok = if ch == b'#' {
                        Token::Attr(name)
                    } else {
                        Token::Meta(name)
                    };
                    return Spanned::new(tok, self.span(start));
                }
                b'"' => {
                    self.pos += 1;
                    let body = self.pos;
                    while self.peek(0).is_some_and(|c| c != b'"' && c != b'\n') {
                        self.pos += 1;
                    }
                    let text = self.text(body, self.pos);
                    if self.peek(0) == Some(b'"') {
                        self.pos += 1;
                    } else {
                        self.error(start, "unterminated string".to_string());
                    }
                    return Spanned::new(Token::Str(text), self.span(start));
                }
                b'.' if self.peek(1) == Some(b'.') && self.peek(2) == Some(b'.') => {
                    self.pos += 3;
                    return Spanned::new(Token::Ellipsis, self.span(start));
                }
                _ if ch.is_ascii_digit()
                    || (ch == b'-' && self.peek(1).is_some_and(|c| c.is_ascii_digit())) =>
                {
                    if let Some(tok) = self.scan_number(start) {
                        return tok;
                    }
                }
                _ if is_word_start(ch) => {
                    while self.peek(0).is_some_and(is_name_char) {
                        self.pos += 1;
                    }
                    let word = self.text(start, self.pos);
                    return Spanned::new(Token::Word(word), self.span(start));
                }
                _ => {
                    self.pos += 1;
                    self.error(start, format!("unexpected character '{}'", ch as char));
                }
            }
        }
    }

    /// Name after `%`, `@`, `#` or `!`: a quoted string or name characters.
    fn scan_name(&mut self) -> String {
        if self.peek(0) == Some(b'"') {
            self.pos += 1;
            let start = self.pos;
            while self.peek(0).is_some_and(|c| c != b'"' && c != b'\n') {
                self.pos += 1;
            }
            let name = self.text(start, self.pos);
            if self.peek(0) == Some(b'"') {
                self.pos += 1;
            }
            return name;
        }
        let start = self.pos;
        while self.peek(0).is_some_and(is_name_char) {
            self.pos += 1;
        }
        self.text(start, self.pos)
    }

    fn scan_number(&mut self, start: usize) -> Option<Spanned<Token>> {
        // Hexadecimal double bit pattern: 0x3FF0000000000000
        if self.peek(0) == Some(b'0') && self.peek(1) == Some(b'x') {
            self.pos += 2;
            let digits = self.pos;
            while self.peek(0).is_some_and(|c| c.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            let text = self.text(digits, self.pos);
            return match u64::from_str_radix(&text, 16) {
                Ok(bits) => Some(Spanned::new(
                    Token::Float(f64::from_bits(bits)),
                    self.span(start),
                )),
                Err(_) => {
                    self.error(start, format!("invalid hexadecimal constant '0x{}'", text));
                    None
                }
            };
        }

        if self.peek(0) == Some(b'-') {
            self.pos += 1;
        }
        while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let mut is_float = false;
        if self.peek(0) == Some(b'.') && self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.pos += 1;
            while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(0), Some(b'e') | Some(b'E')) {
            let sign = usize::from(matches!(self.peek(1), Some(b'+') | Some(b'-')));
            if self.peek(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.pos += 1 + sign;
                while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
        }

        let text = self.text(start, self.pos);
        let tok = if is_float {
            text.parse::<f64>().ok().map(Token::Float)
        } else if let Some(magnitude) = text.strip_prefix('-') {
            magnitude
                .parse::<u64>()
                .ok()
                .map(|n| Token::Int((n as i64).wrapping_neg() as u64))
        } else {
            text.parse::<u64>().ok().map(Token::Int)
        };
        match tok {
            Some(tok) => Some(Spanned::new(tok, self.span(start))),
            None => {
                self.error(start, format!("invalid number '{}'", text));
                None
            }
        }
    }

    fn error(&mut self, start: usize, message: String) {
        let span = self.span(start);
        self.diagnostics.push(Diagnostic::error(message, span));
    }
}
