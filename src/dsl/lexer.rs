//! Lexer for the score language.
//!
//! Converts source text into a stream of [`Token`]s. Note lines are kept as
//! raw whitespace-separated entries; the parser gives them meaning.

use super::error::CompileError;
use super::token::{Token, TokenKind};

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, CompileError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            self.skip_comment();
            self.skip_whitespace();

            if self.is_at_end() {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    line: self.line,
                    col: self.col,
                });
                break;
            }

            let ch = self.peek();

            if ch == '\n' {
                tokens.push(Token {
                    kind: TokenKind::Newline,
                    line: self.line,
                    col: self.col,
                });
                self.advance();
                self.line += 1;
                self.col = 1;
                continue;
            }

            let token = match ch {
                '{' => self.single_char(TokenKind::LBrace),
                '}' => self.single_char(TokenKind::RBrace),
                '=' => self.one_or_two('=', TokenKind::Assign, TokenKind::EqEq),
                '<' => self.one_or_two('=', TokenKind::Lt, TokenKind::LtEq),
                '>' => self.one_or_two('=', TokenKind::Gt, TokenKind::GtEq),
                '+' => self.compound('=', TokenKind::PlusEq)?,
                '*' => self.compound('=', TokenKind::StarEq)?,
                '/' => self.compound('=', TokenKind::SlashEq)?,
                '!' => self.compound('=', TokenKind::NotEq)?,
                '-' if self.peek_next() == Some('=') => self.compound('=', TokenKind::MinusEq)?,
                '-' if self.peek_next().is_some_and(|c| c.is_ascii_digit()) => {
                    self.lex_integer()?
                }
                '[' => self.lex_note_line()?,
                '0'..='9' => self.lex_integer()?,
                'a'..='z' | 'A'..='Z' | '_' => self.lex_ident_or_keyword(),
                _ => {
                    return Err(CompileError::lex(
                        format!("unexpected character: '{ch}'"),
                        self.line,
                        self.col,
                    ));
                }
            };

            tokens.push(token);
        }

        Ok(tokens)
    }

    fn peek(&self) -> char {
        self.chars[self.pos]
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.pos];
        self.pos += 1;
        if ch != '\n' {
            self.col += 1;
        }
        ch
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() {
            let ch = self.peek();
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn skip_comment(&mut self) {
        if !self.is_at_end() && self.peek() == '/' && self.peek_next() == Some('/') {
            while !self.is_at_end() && self.peek() != '\n' {
                self.advance();
            }
        }
    }

    fn single_char(&mut self, kind: TokenKind) -> Token {
        let line = self.line;
        let col = self.col;
        self.advance();
        Token { kind, line, col }
    }

    /// `single` alone, or `double` when followed by `next`.
    fn one_or_two(&mut self, next: char, single: TokenKind, double: TokenKind) -> Token {
        let line = self.line;
        let col = self.col;
        self.advance();
        if !self.is_at_end() && self.peek() == next {
            self.advance();
            Token {
                kind: double,
                line,
                col,
            }
        } else {
            Token {
                kind: single,
                line,
                col,
            }
        }
    }

    /// A two-character operator whose first character is meaningless alone.
    fn compound(&mut self, next: char, kind: TokenKind) -> Result<Token, CompileError> {
        let line = self.line;
        let col = self.col;
        let first = self.advance();
        if !self.is_at_end() && self.peek() == next {
            self.advance();
            Ok(Token { kind, line, col })
        } else {
            Err(CompileError::lex(
                format!("expected '{next}' after '{first}'"),
                line,
                col,
            ))
        }
    }

    fn lex_integer(&mut self) -> Result<Token, CompileError> {
        let line = self.line;
        let col = self.col;
        let mut s = String::new();

        if !self.is_at_end() && self.peek() == '-' {
            s.push(self.advance());
        }

        while !self.is_at_end() && self.peek().is_ascii_digit() {
            s.push(self.advance());
        }

        if !self.is_at_end() && self.peek() == '.' {
            return Err(CompileError::lex(
                format!("only whole numbers are supported: {s}."),
                line,
                col,
            ));
        }

        let val: i64 = s
            .parse()
            .map_err(|_| CompileError::lex(format!("invalid number: {s}"), line, col))?;
        Ok(Token {
            kind: TokenKind::Integer(val),
            line,
            col,
        })
    }

    fn lex_ident_or_keyword(&mut self) -> Token {
        let line = self.line;
        let col = self.col;
        let mut s = String::new();

        while !self.is_at_end() && (self.peek().is_ascii_alphanumeric() || self.peek() == '_') {
            s.push(self.advance());
        }

        let kind = match s.as_str() {
            "while" => TokenKind::While,
            "block" => TokenKind::Block,
            "play" => TokenKind::Play,
            _ => TokenKind::Ident(s),
        };

        Token { kind, line, col }
    }

    /// Lex `[ ... ]` into a single note-line token holding the raw entries.
    fn lex_note_line(&mut self) -> Result<Token, CompileError> {
        let line = self.line;
        let col = self.col;
        self.advance(); // consume '['

        let mut content = String::new();
        loop {
            if self.is_at_end() {
                return Err(CompileError::lex("unclosed note line", line, col));
            }
            let ch = self.peek();
            if ch == ']' {
                self.advance();
                break;
            }
            if ch == '[' {
                return Err(CompileError::lex(
                    "note lines cannot be nested",
                    self.line,
                    self.col,
                ));
            }
            content.push(self.advance());
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            }
        }

        let entries = content.split_whitespace().map(str::to_string).collect();
        Ok(Token {
            kind: TokenKind::NoteLine(entries),
            line,
            col,
        })
    }
}
