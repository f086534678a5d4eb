//! Parser for the score language.
//!
//! Parses a token stream into a [`Program`]. Newlines separate commands and
//! are otherwise ignored.

use super::ast::*;
use super::error::CompileError;
use super::token::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse(&mut self) -> Result<Program, CompileError> {
        let mut commands = Vec::new();

        loop {
            self.skip_newlines();
            if self.is_at_end() {
                break;
            }
            if self.check(TokenKind::RBrace) {
                let t = self.peek();
                return Err(CompileError::parse("unmatched '}'", t.line, t.col));
            }
            commands.push(self.parse_command()?);
        }

        Ok(Program { commands })
    }

    fn parse_command(&mut self) -> Result<Command, CompileError> {
        let t = self.peek().clone();
        match t.kind {
            TokenKind::Ident(name) => {
                self.advance();
                self.parse_assignment_or_modify(name)
            }
            TokenKind::While => {
                self.advance();
                let condition = self.parse_condition()?;
                let body = self.parse_body()?;
                Ok(Command::While { condition, body })
            }
            TokenKind::NoteLine(raw) => {
                self.advance();
                if raw.is_empty() {
                    return Err(CompileError::parse(
                        "note line needs at least one entry",
                        t.line,
                        t.col,
                    ));
                }
                let entries = raw
                    .iter()
                    .map(|entry| parse_entry(entry, t.line, t.col))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Command::NoteLine(entries))
            }
            TokenKind::Block => {
                self.advance();
                let name = self.expect_ident()?;
                let commands = self.parse_body()?;
                Ok(Command::BlockDefinition { name, commands })
            }
            TokenKind::Play => {
                self.advance();
                let name = self.expect_ident()?;
                Ok(Command::PlayBlock(name))
            }
            other => Err(CompileError::parse(
                format!("unexpected token: {other:?}"),
                t.line,
                t.col,
            )),
        }
    }

    fn parse_assignment_or_modify(&mut self, name: String) -> Result<Command, CompileError> {
        let t = self.peek().clone();
        let op = match t.kind {
            TokenKind::Assign => None,
            TokenKind::PlusEq => Some(ModifyOp::Add),
            TokenKind::MinusEq => Some(ModifyOp::Sub),
            TokenKind::StarEq => Some(ModifyOp::Mul),
            TokenKind::SlashEq => Some(ModifyOp::Div),
            other => {
                return Err(CompileError::parse(
                    format!("expected '=' or a compound operator after '{name}', got {other:?}"),
                    t.line,
                    t.col,
                ));
            }
        };
        self.advance();
        let value = self.expect_integer()?;

        Ok(match op {
            None => Command::Assignment { name, value },
            Some(op) => Command::Modify {
                name,
                op,
                operand: value,
            },
        })
    }

    fn parse_condition(&mut self) -> Result<Condition, CompileError> {
        let left = self.expect_ident()?;
        let t = self.peek().clone();
        let comparator = match t.kind {
            TokenKind::EqEq => Comparator::Eq,
            TokenKind::NotEq => Comparator::Ne,
            TokenKind::Lt => Comparator::Lt,
            TokenKind::LtEq => Comparator::Le,
            TokenKind::Gt => Comparator::Gt,
            TokenKind::GtEq => Comparator::Ge,
            other => {
                return Err(CompileError::parse(
                    format!("expected comparator, got {other:?}"),
                    t.line,
                    t.col,
                ));
            }
        };
        self.advance();
        let right = self.expect_integer()?;
        Ok(Condition {
            left,
            comparator,
            right,
        })
    }

    /// Parse `{ command* }`.
    fn parse_body(&mut self) -> Result<Vec<Command>, CompileError> {
        self.expect(TokenKind::LBrace)?;
        let mut commands = Vec::new();

        loop {
            self.skip_newlines();
            if self.check(TokenKind::RBrace) {
                break;
            }
            if self.is_at_end() {
                let t = self.peek();
                return Err(CompileError::parse("unclosed '{'", t.line, t.col));
            }
            commands.push(self.parse_command()?);
        }
        self.expect(TokenKind::RBrace)?;

        Ok(commands)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> &Token {
        let t = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len() || self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end()
            && std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(&kind)
    }

    fn skip_newlines(&mut self) {
        while !self.is_at_end() && self.peek().kind == TokenKind::Newline {
            self.pos += 1;
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&Token, CompileError> {
        self.skip_newlines();
        if std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(&kind) {
            Ok(self.advance())
        } else {
            let t = self.peek();
            Err(CompileError::parse(
                format!("expected {kind:?}, got {:?}", t.kind),
                t.line,
                t.col,
            ))
        }
    }

    fn expect_ident(&mut self) -> Result<String, CompileError> {
        let t = self.peek();
        match &t.kind {
            TokenKind::Ident(s) => {
                let val = s.clone();
                self.advance();
                Ok(val)
            }
            _ => Err(CompileError::parse(
                format!("expected identifier, got {:?}", t.kind),
                t.line,
                t.col,
            )),
        }
    }

    fn expect_integer(&mut self) -> Result<i64, CompileError> {
        let t = self.peek();
        match &t.kind {
            TokenKind::Integer(v) => {
                let val = *v;
                self.advance();
                Ok(val)
            }
            _ => Err(CompileError::parse(
                format!("expected integer, got {:?}", t.kind),
                t.line,
                t.col,
            )),
        }
    }
}

/// Parse one note-line entry: `r:<dur>` or `<letter>[#|b][<octave>|$<var>]:<dur>`.
fn parse_entry(raw: &str, line: usize, col: usize) -> Result<NoteOrRest, CompileError> {
    let err = |what: &str| CompileError::parse(format!("{what} in entry '{raw}'"), line, col);

    let (head, code) = raw
        .split_once(':')
        .ok_or_else(|| err("missing ':<duration>'"))?;
    let duration = DurationCode::from_code(code)
        .ok_or_else(|| err("duration must be one of 1, 2, 4, 8"))?;

    if head == "r" {
        return Ok(NoteOrRest::Rest(duration));
    }

    let mut chars = head.chars();
    let letter = chars
        .next()
        .and_then(Letter::from_char)
        .ok_or_else(|| err("expected a note letter A-G or 'r'"))?;

    let mut rest = chars.as_str();
    let accidental = if let Some(tail) = rest.strip_prefix('#') {
        rest = tail;
        Accidental::Sharp
    } else if let Some(tail) = rest.strip_prefix('b') {
        rest = tail;
        Accidental::Flat
    } else {
        Accidental::Natural
    };

    let octave = if rest.is_empty() {
        OctaveSource::Default
    } else if let Some(var) = rest.strip_prefix('$') {
        let valid = var.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && var.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(err("invalid octave variable"));
        }
        OctaveSource::Variable(var.to_string())
    } else {
        let octave = rest.parse().map_err(|_| err("invalid octave"))?;
        OctaveSource::Literal(octave)
    };

    Ok(NoteOrRest::Note(Note {
        letter,
        octave,
        accidental,
        duration,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::error::ErrorKind;
    use crate::dsl::lexer::Lexer;

    fn parse(src: &str) -> Result<Program, CompileError> {
        let mut lexer = Lexer::new(src);
        let tokens = lexer.tokenize()?;
        let mut parser = Parser::new(tokens);
        parser.parse()
    }

    fn note(
        letter: Letter,
        octave: OctaveSource,
        accidental: Accidental,
        d: DurationCode,
    ) -> NoteOrRest {
        NoteOrRest::Note(Note {
            letter,
            octave,
            accidental,
            duration: d,
        })
    }

    #[test]
    fn parse_empty_program() {
        let prog = parse("").unwrap();
        assert!(prog.commands.is_empty());
    }

    #[test]
    fn parse_assignment_and_modify() {
        let prog = parse("x = 7\nx /= 2\nx += -1").unwrap();
        assert_eq!(
            prog.commands,
            vec![
                Command::Assignment {
                    name: "x".into(),
                    value: 7
                },
                Command::Modify {
                    name: "x".into(),
                    op: ModifyOp::Div,
                    operand: 2
                },
                Command::Modify {
                    name: "x".into(),
                    op: ModifyOp::Add,
                    operand: -1
                },
            ]
        );
    }

    #[test]
    fn parse_note_line_entries() {
        let prog = parse("[C#5:4 r:2 Eb$oct:8 G:1 B-1:4]").unwrap();
        let Command::NoteLine(entries) = &prog.commands[0] else {
            panic!("expected note line");
        };
        assert_eq!(
            entries,
            &vec![
                note(Letter::C, OctaveSource::Literal(5), Accidental::Sharp, DurationCode::Quarter),
                NoteOrRest::Rest(DurationCode::Half),
                note(
                    Letter::E,
                    OctaveSource::Variable("oct".into()),
                    Accidental::Flat,
                    DurationCode::Eighth
                ),
                note(Letter::G, OctaveSource::Default, Accidental::Natural, DurationCode::Whole),
                note(
                    Letter::B,
                    OctaveSource::Literal(-1),
                    Accidental::Natural,
                    DurationCode::Quarter
                ),
            ]
        );
    }

    #[test]
    fn parse_flat_without_octave() {
        let prog = parse("[Bb:4]").unwrap();
        assert_eq!(
            prog.commands[0],
            Command::NoteLine(vec![note(
                Letter::B,
                OctaveSource::Default,
                Accidental::Flat,
                DurationCode::Quarter
            )])
        );
    }

    #[test]
    fn parse_while_loop() {
        let src = "
i = 0
while i < 4 {
    [C:4]
    i += 1
}
";
        let prog = parse(src).unwrap();
        assert_eq!(prog.commands.len(), 2);
        let Command::While { condition, body } = &prog.commands[1] else {
            panic!("expected while");
        };
        assert_eq!(condition.left, "i");
        assert_eq!(condition.comparator, Comparator::Lt);
        assert_eq!(condition.right, 4);
        assert_eq!(body.len(), 2);
        assert!(body[0].as_note_line().is_some());
    }

    #[test]
    fn parse_block_and_play() {
        let src = "block riff {\n  x = 1\n  [C:4 E:4]\n}\nplay riff\n";
        let prog = parse(src).unwrap();
        assert_eq!(prog.commands.len(), 2);
        let Command::BlockDefinition { name, commands } = &prog.commands[0] else {
            panic!("expected block definition");
        };
        assert_eq!(name, "riff");
        assert_eq!(commands.len(), 2);
        assert_eq!(prog.commands[1], Command::PlayBlock("riff".into()));
    }

    #[test]
    fn parse_nested_bodies() {
        let src = "block a { while n != 0 { n -= 1 } }";
        let prog = parse(src).unwrap();
        let Command::BlockDefinition { commands, .. } = &prog.commands[0] else {
            panic!("expected block definition");
        };
        assert!(matches!(commands[0], Command::While { .. }));
    }

    #[test]
    fn error_on_bad_duration() {
        let err = parse("\n  [C:3]").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);
        assert_eq!((err.line, err.col), (2, 3));
        assert!(err.message.contains("C:3"));
    }

    #[test]
    fn error_on_bad_letter() {
        assert!(parse("[H4:4]").is_err());
        assert!(parse("[c4:4]").is_err());
    }

    #[test]
    fn error_on_missing_duration() {
        assert!(parse("[C4]").is_err());
    }

    #[test]
    fn error_on_bad_octave() {
        assert!(parse("[C4x:4]").is_err());
        assert!(parse("[C$:4]").is_err());
        assert!(parse("[C$1a:4]").is_err());
    }

    #[test]
    fn error_on_empty_note_line() {
        assert!(parse("[ ]").is_err());
    }

    #[test]
    fn error_on_unclosed_body() {
        let err = parse("block a {\n [C:4]\n").unwrap_err();
        assert!(err.message.contains("unclosed"));
    }

    #[test]
    fn error_on_stray_close_brace() {
        assert!(parse("}").is_err());
    }

    #[test]
    fn error_on_missing_value() {
        assert!(parse("x =").is_err());
        assert!(parse("x 3").is_err());
    }

    #[test]
    fn error_on_missing_comparator() {
        assert!(parse("while x 3 { }").is_err());
    }
}
