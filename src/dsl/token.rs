//! Token types for the score lexer.

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub col: usize,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords
    While,
    Block,
    Play,

    // Literals
    Ident(String),
    Integer(i64),
    /// Raw entries of a bracketed note line, e.g. `["C#5:4", "r:2"]`.
    NoteLine(Vec<String>),

    // Assignment operators
    Assign,  // =
    PlusEq,  // +=
    MinusEq, // -=
    StarEq,  // *=
    SlashEq, // /=

    // Comparators
    EqEq,  // ==
    NotEq, // !=
    Lt,    // <
    LtEq,  // <=
    Gt,    // >
    GtEq,  // >=

    // Delimiters
    LBrace,
    RBrace,

    // Special
    Newline,
    Eof,
}
