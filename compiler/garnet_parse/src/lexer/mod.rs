//! Tokenizer built on logos.
//!
//! Tokens carry no payload; the parser slices the source with each token's
//! span when it needs the text.

use garnet_diagnostic::{Diagnostic, ErrorCode};
use garnet_ir::{FileRef, Loc, Span};
use logos::Logos;

#[derive(Logos, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r]+")]
pub enum Token {
    // Comments (including the `# typed:` sigil)
    #[regex(r"#[^\n]*", logos::skip)]
    Comment,

    // Newlines separate statements
    #[token("\n")]
    Newline,
    #[token(";")]
    Semi,

    // Keywords
    #[token("class")]
    Class,
    #[token("module")]
    Module,
    #[token("def")]
    Def,
    #[token("end")]
    End,
    #[token("if")]
    If,
    #[token("elsif")]
    Elsif,
    #[token("else")]
    Else,
    #[token("unless")]
    Unless,
    #[token("then")]
    Then,
    #[token("return")]
    Return,
    #[token("self")]
    SelfKw,
    #[token("nil")]
    Nil,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // Punctuation
    #[token("::")]
    ColonColon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    // Assignment
    #[token("=")]
    Eq,
    #[token("||=")]
    OrAssign,
    #[token("&&=")]
    AndAssign,
    #[token("+=")]
    PlusAssign,

    // Operators
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Bang,

    // Literals
    #[regex(r"[0-9]+")]
    Int,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,
    #[regex(r":[a-zA-Z_][a-zA-Z0-9_]*[?=]?")]
    Symbol,

    // Variables and names
    #[regex(r"@@[a-zA-Z_][a-zA-Z0-9_]*")]
    ClassVar,
    #[regex(r"@[a-zA-Z_][a-zA-Z0-9_]*")]
    InstanceVar,
    #[regex(r"\$[a-zA-Z_][a-zA-Z0-9_]*")]
    GlobalVar,
    #[regex(r"[A-Z][a-zA-Z0-9_]*")]
    Constant,
    #[regex(r"[a-z_][a-zA-Z0-9_]*\??")]
    Ident,

    /// Appended after the last real token.
    Eof,
}

impl Token {
    /// Whether the token ends a statement.
    #[inline]
    pub fn is_terminator(self) -> bool {
        matches!(self, Token::Newline | Token::Semi | Token::Eof)
    }

    /// Whether the token may begin an argument of a call written without
    /// parentheses (`attr_reader :a`, `include Foo`).
    pub fn starts_command_arg(self) -> bool {
        matches!(
            self,
            Token::Int
                | Token::Str
                | Token::Symbol
                | Token::Constant
                | Token::Ident
                | Token::InstanceVar
                | Token::ClassVar
                | Token::GlobalVar
                | Token::Nil
                | Token::True
                | Token::False
                | Token::SelfKw
                | Token::ColonColon
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Lexed {
    pub token: Token,
    pub span: Span,
}

/// Tokenize `source`. Unrecognized characters are reported and skipped.
/// The result always ends with `Token::Eof`.
pub fn tokenize(source: &str, file: FileRef, errors: &mut Vec<Diagnostic>) -> Vec<Lexed> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::from_range(lexer.span());
        match result {
            Ok(token) => tokens.push(Lexed { token, span }),
            Err(()) => errors.push(
                Diagnostic::error(ErrorCode::E1005)
                    .with_message(format!("Unrecognized character `{}`", lexer.slice()))
                    .at(Loc::new(file, span)),
            ),
        }
    }

    let end = u32::try_from(source.len()).unwrap_or(u32::MAX);
    tokens.push(Lexed {
        token: Token::Eof,
        span: Span::new(end, end),
    });
    tokens
}
