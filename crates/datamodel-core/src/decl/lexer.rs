//! Tokens of the type-reference syntax.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum TokenKind {
    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token("<")]
    AngleOpen,

    #[token(">")]
    AngleClose,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token(":")]
    Colon,

    #[token("?")]
    Question,

    #[token("*")]
    Star,

    #[token("&")]
    Amp,

    /// Type or field name. Backticks and dots allow host-style names such as
    /// `System.Guid` or ``List`1``.
    #[regex(r"[A-Za-z_][A-Za-z0-9_`.]*")]
    Ident,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'s> {
    pub kind: TokenKind,
    pub text: &'s str,
    pub offset: usize,
}

/// Tokenize a type reference. Returns the byte offset of the first
/// unrecognized character on failure.
pub fn lex(source: &str) -> Result<Vec<Token<'_>>, usize> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();
    while let Some(next) = lexer.next() {
        let span = lexer.span();
        match next {
            Ok(kind) => tokens.push(Token {
                kind,
                text: &source[span.clone()],
                offset: span.start,
            }),
            Err(()) => return Err(span.start),
        }
    }
    Ok(tokens)
}
