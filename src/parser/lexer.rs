//! Lexer for template text using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    // Placeholder delimiters (longer patterns first)
    #[token("{{")]
    Open,
    #[token("}}")]
    Close,

    // A lone brace is ordinary text
    #[regex(r"[{}]", |lex| lex.slice().chars().next())]
    Brace(char),

    // Everything that is not a brace, newlines included
    #[regex(r"[^{}]+", |lex| lex.slice().to_string())]
    Text(String),
}

/// Lex input string into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}
