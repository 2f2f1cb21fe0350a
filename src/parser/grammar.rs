//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::parser::ast::*;
use crate::parser::lexer::Token;

/// Placeholder names follow identifier rules
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parse template text into literal and placeholder segments
pub fn parse_text(input: &str) -> Result<TemplateText, Vec<crate::ParseError>> {
    run(input, false)
}

/// Parse template text, keeping malformed placeholders as literal text
///
/// An unterminated `{{` or a `{{ ... }}` whose name is not an identifier
/// comes out exactly as written, so printing never stops on it.
pub fn parse_text_lenient(input: &str) -> TemplateText {
    run(input, true).unwrap_or_else(|_| TemplateText {
        segments: vec![Spanned::new(Segment::Literal(input.to_string()), 0..input.len())],
    })
}

fn run(input: &str, lenient: bool) -> Result<TemplateText, Vec<crate::ParseError>> {
    let len = input.len();

    let token_iter = crate::parser::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    text_parser(lenient)
        .parse(token_stream)
        .into_result()
        .map(merge_literals)
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn text_parser<'a, I>(
    lenient: bool,
) -> impl Parser<'a, I, TemplateText, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let literal = select! {
        Token::Text(s) => s,
        Token::Brace(c) => c.to_string(),
        Token::Close => "}}".to_string(),
    }
    .map_with(|s, e| Spanned::new(Segment::Literal(s), span_range(&e.span())));

    let name = select! {
        Token::Text(s) => s,
    }
    .try_map(|s, span| {
        let trimmed = s.trim();
        if is_valid_name(trimmed) {
            Ok(Identifier::new(trimmed))
        } else {
            Err(Rich::custom(
                span,
                format!("invalid placeholder name '{}'", trimmed),
            ))
        }
    });

    let placeholder = name
        .delimited_by(just(Token::Open), just(Token::Close))
        .map_with(|id, e| Spanned::new(Segment::Placeholder(id), span_range(&e.span())));

    let segment = if lenient {
        let stray_open = select! {
            Token::Open => "{{".to_string(),
        }
        .map_with(|s, e| Spanned::new(Segment::Literal(s), span_range(&e.span())));
        choice((placeholder, literal, stray_open)).boxed()
    } else {
        choice((placeholder, literal)).boxed()
    };

    segment
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
        .map(|segments| TemplateText { segments })
}

/// Join adjacent literal segments so `a { b` comes out as one literal
fn merge_literals(text: TemplateText) -> TemplateText {
    let mut segments: Vec<Spanned<Segment>> = Vec::with_capacity(text.segments.len());
    for seg in text.segments {
        if let (Some(last), Segment::Literal(s)) = (segments.last_mut(), &seg.node) {
            if let Segment::Literal(prev) = &mut last.node {
                prev.push_str(s);
                last.span = last.span.start..seg.span.end;
                continue;
            }
        }
        segments.push(seg);
    }
    TemplateText { segments }
}
