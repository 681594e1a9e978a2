//! Lexer for deplog schema sources
//!
//! Tokenizes source into a stream for the parser.

use chumsky::prelude::*;
use std::ops::Range;

/// Token types for deplog
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    // Keywords
    Pred,
    Not,
    True,
    False,

    // Atoms of the token stream
    Ident(String),
    Number(String),
    Str(String),

    // Punctuation
    LParen,    // (
    RParen,    // )
    Comma,     // ,
    Semicolon, // ;
    Slash,     // /
    Arrow,     // ->
    Derives,   // :-
    Eq,        // =
    Neq,       // <>
    Lt,        // <
    Leq,       // <=
    Gt,        // >
    Geq,       // >=
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Pred => write!(f, "pred"),
            Token::Not => write!(f, "not"),
            Token::True => write!(f, "TRUE"),
            Token::False => write!(f, "FALSE"),
            Token::Ident(s) => write!(f, "{}", s),
            Token::Number(s) => write!(f, "{}", s),
            Token::Str(s) => write!(f, "\"{}\"", s),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
            Token::Slash => write!(f, "/"),
            Token::Arrow => write!(f, "->"),
            Token::Derives => write!(f, ":-"),
            Token::Eq => write!(f, "="),
            Token::Neq => write!(f, "<>"),
            Token::Lt => write!(f, "<"),
            Token::Leq => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::Geq => write!(f, ">="),
        }
    }
}

/// Type alias for spans
pub type Span = Range<usize>;

/// Create a lexer for deplog sources
pub fn lexer() -> impl Parser<char, Vec<(Token, Span)>, Error = Simple<char>> {
    let keyword_or_ident = text::ident().map(|s: String| match s.as_str() {
        "pred" => Token::Pred,
        "not" => Token::Not,
        "TRUE" => Token::True,
        "FALSE" => Token::False,
        _ => Token::Ident(s),
    });

    // Integers and decimals; the digits are kept verbatim
    let number = text::int(10)
        .then(just('.').ignore_then(text::digits(10)).or_not())
        .map(|(int, frac): (String, Option<String>)| match frac {
            Some(frac) => Token::Number(format!("{}.{}", int, frac)),
            None => Token::Number(int),
        });

    // Double-quoted string constants, no escapes
    let string = just('"')
        .ignore_then(filter(|c: &char| *c != '"').repeated())
        .then_ignore(just('"'))
        .map(|chars: Vec<char>| Token::Str(chars.into_iter().collect()));

    // Multi-character operators must come before their prefixes
    let punctuation = choice((
        just("->").to(Token::Arrow),
        just(":-").to(Token::Derives),
        just("<=").to(Token::Leq),
        just("<>").to(Token::Neq),
        just(">=").to(Token::Geq),
        just('<').to(Token::Lt),
        just('>').to(Token::Gt),
        just('=').to(Token::Eq),
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just(',').to(Token::Comma),
        just(';').to(Token::Semicolon),
        just('/').to(Token::Slash),
    ));

    // Comments: // to end of line (handles both mid-file and end-of-file)
    // Must be checked before single / so it is not read as two Slash tokens
    let line_comment = just("//")
        .then(none_of('\n').repeated())
        .then(just('\n').or_not())
        .ignored();

    let token_or_skip = line_comment
        .to(None)
        .or(choice((keyword_or_ident, number, string, punctuation)).map(Some));

    token_or_skip
        .map_with_span(|opt_tok, span| opt_tok.map(|tok| (tok, span)))
        .padded()
        .repeated()
        .then_ignore(end())
        .map(|items| items.into_iter().flatten().collect())
}
