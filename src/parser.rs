//! Parser for deplog schema sources
//!
//! Parses token streams into the abstract specification tree.

use chumsky::prelude::*;

use crate::ast::*;
use crate::core::ComparisonOp;
use crate::lexer::{Span, Token};

/// Create a parser for a complete schema file
pub fn parser() -> impl Parser<Token, SchemaFile, Error = Simple<Token>> + Clone {
    declaration()
        .map_with_span(|decl, span| Spanned::new(decl, to_span(span)))
        .repeated()
        .then_ignore(end())
        .map(|declarations| SchemaFile { declarations })
}

fn to_span(span: Span) -> crate::ast::Span {
    crate::ast::Span::new(span.start, span.end)
}

// ============================================================================
// Helpers
// ============================================================================

fn ident() -> impl Parser<Token, String, Error = Simple<Token>> + Clone {
    select! {
        Token::Ident(s) => s,
    }
}

fn term() -> impl Parser<Token, TermSpec, Error = Simple<Token>> + Clone {
    select! {
        Token::Ident(s) => TermSpec::Name(s),
        Token::Number(n) => TermSpec::Number(n),
        Token::Str(s) => TermSpec::Str(s),
    }
}

fn comparison_op() -> impl Parser<Token, ComparisonOp, Error = Simple<Token>> + Clone {
    select! {
        Token::Eq => ComparisonOp::Eq,
        Token::Neq => ComparisonOp::Neq,
        Token::Lt => ComparisonOp::Lt,
        Token::Leq => ComparisonOp::Leq,
        Token::Gt => ComparisonOp::Gt,
        Token::Geq => ComparisonOp::Geq,
    }
}

// ============================================================================
// Atoms and literals
// ============================================================================

/// Parse an atom: `P(t, ...)` or a zero-arity `P()`
fn atom() -> impl Parser<Token, AtomSpec, Error = Simple<Token>> + Clone {
    ident()
        .then(
            term()
                .separated_by(just(Token::Comma))
                .delimited_by(just(Token::LParen), just(Token::RParen)),
        )
        .map(|(predicate, terms)| AtomSpec { predicate, terms })
}

fn literal() -> impl Parser<Token, LiteralSpec, Error = Simple<Token>> + Clone {
    // Negated atom: not P(x, ...)
    let negated = just(Token::Not).ignore_then(atom()).map(|atom| LiteralSpec::Atom {
        atom,
        negated: true,
    });

    // Boolean built-ins: TRUE(...) / FALSE(...)
    let boolean = choice((just(Token::True).to(true), just(Token::False).to(false)))
        .then(
            term()
                .separated_by(just(Token::Comma))
                .delimited_by(just(Token::LParen), just(Token::RParen)),
        )
        .map(|(value, terms)| LiteralSpec::Boolean { value, terms });

    // Comparison: t op t
    let comparison = term()
        .then(comparison_op())
        .then(term())
        .map(|((lhs, op), rhs)| LiteralSpec::Comparison { op, lhs, rhs });

    let positive = atom().map(|atom| LiteralSpec::Atom {
        atom,
        negated: false,
    });

    // An atom and a comparison can both start with an identifier; the atom
    // alternative wins on `P(`, the comparison on `x <`
    choice((negated, boolean, positive, comparison))
}

fn literals() -> impl Parser<Token, Vec<LiteralSpec>, Error = Simple<Token>> + Clone {
    literal().separated_by(just(Token::Comma)).at_least(1)
}

// ============================================================================
// Declarations
// ============================================================================

/// `pred P/2;`
fn predicate_decl() -> impl Parser<Token, PredicateDecl, Error = Simple<Token>> + Clone {
    let arity = select! { Token::Number(n) => n }.try_map(|n: String, span| {
        n.parse::<usize>()
            .map_err(|_| Simple::custom(span, "predicate arity must be a non-negative integer"))
    });

    just(Token::Pred)
        .ignore_then(ident())
        .then_ignore(just(Token::Slash))
        .then(arity)
        .then_ignore(just(Token::Semicolon))
        .map(|(name, arity)| PredicateDecl { name, arity })
}

/// `body -> head;`
fn dependency() -> impl Parser<Token, DependencySpec, Error = Simple<Token>> + Clone {
    literals()
        .then_ignore(just(Token::Arrow))
        .then(literals())
        .then_ignore(just(Token::Semicolon))
        .map(|(body, head)| DependencySpec { body, head })
}

/// `Head(t, ...) :- body;`
fn rule() -> impl Parser<Token, RuleSpec, Error = Simple<Token>> + Clone {
    atom()
        .then_ignore(just(Token::Derives))
        .then(literals())
        .then_ignore(just(Token::Semicolon))
        .map(|(head, body)| RuleSpec { head, body })
}

fn declaration() -> impl Parser<Token, Declaration, Error = Simple<Token>> + Clone {
    choice((
        predicate_decl().map(Declaration::Predicate),
        rule().map(Declaration::Rule),
        dependency().map(Declaration::Dependency),
    ))
}
