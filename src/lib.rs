//! deplog: modeling and safety analysis of database schema dependencies
//!
//! A small language for logic-based schema constraints — predicates,
//! derivation rules (views), tuple-generating dependencies (TGDs) and
//! equality-generating dependencies (EGDs) — with two analyses over them:
//! structural equivalence of logic fragments up to consistent renaming, and
//! a decision procedure for whether a schema's EGDs can safely be treated
//! as key dependencies alongside its TGDs (the pre-check a terminating
//! chase needs, not the chase itself).

pub mod ast;
pub mod builder;
pub mod conflict;
pub mod core;
pub mod error;
pub mod fd;
pub mod isomorphism;
pub mod lexer;
pub mod naming;
pub mod parser;
pub mod pretty;
pub mod schema;

pub use builder::SchemaBuilder;
pub use error::ParseError;
pub use lexer::lexer;
pub use parser::parser;
pub use pretty::pretty_print;
pub use schema::{DependencySchema, SchemaError, SchemaResult};

/// Parse a deplog source string into a specification tree
pub fn parse(input: &str) -> Result<ast::SchemaFile, ParseError> {
    use chumsky::prelude::*;

    let tokens = lexer::lexer().parse(input).map_err(ParseError::Lex)?;

    let len = input.len();
    parser::parser()
        .parse(chumsky::Stream::from_iter(len..len + 1, tokens.into_iter()))
        .map_err(ParseError::Parse)
}
