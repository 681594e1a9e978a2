//! Unit tests for the lexer and parser

use deplog::ast::{Declaration, LiteralSpec, TermSpec};
use deplog::core::ComparisonOp;
use deplog::parse;

#[test]
fn test_parse_predicate_declaration() {
    let file = parse("pred Emp/3;").expect("parse failed");
    assert_eq!(file.declarations.len(), 1);

    if let Declaration::Predicate(p) = &file.declarations[0].node {
        assert_eq!(p.name, "Emp");
        assert_eq!(p.arity, 3);
    } else {
        panic!("expected predicate declaration");
    }
}

#[test]
fn test_parse_tgd() {
    let file = parse("Emp(e, d), Dept(d) -> Mgr(e);").expect("parse failed");
    assert_eq!(file.declarations.len(), 1);

    if let Declaration::Dependency(dep) = &file.declarations[0].node {
        assert_eq!(dep.body.len(), 2);
        assert_eq!(dep.head.len(), 1);
        if let LiteralSpec::Atom { atom, negated } = &dep.body[0] {
            assert_eq!(atom.predicate, "Emp");
            assert_eq!(atom.terms.len(), 2);
            assert!(!*negated);
        } else {
            panic!("expected ordinary literal");
        }
    } else {
        panic!("expected dependency");
    }
}

#[test]
fn test_parse_egd_head() {
    let file = parse("P(x, y1), P(x, y2) -> y1 = y2;").expect("parse failed");

    if let Declaration::Dependency(dep) = &file.declarations[0].node {
        assert_eq!(dep.body.len(), 2);
        assert_eq!(dep.head.len(), 1);
        match &dep.head[0] {
            LiteralSpec::Comparison { op, lhs, rhs } => {
                assert_eq!(*op, ComparisonOp::Eq);
                assert_eq!(*lhs, TermSpec::Name("y1".to_string()));
                assert_eq!(*rhs, TermSpec::Name("y2".to_string()));
            }
            other => panic!("expected comparison head, got {:?}", other),
        }
    } else {
        panic!("expected dependency");
    }
}

#[test]
fn test_parse_rule() {
    let file = parse("Senior(e) :- Emp(e, d), not Junior(e);").expect("parse failed");

    if let Declaration::Rule(rule) = &file.declarations[0].node {
        assert_eq!(rule.head.predicate, "Senior");
        assert_eq!(rule.head.terms.len(), 1);
        assert_eq!(rule.body.len(), 2);
        assert!(matches!(&rule.body[1], LiteralSpec::Atom { negated: true, .. }));
    } else {
        panic!("expected rule");
    }
}

#[test]
fn test_parse_comparisons_and_builtins() {
    let file = parse("P(x), x <= y, TRUE() -> Q(x);").expect("parse failed");

    if let Declaration::Dependency(dep) = &file.declarations[0].node {
        assert_eq!(dep.body.len(), 3);
        assert!(matches!(
            &dep.body[1],
            LiteralSpec::Comparison {
                op: ComparisonOp::Leq,
                ..
            }
        ));
        assert!(matches!(
            &dep.body[2],
            LiteralSpec::Boolean { value: true, terms } if terms.is_empty()
        ));
    } else {
        panic!("expected dependency");
    }
}

#[test]
fn test_parse_constant_terms() {
    let file = parse(r#"P(x, 42, "alice") -> Q(x);"#).expect("parse failed");

    if let Declaration::Dependency(dep) = &file.declarations[0].node {
        if let LiteralSpec::Atom { atom, .. } = &dep.body[0] {
            assert_eq!(atom.terms[1], TermSpec::Number("42".to_string()));
            assert_eq!(atom.terms[2], TermSpec::Str("alice".to_string()));
        } else {
            panic!("expected ordinary literal");
        }
    } else {
        panic!("expected dependency");
    }
}

#[test]
fn test_parse_zero_arity_atoms() {
    let file = parse("Init() -> Ready();").expect("parse failed");

    if let Declaration::Dependency(dep) = &file.declarations[0].node {
        if let LiteralSpec::Atom { atom, .. } = &dep.body[0] {
            assert_eq!(atom.predicate, "Init");
            assert!(atom.terms.is_empty());
        } else {
            panic!("expected ordinary literal");
        }
    } else {
        panic!("expected dependency");
    }
}

#[test]
fn test_parse_comments_and_multiple_declarations() {
    let input = r#"
// employee schema
pred Emp/2;
Emp(e, d) -> Dept(d); // every employee's department exists
"#;
    let file = parse(input).expect("parse failed");
    assert_eq!(file.declarations.len(), 2);
}

#[test]
fn test_parse_decimal_numbers() {
    let file = parse("P(x), x < 3.14 -> Q(x);").expect("parse failed");

    if let Declaration::Dependency(dep) = &file.declarations[0].node {
        assert!(matches!(
            &dep.body[1],
            LiteralSpec::Comparison { rhs: TermSpec::Number(n), .. } if n == "3.14"
        ));
    } else {
        panic!("expected dependency");
    }
}

#[test]
fn test_parse_error_on_missing_semicolon() {
    assert!(parse("P(x) -> Q(x)").is_err());
}

#[test]
fn test_parse_error_on_unclosed_atom() {
    assert!(parse("P(x -> Q(x);").is_err());
}

#[test]
fn test_parse_error_on_bad_arity() {
    assert!(parse("pred P/x;").is_err());
}

#[test]
fn test_parse_error_formatting_mentions_source() {
    let source = "P(x) -> ;";
    let err = parse(source).expect_err("expected a parse error");
    let formatted = err.format(source);
    assert!(!formatted.is_empty());
}

#[test]
fn test_parse_empty_input() {
    let file = parse("").expect("parse failed");
    assert!(file.declarations.is_empty());
}
