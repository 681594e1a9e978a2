//! Unit tests for the structural-equivalence comparator

use deplog::core::{
    Atom, BuiltInLiteral, ComparisonOp, Dependency, Egd, Literal, PredId, Query, Term, Tgd,
};
use deplog::isomorphism::{
    dependencies_isomorphic, isomorphic, queries_isomorphic, CompareOptions, PredicateMap, TermMap,
};

const P: PredId = 0;
const Q: PredId = 1;
const R: PredId = 2;

fn var(name: &str) -> Term {
    Term::variable(name)
}

fn cons(name: &str) -> Term {
    Term::constant(name)
}

fn lit(pred: PredId, terms: Vec<Term>) -> Literal {
    Literal::positive(Atom::new(pred, terms))
}

fn default() -> CompareOptions {
    CompareOptions::default()
}

#[test]
fn test_variable_renaming_is_isomorphic() {
    // [P(x), Q(x, y)] vs [P(a), Q(a, b)] via x -> a, y -> b
    let left = vec![lit(P, vec![var("x")]), lit(Q, vec![var("x"), var("y")])];
    let right = vec![lit(P, vec![var("a")]), lit(Q, vec![var("a"), var("b")])];
    assert!(isomorphic(&left, &right, default()));
}

#[test]
fn test_variable_merging_is_not_isomorphic() {
    // [P(x), Q(x, y)] vs [P(a), Q(a, a)]: y cannot also map to a
    let left = vec![lit(P, vec![var("x")]), lit(Q, vec![var("x"), var("y")])];
    let right = vec![lit(P, vec![var("a")]), lit(Q, vec![var("a"), var("a")])];
    assert!(!isomorphic(&left, &right, default()));
    assert!(!isomorphic(&right, &left, default()));
}

#[test]
fn test_size_mismatch_is_not_isomorphic() {
    let left = vec![lit(P, vec![var("x")])];
    let right = vec![lit(P, vec![var("a")]), lit(P, vec![var("b")])];
    assert!(!isomorphic(&left, &right, default()));
}

#[test]
fn test_literal_order_is_irrelevant() {
    let left = vec![lit(P, vec![var("x")]), lit(Q, vec![var("x"), var("y")])];
    let right = vec![lit(Q, vec![var("a"), var("b")]), lit(P, vec![var("a")])];
    assert!(isomorphic(&left, &right, default()));
}

#[test]
fn test_constants_match_only_by_name() {
    assert!(isomorphic(
        &[lit(P, vec![cons("alice")])],
        &[lit(P, vec![cons("alice")])],
        default()
    ));
    assert!(!isomorphic(
        &[lit(P, vec![cons("alice")])],
        &[lit(P, vec![cons("bob")])],
        default()
    ));
}

#[test]
fn test_constant_never_matches_variable() {
    assert!(!isomorphic(
        &[lit(P, vec![cons("alice")])],
        &[lit(P, vec![var("x")])],
        default()
    ));
    assert!(!isomorphic(
        &[lit(P, vec![var("x")])],
        &[lit(P, vec![cons("alice")])],
        default()
    ));
}

#[test]
fn test_polarity_must_agree() {
    let left = vec![Literal::negated(Atom::new(P, vec![var("x")]))];
    let right = vec![lit(P, vec![var("a")])];
    assert!(!isomorphic(&left, &right, default()));
}

#[test]
fn test_builtin_operators_must_agree() {
    let lt = vec![Literal::BuiltIn(BuiltInLiteral::comparison(
        ComparisonOp::Lt,
        var("x"),
        var("y"),
    ))];
    let lt2 = vec![Literal::BuiltIn(BuiltInLiteral::comparison(
        ComparisonOp::Lt,
        var("a"),
        var("b"),
    ))];
    let leq = vec![Literal::BuiltIn(BuiltInLiteral::comparison(
        ComparisonOp::Leq,
        var("a"),
        var("b"),
    ))];
    assert!(isomorphic(&lt, &lt2, default()));
    assert!(!isomorphic(&lt, &leq, default()));
}

#[test]
fn test_builtin_never_matches_ordinary() {
    let built_in = vec![Literal::BuiltIn(BuiltInLiteral::comparison(
        ComparisonOp::Eq,
        var("x"),
        var("y"),
    ))];
    let ordinary = vec![lit(P, vec![var("a"), var("b")])];
    assert!(!isomorphic(&built_in, &ordinary, default()));
}

#[test]
fn test_repeated_variable_requires_repeated_partner() {
    // P(x, x) forces both positions onto the same image
    let left = vec![lit(P, vec![var("x"), var("x")])];
    assert!(isomorphic(&left, &[lit(P, vec![var("a"), var("a")])], default()));
    assert!(!isomorphic(&left, &[lit(P, vec![var("a"), var("b")])], default()));
}

#[test]
fn test_predicate_identity_required_by_default() {
    let left = vec![lit(P, vec![var("x")])];
    let right = vec![lit(Q, vec![var("a")])];
    assert!(!isomorphic(&left, &right, default()));
    assert!(isomorphic(&left, &right, CompareOptions::renaming_predicates()));
}

#[test]
fn test_predicate_renaming_is_injective() {
    // P and Q cannot both map onto R
    let left = vec![lit(P, vec![var("x")]), lit(Q, vec![var("y")])];
    let right = vec![lit(R, vec![var("a")]), lit(R, vec![var("b")])];
    assert!(!isomorphic(&left, &right, CompareOptions::renaming_predicates()));
}

#[test]
fn test_predicate_renaming_is_consistent() {
    // both occurrences of P must map to the same predicate
    let left = vec![lit(P, vec![var("x")]), lit(P, vec![var("y")])];
    let right = vec![lit(Q, vec![var("a")]), lit(R, vec![var("b")])];
    assert!(!isomorphic(&left, &right, CompareOptions::renaming_predicates()));

    let right_consistent = vec![lit(Q, vec![var("a")]), lit(Q, vec![var("b")])];
    assert!(isomorphic(&left, &right_consistent, CompareOptions::renaming_predicates()));
}

#[test]
fn test_empty_collections_are_isomorphic() {
    assert!(isomorphic(&[], &[], default()));
}

#[test]
fn test_backtracking_finds_the_valid_assignment() {
    // matching P(x) against P(a) succeeds locally but dead-ends at Q(x);
    // the search must undo it and take P(b) instead
    let left = vec![
        lit(P, vec![var("x")]),
        lit(P, vec![var("y")]),
        lit(Q, vec![var("x")]),
    ];
    let right = vec![
        lit(P, vec![var("a")]),
        lit(P, vec![var("b")]),
        lit(Q, vec![var("b")]),
    ];
    assert!(isomorphic(&left, &right, default()));
}

#[test]
fn test_term_map_injectivity_bookkeeping() {
    let map = TermMap::new();
    assert!(map.is_empty());

    let map = map.extended(&var("x"), &var("a")).expect("first binding");
    assert_eq!(map.image_of(&var("x")), Some(&var("a")));
    assert_eq!(map.len(), 1);

    // x is already mapped to a
    assert!(map.compatible(&var("x"), &var("a")));
    assert!(!map.compatible(&var("x"), &var("b")));
    // a is already the image of x
    assert!(!map.compatible(&var("y"), &var("a")));
    assert!(map.extended(&var("y"), &var("a")).is_none());

    // constants never enter the map
    let map = map.extended(&cons("c"), &cons("c")).expect("constant pair");
    assert_eq!(map.len(), 1);
}

#[test]
fn test_predicate_map_injectivity_bookkeeping() {
    let map = PredicateMap::new();
    let map = map.extended(P, Q).expect("first binding");
    assert!(map.compatible(P, Q));
    assert!(!map.compatible(P, R));
    assert!(!map.compatible(R, Q));
    assert!(map.extended(R, Q).is_none());
}

#[test]
fn test_queries_isomorphic_respects_heads() {
    let q1 = Query {
        head: vec![var("x")],
        body: vec![lit(P, vec![var("x"), var("y")])],
    };
    let q2 = Query {
        head: vec![var("a")],
        body: vec![lit(P, vec![var("a"), var("b")])],
    };
    let q3 = Query {
        head: vec![var("b")],
        body: vec![lit(P, vec![var("a"), var("b")])],
    };
    assert!(queries_isomorphic(&q1, &q2, default()));
    assert!(!queries_isomorphic(&q1, &q3, default()));
}

#[test]
fn test_dependency_bodies_and_heads_do_not_mix() {
    // swapping body and head yields a different dependency even though the
    // combined literal multisets correspond
    let forward = Dependency::Tgd(Tgd {
        body: vec![lit(P, vec![var("x")])],
        head: vec![Atom::new(Q, vec![var("x")])],
    });
    let backward = Dependency::Tgd(Tgd {
        body: vec![lit(Q, vec![var("y")])],
        head: vec![Atom::new(P, vec![var("y")])],
    });
    assert!(!dependencies_isomorphic(&forward, &backward, default()));
    assert!(dependencies_isomorphic(&forward, &forward, default()));
}

#[test]
fn test_egds_isomorphic_up_to_renaming() {
    let left = Dependency::Egd(Egd {
        body: vec![
            lit(P, vec![var("x"), var("y1")]),
            lit(P, vec![var("x"), var("y2")]),
        ],
        head: BuiltInLiteral::equality(var("y1"), var("y2")),
    });
    let right = Dependency::Egd(Egd {
        body: vec![
            lit(P, vec![var("k"), var("a")]),
            lit(P, vec![var("k"), var("b")]),
        ],
        head: BuiltInLiteral::equality(var("a"), var("b")),
    });
    assert!(dependencies_isomorphic(&left, &right, default()));
}

#[test]
fn test_tgd_never_isomorphic_to_egd() {
    let tgd = Dependency::Tgd(Tgd {
        body: vec![lit(P, vec![var("x")])],
        head: vec![Atom::new(Q, vec![var("x")])],
    });
    let egd = Dependency::Egd(Egd {
        body: vec![lit(P, vec![var("x")])],
        head: BuiltInLiteral::equality(var("x"), var("x")),
    });
    assert!(!dependencies_isomorphic(&tgd, &egd, default()));
}
