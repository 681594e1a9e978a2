//! Structural equivalence of literal collections up to consistent renaming
//!
//! Backtracking search for a bijection on variables (and, as an opt-in, on
//! predicates) mapping one literal collection onto another as a multiset.
//! Maps are copied on every tentative extension, so a failed branch is
//! discarded whole and sibling branches never observe each other's bindings.
//! Constants are never renamed; two constants match only by equal name.

use std::collections::HashMap;

use crate::core::{Dependency, Literal, PredId, Query, Term};

/// Comparator configuration
#[derive(Clone, Copy, Debug, Default)]
pub struct CompareOptions {
    /// Allow a bijective renaming of predicates. When off (the default),
    /// ordinary literals must use identical predicates.
    pub rename_predicates: bool,
}

impl CompareOptions {
    pub fn renaming_predicates() -> Self {
        Self {
            rename_predicates: true,
        }
    }
}

/// A partial injective mapping between terms.
///
/// Constants are compatible only with equal-named constants and are never
/// entered into the map; variables map injectively onto variables.
#[derive(Clone, Debug, Default)]
pub struct TermMap {
    forward: HashMap<Term, Term>,
    inverse: HashMap<Term, Term>,
}

impl TermMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `from -> to` is already present or could be added without
    /// breaking injectivity
    pub fn compatible(&self, from: &Term, to: &Term) -> bool {
        match (from, to) {
            (Term::Constant(a), Term::Constant(b)) => a == b,
            (Term::Variable(_), Term::Variable(_)) => match self.forward.get(from) {
                Some(image) => image == to,
                None => !self.inverse.contains_key(to),
            },
            _ => false,
        }
    }

    /// A copy of this map extended with `from -> to`, or None if the pair
    /// is incompatible
    pub fn extended(&self, from: &Term, to: &Term) -> Option<Self> {
        if !self.compatible(from, to) {
            return None;
        }
        let mut next = self.clone();
        if from.is_variable() {
            next.forward.insert(from.clone(), to.clone());
            next.inverse.insert(to.clone(), from.clone());
        }
        Some(next)
    }

    /// The current image of a term, if mapped
    pub fn image_of(&self, from: &Term) -> Option<&Term> {
        self.forward.get(from)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// A partial injective mapping between predicates
#[derive(Clone, Debug, Default)]
pub struct PredicateMap {
    forward: HashMap<PredId, PredId>,
    inverse: HashMap<PredId, PredId>,
}

impl PredicateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compatible(&self, from: PredId, to: PredId) -> bool {
        match self.forward.get(&from) {
            Some(&image) => image == to,
            None => !self.inverse.contains_key(&to),
        }
    }

    pub fn extended(&self, from: PredId, to: PredId) -> Option<Self> {
        if !self.compatible(from, to) {
            return None;
        }
        let mut next = self.clone();
        next.forward.insert(from, to);
        next.inverse.insert(to, from);
        Some(next)
    }
}

/// Decide whether two literal collections are isomorphic: some bijection on
/// variables (and predicates, when enabled) maps the left collection onto
/// the right as a multiset
pub fn isomorphic(left: &[Literal], right: &[Literal], options: CompareOptions) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut matched = vec![false; right.len()];
    search(
        left,
        right,
        0,
        &TermMap::new(),
        &PredicateMap::new(),
        &mut matched,
        options,
        &|_, _| true,
    )
}

/// Compare two derivation-rule queries: bodies must be isomorphic and the
/// head term lists must correspond under the same mapping
pub fn queries_isomorphic(left: &Query, right: &Query, options: CompareOptions) -> bool {
    if left.body.len() != right.body.len() || left.head.len() != right.head.len() {
        return false;
    }
    let mut matched = vec![false; right.body.len()];
    search(
        &left.body,
        &right.body,
        0,
        &TermMap::new(),
        &PredicateMap::new(),
        &mut matched,
        options,
        &|terms, _| extend_pairwise(terms, &left.head, &right.head).is_some(),
    )
}

/// Compare two dependencies of the same kind: bodies and heads must each be
/// isomorphic under one shared mapping. Body literals never match against
/// head literals.
pub fn dependencies_isomorphic(left: &Dependency, right: &Dependency, options: CompareOptions) -> bool {
    let (left_head, right_head) = match (left, right) {
        (Dependency::Tgd(l), Dependency::Tgd(r)) => {
            let lh: Vec<Literal> = l.head.iter().cloned().map(Literal::positive).collect();
            let rh: Vec<Literal> = r.head.iter().cloned().map(Literal::positive).collect();
            (lh, rh)
        }
        (Dependency::Egd(l), Dependency::Egd(r)) => (
            vec![Literal::BuiltIn(l.head.clone())],
            vec![Literal::BuiltIn(r.head.clone())],
        ),
        _ => return false,
    };
    let (left_body, right_body) = (left.body(), right.body());
    if left_body.len() != right_body.len() || left_head.len() != right_head.len() {
        return false;
    }

    let mut matched_body = vec![false; right_body.len()];
    search(
        left_body,
        right_body,
        0,
        &TermMap::new(),
        &PredicateMap::new(),
        &mut matched_body,
        options,
        &|terms, predicates| {
            let mut matched_head = vec![false; right_head.len()];
            search(
                &left_head,
                &right_head,
                0,
                terms,
                predicates,
                &mut matched_head,
                options,
                &|_, _| true,
            )
        },
    )
}

/// The backtracking matcher. Places left literals one at a time against
/// unmatched right candidates; on placing them all, `on_complete` gets the
/// final maps and may impose further conditions (head correspondence).
#[allow(clippy::too_many_arguments)]
fn search(
    left: &[Literal],
    right: &[Literal],
    index: usize,
    terms: &TermMap,
    predicates: &PredicateMap,
    matched: &mut [bool],
    options: CompareOptions,
    on_complete: &dyn Fn(&TermMap, &PredicateMap) -> bool,
) -> bool {
    if index == left.len() {
        // sizes were equal up front, so every right literal is matched here
        return on_complete(terms, predicates);
    }
    let current = &left[index];
    for (candidate, literal) in right.iter().enumerate() {
        if matched[candidate] {
            continue;
        }
        if let Some((next_terms, next_predicates)) =
            match_literal(current, literal, terms, predicates, options)
        {
            matched[candidate] = true;
            if search(
                left,
                right,
                index + 1,
                &next_terms,
                &next_predicates,
                matched,
                options,
                on_complete,
            ) {
                return true;
            }
            matched[candidate] = false;
        }
    }
    false
}

/// Structural compatibility of one left/right literal pair under the current
/// maps; on success returns the extended copies
fn match_literal(
    left: &Literal,
    right: &Literal,
    terms: &TermMap,
    predicates: &PredicateMap,
    options: CompareOptions,
) -> Option<(TermMap, PredicateMap)> {
    match (left, right) {
        (Literal::Ordinary(l), Literal::Ordinary(r)) => {
            if l.polarity != r.polarity || l.atom.terms.len() != r.atom.terms.len() {
                return None;
            }
            let predicates = if options.rename_predicates {
                predicates.extended(l.atom.predicate, r.atom.predicate)?
            } else if l.atom.predicate == r.atom.predicate {
                predicates.clone()
            } else {
                return None;
            };
            let terms = extend_pairwise(terms, &l.atom.terms, &r.atom.terms)?;
            Some((terms, predicates))
        }
        (Literal::BuiltIn(l), Literal::BuiltIn(r)) => {
            if l.op != r.op || l.terms.len() != r.terms.len() {
                return None;
            }
            let terms = extend_pairwise(terms, &l.terms, &r.terms)?;
            Some((terms, predicates.clone()))
        }
        _ => None,
    }
}

/// Extend a term map with positionwise bindings. Each binding is checked
/// against the partially-extended copy, so a variable repeated on one side
/// must meet the same partner on the other.
fn extend_pairwise(map: &TermMap, from: &[Term], to: &[Term]) -> Option<TermMap> {
    if from.len() != to.len() {
        return None;
    }
    let mut map = map.clone();
    for (f, t) in from.iter().zip(to) {
        map = map.extended(f, t)?;
    }
    Some(map)
}
