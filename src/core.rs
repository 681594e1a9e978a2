//! Core domain model for dependency schemas
//!
//! The typed, validated representation the analyses consume. Surface syntax
//! (ast.rs) is lowered into these types by the schema builder; everything
//! here is immutable plain data once built.

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexSet;

/// A unique identifier for predicates, indexing a schema's predicate table
pub type PredId = usize;

/// A term: a variable or a constant, identified by kind and name
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Variable(String),
    Constant(String),
}

impl Term {
    pub fn variable(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    pub fn constant(name: impl Into<String>) -> Self {
        Term::Constant(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Term::Variable(n) | Term::Constant(n) => n,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Term::Constant(_))
    }

    /// The variable name, if this term is a variable
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Term::Variable(n) => Some(n),
            Term::Constant(_) => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A predicate: a named relation with a fixed arity.
///
/// A predicate carrying at least one derivation-rule query is derived;
/// otherwise it is a base relation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Predicate {
    pub name: String,
    pub arity: usize,
    pub queries: Vec<Query>,
}

impl Predicate {
    pub fn base(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
            queries: Vec::new(),
        }
    }

    pub fn is_derived(&self) -> bool {
        !self.queries.is_empty()
    }
}

/// An atom: a predicate applied to an ordered list of terms.
///
/// The term count must equal the predicate's arity; the schema checks this
/// at construction time.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Atom {
    pub predicate: PredId,
    pub terms: Vec<Term>,
}

impl Atom {
    pub fn new(predicate: PredId, terms: Vec<Term>) -> Self {
        Self { predicate, terms }
    }

    /// Variable names of this atom, in positional order, with repetitions
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().filter_map(Term::as_variable)
    }
}

/// Polarity of an ordinary literal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Polarity {
    Positive,
    Negated,
}

/// An ordinary literal: a possibly negated atom
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OrdinaryLiteral {
    pub atom: Atom,
    pub polarity: Polarity,
}

impl OrdinaryLiteral {
    pub fn positive(atom: Atom) -> Self {
        Self {
            atom,
            polarity: Polarity::Positive,
        }
    }

    pub fn negated(atom: Atom) -> Self {
        Self {
            atom,
            polarity: Polarity::Negated,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.polarity == Polarity::Positive
    }
}

/// Binary comparison operators for built-in literals
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    Neq,
    Lt,
    Leq,
    Gt,
    Geq,
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Neq => "<>",
            ComparisonOp::Lt => "<",
            ComparisonOp::Leq => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Geq => ">=",
        };
        write!(f, "{}", text)
    }
}

/// The operator of a built-in literal
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BuiltInOp {
    Comparison(ComparisonOp),
    True,
    False,
    /// A named operation with no interpretation given here
    Custom(String),
}

/// A built-in literal: an operator applied to an ordered list of terms
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BuiltInLiteral {
    pub op: BuiltInOp,
    pub terms: Vec<Term>,
}

impl BuiltInLiteral {
    pub fn comparison(op: ComparisonOp, lhs: Term, rhs: Term) -> Self {
        Self {
            op: BuiltInOp::Comparison(op),
            terms: vec![lhs, rhs],
        }
    }

    pub fn equality(lhs: Term, rhs: Term) -> Self {
        Self::comparison(ComparisonOp::Eq, lhs, rhs)
    }

    /// A binary `=` literal, the only shape admissible as an EGD head
    pub fn is_equality(&self) -> bool {
        self.op == BuiltInOp::Comparison(ComparisonOp::Eq) && self.terms.len() == 2
    }
}

/// A body or head literal: ordinary (atom-based) or built-in
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    Ordinary(OrdinaryLiteral),
    BuiltIn(BuiltInLiteral),
}

impl Literal {
    pub fn positive(atom: Atom) -> Self {
        Literal::Ordinary(OrdinaryLiteral::positive(atom))
    }

    pub fn negated(atom: Atom) -> Self {
        Literal::Ordinary(OrdinaryLiteral::negated(atom))
    }

    /// The ordered terms of this literal
    pub fn terms(&self) -> &[Term] {
        match self {
            Literal::Ordinary(l) => &l.atom.terms,
            Literal::BuiltIn(l) => &l.terms,
        }
    }

    /// Variable names of this literal, in positional order, with repetitions
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.terms().iter().filter_map(Term::as_variable)
    }

    /// The atom, if this literal is a positive ordinary one
    pub fn as_positive_atom(&self) -> Option<&Atom> {
        match self {
            Literal::Ordinary(l) if l.is_positive() => Some(&l.atom),
            _ => None,
        }
    }
}

/// One disjunct of a derived predicate's extension: head terms plus body
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Query {
    pub head: Vec<Term>,
    pub body: Vec<Literal>,
}

/// Distinct variable names occurring in a literal collection, in
/// first-occurrence order
pub fn body_variables(body: &[Literal]) -> IndexSet<&str> {
    body.iter().flat_map(Literal::variables).collect()
}

/// A tuple-generating dependency: body implies existentially-quantified
/// head atoms
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tgd {
    pub body: Vec<Literal>,
    pub head: Vec<Atom>,
}

impl Tgd {
    /// Variables occurring in the body (universally quantified)
    pub fn universal_variables(&self) -> IndexSet<&str> {
        body_variables(&self.body)
    }

    /// Head variables that do not occur in the body
    pub fn existential_variables(&self) -> IndexSet<&str> {
        let universal = self.universal_variables();
        self.head
            .iter()
            .flat_map(Atom::variables)
            .filter(|v| !universal.contains(v))
            .collect()
    }
}

/// An equality-generating dependency: body forces two terms to be equal
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Egd {
    pub body: Vec<Literal>,
    pub head: BuiltInLiteral,
}

impl Egd {
    /// Variables occurring in the body (universally quantified)
    pub fn universal_variables(&self) -> IndexSet<&str> {
        body_variables(&self.body)
    }
}

/// A dependency: tuple-generating or equality-generating
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dependency {
    Tgd(Tgd),
    Egd(Egd),
}

impl Dependency {
    pub fn body(&self) -> &[Literal] {
        match self {
            Dependency::Tgd(t) => &t.body,
            Dependency::Egd(e) => &e.body,
        }
    }
}

/// A positional functional dependency on a predicate: the key positions
/// determine the determined positions
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionalDependency {
    pub predicate: PredId,
    pub key_positions: BTreeSet<usize>,
    pub determined_positions: BTreeSet<usize>,
}

impl FunctionalDependency {
    /// Whether the key positions determine every other position of a
    /// predicate with the given arity (full-key semantics)
    pub fn is_key_dependency(&self, arity: usize) -> bool {
        (0..arity).all(|p| self.key_positions.contains(&p) || self.determined_positions.contains(&p))
    }
}
