//! Dependency schemas: closed collections of predicates and dependencies
//!
//! A schema validates its own closure at construction time: every predicate
//! referenced anywhere inside it — by a dependency's body or head, or by a
//! derived predicate's query bodies — must be an element of its predicate
//! table. No partially-valid schema is ever observable.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexSet;

use crate::core::{Atom, Dependency, Egd, Literal, PredId, Predicate, Tgd};

/// Schema construction and validation errors
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchemaError {
    /// The same name declared with conflicting arities
    RepeatedPredicateName {
        name: String,
        declared: usize,
        conflicting: usize,
    },
    /// A dependency or query references a predicate outside the schema
    PredicateOutsideSchema { reference: String },
    /// An atom's term count disagrees with its predicate's declared arity
    ArityMismatch {
        predicate: String,
        expected: usize,
        found: usize,
    },
    /// A dependency head of an inadmissible shape
    InvalidDependency { reason: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::RepeatedPredicateName {
                name,
                declared,
                conflicting,
            } => write!(
                f,
                "repeated predicate name: '{}' declared with arity {}, later used with arity {}",
                name, declared, conflicting
            ),
            SchemaError::PredicateOutsideSchema { reference } => {
                write!(f, "predicate outside schema: {}", reference)
            }
            SchemaError::ArityMismatch {
                predicate,
                expected,
                found,
            } => write!(
                f,
                "arity mismatch: predicate '{}' has arity {}, atom carries {} terms",
                predicate, expected, found
            ),
            SchemaError::InvalidDependency { reason } => {
                write!(f, "invalid dependency: {}", reason)
            }
        }
    }
}

impl std::error::Error for SchemaError {}

pub type SchemaResult<T> = Result<T, SchemaError>;

/// An immutable, validated dependency schema
#[derive(Clone, Debug)]
pub struct DependencySchema {
    predicates: Vec<Predicate>,
    names: HashMap<String, PredId>,
    dependencies: Vec<Dependency>,
}

impl DependencySchema {
    /// Build a schema from domain objects, validating the closure invariant.
    ///
    /// Structurally equal dependencies collapse; the first insertion keeps
    /// its position.
    pub fn new(predicates: Vec<Predicate>, dependencies: Vec<Dependency>) -> SchemaResult<Self> {
        let mut names: HashMap<String, PredId> = HashMap::new();
        for (id, pred) in predicates.iter().enumerate() {
            if let Some(&prev) = names.get(&pred.name) {
                return Err(SchemaError::RepeatedPredicateName {
                    name: pred.name.clone(),
                    declared: predicates[prev].arity,
                    conflicting: pred.arity,
                });
            }
            names.insert(pred.name.clone(), id);
        }

        let dependencies: Vec<Dependency> = dependencies
            .into_iter()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();

        let schema = Self {
            predicates,
            names,
            dependencies,
        };
        schema.validate()?;
        Ok(schema)
    }

    fn validate(&self) -> SchemaResult<()> {
        for dep in &self.dependencies {
            self.check_literals(dep.body())?;
            match dep {
                Dependency::Tgd(tgd) => {
                    if tgd.head.is_empty() {
                        return Err(SchemaError::InvalidDependency {
                            reason: "TGD with an empty head".to_string(),
                        });
                    }
                    for atom in &tgd.head {
                        self.check_atom(atom)?;
                    }
                }
                Dependency::Egd(egd) => {
                    if !egd.head.is_equality() {
                        return Err(SchemaError::InvalidDependency {
                            reason: "EGD head must be a binary equality".to_string(),
                        });
                    }
                }
            }
        }
        for pred in &self.predicates {
            for query in &pred.queries {
                self.check_literals(&query.body)?;
            }
        }
        Ok(())
    }

    fn check_literals(&self, literals: &[Literal]) -> SchemaResult<()> {
        for literal in literals {
            if let Literal::Ordinary(l) = literal {
                self.check_atom(&l.atom)?;
            }
        }
        Ok(())
    }

    fn check_atom(&self, atom: &Atom) -> SchemaResult<()> {
        let pred = match self.predicates.get(atom.predicate) {
            Some(pred) => pred,
            None => {
                return Err(SchemaError::PredicateOutsideSchema {
                    reference: format!("#{}", atom.predicate),
                });
            }
        };
        if atom.terms.len() != pred.arity {
            return Err(SchemaError::ArityMismatch {
                predicate: pred.name.clone(),
                expected: pred.arity,
                found: atom.terms.len(),
            });
        }
        Ok(())
    }

    /// The predicate table, in declaration order
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Look up a predicate by its id.
    ///
    /// Ids come from this schema's own table; an out-of-range id panics.
    pub fn predicate(&self, id: PredId) -> &Predicate {
        &self.predicates[id]
    }

    /// Look up a predicate id by name
    pub fn lookup(&self, name: &str) -> Option<PredId> {
        self.names.get(name).copied()
    }

    /// All dependencies, in first-insertion order
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// The tuple-generating dependencies, in insertion order
    pub fn tgds(&self) -> impl Iterator<Item = &Tgd> {
        self.dependencies.iter().filter_map(|dep| match dep {
            Dependency::Tgd(tgd) => Some(tgd),
            Dependency::Egd(_) => None,
        })
    }

    /// The equality-generating dependencies, in insertion order
    pub fn egds(&self) -> impl Iterator<Item = &Egd> {
        self.dependencies.iter().filter_map(|dep| match dep {
            Dependency::Egd(egd) => Some(egd),
            Dependency::Tgd(_) => None,
        })
    }
}
