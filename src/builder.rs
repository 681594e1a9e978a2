//! Incremental schema construction from parsed specification trees
//!
//! The builder is the only stateful component of the crate: it accumulates
//! predicate declarations, dependency specifications, and derivation rules,
//! then `build()` hands over an immutable, validated schema. Predicates
//! mentioned before being declared are auto-declared with the arity implied
//! by their first occurrence.

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::ast;
use crate::core::{
    Atom, BuiltInLiteral, BuiltInOp, ComparisonOp, Dependency, Egd, Literal, OrdinaryLiteral,
    Polarity, PredId, Predicate, Query, Term, Tgd,
};
use crate::naming::{AllVariables, NamingCriteria};
use crate::schema::{DependencySchema, SchemaError, SchemaResult};

/// Accumulates declarations and specifications, then builds a schema
pub struct SchemaBuilder {
    predicates: Vec<Predicate>,
    names: HashMap<String, PredId>,
    dependencies: IndexSet<Dependency>,
    criteria: Box<dyn NamingCriteria>,
}

impl SchemaBuilder {
    /// A builder with the default naming criteria (all bare names are
    /// variables)
    pub fn new() -> Self {
        Self::with_criteria(Box::new(AllVariables))
    }

    pub fn with_criteria(criteria: Box<dyn NamingCriteria>) -> Self {
        Self {
            predicates: Vec::new(),
            names: HashMap::new(),
            dependencies: IndexSet::new(),
            criteria,
        }
    }

    /// Declare a predicate. Idempotent for identical re-declarations;
    /// re-declaring a name with a different arity is an error.
    pub fn declare_predicate(&mut self, name: &str, arity: usize) -> SchemaResult<PredId> {
        match self.names.get(name) {
            Some(&id) => {
                let declared = self.predicates[id].arity;
                if declared != arity {
                    Err(SchemaError::RepeatedPredicateName {
                        name: name.to_string(),
                        declared,
                        conflicting: arity,
                    })
                } else {
                    Ok(id)
                }
            }
            None => {
                let id = self.predicates.len();
                self.names.insert(name.to_string(), id);
                self.predicates.push(Predicate::base(name, arity));
                Ok(id)
            }
        }
    }

    /// Add every declaration of a parsed file, in order
    pub fn add_file(&mut self, file: &ast::SchemaFile) -> SchemaResult<()> {
        for decl in &file.declarations {
            self.add_declaration(&decl.node)?;
        }
        Ok(())
    }

    pub fn add_declaration(&mut self, decl: &ast::Declaration) -> SchemaResult<()> {
        match decl {
            ast::Declaration::Predicate(p) => self.declare_predicate(&p.name, p.arity).map(|_| ()),
            ast::Declaration::Dependency(d) => self.add_dependency(d),
            ast::Declaration::Rule(r) => self.add_rule(r),
        }
    }

    /// Resolve a dependency specification into a domain TGD or EGD.
    ///
    /// Structurally equal dependencies collapse via set semantics.
    pub fn add_dependency(&mut self, spec: &ast::DependencySpec) -> SchemaResult<()> {
        let body = self.lower_literals(&spec.body)?;
        let dependency = self.lower_head(&spec.head, body)?;
        self.dependencies.insert(dependency);
        Ok(())
    }

    /// Attach a derivation rule to its head predicate, making it derived
    pub fn add_rule(&mut self, spec: &ast::RuleSpec) -> SchemaResult<()> {
        let head_pred = self.declare_predicate(&spec.head.predicate, spec.head.terms.len())?;
        let head = spec.head.terms.iter().map(|t| self.lower_term(t)).collect();
        let body = self.lower_literals(&spec.body)?;
        self.predicates[head_pred].queries.push(Query { head, body });
        Ok(())
    }

    /// Build the immutable schema, running closure validation
    pub fn build(self) -> SchemaResult<DependencySchema> {
        DependencySchema::new(self.predicates, self.dependencies.into_iter().collect())
    }

    /// Classify the head: all positive atoms make a TGD, a single equality
    /// makes an EGD, anything else is a fatal shape error
    fn lower_head(&mut self, head: &[ast::LiteralSpec], body: Vec<Literal>) -> SchemaResult<Dependency> {
        if head.is_empty() {
            return Err(SchemaError::InvalidDependency {
                reason: "dependency with an empty head".to_string(),
            });
        }

        if let [ast::LiteralSpec::Comparison {
            op: ComparisonOp::Eq,
            lhs,
            rhs,
        }] = head
        {
            let head = BuiltInLiteral::equality(self.lower_term(lhs), self.lower_term(rhs));
            return Ok(Dependency::Egd(Egd { body, head }));
        }

        let mut atoms = Vec::with_capacity(head.len());
        for literal in head {
            match literal {
                ast::LiteralSpec::Atom {
                    atom,
                    negated: false,
                } => atoms.push(self.lower_atom(atom)?),
                other => {
                    return Err(SchemaError::InvalidDependency {
                        reason: format!(
                            "{} in a dependency head; heads take positive atoms or a single equality",
                            head_literal_kind(other)
                        ),
                    });
                }
            }
        }
        Ok(Dependency::Tgd(Tgd { body, head: atoms }))
    }

    fn lower_literals(&mut self, specs: &[ast::LiteralSpec]) -> SchemaResult<Vec<Literal>> {
        specs.iter().map(|spec| self.lower_literal(spec)).collect()
    }

    fn lower_literal(&mut self, spec: &ast::LiteralSpec) -> SchemaResult<Literal> {
        match spec {
            ast::LiteralSpec::Atom { atom, negated } => {
                let atom = self.lower_atom(atom)?;
                let polarity = if *negated {
                    Polarity::Negated
                } else {
                    Polarity::Positive
                };
                Ok(Literal::Ordinary(OrdinaryLiteral { atom, polarity }))
            }
            ast::LiteralSpec::Comparison { op, lhs, rhs } => Ok(Literal::BuiltIn(
                BuiltInLiteral::comparison(*op, self.lower_term(lhs), self.lower_term(rhs)),
            )),
            ast::LiteralSpec::Boolean { value, terms } => {
                let op = if *value { BuiltInOp::True } else { BuiltInOp::False };
                Ok(Literal::BuiltIn(BuiltInLiteral {
                    op,
                    terms: terms.iter().map(|t| self.lower_term(t)).collect(),
                }))
            }
        }
    }

    fn lower_atom(&mut self, spec: &ast::AtomSpec) -> SchemaResult<Atom> {
        let predicate = self.declare_predicate(&spec.predicate, spec.terms.len())?;
        let terms = spec.terms.iter().map(|t| self.lower_term(t)).collect();
        Ok(Atom::new(predicate, terms))
    }

    fn lower_term(&self, spec: &ast::TermSpec) -> Term {
        match spec {
            ast::TermSpec::Name(name) => {
                if self.criteria.is_constant(name) {
                    Term::constant(name.clone())
                } else {
                    Term::variable(name.clone())
                }
            }
            ast::TermSpec::Number(n) => Term::constant(n.clone()),
            ast::TermSpec::Str(s) => Term::constant(s.clone()),
        }
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn head_literal_kind(spec: &ast::LiteralSpec) -> &'static str {
    match spec {
        ast::LiteralSpec::Atom { negated: true, .. } => "negated literal",
        ast::LiteralSpec::Atom { negated: false, .. } => "ordinary literal",
        ast::LiteralSpec::Comparison { .. } => "comparison",
        ast::LiteralSpec::Boolean { .. } => "boolean built-in",
    }
}
