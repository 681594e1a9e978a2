//! Pretty-printer for dependency schemas
//!
//! Renders a schema back to source syntax for round-trip testing and CLI
//! output: `pred P/2;` declarations first, then `head :- body;` derivation
//! rules, then `body -> head;` dependencies, all in stable insertion order.

use crate::core::{
    Atom, BuiltInLiteral, BuiltInOp, Dependency, Literal, OrdinaryLiteral, Polarity, Query, Term,
};
use crate::schema::DependencySchema;

/// Pretty-print a whole schema
pub fn pretty_print(schema: &DependencySchema) -> String {
    Pretty::new(schema).schema()
}

/// A printer bound to one schema (predicate ids resolve against its table)
pub struct Pretty<'a> {
    schema: &'a DependencySchema,
    output: String,
}

impl<'a> Pretty<'a> {
    pub fn new(schema: &'a DependencySchema) -> Self {
        Self {
            schema,
            output: String::new(),
        }
    }

    pub fn schema(mut self) -> String {
        let schema = self.schema;
        for pred in schema.predicates() {
            self.output
                .push_str(&format!("pred {}/{};\n", pred.name, pred.arity));
        }
        for pred in schema.predicates() {
            for query in &pred.queries {
                self.rule(&pred.name, query);
            }
        }
        for dep in schema.dependencies() {
            self.dependency(dep);
        }
        self.output
    }

    pub fn rule(&mut self, predicate: &str, query: &Query) {
        self.output.push_str(predicate);
        self.output.push('(');
        self.terms(&query.head);
        self.output.push_str(") :- ");
        self.literals(&query.body);
        self.output.push_str(";\n");
    }

    pub fn dependency(&mut self, dep: &Dependency) {
        match dep {
            Dependency::Tgd(tgd) => {
                self.literals(&tgd.body);
                self.output.push_str(" -> ");
                for (i, atom) in tgd.head.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.atom(atom);
                }
            }
            Dependency::Egd(egd) => {
                self.literals(&egd.body);
                self.output.push_str(" -> ");
                self.built_in(&egd.head);
            }
        }
        self.output.push_str(";\n");
    }

    fn literals(&mut self, literals: &[Literal]) {
        for (i, literal) in literals.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.literal(literal);
        }
    }

    fn literal(&mut self, literal: &Literal) {
        match literal {
            Literal::Ordinary(l) => self.ordinary(l),
            Literal::BuiltIn(l) => self.built_in(l),
        }
    }

    fn ordinary(&mut self, literal: &OrdinaryLiteral) {
        if literal.polarity == Polarity::Negated {
            self.output.push_str("not ");
        }
        self.atom(&literal.atom);
    }

    fn atom(&mut self, atom: &Atom) {
        let name = &self.schema.predicate(atom.predicate).name;
        self.output.push_str(name);
        self.output.push('(');
        self.terms(&atom.terms);
        self.output.push(')');
    }

    fn built_in(&mut self, literal: &BuiltInLiteral) {
        match &literal.op {
            BuiltInOp::Comparison(op) => {
                // binary comparisons render infix
                self.term(&literal.terms[0]);
                self.output.push_str(&format!(" {} ", op));
                self.term(&literal.terms[1]);
            }
            BuiltInOp::True => {
                self.output.push_str("TRUE(");
                self.terms(&literal.terms);
                self.output.push(')');
            }
            BuiltInOp::False => {
                self.output.push_str("FALSE(");
                self.terms(&literal.terms);
                self.output.push(')');
            }
            BuiltInOp::Custom(name) => {
                self.output.push_str(name);
                self.output.push('(');
                self.terms(&literal.terms);
                self.output.push(')');
            }
        }
    }

    fn terms(&mut self, terms: &[Term]) {
        for (i, term) in terms.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.term(term);
        }
    }

    fn term(&mut self, term: &Term) {
        match term {
            Term::Variable(name) => self.output.push_str(name),
            // numeric constants render bare; other constants render quoted
            // so re-parsing classifies them as constants under any policy
            Term::Constant(name) => {
                if is_numeric(name) {
                    self.output.push_str(name);
                } else {
                    self.output.push('"');
                    self.output.push_str(name);
                    self.output.push('"');
                }
            }
        }
    }
}

fn is_numeric(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_digit() || c == '.')
        && name.chars().filter(|&c| c == '.').count() <= 1
        && !name.starts_with('.')
        && !name.ends_with('.')
}
