//! EGD to functional-dependency extraction
//!
//! Classifies each EGD of a schema as contributing to a positional
//! functional dependency on some predicate, or as non-functional. An EGD
//! fits the functional shape when its body holds two positive occurrences
//! of the same predicate agreeing (sharing a variable) at the candidate key
//! positions, and its head equates the two occurrences' variables at one
//! other position. Groups accumulate determined positions per
//! (predicate, key) across the EGD set.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::core::{Atom, Egd, FunctionalDependency, Literal, PredId, Term};
use crate::schema::DependencySchema;

/// A functional dependency together with the EGDs that establish it
#[derive(Clone, Debug)]
pub struct FdGroup {
    pub fd: FunctionalDependency,
    pub egds: Vec<Egd>,
}

/// The outcome of classifying a schema's EGDs
#[derive(Clone, Debug, Default)]
pub struct EgdAnalysis {
    /// Per-(predicate, key) groups with their accumulated coverage
    pub functional_dependencies: Vec<FdGroup>,
    /// EGDs that do not fit the two-occurrence functional shape
    pub non_functional_egds: Vec<Egd>,
}

impl EgdAnalysis {
    /// True iff every EGD was absorbed into some group and every resulting
    /// functional dependency is a full key dependency
    pub fn all_egds_define_key_dependencies(&self, schema: &DependencySchema) -> bool {
        self.non_functional_egds.is_empty()
            && self.functional_dependencies.iter().all(|group| {
                group
                    .fd
                    .is_key_dependency(schema.predicate(group.fd.predicate).arity)
            })
    }
}

/// The functional shape of a single EGD: which predicate, which key
/// positions, which position the head equates
struct FdShape {
    predicate: PredId,
    key: BTreeSet<usize>,
    determined: usize,
}

/// Classify every EGD of the schema
pub fn analyze_egds(schema: &DependencySchema) -> EgdAnalysis {
    let mut groups: IndexMap<(PredId, BTreeSet<usize>), (BTreeSet<usize>, Vec<Egd>)> =
        IndexMap::new();
    let mut analysis = EgdAnalysis::default();

    for egd in schema.egds() {
        match fd_shape(egd) {
            Some(shape) => {
                let entry = groups.entry((shape.predicate, shape.key)).or_default();
                entry.0.insert(shape.determined);
                entry.1.push(egd.clone());
            }
            None => analysis.non_functional_egds.push(egd.clone()),
        }
    }

    analysis.functional_dependencies = groups
        .into_iter()
        .map(|((predicate, key_positions), (determined_positions, egds))| FdGroup {
            fd: FunctionalDependency {
                predicate,
                key_positions,
                determined_positions,
            },
            egds,
        })
        .collect();
    analysis
}

/// Recognize the functional shape of one EGD, if it has one.
///
/// The first pair of same-predicate positive occurrences that fits wins;
/// bodies may carry further atoms, which are ignored.
fn fd_shape(egd: &Egd) -> Option<FdShape> {
    // the head must equate two distinct variables
    let (lhs, rhs) = match egd.head.terms.as_slice() {
        [lhs, rhs] if lhs.is_variable() && rhs.is_variable() && lhs != rhs => (lhs, rhs),
        _ => return None,
    };

    let atoms: Vec<&Atom> = egd.body.iter().filter_map(Literal::as_positive_atom).collect();
    for (i, &first) in atoms.iter().enumerate() {
        for &second in atoms.iter().skip(i + 1) {
            if first.predicate != second.predicate {
                continue;
            }
            if let Some(shape) = pair_shape(first, second, lhs, rhs) {
                return Some(shape);
            }
        }
    }
    None
}

/// The shape carried by one pair of same-predicate occurrences, if any
fn pair_shape(first: &Atom, second: &Atom, lhs: &Term, rhs: &Term) -> Option<FdShape> {
    if first.terms.len() != second.terms.len() {
        return None;
    }
    let arity = first.terms.len();

    // the equated position: the two occurrences carry the head's variables
    // there, in either orientation
    let determined = (0..arity).find(|&p| {
        (first.terms[p] == *lhs && second.terms[p] == *rhs)
            || (first.terms[p] == *rhs && second.terms[p] == *lhs)
    })?;

    // key positions: where the two occurrences share the same variable
    let key: BTreeSet<usize> = (0..arity)
        .filter(|&p| first.terms[p] == second.terms[p] && first.terms[p].is_variable())
        .collect();

    // the head's variables differ, so `determined` can never land in `key`;
    // an empty key means the equated position is unconditional, which is
    // not a functional dependency
    if key.is_empty() {
        return None;
    }
    Some(FdShape {
        predicate: first.predicate,
        key,
        determined,
    })
}
