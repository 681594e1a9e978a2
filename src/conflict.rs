//! TGD / functional-dependency conflict analysis
//!
//! Decides whether a set of TGDs is safe to combine with functional
//! dependencies (derived from EGDs) without breaking chase-termination
//! guarantees. These are pure decision procedures: a "no" answer is a
//! value, never an error.

use std::collections::BTreeSet;

use crate::core::{FunctionalDependency, Term, Tgd};
use crate::fd::analyze_egds;
use crate::schema::DependencySchema;

/// Whether one TGD conflicts with one functional dependency
pub fn is_conflicting_pair(
    schema: &DependencySchema,
    tgd: &Tgd,
    fd: &FunctionalDependency,
) -> bool {
    if !tgd.head.iter().any(|atom| atom.predicate == fd.predicate) {
        return false;
    }

    let universal = tgd.universal_variables();
    let existential = tgd.existential_variables();

    // an existential variable shared between head atoms makes the chase
    // equate labelled nulls across tuples
    let repeated_across_atoms = existential.iter().any(|var| {
        tgd.head
            .iter()
            .filter(|atom| atom.variables().any(|v| v == *var))
            .count()
            > 1
    });
    if repeated_across_atoms {
        return true;
    }

    let arity = schema.predicate(fd.predicate).arity;
    tgd.head
        .iter()
        .filter(|atom| atom.predicate == fd.predicate)
        .any(|atom| {
            // an existential repeated within the atom's own term list
            let internally_repeated = existential
                .iter()
                .any(|var| atom.variables().filter(|v| v == var).count() > 1);
            if internally_repeated {
                return true;
            }

            if !fd.is_key_dependency(arity) {
                return true;
            }

            if atom.terms.iter().any(Term::is_constant) {
                return true;
            }

            // positions of the atom bound to universal variables; a key that
            // is a proper subset of them leaves a universally-bound non-key
            // position the key cannot determine
            let bound: BTreeSet<usize> = atom
                .terms
                .iter()
                .enumerate()
                .filter(|(_, term)| {
                    term.as_variable().map_or(false, |v| universal.contains(v))
                })
                .map(|(position, _)| position)
                .collect();
            fd.key_positions.is_subset(&bound) && fd.key_positions != bound
        })
}

/// Whether some (TGD, FD) pair conflicts
pub fn is_conflicting(
    schema: &DependencySchema,
    tgds: &[Tgd],
    fds: &[FunctionalDependency],
) -> bool {
    tgds.iter()
        .any(|tgd| fds.iter().any(|fd| is_conflicting_pair(schema, tgd, fd)))
}

pub fn is_non_conflicting(
    schema: &DependencySchema,
    tgds: &[Tgd],
    fds: &[FunctionalDependency],
) -> bool {
    !is_conflicting(schema, tgds, fds)
}

/// The end-to-end safety check: every EGD of the schema must define a key
/// dependency, and no TGD may conflict with any of the derived keys
pub fn egds_non_conflicting_with_tgds(schema: &DependencySchema) -> bool {
    let analysis = analyze_egds(schema);
    if !analysis.all_egds_define_key_dependencies(schema) {
        return false;
    }
    let fds: Vec<FunctionalDependency> = analysis
        .functional_dependencies
        .iter()
        .map(|group| group.fd.clone())
        .collect();
    let tgds: Vec<Tgd> = schema.tgds().cloned().collect();
    is_non_conflicting(schema, &tgds, &fds)
}
