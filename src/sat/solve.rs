//! C3, the SAT Frontend: the single entry point that turns a list of
//! installables into either the selected subset or an unsat core.

use tracing::{debug, instrument, warn};

use crate::config::ResolverConfig;
use crate::error::SatError;

use super::backend::{Outcome, SatBackend, VarisatBackend};
use super::dict::Dictionary;
use super::installable::{AppliedConstraint, Installable};

/// Solve the constraint system described by `installables` with no resource
/// limits and return the subset that should be selected. A thin wrapper
/// around [`solve_with_config`] for callers that don't need a budget.
pub fn solve(installables: Vec<Installable>) -> Result<Vec<Installable>, SatError> {
    solve_with_config(installables, &ResolverConfig::default())
}

/// Solve the constraint system described by `installables`, bounded by
/// `config` (§5), and return the subset that should be selected.
///
/// Every constraint carried by every installable is applied to the backend
/// in input order (§4.1). If the dictionary logs any referential-integrity
/// errors while doing so, those errors take priority over whatever the
/// backend concluded: a dangling reference means the constraint system was
/// built wrong, not that it is genuinely unsatisfiable (§7).
#[instrument(level = "debug", skip_all, fields(installables = installables.len()))]
pub fn solve_with_config(
    installables: Vec<Installable>,
    config: &ResolverConfig,
) -> Result<Vec<Installable>, SatError> {
    let mut dict = Dictionary::compile(installables);
    let mut backend = VarisatBackend::new(dict.installable_count(), *config);

    for installable in dict.installables().to_vec() {
        let subject = installable.identifier().clone();
        for constraint in installable.constraints() {
            let m = constraint.apply(&mut backend, &mut dict, &subject);
            dict.record_constraint(m, AppliedConstraint::new(installable.clone(), constraint.clone()));
        }
    }

    let outcome = backend.solve();
    debug!(?outcome, "backend solve finished");

    if dict.has_errors() {
        let errors = dict.into_errors();
        warn!(count = errors.len(), "dictionary reported referential errors");
        return Err(SatError::Internal(errors));
    }

    match outcome {
        Outcome::Satisfiable => {
            let selected = dict
                .installables()
                .iter()
                .enumerate()
                .filter(|(index, _)| backend.value(super::lit::Lit::positive(index + 1)))
                .map(|(_, installable)| installable.clone())
                .collect();
            Ok(selected)
        }
        Outcome::Unsatisfiable => {
            let mut core: Vec<AppliedConstraint> = backend
                .why()
                .into_iter()
                .map(|lit| dict.constraint_of(lit))
                .collect();
            core.sort_by(|a, b| {
                a.installable
                    .identifier()
                    .cmp(b.installable.identifier())
                    .then_with(|| a.constraint_position().cmp(&b.constraint_position()))
            });
            Err(SatError::NotSatisfiable(core))
        }
        Outcome::Indeterminate => Err(SatError::Indeterminate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::{Constraint, Identifier};

    fn bundle(id: &str, constraints: Vec<Constraint>) -> Installable {
        Installable::bundle(Identifier::new(id), constraints)
    }

    #[test]
    fn single_mandatory_is_satisfiable() {
        let result = solve(vec![bundle("a", vec![Constraint::Mandatory])]).expect("sat");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].identifier(), &Identifier::new("a"));
    }

    #[test]
    fn mandatory_and_prohibited_is_unsat() {
        let err = solve(vec![bundle(
            "a",
            vec![Constraint::Mandatory, Constraint::Prohibited],
        )])
        .expect_err("unsat");
        match err {
            SatError::NotSatisfiable(core) => {
                assert_eq!(core.len(), 2);
                assert_eq!(core[0].installable.identifier(), &Identifier::new("a"));
            }
            other => panic!("expected NotSatisfiable, got {other:?}"),
        }
    }

    #[test]
    fn unconstrained_installable_may_be_left_out() {
        let result = solve(vec![bundle("a", vec![])]).expect("sat");
        assert!(result.is_empty());
    }

    #[test]
    fn dependency_forces_selection_of_dependency() {
        let result = solve(vec![
            bundle(
                "root",
                vec![
                    Constraint::Mandatory,
                    Constraint::Dependency(vec![Identifier::new("dep")]),
                ],
            ),
            bundle("dep", vec![]),
        ])
        .expect("sat");
        let identifiers: Vec<_> = result.iter().map(Installable::identifier).collect();
        assert!(identifiers.contains(&&Identifier::new("root")));
        assert!(identifiers.contains(&&Identifier::new("dep")));
    }

    #[test]
    fn dependency_with_missing_target_is_unsat() {
        let result = solve(vec![bundle(
            "root",
            vec![
                Constraint::Mandatory,
                Constraint::Dependency(vec![Identifier::new("missing")]),
            ],
        )]);
        assert!(result.is_err());
    }

    #[test]
    fn conflict_between_two_mandatory_installables_is_unsat() {
        let err = solve(vec![
            bundle(
                "a",
                vec![Constraint::Mandatory, Constraint::Conflict(Identifier::new("b"))],
            ),
            bundle("b", vec![Constraint::Mandatory]),
        ])
        .expect_err("unsat");
        assert!(matches!(err, SatError::NotSatisfiable(_)));
    }

    #[test]
    fn empty_installable_list_is_trivially_satisfiable() {
        let result = solve(vec![]).expect("sat");
        assert!(result.is_empty());
    }

    /// §8 scenario 6: `c` is mandatory and depends on either `a` or `b`; `b`
    /// conflicts with `a`. Input order must break the tie towards the
    /// earlier-declared candidate that is still available, i.e. `a` is
    /// tried first and dropped only because `b`'s conflict forbids it,
    /// leaving `{b, c}` rather than `{a, c}`. This is the exact case review
    /// comment (a) identified as the one a sorted catalog lookup would have
    /// broken.
    #[test]
    fn input_order_breaks_dependency_tie_around_a_conflict() {
        let result = solve(vec![
            bundle("a", vec![]),
            bundle("b", vec![Constraint::Conflict(Identifier::new("a"))]),
            bundle(
                "c",
                vec![
                    Constraint::Mandatory,
                    Constraint::Dependency(vec![Identifier::new("a"), Identifier::new("b")]),
                ],
            ),
        ])
        .expect("sat");
        let identifiers: Vec<_> = result.iter().map(Installable::identifier).collect();
        assert!(identifiers.contains(&&Identifier::new("b")));
        assert!(identifiers.contains(&&Identifier::new("c")));
        assert!(!identifiers.contains(&&Identifier::new("a")));
    }
}
