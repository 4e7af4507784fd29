//! Error types for the SAT layer and the resolver layer.
//!
//! [`SatError`] covers everything that can go wrong inside [`crate::sat::solve`];
//! [`ResolveError`] wraps it and adds the catalog-miss variants specific to
//! [`crate::resolver::BundleResolver`].

use std::fmt;

use crate::sat::AppliedConstraint;

/// Errors produced by the SAT frontend ([`crate::sat::solve`]).
#[derive(thiserror::Error)]
pub enum SatError {
    /// The constraint system has no solution.
    ///
    /// The payload is the unsat core: the applied constraints that were
    /// together responsible for the contradiction.
    #[error("{}", format_not_satisfiable(.0))]
    NotSatisfiable(Vec<AppliedConstraint>),

    /// The dictionary logged one or more referential-integrity errors
    /// (dangling identifiers, out-of-range literals) while compiling
    /// constraints. This indicates a bug in the constraint wiring, not a
    /// genuine unsat result, and discards any solve outcome.
    #[error("{} error(s) encountered while compiling constraints: {}", .0.len(), join_errors(.0))]
    Internal(Vec<String>),

    /// The backend returned neither SAT nor UNSAT within its resource
    /// budget (§5 of the specification: timeout or exhaustion).
    #[error("failed to solve in the allotted time")]
    Indeterminate,
}

fn format_not_satisfiable(constraints: &[AppliedConstraint]) -> String {
    if constraints.is_empty() {
        "constraints not satisfiable".to_string()
    } else {
        let joined = constraints
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!("constraints not satisfiable: {joined}")
    }
}

fn join_errors(errors: &[String]) -> String {
    errors.join(", ")
}

/// Errors produced by [`crate::resolver::BundleResolver::solve_operators`].
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The SAT layer failed; see [`SatError`] for the reason.
    #[error(transparent)]
    Sat(#[from] SatError),

    /// No bundle in any catalog satisfied a requested package or a pinned
    /// version dependency.
    #[error("no catalog bundle satisfies {0}")]
    CatalogMiss(String),

    /// A bundle identifier could not be parsed into its
    /// `namespace/catalog/csv-name` triple.
    #[error("malformed bundle identifier {0:?}: expected exactly two '/' separators")]
    MalformedIdentifier(String),

    /// Multiple independent failures occurred across different
    /// subscriptions or add-requests; all are reported together rather than
    /// hiding all but the first.
    #[error("{} error(s) resolving operators: {}", .0.len(), join_resolve_errors(.0))]
    Aggregate(Vec<ResolveError>),
}

fn join_resolve_errors(errors: &[ResolveError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ResolveError {
    /// Combine a list of errors collected from independent sub-operations
    /// into a single error, or return `Ok(())` if the list is empty.
    ///
    /// Mirrors the aggregation policy in §7: one bad subscription or
    /// pinned-dependency lookup must not hide errors from the others.
    pub fn aggregate(errors: Vec<ResolveError>) -> Result<(), ResolveError> {
        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.into_iter().next().expect("len checked above"))
        } else {
            Err(ResolveError::Aggregate(errors))
        }
    }
}

impl fmt::Debug for SatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Manual Debug so `Vec<AppliedConstraint>` (which derives Debug via
        // its own fields) reads the same whether reached through `{:?}` or
        // through the `thiserror` `Display` impl above.
        match self {
            SatError::NotSatisfiable(cs) => f.debug_tuple("NotSatisfiable").field(cs).finish(),
            SatError::Internal(es) => f.debug_tuple("Internal").field(es).finish(),
            SatError::Indeterminate => write!(f, "Indeterminate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::{Constraint, Identifier, Installable};

    fn installable(id: &str) -> Installable {
        Installable::bundle(Identifier::new(id), vec![])
    }

    #[test]
    fn not_satisfiable_empty_message() {
        let err = SatError::NotSatisfiable(vec![]);
        assert_eq!(err.to_string(), "constraints not satisfiable");
    }

    #[test]
    fn not_satisfiable_joins_constraints() {
        let err = SatError::NotSatisfiable(vec![
            AppliedConstraint::new(installable("a"), Constraint::Mandatory),
            AppliedConstraint::new(installable("b"), Constraint::Prohibited),
        ]);
        assert_eq!(
            err.to_string(),
            "constraints not satisfiable: a is mandatory, b is prohibited"
        );
    }

    #[test]
    fn aggregate_of_one_unwraps() {
        let err = ResolveError::aggregate(vec![ResolveError::CatalogMiss("a".into())])
            .expect_err("one error should fail");
        assert!(matches!(err, ResolveError::CatalogMiss(_)));
    }

    #[test]
    fn aggregate_of_many_wraps() {
        let err = ResolveError::aggregate(vec![
            ResolveError::CatalogMiss("a".into()),
            ResolveError::CatalogMiss("b".into()),
        ])
        .expect_err("two errors should fail");
        assert!(matches!(err, ResolveError::Aggregate(_)));
        assert_eq!(
            err.to_string(),
            "2 error(s) resolving operators: no catalog bundle satisfies a; no catalog bundle satisfies b"
        );
    }

    #[test]
    fn aggregate_of_none_is_ok() {
        assert!(ResolveError::aggregate(vec![]).is_ok());
    }
}
