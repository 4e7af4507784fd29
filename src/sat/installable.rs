//! The two concrete installable variants (§3) and the `AppliedConstraint`
//! unit of unsat reporting.

use std::fmt;

use super::constraint::Constraint;
use super::identifier::Identifier;

/// Anything the SAT layer might select.
///
/// Re-expressed from the source's interface-dispatch pattern as a closed
/// enum (§9 REDESIGN FLAGS): the two variants are exhaustively known, so a
/// `match` replaces dynamic dispatch and the frontend can hold a single
/// homogeneous `Vec<Installable>` without boxing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Installable {
    /// A synthetic installable representing the abstract desire for *some*
    /// version of a package. Always carries `mandatory` plus a single
    /// `dependency` enumerating the acceptable bundles.
    Virtual {
        identifier: Identifier,
        constraints: Vec<Constraint>,
    },
    /// A concrete installable artifact for one version of one package in
    /// one catalog. Carries zero or more `dependency` constraints, one per
    /// declared version-pinned dependency.
    Bundle {
        identifier: Identifier,
        constraints: Vec<Constraint>,
    },
}

impl Installable {
    /// Construct a virtual-package installable with identifier `pkg`,
    /// pre-seeded with the `mandatory` constraint (§4.4 step 2.1).
    pub fn virtual_package(pkg: impl Into<Identifier>) -> Self {
        Installable::Virtual {
            identifier: pkg.into(),
            constraints: vec![Constraint::Mandatory],
        }
    }

    /// Construct a bundle installable for the given identifier and initial
    /// constraint set (usually empty; dependencies are attached as they're
    /// discovered during catalog expansion).
    pub fn bundle(identifier: Identifier, constraints: Vec<Constraint>) -> Self {
        Installable::Bundle {
            identifier,
            constraints,
        }
    }

    /// This installable's identifier.
    pub fn identifier(&self) -> &Identifier {
        match self {
            Installable::Virtual { identifier, .. } | Installable::Bundle { identifier, .. } => {
                identifier
            }
        }
    }

    /// This installable's constraints, in the order they were added.
    pub fn constraints(&self) -> &[Constraint] {
        match self {
            Installable::Virtual { constraints, .. } | Installable::Bundle { constraints, .. } => {
                constraints
            }
        }
    }

    /// Append a `dependency` constraint enumerating the given identifiers.
    /// Used by catalog expansion once a bundle's or virtual package's full
    /// set of acceptable dependents is known.
    pub fn add_dependency(&mut self, dependencies: Vec<Identifier>) {
        let constraints = match self {
            Installable::Virtual { constraints, .. } | Installable::Bundle { constraints, .. } => {
                constraints
            }
        };
        constraints.push(Constraint::Dependency(dependencies));
    }

    /// Whether this is a [`Installable::Bundle`] (used to filter a solved
    /// set down to the installables that map back to catalog entries, §4.4
    /// step 5).
    pub fn is_bundle(&self) -> bool {
        matches!(self, Installable::Bundle { .. })
    }
}

/// The (installable, constraint) pair that is the unit of unsat reporting
/// (§3). Two `AppliedConstraint`s are equal iff both their installable and
/// constraint are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedConstraint {
    pub installable: Installable,
    pub constraint: Constraint,
}

impl AppliedConstraint {
    pub fn new(installable: Installable, constraint: Constraint) -> Self {
        AppliedConstraint {
            installable,
            constraint,
        }
    }

    /// The position of `self.constraint` within `self.installable`'s
    /// constraint list, used for the deterministic tie-break sort in the
    /// test suite (§7 "Unsat ordering for determinism").
    pub fn constraint_position(&self) -> usize {
        self.installable
            .constraints()
            .iter()
            .position(|c| *c == self.constraint)
            .unwrap_or(usize::MAX)
    }
}

impl fmt::Display for AppliedConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.constraint.describe(self.installable.identifier()))
    }
}

/// The sentinel installable returned for an out-of-range literal lookup
/// (§4.3 `installable_of`).
pub(crate) fn zero_installable() -> Installable {
    Installable::Bundle {
        identifier: Identifier::new(""),
        constraints: Vec::new(),
    }
}

/// The sentinel applied constraint returned for an unknown literal lookup
/// (§4.3 `constraint_of`).
pub(crate) fn zero_applied_constraint() -> AppliedConstraint {
    AppliedConstraint::new(zero_installable(), Constraint::Zero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_package_is_mandatory() {
        let v = Installable::virtual_package("pkg");
        assert_eq!(v.constraints(), &[Constraint::Mandatory]);
        assert!(!v.is_bundle());
    }

    #[test]
    fn add_dependency_appends() {
        let mut v = Installable::virtual_package("pkg");
        v.add_dependency(vec![Identifier::new("ns/cat/csv")]);
        assert_eq!(v.constraints().len(), 2);
        assert!(matches!(v.constraints()[1], Constraint::Dependency(_)));
    }

    #[test]
    fn applied_constraint_display_matches_describe() {
        let i = Installable::bundle(Identifier::new("a"), vec![Constraint::Mandatory]);
        let ac = AppliedConstraint::new(i, Constraint::Mandatory);
        assert_eq!(ac.to_string(), "a is mandatory");
    }

    #[test]
    fn constraint_position_found() {
        let i = Installable::bundle(
            Identifier::new("a"),
            vec![Constraint::Mandatory, Constraint::Prohibited],
        );
        let ac = AppliedConstraint::new(i, Constraint::Prohibited);
        assert_eq!(ac.constraint_position(), 1);
    }
}
