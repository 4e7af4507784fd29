//! The closed set of constraint variants (§4.2) and their CNF encodings.

use std::fmt;

use super::backend::SatBackend;
use super::dict::Dictionary;
use super::identifier::Identifier;
use super::lit::Lit;

/// One of the five constraint kinds an [`crate::sat::Installable`] can carry.
///
/// The set is closed and total: every variant's `apply` is exhaustive, and
/// nothing outside the SAT layer can introduce a sixth kind — new encodings
/// require editing this enum, not implementing a trait somewhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// No effect. Exists so a sentinel `AppliedConstraint` can be produced
    /// for lookup failures without an `Option` at every call site.
    Zero,
    /// The subject installable must be selected.
    Mandatory,
    /// The subject installable must not be selected.
    Prohibited,
    /// If the subject is selected, at least one of the named identifiers
    /// must also be selected.
    Dependency(Vec<Identifier>),
    /// The subject and the named identifier cannot both be selected.
    Conflict(Identifier),
}

impl Constraint {
    /// Human-readable description used both for `Display` and for the
    /// unsat-core error string (§4.2, §7). `subject` is the identifier of
    /// the installable carrying this constraint.
    pub fn describe(&self, subject: &Identifier) -> String {
        match self {
            Constraint::Zero => String::new(),
            Constraint::Mandatory => format!("{subject} is mandatory"),
            Constraint::Prohibited => format!("{subject} is prohibited"),
            Constraint::Dependency(deps) => {
                let joined = deps
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{subject} requires at least one of {joined}")
            }
            Constraint::Conflict(other) => format!("{subject} conflicts with {other}"),
        }
    }

    /// Encode this constraint into the backend and return the literal
    /// (assumption or activation literal) that identifies it for unsat-core
    /// attribution.
    pub(crate) fn apply(
        &self,
        backend: &mut dyn SatBackend,
        dict: &mut Dictionary,
        subject: &Identifier,
    ) -> Lit {
        match self {
            Constraint::Zero => Lit::NULL,

            Constraint::Mandatory => {
                let m = dict.lit_of(subject);
                backend.assume(&[m]);
                m
            }

            Constraint::Prohibited => {
                let m = dict.lit_of(subject).negated();
                backend.assume(&[m]);
                m
            }

            Constraint::Dependency(deps) => {
                backend.add(dict.lit_of(subject).negated());
                for dep in deps {
                    backend.add(dict.lit_of(dep));
                }
                let m = dict.free_lit();
                backend.activate_with(m);
                backend.assume(&[m]);
                m
            }

            Constraint::Conflict(other) => {
                backend.add(dict.lit_of(subject).negated());
                backend.add(dict.lit_of(other).negated());
                let m = dict.free_lit();
                backend.activate_with(m);
                backend.assume(&[m]);
                m
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Constraint::Display has no subject of its own; used only for
        // debug output, never for the unsat-core strings (those go through
        // `describe`, which takes the owning installable's identifier).
        match self {
            Constraint::Zero => write!(f, "<no constraint>"),
            Constraint::Mandatory => write!(f, "mandatory"),
            Constraint::Prohibited => write!(f, "prohibited"),
            Constraint::Dependency(deps) => {
                write!(f, "dependency(")?;
                for (i, d) in deps.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{d}")?;
                }
                write!(f, ")")
            }
            Constraint::Conflict(other) => write!(f, "conflict({other})"),
        }
    }
}
