//! The domain-agnostic SAT layer: a literal dictionary, a closed set of
//! constraint kinds, and the frontend that turns a list of installables into
//! either a selected subset or an unsat core.
//!
//! Everything in this module is oblivious to catalogs, packages, or
//! subscriptions — see [`crate::catalog`] and [`crate::resolver`] for the
//! layer that translates those into [`Installable`]s.

mod backend;
mod constraint;
mod dict;
mod identifier;
mod installable;
mod lit;
mod solve;

pub use constraint::Constraint;
pub use identifier::Identifier;
pub use installable::{AppliedConstraint, Installable};
pub use solve::{solve, solve_with_config};

pub(crate) use backend::{Outcome, SatBackend, VarisatBackend};
pub(crate) use dict::Dictionary;
pub(crate) use lit::Lit;
