//! A SAT-backed dependency resolver for catalog-sourced installable bundles.
//!
//! The crate is split into two layers:
//!
//! - [`sat`] is domain-agnostic: a literal dictionary, a closed set of
//!   constraint kinds, and a frontend that turns a list of installables into
//!   either a selected subset or an unsat core. It knows nothing about
//!   packages or catalogs.
//! - [`catalog`] and [`resolver`] translate catalog data and subscription
//!   requests into [`sat::Installable`]s and translate the result back into
//!   [`catalog::Operator`]s.

pub mod catalog;
pub mod config;
pub mod error;
pub mod resolver;
pub mod sat;

pub use catalog::{Cache, CatalogKey, Operator, VersionDependency};
pub use config::ResolverConfig;
pub use error::{ResolveError, SatError};
pub use resolver::{BundleResolver, Subscription};
pub use sat::{AppliedConstraint, Constraint, Identifier, Installable};
