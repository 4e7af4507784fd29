//! The Literal Dictionary (C1): the bijection between domain identifiers
//! and boolean variables, plus applied-constraint provenance for unsat-core
//! attribution.

use std::collections::HashMap;

use tracing::warn;

use super::identifier::Identifier;
use super::installable::{zero_applied_constraint, zero_installable, AppliedConstraint, Installable};
use super::lit::Lit;

/// Translates between the input/output types of [`super::solve`]
/// (installables, constraints, identifiers) and the integer variables that
/// appear in the compiled formula.
///
/// A `Dictionary` is single-use: built from one installable list, consulted
/// while compiling constraints against one backend, then discarded (§3).
pub struct Dictionary {
    installables: Vec<Installable>,
    indices: HashMap<Identifier, usize>,
    constraints: HashMap<Lit, AppliedConstraint>,
    errors: Vec<String>,
    next: usize,
}

impl Dictionary {
    /// Build a dictionary over `installables`, establishing the
    /// identifier-to-index map deterministically by input order (§4.3:
    /// equal inputs always produce equal literal numberings).
    pub fn compile(installables: Vec<Installable>) -> Self {
        let mut indices = HashMap::with_capacity(installables.len());
        for (index, installable) in installables.iter().enumerate() {
            indices.insert(installable.identifier().clone(), index);
        }
        let next = installables.len() + 1;
        Dictionary {
            installables,
            indices,
            constraints: HashMap::new(),
            errors: Vec::new(),
            next,
        }
    }

    /// Number of installables backing this dictionary (== highest
    /// installable literal).
    pub fn installable_count(&self) -> usize {
        self.installables.len()
    }

    /// Borrow the compiled installable list, in input order.
    pub fn installables(&self) -> &[Installable] {
        &self.installables
    }

    /// The positive literal for the installable named `id`. Unknown
    /// identifiers are logged as a dictionary error (§3 invariant: dangling
    /// references poison the solve) and yield the null literal.
    pub fn lit_of(&mut self, id: &Identifier) -> Lit {
        match self.indices.get(id) {
            Some(&index) => Lit::positive(index + 1),
            None => {
                let msg = format!("installable {id:?} referenced but not provided");
                warn!(identifier = %id, "{msg}");
                self.errors.push(msg);
                Lit::NULL
            }
        }
    }

    /// Allocate and return a fresh literal for an auxiliary activation
    /// clause (`dependency`/`conflict` encodings).
    pub fn free_lit(&mut self) -> Lit {
        let lit = Lit::positive(self.next);
        self.next += 1;
        lit
    }

    /// Record that literal `m` was produced by applying `applied` during
    /// compilation, so a later unsat core expressed in `m` can be mapped
    /// back to it.
    pub fn record_constraint(&mut self, m: Lit, applied: AppliedConstraint) {
        if !m.is_null() {
            self.constraints.insert(m, applied);
        }
    }

    /// The installable corresponding to `lit`, for literals `1..=N`.
    /// Out-of-range literals are logged and yield a zero-installable
    /// sentinel (§4.3).
    pub fn installable_of(&mut self, lit: Lit) -> Installable {
        match lit.var() {
            Some(var) if var >= 1 && var <= self.installables.len() => {
                self.installables[var - 1].clone()
            }
            _ => {
                let msg = format!("no installable corresponding to {lit}");
                warn!("{msg}");
                self.errors.push(msg);
                zero_installable()
            }
        }
    }

    /// The applied constraint that produced `lit`, or a zero-constraint
    /// sentinel for an unknown literal (§4.3).
    pub fn constraint_of(&mut self, lit: Lit) -> AppliedConstraint {
        match self.constraints.get(&lit) {
            Some(applied) => applied.clone(),
            None => {
                let msg = format!("no constraint corresponding to {lit}");
                warn!("{msg}");
                self.errors.push(msg);
                zero_applied_constraint()
            }
        }
    }

    /// Aggregate all logged errors into one composite, or `None` if there
    /// were none. A non-`None` return indicates a bug in the constraint
    /// wiring, not a genuine unsat result (§7).
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    /// Whether any referential-integrity errors have been logged so far.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
