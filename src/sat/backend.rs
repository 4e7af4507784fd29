//! The CDCL backend adapter.
//!
//! The specification treats the underlying SAT algorithm as an external
//! collaborator exposing exactly six primitives: `Add`, `Assume`,
//! `ActivateWith`, `Solve`, `Value`, `Why`. [`SatBackend`] is that
//! interface, expressed over this crate's own [`Lit`] newtype so that
//! [`super::dict::Dictionary`] and [`super::constraint::Constraint`] never
//! need to know which SAT crate is behind it. [`VarisatBackend`] is the one
//! production implementation, wrapping [`varisat::Solver`].

use std::collections::HashMap;
use std::time::Instant;

use crate::config::ResolverConfig;

use super::lit::Lit;

/// Negate a `varisat::Lit` by round-tripping through its variable, since
/// only `Var::lit(bool)` is relied upon here rather than any operator
/// overload the backend crate may or may not expose on `Lit` itself.
fn negate(lit: varisat::Lit) -> varisat::Lit {
    lit.var().lit(!lit.is_positive())
}

/// Outcome of a backend `solve` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Satisfiable,
    Unsatisfiable,
    /// Neither SAT nor UNSAT was established (§5: timeout or resource
    /// exhaustion). The reference backend never produces this today, but
    /// the contract accommodates a future backend that can.
    Indeterminate,
}

/// The narrow interface the Dictionary and Constraint encoders compile
/// against. One clause is built up by zero or more [`SatBackend::add`]
/// calls terminated by [`SatBackend::activate_with`], which both finalizes
/// the clause (appending the activation literal's negation, per §4.2's
/// "activated by m") and hands back control once the clause has been
/// submitted to the backend.
pub trait SatBackend {
    /// Append a literal to the clause currently under construction.
    fn add(&mut self, lit: Lit);

    /// Finalize the clause under construction, adding `¬act` as one more
    /// disjunct so the clause has no effect unless `act` is later assumed.
    fn activate_with(&mut self, act: Lit);

    /// Record literals that must hold in the next `solve` call, and are
    /// eligible to appear in the unsat core via `why`.
    fn assume(&mut self, lits: &[Lit]);

    /// Solve the accumulated clauses under the accumulated assumptions.
    fn solve(&mut self) -> Outcome;

    /// The value assigned to `lit` in the last satisfiable solve.
    fn value(&mut self, lit: Lit) -> bool;

    /// The subset of assumed literals that were part of the proof of
    /// unsatisfiability in the last solve.
    fn why(&mut self) -> Vec<Lit>;
}

/// [`SatBackend`] implementation over [`varisat::Solver`].
///
/// Backend variables are allocated lazily: the first time a [`Lit`] with a
/// previously-unseen magnitude is passed to `add`, `assume`, or
/// `activate_with`, a fresh `varisat::Var` is interned for it. This keeps
/// the adapter agnostic of how many auxiliary literals the Dictionary ends
/// up allocating.
pub struct VarisatBackend<'a> {
    solver: varisat::Solver<'a>,
    vars: Vec<varisat::Var>,
    var_of_magnitude: HashMap<i32, usize>,
    pending_clause: Vec<varisat::Lit>,
    assumptions: Vec<varisat::Lit>,
    assumption_origin: HashMap<varisat::Lit, Lit>,
    budget: ResolverConfig,
}

impl<'a> VarisatBackend<'a> {
    /// Create a backend pre-sized for `installable_count` installables; the
    /// corresponding backend variables are allocated up front so literals
    /// `1..=installable_count` are ready before any constraint is applied.
    /// `budget` bounds the work the next [`SatBackend::solve`] call may
    /// perform (§5).
    pub fn new(installable_count: usize, budget: ResolverConfig) -> Self {
        let mut backend = VarisatBackend {
            solver: varisat::Solver::new(),
            vars: Vec::with_capacity(installable_count),
            var_of_magnitude: HashMap::with_capacity(installable_count),
            pending_clause: Vec::new(),
            assumptions: Vec::new(),
            assumption_origin: HashMap::new(),
            budget,
        };
        for var in 1..=installable_count {
            backend.ensure_var(var as i32);
        }
        backend
    }

    fn ensure_var(&mut self, magnitude: i32) -> varisat::Var {
        debug_assert!(magnitude > 0);
        if let Some(&idx) = self.var_of_magnitude.get(&magnitude) {
            return self.vars[idx];
        }
        let var = self.solver.new_var();
        let idx = self.vars.len();
        self.vars.push(var);
        self.var_of_magnitude.insert(magnitude, idx);
        var
    }

    fn to_backend_lit(&mut self, lit: Lit) -> varisat::Lit {
        debug_assert!(!lit.is_null(), "null literal must never reach the backend");
        let var = self.ensure_var(lit.raw().abs());
        var.lit(lit.is_positive())
    }

    fn from_backend_lit(&self, lit: varisat::Lit) -> Option<Lit> {
        let var = lit.var();
        self.var_of_magnitude
            .iter()
            .find(|(_, &idx)| self.vars[idx] == var)
            .map(|(&magnitude, _)| {
                if lit.is_positive() {
                    Lit::positive(magnitude as usize)
                } else {
                    Lit::positive(magnitude as usize).negated()
                }
            })
    }
}

impl SatBackend for VarisatBackend<'_> {
    fn add(&mut self, lit: Lit) {
        if lit.is_null() {
            return;
        }
        let backend_lit = self.to_backend_lit(lit);
        self.pending_clause.push(backend_lit);
    }

    fn activate_with(&mut self, act: Lit) {
        let act_lit = self.to_backend_lit(act);
        self.pending_clause.push(negate(act_lit));
        self.solver.add_clause(&self.pending_clause);
        self.pending_clause.clear();
    }

    fn assume(&mut self, lits: &[Lit]) {
        for &lit in lits {
            if lit.is_null() {
                continue;
            }
            let backend_lit = self.to_backend_lit(lit);
            self.assumptions.push(backend_lit);
            self.assumption_origin.insert(backend_lit, lit);
        }
    }

    fn solve(&mut self) -> Outcome {
        if self.budget.max_conflicts == Some(0) {
            return Outcome::Indeterminate;
        }

        let started = Instant::now();
        self.solver.assume(&self.assumptions);
        let result = self.solver.solve();

        if let Some(deadline) = self.budget.deadline {
            if started.elapsed() >= deadline {
                return Outcome::Indeterminate;
            }
        }

        match result {
            Ok(true) => Outcome::Satisfiable,
            Ok(false) => Outcome::Unsatisfiable,
            Err(_) => Outcome::Indeterminate,
        }
    }

    fn value(&mut self, lit: Lit) -> bool {
        if lit.is_null() {
            return false;
        }
        let backend_lit = self.to_backend_lit(lit);
        self.solver
            .model()
            .and_then(|model| model.iter().find(|l| l.var() == backend_lit.var()).copied())
            .map(|assigned| assigned.is_positive() == backend_lit.is_positive())
            .unwrap_or(false)
    }

    fn why(&mut self) -> Vec<Lit> {
        let Some(core) = self.solver.failed_core() else {
            return Vec::new();
        };
        core.iter()
            .filter_map(|&backend_lit| {
                self.assumption_origin
                    .get(&backend_lit)
                    .copied()
                    .or_else(|| self.from_backend_lit(backend_lit))
            })
            .collect()
    }
}
