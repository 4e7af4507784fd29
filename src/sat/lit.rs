//! Opaque literal handle shared by the Dictionary, the Constraint encoders
//! and the backend adapter.
//!
//! A [`Lit`] wraps a signed `i32`: the magnitude is a 1-based variable
//! index, the sign is polarity, and `0` is the null sentinel. This mirrors
//! the variable numbering in [`crate::sat::dict::Dictionary`] (literals
//! `1..=N` are installables, everything above `N` is an auxiliary
//! activation literal) without committing that numbering to whatever
//! representation the underlying SAT crate happens to use internally.

use std::fmt;

/// A signed variable handle. `Lit::NULL` carries no meaning and is only
/// ever produced by the `zero` constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lit(i32);

impl Lit {
    /// The null literal, returned by constraints with no CNF effect.
    pub const NULL: Lit = Lit(0);

    /// Construct the positive literal for the given 1-based variable index.
    pub(crate) fn positive(var: usize) -> Lit {
        debug_assert!(var > 0, "variable indices are 1-based");
        Lit(var as i32)
    }

    /// Whether this is the null sentinel.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// The positive form of this literal (same variable, positive polarity).
    pub fn positive_form(self) -> Lit {
        Lit(self.0.abs())
    }

    /// The negated form of this literal (same variable, opposite polarity).
    pub fn negated(self) -> Lit {
        Lit(-self.0)
    }

    /// Whether this literal is in positive polarity.
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// The 1-based variable index this literal refers to, or `None` for
    /// the null literal.
    pub fn var(self) -> Option<usize> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.unsigned_abs() as usize)
        }
    }

    /// The raw signed integer backing this literal. Used only by the
    /// backend adapter to translate into the underlying SAT crate's own
    /// literal type.
    pub(crate) fn raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_null() {
        assert!(Lit::NULL.is_null());
        assert_eq!(Lit::NULL.var(), None);
    }

    #[test]
    fn positive_and_negated_roundtrip() {
        let lit = Lit::positive(3);
        assert!(lit.is_positive());
        assert_eq!(lit.var(), Some(3));
        let neg = lit.negated();
        assert!(!neg.is_positive());
        assert_eq!(neg.var(), Some(3));
        assert_eq!(neg.negated(), lit);
        assert_eq!(neg.positive_form(), lit);
    }
}
