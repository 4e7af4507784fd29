//! The [`Identifier`] newtype naming installables.
//!
//! Per the data model, an identifier is an opaque string: either a bare
//! package name (virtual-package installables) or a `namespace/catalog/csv`
//! triple (bundle installables). The SAT layer never interprets the string
//! beyond equality and ordering — splitting on `/` is entirely the
//! resolver layer's concern (see [`crate::catalog`]).

use std::fmt;

/// Uniquely names an [`crate::sat::Installable`] within one solve.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Wrap any string-like value as an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Identifier(id.into())
    }

    /// Borrow the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier::new(s)
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Identifier::new(s)
    }
}
