//! Resolver-wide configuration: the resource budget the SAT frontend is
//! allowed to spend on one solve.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Bounds on how much work a single [`crate::sat::solve`] call may perform.
///
/// The reference backend never exercises the indeterminate path (§5), but a
/// future backend with real conflict/time budgets plugs into the same
/// struct without a breaking change to callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Maximum number of CDCL conflicts before giving up and reporting
    /// [`crate::error::SatError::Indeterminate`]. `None` means unbounded.
    pub max_conflicts: Option<u64>,

    /// Wall-clock budget for one solve. `None` means unbounded.
    #[serde(with = "duration_millis_opt")]
    pub deadline: Option<Duration>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            max_conflicts: None,
            deadline: None,
        }
    }
}

impl ResolverConfig {
    /// A config with no resource limits at all.
    pub fn unbounded() -> Self {
        ResolverConfig::default()
    }

    /// A config bounded only by wall-clock time.
    pub fn with_deadline(deadline: Duration) -> Self {
        ResolverConfig {
            deadline: Some(deadline),
            ..Default::default()
        }
    }
}

mod duration_millis_opt {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.map(|d| d.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis: Option<u64> = Option::deserialize(deserializer)?;
        Ok(millis.map(Duration::from_millis))
    }
}
