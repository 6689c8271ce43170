#![forbid(unsafe_code)]

//! When a change on one side of a binding reaches the other side.

use std::fmt;

/// Propagation policy for one direction of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum UpdatePolicy {
    /// Changes are never propagated in this direction.
    Never,
    /// Changes are propagated only by an explicit update call.
    OnRequest,
    /// Changes are propagated as soon as they happen.
    #[default]
    Instantly,
}

impl UpdatePolicy {
    /// Whether change events propagate immediately.
    #[must_use]
    pub fn is_instant(self) -> bool {
        self == Self::Instantly
    }

    /// Whether explicit update calls propagate.
    #[must_use]
    pub fn allows_update(self) -> bool {
        self != Self::Never
    }
}

impl fmt::Display for UpdatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Never => "NEVER",
            Self::OnRequest => "ON_REQUEST",
            Self::Instantly => "INSTANTLY",
        })
    }
}
