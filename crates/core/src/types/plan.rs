//! Subscription plan label.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Subscription plan shown on the account menu.
///
/// A free-form label. New accounts get [`Plan::PREMIUM`] unless the store is
/// configured with a different default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Plan(String);

impl Plan {
    /// Label assigned to every new account by default.
    pub const PREMIUM: &'static str = "Premium Plan";

    /// Create a plan from a label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the plan label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Plan {
    fn default() -> Self {
        Self::new(Self::PREMIUM)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_premium() {
        assert_eq!(Plan::default().as_str(), "Premium Plan");
    }
}
