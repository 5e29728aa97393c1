//! Cache layer configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the pagination cache layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagerConfig {
    /// Capacity of the invalidation broadcast channel.
    ///
    /// A subscriber that falls more than this many events behind observes a
    /// lag error from its receiver and must resubscribe; events carry no
    /// payload, so a lagged subscriber only needs one fresh event to know
    /// its domains are stale.
    pub invalidation_capacity: usize,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            invalidation_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_is_nonzero() {
        assert!(PagerConfig::default().invalidation_capacity > 0);
    }
}
