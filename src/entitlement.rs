//! Plan state reported by the billing collaborator.
//!
//! The layout core never enforces quota; the session truncates add batches
//! against the plan ceiling before placement, so the core only ever sees
//! admissible requests.

use serde::{Deserialize, Serialize};

/// Chart ceiling for accounts without a premium entitlement.
pub const FREE_MAX_CHARTS: usize = 5;
/// Chart ceiling once a one-time or recurring purchase is active.
pub const PREMIUM_MAX_CHARTS: usize = 50;

/// Entitlement state as reported by the billing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    None,
    Subscribed,
    Lifetime,
}

impl Plan {
    pub const fn is_premium(self) -> bool {
        matches!(self, Plan::Subscribed | Plan::Lifetime)
    }

    pub const fn max_charts(self) -> usize {
        if self.is_premium() {
            PREMIUM_MAX_CHARTS
        } else {
            FREE_MAX_CHARTS
        }
    }

    /// How many of `requested` new charts fit under the ceiling given the
    /// current count. The session slices add batches with this before
    /// calling the coordinator.
    pub fn allowed_additions(self, current: usize, requested: usize) -> usize {
        requested.min(self.max_charts().saturating_sub(current))
    }
}
