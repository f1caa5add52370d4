//! Goal condition: every intermediate location checked.

use crate::element::is_goal_location;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tracks the intermediate locations still missing for the goal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalTracker {
    needed: BTreeSet<u32>,
    reached: bool,
}

impl GoalTracker {
    /// Seed from the room's missing locations. Locations that do not belong
    /// to an intermediate in `1..=intermediate_amount` are ignored.
    pub fn from_missing(missing: impl IntoIterator<Item = u32>, intermediate_amount: u32) -> Self {
        Self {
            needed: missing
                .into_iter()
                .filter(|&loc| is_goal_location(loc, intermediate_amount))
                .collect(),
            reached: false,
        }
    }

    /// Remove checked locations from the needed set.
    pub fn check(&mut self, locations: &[u32]) {
        for loc in locations {
            self.needed.remove(loc);
        }
    }

    /// Returns `true` exactly once: the first time this is called with
    /// nothing left to check.
    pub fn evaluate(&mut self) -> bool {
        if self.reached || !self.needed.is_empty() {
            return false;
        }
        self.reached = true;
        true
    }

    pub fn needed(&self) -> &BTreeSet<u32> {
        &self.needed
    }

    pub fn is_reached(&self) -> bool {
        self.reached
    }
}
