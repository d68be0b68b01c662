//! Bounty settings store
//!
//! Process-wide configuration written only through
//! [`BountyBoard::change_bounty_settings`](crate::board::BountyBoard::change_bounty_settings).
//! Experience tables and rates are read by presentation layers for display;
//! the lifecycle engine itself only consumes the allocator reference.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Address;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BountySettings {
    /// Experience multipliers, parallel to `experience_levels`.
    pub xp_multipliers: Vec<u64>,
    /// Human-readable experience level labels.
    pub experience_levels: Vec<String>,
    pub base_rate: u64,
    /// Default deadline offset for new bounties, in hours. Stored metadata;
    /// deadlines are enforced by collaborators, not by this engine.
    pub bounty_deadline_offset: u64,
    /// Display currency for rate calculations; `None` means native.
    pub bounty_currency: Option<Address>,
    /// Address of the active escrow. Changing it only affects future
    /// fundings; live bounties keep resolving against the escrow that holds
    /// their external id.
    pub bounty_allocator: Address,
}

impl Default for BountySettings {
    fn default() -> Self {
        Self {
            xp_multipliers: vec![100, 300, 500],
            experience_levels: vec![
                "Beginner".to_string(),
                "Intermediate".to_string(),
                "Advanced".to_string(),
            ],
            base_rate: 0,
            bounty_deadline_offset: 336,
            bounty_currency: None,
            bounty_allocator: Address::ZERO,
        }
    }
}

impl BountySettings {
    /// Shape check: the experience arrays must pair up.
    pub fn validate(&self) -> Result<()> {
        if self.xp_multipliers.len() != self.experience_levels.len() {
            return Err(Error::LengthMismatch);
        }
        Ok(())
    }
}
