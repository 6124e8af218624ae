use serde::{Deserialize, Serialize};

use crate::types::{AccountId, Score, Timestamp};

// ── Participant ──────────────────────────────────────────────────────────────

/// One enrolled account in the referral forest.
///
/// Created exactly once at registration and mutated in place afterwards.
/// `invited_by` never changes after creation; `None` marks a forest seed.
/// The relation is acyclic by construction: an account registers once and
/// must name an already-registered inviter, so every upline terminates.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Participant {
    pub account: AccountId,
    pub invited_by: Option<AccountId>,
    /// Timestamp of the most recent score mutation; gates the cooldown.
    pub last_updated: Timestamp,
    pub score: Score,
    /// One-shot claim flag (meaningful under `ClaimPolicy::SingleClaim`).
    pub claimed: bool,
    pub registered_at: Timestamp,
}

impl Participant {
    pub fn new(
        account: AccountId,
        invited_by: Option<AccountId>,
        score: Score,
        now: Timestamp,
    ) -> Self {
        Self {
            account,
            invited_by,
            last_updated: now,
            score,
            claimed: false,
            registered_at: now,
        }
    }

    /// Seconds until this participant may receive another score increment.
    /// Zero if the cooldown has elapsed.
    pub fn cooldown_remaining(&self, cooldown_secs: i64, now: Timestamp) -> i64 {
        (self.last_updated + cooldown_secs - now).max(0)
    }
}

// ── Stats ────────────────────────────────────────────────────────────────────

/// Global counters, written as a side effect of registration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Stats {
    pub total_users: u64,
    pub total_referrals: u64,
    pub last_registered: Option<AccountId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_remaining_counts_down() {
        let p = Participant::new(AccountId::new("alice").unwrap(), None, 1, 1_000);
        assert_eq!(p.cooldown_remaining(600, 1_000), 600);
        assert_eq!(p.cooldown_remaining(600, 1_300), 300);
        assert_eq!(p.cooldown_remaining(600, 1_600), 0);
        assert_eq!(p.cooldown_remaining(600, 2_000), 0);
    }
}
