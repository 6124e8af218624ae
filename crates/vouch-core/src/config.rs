use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_CURVE_MULTIPLIER, MAX_REFERRAL_DEPTH, MIN_CURVE_MULTIPLIER, MIN_REFERRAL_DEPTH,
};
use crate::error::VouchError;
use crate::types::{AccountId, Symbol};

// ── Policies ─────────────────────────────────────────────────────────────────

/// How score propagation weights each upline level.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum ScorePolicy {
    /// Every reachable ancestor gets +1.
    Flat,
    /// +multipliers[level-1] per level; levels past the end of the array
    /// fall back to `default_multiplier`.
    LevelWeighted {
        multipliers: Vec<u8>,
        default_multiplier: u8,
    },
    /// The increment scales with the recipient's current tetrahedral
    /// position, floored at 1 so progress never stalls.
    /// `global_multiplier` is in hundredths (100 = 1.00x).
    CurveWeighted { global_multiplier: u16 },
}

/// Claim accounting variant. The two are mutually exclusive: a deployment
/// picks one and never mixes them.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub enum ClaimPolicy {
    /// A one-shot `claimed` flag; a participant can claim exactly once.
    SingleClaim,
    /// Claiming resets score to zero; future re-accrual allows re-claiming.
    ResetOnClaim,
}

/// How an accumulated score converts into a token amount at claim time.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub enum RewardPolicy {
    /// amount = score × scale × rate / 100
    ScoreLinear,
    /// base = score × scale × rate / 100; bonus = base × position / 100
    CurveBased,
}

// ── Config ───────────────────────────────────────────────────────────────────

/// Engine-wide configuration singleton.
///
/// Written only through governance (`set_config`); read by every entry
/// point. The whole record is replaced atomically — there is no
/// partial-field update.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Account authorized to replace this record after bootstrap.
    pub admin: AccountId,
    /// Minimum account age (seconds) required to register.
    pub min_account_age_secs: i64,
    /// Minimum elapsed time between score increments for one account.
    pub cooldown_secs: i64,
    /// Master switch for registration and claims.
    pub enabled: bool,
    /// Upline traversal bound, inclusive.
    pub max_referral_depth: u16,
    pub score_policy: ScorePolicy,
    pub claim_policy: ClaimPolicy,
    pub reward_policy: RewardPolicy,
    /// Identity of the external token ledger rewards are drawn from.
    pub reward_ledger: AccountId,
    pub reward_symbol: Symbol,
    /// Reward units per score point, in hundredths (100 = 1.00 token).
    pub reward_rate: u32,
    /// When set, registration is rejected outright while the direct
    /// inviter is still within its cooldown window.
    pub strict_inviter_cooldown: bool,
}

impl Config {
    /// Validate the record. Bootstrap accepts zero cooldown and min-age;
    /// once initialized, both must be positive.
    pub fn validate(&self, initialized: bool) -> Result<(), VouchError> {
        if !(MIN_REFERRAL_DEPTH..=MAX_REFERRAL_DEPTH).contains(&self.max_referral_depth) {
            return Err(VouchError::InvalidDepth {
                min: MIN_REFERRAL_DEPTH,
                max: MAX_REFERRAL_DEPTH,
                got: self.max_referral_depth,
            });
        }
        if self.reward_rate == 0 {
            return Err(VouchError::InvalidRewardRate);
        }
        match &self.score_policy {
            ScorePolicy::Flat => {}
            ScorePolicy::LevelWeighted { multipliers, default_multiplier } => {
                if multipliers.is_empty()
                    || multipliers.iter().any(|m| *m == 0)
                    || *default_multiplier == 0
                {
                    return Err(VouchError::InvalidLevelMultipliers);
                }
            }
            ScorePolicy::CurveWeighted { global_multiplier } => {
                if !(MIN_CURVE_MULTIPLIER..=MAX_CURVE_MULTIPLIER).contains(global_multiplier) {
                    return Err(VouchError::InvalidMultiplier {
                        min: MIN_CURVE_MULTIPLIER,
                        max: MAX_CURVE_MULTIPLIER,
                        got: *global_multiplier,
                    });
                }
            }
        }
        // Bootstrap accepts zero timers; updates after that require both
        // to be positive. Negative values are never valid.
        let min_allowed = if initialized { 1 } else { 0 };
        if self.min_account_age_secs < min_allowed {
            return Err(VouchError::InvalidMinAge);
        }
        if self.cooldown_secs < min_allowed {
            return Err(VouchError::InvalidCooldown);
        }
        Ok(())
    }
}
