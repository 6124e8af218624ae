//! Claim-time reward arithmetic.
//!
//! All multiplication chains widen to u128 before any division and reject
//! amounts that do not fit a `TokenAmount`. Overflow aborts the claim; it
//! never wraps or silently clamps.

use crate::config::RewardPolicy;
use crate::curve::tetrahedral_position;
use crate::error::VouchError;
use crate::types::{Score, Symbol, TokenAmount};

/// Compute the payout for `score` under `policy`.
///
/// `rate` is in hundredths of a token per point (100 = 1.00 token).
pub fn reward_amount(
    policy: RewardPolicy,
    score: Score,
    symbol: &Symbol,
    rate: u32,
) -> Result<TokenAmount, VouchError> {
    let base = (score as u128)
        .checked_mul(symbol.scale())
        .and_then(|v| v.checked_mul(rate as u128))
        .ok_or(VouchError::AmountOverflow)?
        / 100;

    let total = match policy {
        RewardPolicy::ScoreLinear => base,
        RewardPolicy::CurveBased => {
            let position = tetrahedral_position(score) as u128;
            let bonus = base.checked_mul(position).ok_or(VouchError::AmountOverflow)? / 100;
            base.checked_add(bonus).ok_or(VouchError::AmountOverflow)?
        }
    };

    TokenAmount::try_from(total).map_err(|_| VouchError::AmountOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(precision: u8) -> Symbol {
        Symbol::new("VOUCH", precision).unwrap()
    }

    #[test]
    fn linear_basic() {
        // 5 points × 10^4 × 100 / 100 = 50_000 base units (5.0000 VOUCH).
        let amount = reward_amount(RewardPolicy::ScoreLinear, 5, &sym(4), 100).unwrap();
        assert_eq!(amount, 50_000);
    }

    #[test]
    fn linear_fractional_rate() {
        // rate 50 = 0.50 token per point.
        let amount = reward_amount(RewardPolicy::ScoreLinear, 3, &sym(2), 50).unwrap();
        assert_eq!(amount, 150);
    }

    #[test]
    fn curve_adds_position_bonus() {
        // score 5 → position 2 (first step > 5 is 10 at index 2).
        // base = 5 × 10^4 × 100 / 100 = 50_000; bonus = 50_000 × 2 / 100.
        let amount = reward_amount(RewardPolicy::CurveBased, 5, &sym(4), 100).unwrap();
        assert_eq!(amount, 51_000);
    }

    #[test]
    fn curve_zero_position_pays_base_only() {
        // score 0 would not be claimable, but the arithmetic is total.
        let amount = reward_amount(RewardPolicy::CurveBased, 0, &sym(4), 100).unwrap();
        assert_eq!(amount, 0);
    }

    #[test]
    fn monotonic_in_score() {
        for policy in [RewardPolicy::ScoreLinear, RewardPolicy::CurveBased] {
            let mut prev = 0;
            for score in 1..2_000u32 {
                let amount = reward_amount(policy, score, &sym(4), 100).unwrap();
                assert!(amount >= prev, "reward regressed at score {}", score);
                prev = amount;
            }
        }
    }

    #[test]
    fn overflow_rejected_not_wrapped() {
        // u32::MAX points at precision 18 exceeds u64 base units.
        let err = reward_amount(RewardPolicy::ScoreLinear, u32::MAX, &sym(18), 1_000_000_000)
            .unwrap_err();
        assert!(matches!(err, VouchError::AmountOverflow));

        let err =
            reward_amount(RewardPolicy::CurveBased, u32::MAX, &sym(18), 1_000_000_000).unwrap_err();
        assert!(matches!(err, VouchError::AmountOverflow));
    }

    #[test]
    fn large_but_safe_amount_succeeds() {
        let amount = reward_amount(RewardPolicy::CurveBased, 1_000_000, &sym(4), 100).unwrap();
        // position of 1_000_000 is the sentinel index (24).
        assert_eq!(amount, 10_000_000_000 + 10_000_000_000 * 24 / 100);
    }
}
