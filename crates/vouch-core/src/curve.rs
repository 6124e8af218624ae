//! Tetrahedral step curve.
//!
//! Maps an accumulated score to its discrete position in the fixed
//! tetrahedral-number sequence. Payout bonuses scale with this position,
//! so standing grows super-linearly harder to advance.

use crate::constants::TETRAHEDRAL_STEPS;
use crate::types::Score;

/// Position of `score` within the tetrahedral sequence: the index of the
/// first step strictly greater than `score`, clamped to the last index.
///
/// The boundary is exclusive: a score exactly equal to a step value has
/// not yet passed that step. `position(0) == 0`, `position(1) == 1`,
/// `position(3) == 1`, `position(4) == 2`.
pub fn tetrahedral_position(score: Score) -> u32 {
    for (i, step) in TETRAHEDRAL_STEPS.iter().enumerate() {
        if *step > score {
            return i as u32;
        }
    }
    (TETRAHEDRAL_STEPS.len() - 1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_score_is_position_zero() {
        assert_eq!(tetrahedral_position(0), 0);
    }

    #[test]
    fn boundary_is_exclusive() {
        // A score equal to a step value has passed it; the position is the
        // index of the next (strictly greater) step.
        assert_eq!(tetrahedral_position(1), 1);
        assert_eq!(tetrahedral_position(4), 2);
        assert_eq!(tetrahedral_position(10), 3);
        assert_eq!(tetrahedral_position(20), 4);
    }

    #[test]
    fn below_boundary_stays_behind() {
        assert_eq!(tetrahedral_position(3), 1);
        assert_eq!(tetrahedral_position(9), 2);
        assert_eq!(tetrahedral_position(19), 3);
        assert_eq!(tetrahedral_position(34), 4);
    }

    #[test]
    fn monotonic_over_full_range() {
        let mut prev = tetrahedral_position(0);
        for score in 1..3000u32 {
            let pos = tetrahedral_position(score);
            assert!(pos >= prev, "position regressed at score {}", score);
            prev = pos;
        }
    }

    #[test]
    fn sentinel_clamps_huge_scores() {
        let last = (TETRAHEDRAL_STEPS.len() - 1) as u32;
        assert_eq!(tetrahedral_position(2600), last);
        assert_eq!(tetrahedral_position(u32::MAX - 1), last);
        assert_eq!(tetrahedral_position(u32::MAX), last);
    }
}
