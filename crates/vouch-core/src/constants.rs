/// ─── Vouch Protocol Constants ───────────────────────────────────────────────
///
/// Bounds validated by governance and the domain types. Changing any of
/// these changes what historical configurations were considered valid.

// ── Identity ─────────────────────────────────────────────────────────────────

/// Maximum account-name length in bytes.
pub const MAX_ACCOUNT_NAME_LEN: usize = 12;

/// Maximum symbol-code length in bytes.
pub const MAX_SYMBOL_CODE_LEN: usize = 7;

/// Maximum fractional precision of a reward symbol.
pub const MAX_SYMBOL_PRECISION: u8 = 18;

// ── Referral graph ───────────────────────────────────────────────────────────

/// Upline traversal depth bounds (inclusive).
pub const MIN_REFERRAL_DEPTH: u16 = 1;
pub const MAX_REFERRAL_DEPTH: u16 = 100;

/// Global curve multiplier bounds (hundredths; 100 = 1.00x).
pub const MIN_CURVE_MULTIPLIER: u16 = 1;
pub const MAX_CURVE_MULTIPLIER: u16 = 1000;

/// Score assigned to a freshly registered participant.
pub const INITIAL_SCORE: u32 = 1;

// ── Tetrahedral curve ────────────────────────────────────────────────────────

/// Tetrahedral numbers T(n) = n(n+1)(n+2)/6 for n = 1..=24, terminated by
/// an effectively-infinite sentinel. A score's "position" is the index of
/// the first entry strictly greater than it, so the sentinel guarantees
/// every score maps into the table.
pub const TETRAHEDRAL_STEPS: [u32; 25] = [
    1, 4, 10, 20, 35, 56, 84, 120, 165, 220, 286, 364, 455, 560, 680, 816, 969, 1140, 1330, 1540,
    1771, 2024, 2300, 2600, u32::MAX,
];
