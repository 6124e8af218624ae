use thiserror::Error;

#[derive(Debug, Error)]
pub enum VouchError {
    // ── Validation errors ────────────────────────────────────────────────────
    #[error("invalid account name: {0}")]
    InvalidAccountName(String),

    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("invalid referral depth: must be within {min}..={max}, got {got}")]
    InvalidDepth { min: u16, max: u16, got: u16 },

    #[error("invalid multiplier: must be within {min}..={max}, got {got}")]
    InvalidMultiplier { min: u16, max: u16, got: u16 },

    #[error("level multipliers must be non-empty with every entry >= 1")]
    InvalidLevelMultipliers,

    #[error("reward rate must be positive")]
    InvalidRewardRate,

    #[error("minimum account age must be positive once initialized")]
    InvalidMinAge,

    #[error("cooldown must be positive once initialized")]
    InvalidCooldown,

    // ── Authorization errors ─────────────────────────────────────────────────
    #[error("caller is not authorized as {0}")]
    NotAuthorized(String),

    #[error("only the configured admin may update the configuration")]
    AdminOnly,

    #[error("only the platform authority may perform this operation")]
    AuthorityOnly,

    // ── State conflict errors ────────────────────────────────────────────────
    #[error("account already registered: {0}")]
    AlreadyRegistered(String),

    #[error("self-referral not allowed")]
    SelfReferral,

    #[error("unknown account: {0}")]
    UnknownAccount(String),

    #[error("inviter must be registered first: {0}")]
    InviterNotRegistered(String),

    #[error("account is not a participant: {0}")]
    NotRegistered(String),

    #[error("registration and claims are currently disabled")]
    Disabled,

    #[error("account must be at least {required_secs} seconds old to register (is {age_secs})")]
    AccountTooYoung { required_secs: i64, age_secs: i64 },

    #[error("inviter is cooling down; try again in {retry_in_secs} seconds")]
    InviterCoolingDown { retry_in_secs: i64 },

    #[error("rewards already claimed")]
    AlreadyClaimed,

    #[error("no rewards to claim")]
    NothingToClaim,

    // ── Arithmetic ───────────────────────────────────────────────────────────
    #[error("reward amount overflows the token amount range")]
    AmountOverflow,

    // ── External collaborators ───────────────────────────────────────────────
    #[error("token transfer failed: {0}")]
    TransferFailed(String),

    // ── Serialization / storage ──────────────────────────────────────────────
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Storage(String),
}
