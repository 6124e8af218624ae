//! vouch-engine
//!
//! Serialized state-transition engine for the referral forest: registration,
//! score propagation, reward claims, and governance. Storage lives in
//! vouch-store; identity, account metadata, and token issuance are external
//! collaborators expressed as traits in `context`.

pub mod context;
pub mod engine;
pub mod query;

pub use context::{AccountDirectory, AuthProof, TokenLedger};
pub use engine::ReferralEngine;
pub use query::ReferralQuery;
