//! External collaborator seams.
//!
//! The engine never reads a clock, checks a signature, or moves tokens
//! itself. Callers thread `now` explicitly and supply these capabilities
//! per call, which keeps every entry point deterministic under test.

use vouch_core::error::VouchError;
use vouch_core::types::{AccountId, Symbol, Timestamp, TokenAmount};

/// Capability proof for the current call: which identities the caller may
/// act as. Supplied by the surrounding platform per operation.
pub trait AuthProof {
    fn authorized_as(&self, account: &AccountId) -> bool;
}

/// Account metadata oracle supplied by the surrounding platform.
pub trait AccountDirectory {
    fn account_exists(&self, account: &AccountId) -> bool;

    /// Creation time of an existing account.
    fn creation_time(&self, account: &AccountId) -> Result<Timestamp, VouchError>;
}

/// External token ledger. Called at most once per claim; a failure aborts
/// the enclosing operation.
pub trait TokenLedger {
    fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: TokenAmount,
        symbol: &Symbol,
        memo: &str,
    ) -> Result<(), VouchError>;
}

/// Proof that the caller holds exactly one identity.
///
/// The common case: the platform verified a signature for `account` and
/// hands the engine this single-identity capability.
pub struct CallerIs(pub AccountId);

impl AuthProof for CallerIs {
    fn authorized_as(&self, account: &AccountId) -> bool {
        self.0 == *account
    }
}
