use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{MAX_ACCOUNT_NAME_LEN, MAX_SYMBOL_CODE_LEN, MAX_SYMBOL_PRECISION};
use crate::error::VouchError;

/// Unix timestamp (seconds, UTC).
pub type Timestamp = i64;

/// Referral score accumulated by a participant.
pub type Score = u32;

/// Token amount in base units of the reward symbol.
pub type TokenAmount = u64;

// ── AccountId ────────────────────────────────────────────────────────────────

/// Human-readable account name: 1–12 chars from `a-z`, `1-5` and `.`,
/// not starting or ending with `.`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(name: &str) -> Result<Self, VouchError> {
        if name.is_empty() || name.len() > MAX_ACCOUNT_NAME_LEN {
            return Err(VouchError::InvalidAccountName(name.to_string()));
        }
        let valid = name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || (b'1'..=b'5').contains(&b) || b == b'.');
        if !valid || name.starts_with('.') || name.ends_with('.') {
            return Err(VouchError::InvalidAccountName(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw bytes, used as the primary key in the state database.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VouchError> {
        let s = std::str::from_utf8(bytes)
            .map_err(|_| VouchError::InvalidAccountName(String::from_utf8_lossy(bytes).into()))?;
        Self::new(s)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.0)
    }
}

// ── Symbol ───────────────────────────────────────────────────────────────────

/// Reward token denomination: 1–7 uppercase A–Z code plus a fractional
/// precision (number of base-unit decimals).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    code: String,
    precision: u8,
}

impl Symbol {
    pub fn new(code: &str, precision: u8) -> Result<Self, VouchError> {
        if code.is_empty()
            || code.len() > MAX_SYMBOL_CODE_LEN
            || !code.bytes().all(|b| b.is_ascii_uppercase())
            || precision > MAX_SYMBOL_PRECISION
        {
            return Err(VouchError::InvalidSymbol(format!("{},{}", code, precision)));
        }
        Ok(Self { code: code.to_string(), precision })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Base units per whole token: 10^precision, widened for arithmetic.
    pub fn scale(&self) -> u128 {
        10u128.pow(self.precision as u32)
    }

    /// Render a base-unit amount as a decimal quantity with the code,
    /// e.g. `12.5000 VOUCH`.
    pub fn format_amount(&self, amount: TokenAmount) -> String {
        if self.precision == 0 {
            return format!("{} {}", amount, self.code);
        }
        let scale = self.scale() as u64;
        format!(
            "{}.{:0width$} {}",
            amount / scale,
            amount % scale,
            self.code,
            width = self.precision as usize
        )
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision, self.code)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({},{})", self.precision, self.code)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
