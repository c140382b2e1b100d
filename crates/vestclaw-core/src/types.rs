//! Account identifiers and the lock-request wire shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::VestClawError;

/// Opaque 20-byte beneficiary/authority identifier.
///
/// Rendered as 0x-prefixed lowercase hex; parsed case-insensitively with
/// or without the prefix (the upstream datasets carry Ethereum-style
/// addresses in both spellings). The all-zero value is the null account
/// and is never a valid lock target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId([u8; 20]);

impl AccountId {
    /// The null account.
    pub const ZERO: AccountId = AccountId([0u8; 20]);

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Parse a hex account id ("0xabc..." or bare, any case, 40 digits).
    pub fn parse(s: &str) -> Result<Self, VestClawError> {
        let raw = s.trim();
        let hex = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")).unwrap_or(raw);
        if hex.len() != 40 || !hex.is_ascii() {
            return Err(VestClawError::InvalidAccount(raw.to_string()));
        }
        let mut bytes = [0u8; 20];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = &hex[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16)
                .map_err(|_| VestClawError::InvalidAccount(raw.to_string()))?;
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for AccountId {
    type Error = VestClawError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.to_string()
    }
}

/// One lock request as carried in batch files.
///
/// Field names serialize camelCase to stay byte-compatible with the
/// batch files the upstream ETL produced (`{account, unlockAt, amounts}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRequest {
    /// Beneficiary account.
    pub account: AccountId,
    /// Unlock timestamps (Unix seconds), strictly increasing.
    pub unlock_at: Vec<u64>,
    /// Amount released at each matching unlock timestamp.
    pub amounts: Vec<u64>,
}

impl LockRequest {
    pub fn new(account: AccountId, unlock_at: Vec<u64>, amounts: Vec<u64>) -> Self {
        Self {
            account,
            unlock_at,
            amounts,
        }
    }
}
