//! Core data types shared across the board

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Funded amounts and payouts, in the smallest unit of the currency.
pub type Amount = u128;

/// Identifier handed back by the external bounty escrow when funds are
/// deposited. Escrows start at 1; there is no id 0.
pub type ExternalId = u64;

/// A 20-byte account identity: applicants, assignees, token contracts,
/// allocators and the vault itself are all addressed this way.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    /// Builds an address from a small integer, big-endian in the low bytes.
    /// Handy for fixtures and locally-wired collaborators.
    pub fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&value.to_be_bytes());
        Address(bytes)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Address {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(raw).map_err(|e| format!("bad address {s}: {e}"))?;
        let bytes: [u8; 20] = bytes
            .try_into()
            .map_err(|_| format!("bad address length: {s}"))?;
        Ok(Address(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Externally-supplied opaque repository identifier (e.g. an encoded
/// repository reference). The board never interprets its contents.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoId(String);

impl RepoId {
    pub fn new(id: impl Into<String>) -> Self {
        RepoId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RepoId {
    fn from(id: &str) -> Self {
        RepoId(id.to_string())
    }
}

impl From<String> for RepoId {
    fn from(id: String) -> Self {
        RepoId(id)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RepoId({})", self.0)
    }
}

/// The currency a bounty is denominated in. Bounties are fungible-value
/// only; non-fungible token classes are rejected at the door.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "token", rename_all = "snake_case")]
pub enum Currency {
    /// Native settlement currency, funded by the deposit attached to the
    /// funding call.
    Native,
    /// A fungible token contract, funded from the vault's holdings.
    Token(Address),
}

/// Token class wire encoding: 0 = native, 1 = fungible token contract.
pub const TOKEN_CLASS_NATIVE: u16 = 0;
pub const TOKEN_CLASS_FUNGIBLE: u16 = 1;

impl Currency {
    /// Resolves a (token type, token contract) pair into a currency,
    /// rejecting every shape the board does not settle in.
    pub fn from_token_config(token_type: u16, token_contract: Address) -> Result<Currency> {
        match token_type {
            TOKEN_CLASS_NATIVE => {
                if !token_contract.is_zero() {
                    return Err(Error::InvalidTokenConfig(format!(
                        "native bounty with token contract {token_contract}"
                    )));
                }
                Ok(Currency::Native)
            }
            TOKEN_CLASS_FUNGIBLE => {
                if token_contract.is_zero() {
                    return Err(Error::InvalidTokenConfig(
                        "fungible bounty without a token contract".to_string(),
                    ));
                }
                Ok(Currency::Token(token_contract))
            }
            other => Err(Error::InvalidTokenConfig(format!(
                "unsupported token class {other}"
            ))),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Native => f.write_str("native"),
            Currency::Token(addr) => write!(f, "token:{addr}"),
        }
    }
}

/// Review outcome of an assignment request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Unreviewed,
    Accepted,
    Rejected,
}

/// One assignment request by one identity for one issue.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Application {
    pub applicant: Address,
    /// Opaque reference describing the pitch (e.g. a content hash).
    pub pitch: String,
    pub status: ApplicationStatus,
}

/// Per-entry result of a funding call, in input order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BountyReceipt {
    pub repo_id: RepoId,
    pub issue_number: u64,
    pub bounty_size: Amount,
    pub external_id: ExternalId,
}

/// Read view of an issue's bounty state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueView {
    pub has_bounty: bool,
    pub external_id: Option<ExternalId>,
    pub fulfilled: bool,
    pub bounty_size: Amount,
    pub assignee: Option<Address>,
}
