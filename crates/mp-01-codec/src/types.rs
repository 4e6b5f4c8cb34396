//! # Record Types
//!
//! Typed records (`AccountUpdate`, `MerkleUpdate`) hold fixed arrays and are
//! what decoding produces. The `*Like` variants hold plain byte vectors, as
//! they arrive from JSON or other untyped sources; their fixed-size fields are
//! checked when they are encoded or converted.

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_types::{to_byte32, Address, Hash};

use crate::error::CodecError;

/// One account's point change.
///
/// `old_point == 0` doubles as "account absent from the tree", so an existing
/// zero balance cannot be told apart from a brand-new account.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdate {
    #[serde_as(as = "Hex")]
    pub address: Address,
    pub old_point: u32,
    pub new_point: u32,
}

impl AccountUpdate {
    pub fn new(address: Address, old_point: u32, new_point: u32) -> Self {
        Self {
            address,
            old_point,
            new_point,
        }
    }

    /// Account enters the tree with this update.
    pub fn is_insertion(&self) -> bool {
        self.old_point == 0
    }
}

/// One state-transition claim, carried in a transaction witness.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleUpdate {
    #[serde_as(as = "Hex")]
    pub old_root: Hash,
    #[serde_as(as = "Hex")]
    pub new_root: Hash,
    /// Order is preserved through encode/decode.
    pub accounts: Vec<AccountUpdate>,
    /// Multi-key proof covering every account key, valid for both roots.
    #[serde_as(as = "Hex")]
    pub proof: Vec<u8>,
}

/// Untyped form of [`AccountUpdate`].
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdateLike {
    #[serde_as(as = "Hex")]
    pub address: Vec<u8>,
    pub old_point: u32,
    pub new_point: u32,
}

/// Untyped form of [`MerkleUpdate`].
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleUpdateLike {
    #[serde_as(as = "Hex")]
    pub old_root: Vec<u8>,
    #[serde_as(as = "Hex")]
    pub new_root: Vec<u8>,
    pub accounts: Vec<AccountUpdateLike>,
    #[serde_as(as = "Hex")]
    pub proof: Vec<u8>,
}

impl From<&AccountUpdate> for AccountUpdateLike {
    fn from(account: &AccountUpdate) -> Self {
        Self {
            address: account.address.to_vec(),
            old_point: account.old_point,
            new_point: account.new_point,
        }
    }
}

impl From<&MerkleUpdate> for MerkleUpdateLike {
    fn from(update: &MerkleUpdate) -> Self {
        Self {
            old_root: update.old_root.to_vec(),
            new_root: update.new_root.to_vec(),
            accounts: update.accounts.iter().map(AccountUpdateLike::from).collect(),
            proof: update.proof.clone(),
        }
    }
}

impl TryFrom<AccountUpdateLike> for AccountUpdate {
    type Error = CodecError;

    fn try_from(like: AccountUpdateLike) -> Result<Self, Self::Error> {
        Ok(Self {
            address: fixed("address", &like.address)?,
            old_point: like.old_point,
            new_point: like.new_point,
        })
    }
}

impl TryFrom<MerkleUpdateLike> for MerkleUpdate {
    type Error = CodecError;

    fn try_from(like: MerkleUpdateLike) -> Result<Self, Self::Error> {
        Ok(Self {
            old_root: fixed("old_root", &like.old_root)?,
            new_root: fixed("new_root", &like.new_root)?,
            accounts: like
                .accounts
                .into_iter()
                .map(AccountUpdate::try_from)
                .collect::<Result<_, _>>()?,
            proof: like.proof,
        })
    }
}

fn fixed(field: &'static str, value: &[u8]) -> Result<[u8; 32], CodecError> {
    to_byte32(value).map_err(|_| CodecError::InvalidFieldSize {
        field,
        expected: 32,
        actual: value.len(),
    })
}
