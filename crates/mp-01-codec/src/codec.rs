//! # Record Codec
//!
//! ```text
//! MerkleUpdate  = table { old_root: [u8;32], new_root: [u8;32],
//!                         accounts: vector<AccountUpdate>, proof: bytes }
//! AccountUpdate = table { address: [u8;32], old_point: u32, new_point: u32 }
//! vector<T>     = count u32 ++ T ++ T ++ ...
//! bytes         = len u32 ++ raw
//! ```
//!
//! Every `AccountUpdate` table has the same 56-byte layout, so the accounts
//! vector splits into equal chunks.

use tracing::trace;

use crate::error::CodecError;
use crate::table::{
    read_byte32, read_bytes, read_fixed_vector, read_uint32, TableReader, TableWriter,
    HEADER_UNIT,
};
use crate::types::{AccountUpdate, AccountUpdateLike, MerkleUpdate, MerkleUpdateLike};

/// Fields in a `MerkleUpdate` table.
pub const MERKLE_UPDATE_FIELDS: usize = 4;
/// Fields in an `AccountUpdate` table.
pub const ACCOUNT_UPDATE_FIELDS: usize = 3;
/// Encoded size of one `AccountUpdate`: header + address + two points.
pub const ACCOUNT_UPDATE_SIZE: usize = HEADER_UNIT * (1 + ACCOUNT_UPDATE_FIELDS) + 32 + 4 + 4;

/// Types that serialize to the record wire format.
pub trait Encode {
    fn encode(&self) -> Result<Vec<u8>, CodecError>;
}

impl Encode for AccountUpdate {
    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        encode_account(&self.address, self.old_point, self.new_point)
    }
}

impl Encode for AccountUpdateLike {
    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        encode_account(&self.address, self.old_point, self.new_point)
    }
}

impl Encode for MerkleUpdate {
    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let accounts = self
            .accounts
            .iter()
            .map(Encode::encode)
            .collect::<Result<Vec<_>, _>>()?;
        encode_update(&self.old_root, &self.new_root, accounts, &self.proof)
    }
}

impl Encode for MerkleUpdateLike {
    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let accounts = self
            .accounts
            .iter()
            .map(Encode::encode)
            .collect::<Result<Vec<_>, _>>()?;
        encode_update(&self.old_root, &self.new_root, accounts, &self.proof)
    }
}

fn encode_account(address: &[u8], old_point: u32, new_point: u32) -> Result<Vec<u8>, CodecError> {
    TableWriter::new()
        .byte32("address", address)?
        .uint32(old_point)
        .uint32(new_point)
        .finish()
}

fn encode_update(
    old_root: &[u8],
    new_root: &[u8],
    accounts: Vec<Vec<u8>>,
    proof: &[u8],
) -> Result<Vec<u8>, CodecError> {
    let account_count = accounts.len();
    let encoded = TableWriter::new()
        .byte32("old_root", old_root)?
        .byte32("new_root", new_root)?
        .vector(accounts)?
        .bytes(proof)?
        .finish()?;
    trace!(
        accounts = account_count,
        proof_len = proof.len(),
        record_len = encoded.len(),
        "Encoded merkle update"
    );
    Ok(encoded)
}

/// Encode a record for transport.
pub fn encode<T: Encode + ?Sized>(record: &T) -> Result<Vec<u8>, CodecError> {
    record.encode()
}

/// Decode a record, rejecting any table that does not match this layout
/// exactly.
pub fn decode(bytes: &[u8]) -> Result<MerkleUpdate, CodecError> {
    decode_with(bytes, false)
}

/// Decode a record written by a newer encoder that appended fields to the
/// outer table. Unknown trailing fields are skipped.
pub fn decode_compatible(bytes: &[u8]) -> Result<MerkleUpdate, CodecError> {
    decode_with(bytes, true)
}

/// Decode a single `AccountUpdate` table.
pub fn decode_account(bytes: &[u8]) -> Result<AccountUpdate, CodecError> {
    let table = TableReader::parse(bytes, ACCOUNT_UPDATE_FIELDS, false)?;
    Ok(AccountUpdate {
        address: read_byte32(table.field(0)?, "address")?,
        old_point: read_uint32(table.field(1)?, "old_point")?,
        new_point: read_uint32(table.field(2)?, "new_point")?,
    })
}

fn decode_with(bytes: &[u8], compatible: bool) -> Result<MerkleUpdate, CodecError> {
    let table = TableReader::parse(bytes, MERKLE_UPDATE_FIELDS, compatible)?;

    let old_root = read_byte32(table.field(0)?, "old_root")?;
    let new_root = read_byte32(table.field(1)?, "new_root")?;
    let accounts = read_fixed_vector(table.field(2)?, ACCOUNT_UPDATE_SIZE, "accounts")?
        .into_iter()
        .map(decode_account)
        .collect::<Result<Vec<_>, _>>()?;
    let proof = read_bytes(table.field(3)?, "proof")?;

    if table.field_count() > MERKLE_UPDATE_FIELDS {
        trace!(
            extra_fields = table.field_count() - MERKLE_UPDATE_FIELDS,
            "Skipped unknown trailing fields"
        );
    }

    Ok(MerkleUpdate {
        old_root,
        new_root,
        accounts,
        proof,
    })
}
