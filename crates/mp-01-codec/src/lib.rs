//! # MP-01 Codec
//!
//! Binary codec for Merkle-Points update records.
//!
//! ## Role in System
//!
//! The encoded `MerkleUpdate` is the only structure that crosses the
//! off-chain/on-chain boundary: the builder serializes it into a transaction
//! witness and the validator deserializes it. Byte-exact compatibility is
//! mandatory, and `decode(encode(x)) == x` holds for every valid record.
//!
//! ## Errors
//!
//! - `InvalidFieldSize`: a fixed 32-byte field got another length (encode)
//! - `MalformedRecord`: wrong total length, bad offsets, wrong slice sizes
//!   (decode)
//!
//! ## Usage Example
//!
//! ```ignore
//! use mp_01_codec::{decode, encode, AccountUpdate, MerkleUpdate};
//!
//! let update = MerkleUpdate {
//!     old_root: [0u8; 32],
//!     new_root: new_root,
//!     accounts: vec![AccountUpdate::new(address, 0, 150)],
//!     proof,
//! };
//! let bytes = encode(&update)?;
//! assert_eq!(decode(&bytes)?, update);
//! ```

pub mod codec;
pub mod error;
pub mod table;
pub mod types;

pub use codec::{
    decode, decode_account, decode_compatible, encode, Encode, ACCOUNT_UPDATE_FIELDS,
    ACCOUNT_UPDATE_SIZE, MERKLE_UPDATE_FIELDS,
};
pub use error::CodecError;
pub use types::{AccountUpdate, AccountUpdateLike, MerkleUpdate, MerkleUpdateLike};
