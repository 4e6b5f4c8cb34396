use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_types::Address;

/// An account's point balance, as tracked by the builder or requested by a
/// caller.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPoint {
    #[serde_as(as = "Hex")]
    pub address: Address,
    pub point: u32,
}

impl AccountPoint {
    pub fn new(address: Address, point: u32) -> Self {
        Self { address, point }
    }
}

impl From<(Address, u32)> for AccountPoint {
    fn from((address, point): (Address, u32)) -> Self {
        Self { address, point }
    }
}
