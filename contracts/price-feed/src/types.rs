use soroban_sdk::contracttype;

/// A single feed answer: USD price scaled by `10^decimals`, stamped with the
/// ledger timestamp at which it was pushed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceData {
    pub price: i128,

    pub decimals: u32,

    pub updated_at: u64,
}
