use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::error::Error;

// ---------- TTL constants ----------
// Testnet: ~5s per ledger
// 30 days  ≈  518_400 ledgers
// 180 days ≈ 3_110_400 ledgers
const INSTANCE_LIFETIME_THRESHOLD: u32 = 100_800; // ~7 days
const INSTANCE_BUMP_AMOUNT: u32 = 518_400;        // bump to ~30 days
const USER_LIFETIME_THRESHOLD: u32 = 518_400;     // ~30 days
const USER_BUMP_AMOUNT: u32 = 3_110_400;          // bump to ~180 days

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    // registry, written once by `initialize`
    Dsc,
    CollateralTokens,
    PriceFeed(Address),
    AssetDecimals(Address),
    // protocol totals
    TotalDebt,
    TotalCollateral(Address),
    // positions
    Collateral(CollateralKey),
    DscMinted(Address),
}

#[derive(Clone)]
#[contracttype]
pub struct CollateralKey {
    pub user: Address,
    pub asset: Address,
}

pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn read_user_i128(env: &Env, key: &DataKey) -> i128 {
    let val: i128 = env.storage().persistent().get(key).unwrap_or(0);
    if val > 0 {
        env.storage()
            .persistent()
            .extend_ttl(key, USER_LIFETIME_THRESHOLD, USER_BUMP_AMOUNT);
    }
    val
}

fn write_user_i128(env: &Env, key: &DataKey, val: i128) {
    env.storage().persistent().set(key, &val);
    env.storage()
        .persistent()
        .extend_ttl(key, USER_LIFETIME_THRESHOLD, USER_BUMP_AMOUNT);
}

// --- Registry ---

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Dsc)
}

pub fn read_dsc(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Dsc)
        .ok_or(Error::NotInitialized)
}

pub fn write_dsc(env: &Env, dsc: &Address) {
    env.storage().instance().set(&DataKey::Dsc, dsc);
}

pub fn read_collateral_tokens(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&DataKey::CollateralTokens)
        .unwrap_or(Vec::new(env))
}

pub fn write_collateral_tokens(env: &Env, tokens: &Vec<Address>) {
    env.storage().instance().set(&DataKey::CollateralTokens, tokens);
}

pub fn read_price_feed(env: &Env, asset: &Address) -> Option<Address> {
    env.storage()
        .instance()
        .get(&DataKey::PriceFeed(asset.clone()))
}

pub fn write_price_feed(env: &Env, asset: &Address, feed: &Address) {
    env.storage()
        .instance()
        .set(&DataKey::PriceFeed(asset.clone()), feed);
}

pub fn read_asset_decimals(env: &Env, asset: &Address) -> Result<u32, Error> {
    env.storage()
        .instance()
        .get(&DataKey::AssetDecimals(asset.clone()))
        .ok_or(Error::UnknownAsset)
}

pub fn write_asset_decimals(env: &Env, asset: &Address, decimals: u32) {
    env.storage()
        .instance()
        .set(&DataKey::AssetDecimals(asset.clone()), &decimals);
}

// --- Protocol totals ---

pub fn read_total_debt(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalDebt)
        .unwrap_or(0)
}

pub fn write_total_debt(env: &Env, val: i128) {
    env.storage().instance().set(&DataKey::TotalDebt, &val);
}

pub fn read_total_collateral(env: &Env, asset: &Address) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalCollateral(asset.clone()))
        .unwrap_or(0)
}

pub fn write_total_collateral(env: &Env, asset: &Address, val: i128) {
    env.storage()
        .instance()
        .set(&DataKey::TotalCollateral(asset.clone()), &val);
}

// --- Positions ---

pub fn read_collateral(env: &Env, user: &Address, asset: &Address) -> i128 {
    read_user_i128(
        env,
        &DataKey::Collateral(CollateralKey {
            user: user.clone(),
            asset: asset.clone(),
        }),
    )
}

pub fn write_collateral(env: &Env, user: &Address, asset: &Address, val: i128) {
    write_user_i128(
        env,
        &DataKey::Collateral(CollateralKey {
            user: user.clone(),
            asset: asset.clone(),
        }),
        val,
    );
}

pub fn read_dsc_minted(env: &Env, user: &Address) -> i128 {
    read_user_i128(env, &DataKey::DscMinted(user.clone()))
}

pub fn write_dsc_minted(env: &Env, user: &Address, val: i128) {
    write_user_i128(env, &DataKey::DscMinted(user.clone()), val);
}
