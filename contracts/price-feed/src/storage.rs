use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::types::PriceData;

const ADMIN: Symbol = symbol_short!("ADMIN");
const DECIMALS: Symbol = symbol_short!("DECIMALS");
const MAX_AGE: Symbol = symbol_short!("MAXAGE");
const LATEST: Symbol = symbol_short!("LATEST");

// ADMIN

pub fn get_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&ADMIN)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&ADMIN, admin);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&ADMIN)
}

// FEED SETTINGS

pub fn get_decimals(env: &Env) -> u32 {
    env.storage().instance().get(&DECIMALS).unwrap_or(0)
}

pub fn set_decimals(env: &Env, decimals: u32) {
    env.storage().instance().set(&DECIMALS, &decimals);
}

pub fn get_max_age(env: &Env) -> u64 {
    env.storage().instance().get(&MAX_AGE).unwrap_or(0)
}

pub fn set_max_age(env: &Env, max_age: u64) {
    env.storage().instance().set(&MAX_AGE, &max_age);
}

// LATEST ANSWER

pub fn get_latest(env: &Env) -> Option<PriceData> {
    env.storage().instance().get(&LATEST)
}

pub fn set_latest(env: &Env, data: &PriceData) {
    env.storage().instance().set(&LATEST, data);
}
