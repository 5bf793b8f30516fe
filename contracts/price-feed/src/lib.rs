#![no_std]

//! Admin-pushed USD price feed.
//!
//! One contract instance per collateral asset. The admin (an off-chain
//! relayer, or a test) pushes answers with `set_price`; consumers read them
//! with `latest_price`. Answers older than `max_age` seconds are refused.
//! The feed does not judge the answer itself: a zero or negative price is
//! stored and served as-is, rejecting it is the consumer's job.

use soroban_sdk::{contract, contractimpl, log, Address, Env};

mod error;
mod events;
mod storage;
mod types;

pub use error::Error;
pub use types::PriceData;

use events::price_updated_event;
use storage::{
    get_admin, get_decimals, get_latest, get_max_age, is_initialized, set_admin, set_decimals,
    set_latest,
};

// ---------- TTL constants ----------
const INSTANCE_LIFETIME_THRESHOLD: u32 = 100_800; // ~7 days
const INSTANCE_BUMP_AMOUNT: u32 = 518_400;        // bump to ~30 days

/// Three hours, the usual heartbeat window of an off-chain USD feed.
pub const DEFAULT_MAX_AGE: u64 = 3 * 60 * 60;

fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

#[contract]
pub struct PriceFeed;

#[contractimpl]
impl PriceFeed {
    /// Initialize the feed with its answer precision and staleness window.
    pub fn initialize(env: Env, admin: Address, decimals: u32, max_age: u64) -> Result<(), Error> {
        if is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        if max_age == 0 {
            return Err(Error::InvalidMaxAge);
        }

        set_admin(&env, &admin);
        set_decimals(&env, decimals);
        storage::set_max_age(&env, max_age);
        extend_instance(&env);

        log!(&env, "PriceFeed: initialized", decimals, max_age);
        Ok(())
    }

    /// Push a new answer, stamped with the current ledger timestamp.
    pub fn set_price(env: Env, price: i128) -> Result<(), Error> {
        let admin = get_admin(&env).ok_or(Error::NotInitialized)?;
        admin.require_auth();
        extend_instance(&env);

        let updated_at = env.ledger().timestamp();
        let data = PriceData {
            price,
            decimals: get_decimals(&env),
            updated_at,
        };
        set_latest(&env, &data);

        price_updated_event(&env, price, updated_at);
        Ok(())
    }

    /// Latest answer, refused once it is older than `max_age`.
    pub fn latest_price(env: Env) -> Result<PriceData, Error> {
        if !is_initialized(&env) {
            return Err(Error::NotInitialized);
        }
        extend_instance(&env);

        let data = get_latest(&env).ok_or(Error::NoPrice)?;
        let age = env.ledger().timestamp().saturating_sub(data.updated_at);
        if age > get_max_age(&env) {
            return Err(Error::StalePrice);
        }
        Ok(data)
    }

    pub fn decimals(env: Env) -> u32 {
        extend_instance(&env);
        get_decimals(&env)
    }

    pub fn max_age(env: Env) -> u64 {
        extend_instance(&env);
        get_max_age(&env)
    }

    /// Update the staleness window. Only callable by admin.
    pub fn set_max_age(env: Env, max_age: u64) -> Result<(), Error> {
        let admin = get_admin(&env).ok_or(Error::NotInitialized)?;
        admin.require_auth();
        if max_age == 0 {
            return Err(Error::InvalidMaxAge);
        }
        extend_instance(&env);
        storage::set_max_age(&env, max_age);
        Ok(())
    }

    pub fn admin(env: Env) -> Result<Address, Error> {
        extend_instance(&env);
        get_admin(&env).ok_or(Error::NotInitialized)
    }
}
