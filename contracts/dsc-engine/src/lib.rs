#![no_std]

//! DSC engine: over-collateralized issuance of a USD-pegged stable coin.
//!
//! Users lock registered collateral assets and mint DSC against them. Every
//! position with debt must keep a health factor of at least 1.0, where
//! health = (collateral USD value * 50%) / debt. Positions that fall below
//! 1.0 can be liquidated by anyone who repays part of their debt, in exchange
//! for the equivalent collateral plus a 10% bonus.

use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Vec};

mod debt_token;
mod error;
mod events;
mod oracle;
mod storage;
mod valuation;

pub use error::Error;

use debt_token::DebtTokenClient;
use storage::extend_instance;

/// Internal fixed point: 7 decimals, the precision of DSC itself.
pub const PRECISION: i128 = 10_000_000;
pub const PRECISION_DECIMALS: u32 = 7;
/// Share of collateral value counted toward solvency (200% over-collateralized).
pub const LIQUIDATION_THRESHOLD: i128 = 50;
/// Extra collateral paid to liquidators on top of the debt they cover.
pub const LIQUIDATION_BONUS: i128 = 10;
pub const LIQUIDATION_PRECISION: i128 = 100;
pub const MIN_HEALTH_FACTOR: i128 = PRECISION;
/// Feeds reporting more decimals than this are rejected.
pub const MAX_FEED_DECIMALS: u32 = 18;

// --- Validation ---

fn require_more_than_zero(amount: i128) -> Result<(), Error> {
    if amount <= 0 {
        return Err(Error::MustBeMoreThanZero);
    }
    Ok(())
}

fn require_allowed_asset(env: &Env, asset: &Address) -> Result<(), Error> {
    if storage::read_price_feed(env, asset).is_none() {
        return Err(Error::UnsupportedCollateral);
    }
    Ok(())
}

// --- Custody ---

fn transfer_asset(env: &Env, asset: &Address, from: &Address, to: &Address, amount: i128) -> Result<(), Error> {
    match token::Client::new(env, asset).try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::TransferFailed),
    }
}

// --- Ledger mutations, no health checks ---

fn deposit_collateral_internal(env: &Env, user: &Address, asset: &Address, amount: i128) -> Result<(), Error> {
    transfer_asset(env, asset, user, &env.current_contract_address(), amount)?;

    let current = storage::read_collateral(env, user, asset);
    let updated = current.checked_add(amount).ok_or(Error::MathOverflow)?;
    storage::write_collateral(env, user, asset, updated);

    let total = storage::read_total_collateral(env, asset);
    storage::write_total_collateral(env, asset, total.checked_add(amount).ok_or(Error::MathOverflow)?);

    events::collateral_deposited_event(env, user, asset, amount);
    Ok(())
}

fn redeem_collateral_internal(
    env: &Env,
    from: &Address,
    to: &Address,
    asset: &Address,
    amount: i128,
) -> Result<(), Error> {
    let current = storage::read_collateral(env, from, asset);
    if current < amount {
        return Err(Error::InsufficientCollateral);
    }
    storage::write_collateral(env, from, asset, current - amount);

    let total = storage::read_total_collateral(env, asset);
    storage::write_total_collateral(env, asset, total - amount);

    transfer_asset(env, asset, &env.current_contract_address(), to, amount)?;

    events::collateral_redeemed_event(env, from, to, asset, amount);
    Ok(())
}

fn mint_dsc_internal(env: &Env, user: &Address, amount: i128) -> Result<(), Error> {
    let current = storage::read_dsc_minted(env, user);
    let updated = current.checked_add(amount).ok_or(Error::MathOverflow)?;
    storage::write_dsc_minted(env, user, updated);

    let total = storage::read_total_debt(env);
    storage::write_total_debt(env, total.checked_add(amount).ok_or(Error::MathOverflow)?);

    let dsc = DebtTokenClient::new(env, &storage::read_dsc(env)?);
    let minted = matches!(dsc.try_mint(user, &amount), Ok(Ok(true)));
    if !minted {
        return Err(Error::MintFailed);
    }

    events::dsc_minted_event(env, user, amount);
    Ok(())
}

/// Debits `on_behalf_of`'s debt, pulling the DSC from `dsc_from` into the
/// engine and burning it there.
fn burn_dsc_internal(env: &Env, on_behalf_of: &Address, dsc_from: &Address, amount: i128) -> Result<(), Error> {
    let current = storage::read_dsc_minted(env, on_behalf_of);
    if amount > current {
        return Err(Error::BurnAmountExceedsDebt);
    }
    storage::write_dsc_minted(env, on_behalf_of, current - amount);

    let total = storage::read_total_debt(env);
    storage::write_total_debt(env, total - amount);

    let dsc = DebtTokenClient::new(env, &storage::read_dsc(env)?);
    if !matches!(
        dsc.try_transfer(dsc_from, &env.current_contract_address(), &amount),
        Ok(Ok(()))
    ) {
        return Err(Error::TransferFailed);
    }
    if !matches!(dsc.try_burn(&amount), Ok(Ok(()))) {
        return Err(Error::TransferFailed);
    }

    events::dsc_burned_event(env, on_behalf_of, dsc_from, amount);
    Ok(())
}

#[contract]
pub struct DscEngine;

#[contractimpl]
impl DscEngine {
    /// Initialize the engine with its collateral registry and the DSC token.
    ///
    /// `token_addresses[i]` is priced by `price_feed_addresses[i]`. The DSC
    /// token's minter must be handed to this contract's address before any
    /// DSC can be minted.
    pub fn initialize(
        env: Env,
        token_addresses: Vec<Address>,
        price_feed_addresses: Vec<Address>,
        dsc: Address,
    ) -> Result<(), Error> {
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        if token_addresses.len() != price_feed_addresses.len() {
            return Err(Error::AssetFeedLengthMismatch);
        }

        for (asset, feed) in token_addresses.iter().zip(price_feed_addresses.iter()) {
            if storage::read_price_feed(&env, &asset).is_some() {
                return Err(Error::DuplicateCollateral);
            }
            let decimals = match token::Client::new(&env, &asset).try_decimals() {
                Ok(Ok(decimals)) => decimals,
                _ => return Err(Error::UnsupportedCollateral),
            };
            storage::write_price_feed(&env, &asset, &feed);
            storage::write_asset_decimals(&env, &asset, decimals);
        }
        storage::write_collateral_tokens(&env, &token_addresses);
        storage::write_dsc(&env, &dsc);
        extend_instance(&env);

        log!(&env, "DscEngine: initialized", token_addresses.len(), dsc);
        Ok(())
    }

    /// Bump instance TTL. Anyone may call it to keep the contract alive.
    pub fn bump_instance(env: Env) {
        extend_instance(&env);
    }

    // ==========================================================
    // Position operations
    // ==========================================================

    /// Lock `amount` of `asset` as collateral.
    pub fn deposit_collateral(env: Env, user: Address, asset: Address, amount: i128) -> Result<(), Error> {
        user.require_auth();
        require_more_than_zero(amount)?;
        require_allowed_asset(&env, &asset)?;
        extend_instance(&env);

        deposit_collateral_internal(&env, &user, &asset, amount)
    }

    /// Withdraw collateral; the position must stay healthy afterwards.
    pub fn redeem_collateral(env: Env, user: Address, asset: Address, amount: i128) -> Result<(), Error> {
        user.require_auth();
        require_more_than_zero(amount)?;
        require_allowed_asset(&env, &asset)?;
        extend_instance(&env);

        redeem_collateral_internal(&env, &user, &user, &asset, amount)?;
        valuation::assert_healthy(&env, &user)
    }

    /// Mint DSC against deposited collateral; the position must stay healthy.
    pub fn mint_dsc(env: Env, user: Address, amount: i128) -> Result<(), Error> {
        user.require_auth();
        require_more_than_zero(amount)?;
        extend_instance(&env);

        mint_dsc_internal(&env, &user, amount)?;
        valuation::assert_healthy(&env, &user)
    }

    /// Repay debt with DSC held by `user`.
    pub fn burn_dsc(env: Env, user: Address, amount: i128) -> Result<(), Error> {
        user.require_auth();
        require_more_than_zero(amount)?;
        extend_instance(&env);

        burn_dsc_internal(&env, &user, &user, amount)
    }

    /// Deposit then mint, checking health once at the end.
    pub fn deposit_collateral_and_mint_dsc(
        env: Env,
        user: Address,
        asset: Address,
        collateral_amount: i128,
        dsc_amount: i128,
    ) -> Result<(), Error> {
        user.require_auth();
        require_more_than_zero(collateral_amount)?;
        require_more_than_zero(dsc_amount)?;
        require_allowed_asset(&env, &asset)?;
        extend_instance(&env);

        deposit_collateral_internal(&env, &user, &asset, collateral_amount)?;
        mint_dsc_internal(&env, &user, dsc_amount)?;
        valuation::assert_healthy(&env, &user)
    }

    /// Burn then redeem, checking health once at the end.
    pub fn redeem_collateral_for_dsc(
        env: Env,
        user: Address,
        asset: Address,
        collateral_amount: i128,
        dsc_amount: i128,
    ) -> Result<(), Error> {
        user.require_auth();
        require_more_than_zero(collateral_amount)?;
        require_more_than_zero(dsc_amount)?;
        require_allowed_asset(&env, &asset)?;
        extend_instance(&env);

        burn_dsc_internal(&env, &user, &user, dsc_amount)?;
        redeem_collateral_internal(&env, &user, &user, &asset, collateral_amount)?;
        valuation::assert_healthy(&env, &user)
    }

    // ==========================================================
    // Liquidation
    // ==========================================================

    /// Repay `debt_to_cover` of an unhealthy `user`'s debt with the
    /// liquidator's own DSC, receiving the same USD value of `asset` plus
    /// the liquidation bonus.
    ///
    /// Fails unless the victim's health factor strictly improves, and unless
    /// the liquidator's own position is still healthy afterwards.
    pub fn liquidate(
        env: Env,
        liquidator: Address,
        user: Address,
        asset: Address,
        debt_to_cover: i128,
    ) -> Result<(), Error> {
        liquidator.require_auth();
        extend_instance(&env);

        let starting_user_health_factor = valuation::health_factor(&env, &user)?;
        if starting_user_health_factor >= MIN_HEALTH_FACTOR {
            return Err(Error::HealthFactorOk);
        }
        require_more_than_zero(debt_to_cover)?;
        require_allowed_asset(&env, &asset)?;

        let token_amount_from_debt_covered = valuation::token_amount_from_usd(&env, &asset, debt_to_cover)?;
        let bonus_collateral = valuation::mul_div(
            token_amount_from_debt_covered,
            LIQUIDATION_BONUS,
            LIQUIDATION_PRECISION,
        )?;
        let collateral_to_seize = token_amount_from_debt_covered
            .checked_add(bonus_collateral)
            .ok_or(Error::MathOverflow)?;

        // never clamp: a short seize would silently eat the liquidator's bonus
        if collateral_to_seize > storage::read_collateral(&env, &user, &asset) {
            return Err(Error::InsufficientCollateralToLiquidate);
        }

        redeem_collateral_internal(&env, &user, &liquidator, &asset, collateral_to_seize)?;
        burn_dsc_internal(&env, &user, &liquidator, debt_to_cover)?;

        let ending_user_health_factor = valuation::health_factor(&env, &user)?;
        if ending_user_health_factor <= starting_user_health_factor {
            log!(
                &env,
                "liquidation did not improve health factor",
                starting_user_health_factor,
                ending_user_health_factor
            );
            return Err(Error::HealthFactorNotImproved);
        }
        valuation::assert_healthy(&env, &liquidator)?;

        events::liquidated_event(&env, &liquidator, &user, &asset, debt_to_cover, collateral_to_seize);
        Ok(())
    }

    // ==========================================================
    // Valuation views
    // ==========================================================

    pub fn get_usd_value(env: Env, asset: Address, amount: i128) -> Result<i128, Error> {
        extend_instance(&env);
        valuation::usd_value(&env, &asset, amount)
    }

    pub fn get_token_amount_from_usd(env: Env, asset: Address, usd_amount: i128) -> Result<i128, Error> {
        extend_instance(&env);
        valuation::token_amount_from_usd(&env, &asset, usd_amount)
    }

    pub fn get_account_collateral_value(env: Env, user: Address) -> Result<i128, Error> {
        extend_instance(&env);
        valuation::account_collateral_value(&env, &user)
    }

    /// Returns (dsc_minted, collateral_value_in_usd) for a user.
    pub fn get_account_information(env: Env, user: Address) -> Result<(i128, i128), Error> {
        extend_instance(&env);
        valuation::account_information(&env, &user)
    }

    /// Returns health factor scaled by PRECISION (1e7 = 1.0), `i128::MAX` without debt.
    pub fn get_health_factor(env: Env, user: Address) -> Result<i128, Error> {
        extend_instance(&env);
        valuation::health_factor(&env, &user)
    }

    pub fn calculate_health_factor(_env: Env, total_dsc_minted: i128, collateral_value_in_usd: i128) -> Result<i128, Error> {
        valuation::calculate_health_factor(total_dsc_minted, collateral_value_in_usd)
    }

    /// USD value of everything the engine custodies.
    pub fn get_protocol_collateral_value(env: Env) -> Result<i128, Error> {
        extend_instance(&env);
        let mut total: i128 = 0;
        for asset in storage::read_collateral_tokens(&env).iter() {
            let amount = storage::read_total_collateral(&env, &asset);
            if amount == 0 {
                continue;
            }
            total = total
                .checked_add(valuation::usd_value(&env, &asset, amount)?)
                .ok_or(Error::MathOverflow)?;
        }
        Ok(total)
    }

    // ==========================================================
    // Ledger and registry views
    // ==========================================================

    pub fn get_collateral_balance_of_user(env: Env, user: Address, asset: Address) -> i128 {
        extend_instance(&env);
        storage::read_collateral(&env, &user, &asset)
    }

    pub fn get_dsc_minted(env: Env, user: Address) -> i128 {
        extend_instance(&env);
        storage::read_dsc_minted(&env, &user)
    }

    pub fn get_total_debt(env: Env) -> i128 {
        extend_instance(&env);
        storage::read_total_debt(&env)
    }

    pub fn get_total_collateral(env: Env, asset: Address) -> i128 {
        extend_instance(&env);
        storage::read_total_collateral(&env, &asset)
    }

    pub fn get_collateral_tokens(env: Env) -> Vec<Address> {
        extend_instance(&env);
        storage::read_collateral_tokens(&env)
    }

    pub fn get_collateral_token_price_feed(env: Env, asset: Address) -> Result<Address, Error> {
        extend_instance(&env);
        storage::read_price_feed(&env, &asset).ok_or(Error::UnknownAsset)
    }

    pub fn get_dsc(env: Env) -> Result<Address, Error> {
        extend_instance(&env);
        storage::read_dsc(&env)
    }

    pub fn get_precision(_env: Env) -> i128 {
        PRECISION
    }

    pub fn get_liquidation_threshold(_env: Env) -> i128 {
        LIQUIDATION_THRESHOLD
    }

    pub fn get_liquidation_bonus(_env: Env) -> i128 {
        LIQUIDATION_BONUS
    }

    pub fn get_liquidation_precision(_env: Env) -> i128 {
        LIQUIDATION_PRECISION
    }

    pub fn get_min_health_factor(_env: Env) -> i128 {
        MIN_HEALTH_FACTOR
    }
}
