use soroban_sdk::{log, Address, Env};

use crate::error::Error;
use crate::oracle::{pow10, read_normalized_price};
use crate::storage;
use crate::{LIQUIDATION_PRECISION, LIQUIDATION_THRESHOLD, MIN_HEALTH_FACTOR, PRECISION};

/// `a * b / denominator`, rounding down.
pub fn mul_div(a: i128, b: i128, denominator: i128) -> Result<i128, Error> {
    a.checked_mul(b)
        .and_then(|product| product.checked_div(denominator))
        .ok_or(Error::MathOverflow)
}

fn feed_and_unit(env: &Env, asset: &Address) -> Result<(i128, i128), Error> {
    let feed = storage::read_price_feed(env, asset).ok_or(Error::UnknownAsset)?;
    let price = read_normalized_price(env, &feed)?;
    let unit = pow10(storage::read_asset_decimals(env, asset)?)?;
    Ok((price, unit))
}

/// USD value (in `PRECISION`) of `amount` base units of `asset`.
pub fn usd_value(env: &Env, asset: &Address, amount: i128) -> Result<i128, Error> {
    let (price, unit) = feed_and_unit(env, asset)?;
    mul_div(amount, price, unit)
}

/// Base units of `asset` worth `usd_amount` at the current price, rounded down.
pub fn token_amount_from_usd(env: &Env, asset: &Address, usd_amount: i128) -> Result<i128, Error> {
    let (price, unit) = feed_and_unit(env, asset)?;
    mul_div(usd_amount, unit, price)
}

/// Sum of the USD value of every registered asset the user holds, in registry order.
/// Empty balances are skipped without touching their feed.
pub fn account_collateral_value(env: &Env, user: &Address) -> Result<i128, Error> {
    let mut total: i128 = 0;
    for asset in storage::read_collateral_tokens(env).iter() {
        let amount = storage::read_collateral(env, user, &asset);
        if amount == 0 {
            continue;
        }
        total = total
            .checked_add(usd_value(env, &asset, amount)?)
            .ok_or(Error::MathOverflow)?;
    }
    Ok(total)
}

/// Health factor scaled by `PRECISION` (1.0 = `PRECISION`). Debt-free positions
/// report `i128::MAX`.
pub fn calculate_health_factor(total_dsc_minted: i128, collateral_value_in_usd: i128) -> Result<i128, Error> {
    if total_dsc_minted == 0 {
        return Ok(i128::MAX);
    }
    let adjusted = mul_div(collateral_value_in_usd, LIQUIDATION_THRESHOLD, LIQUIDATION_PRECISION)?;
    mul_div(adjusted, PRECISION, total_dsc_minted)
}

/// Returns `(debt_minted, collateral_value_in_usd)`.
pub fn account_information(env: &Env, user: &Address) -> Result<(i128, i128), Error> {
    let debt = storage::read_dsc_minted(env, user);
    let collateral_value = account_collateral_value(env, user)?;
    Ok((debt, collateral_value))
}

pub fn health_factor(env: &Env, user: &Address) -> Result<i128, Error> {
    let debt = storage::read_dsc_minted(env, user);
    if debt == 0 {
        // no feed reads needed
        return Ok(i128::MAX);
    }
    calculate_health_factor(debt, account_collateral_value(env, user)?)
}

pub fn assert_healthy(env: &Env, user: &Address) -> Result<(), Error> {
    let hf = health_factor(env, user)?;
    if hf < MIN_HEALTH_FACTOR {
        log!(env, "health factor below minimum", user.clone(), hf);
        return Err(Error::InsufficientHealthFactor);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debt_free_is_max() {
        assert_eq!(calculate_health_factor(0, 0), Ok(i128::MAX));
        assert_eq!(calculate_health_factor(0, 1_000_0000000), Ok(i128::MAX));
    }

    #[test]
    fn boundary_is_exactly_one() {
        // $2000 of collateral backs at most $1000 of debt
        assert_eq!(
            calculate_health_factor(1_000_0000000, 2_000_0000000),
            Ok(MIN_HEALTH_FACTOR)
        );
        assert!(calculate_health_factor(1_000_0000001, 2_000_0000000).unwrap() < MIN_HEALTH_FACTOR);
    }

    #[test]
    fn half_collateral_is_half_health() {
        assert_eq!(
            calculate_health_factor(1_000_0000000, 1_000_0000000),
            Ok(PRECISION / 2)
        );
    }

    #[test]
    fn mul_div_rounds_down() {
        assert_eq!(mul_div(5_000_000_000, 10_000_000, 18_000_000_000), Ok(2_777_777));
        assert_eq!(mul_div(1, 1, 0), Err(Error::MathOverflow));
        assert_eq!(mul_div(i128::MAX, 2, 1), Err(Error::MathOverflow));
    }
}
