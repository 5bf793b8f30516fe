//! Price feed boundary.
//!
//! Feeds are untrusted: any failed call, non-positive answer or answer with
//! an unreasonable precision aborts the caller with `StaleOrInvalidPrice`.
//! Staleness itself is enforced by the feed, which refuses to serve an
//! answer older than its heartbeat window.

use soroban_sdk::{contractclient, contracttype, log, Address, Env};

use crate::error::Error;
use crate::{MAX_FEED_DECIMALS, PRECISION_DECIMALS};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceData {
    pub price: i128,
    pub decimals: u32,
    pub updated_at: u64,
}

#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeedInterface {
    fn latest_price(env: Env) -> PriceData;
}

/// `10^exp`, failing instead of wrapping.
pub fn pow10(exp: u32) -> Result<i128, Error> {
    10i128.checked_pow(exp).ok_or(Error::MathOverflow)
}

/// Rescale a fixed-point `value` from `from` decimals to `to` decimals,
/// rounding down when precision is dropped.
pub fn rescale(value: i128, from: u32, to: u32) -> Result<i128, Error> {
    if from <= to {
        value
            .checked_mul(pow10(to - from)?)
            .ok_or(Error::MathOverflow)
    } else {
        Ok(value / pow10(from - to)?)
    }
}

/// USD price of one whole unit of the asset behind `feed`, in `PRECISION`.
pub fn read_normalized_price(env: &Env, feed: &Address) -> Result<i128, Error> {
    let data = match PriceFeedClient::new(env, feed).try_latest_price() {
        Ok(Ok(data)) => data,
        _ => {
            log!(env, "price feed read failed", feed.clone());
            return Err(Error::StaleOrInvalidPrice);
        }
    };

    if data.price <= 0 || data.decimals > MAX_FEED_DECIMALS {
        log!(env, "price feed answer rejected", feed.clone(), data.price, data.decimals);
        return Err(Error::StaleOrInvalidPrice);
    }

    let price = rescale(data.price, data.decimals, PRECISION_DECIMALS)?;
    // sub-precision prices would round to zero and break the inverse conversion
    if price == 0 {
        return Err(Error::StaleOrInvalidPrice);
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescale_up_and_down() {
        assert_eq!(rescale(2_000_00000000, 8, 7), Ok(2_000_0000000));
        assert_eq!(rescale(2_000_00000, 5, 7), Ok(2_000_0000000));
        assert_eq!(rescale(2_000_0000000, 7, 7), Ok(2_000_0000000));
        // 1234.56789012 at 8 decimals loses its last digit
        assert_eq!(rescale(1_234_56789012, 8, 7), Ok(1_234_5678901));
    }

    #[test]
    fn rescale_overflow_is_an_error() {
        assert_eq!(rescale(i128::MAX / 10, 0, 7), Err(Error::MathOverflow));
        assert_eq!(pow10(39), Err(Error::MathOverflow));
    }
}
