use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // setup
    AlreadyInitialized = 1,
    NotInitialized = 2,
    AssetFeedLengthMismatch = 3,
    DuplicateCollateral = 4,

    // caller input
    MustBeMoreThanZero = 5,
    UnsupportedCollateral = 6,
    UnknownAsset = 7,

    // position state
    InsufficientCollateral = 8,
    BurnAmountExceedsDebt = 9,

    // solvency invariant
    InsufficientHealthFactor = 10,

    // price feed
    StaleOrInvalidPrice = 11,

    // liquidation
    HealthFactorOk = 12,
    HealthFactorNotImproved = 13,
    InsufficientCollateralToLiquidate = 14,

    // token movements
    TransferFailed = 15,
    MintFailed = 16,

    MathOverflow = 17,
}
