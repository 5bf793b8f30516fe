use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,

    NotInitialized = 2,

    MustBeMoreThanZero = 3,

    NegativeAmount = 4,

    InsufficientBalance = 5,

    InsufficientAllowance = 6,

    BurnAmountExceedsBalance = 7,

    MinterLocked = 8,
}
