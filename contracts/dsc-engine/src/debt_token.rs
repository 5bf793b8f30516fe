use soroban_sdk::{contractclient, Address, Env};

/// The slice of the DSC token the engine drives. The engine's contract address
/// is the token's minter, so `mint` and `burn` are authorized by the engine
/// invoking them directly.
#[contractclient(name = "DebtTokenClient")]
pub trait DebtTokenInterface {
    fn mint(env: Env, to: Address, amount: i128) -> bool;

    /// Burns from the minter's (the engine's) own balance.
    fn burn(env: Env, amount: i128);

    fn transfer(env: Env, from: Address, to: Address, amount: i128);
}
