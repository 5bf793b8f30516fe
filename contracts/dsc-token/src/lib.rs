#![no_std]

use soroban_sdk::{contract, contractimpl, contracttype, log, Address, Env, String};
use soroban_token_sdk::TokenUtils;

mod error;

pub use error::Error;

// ---------- TTL constants ----------
// Testnet: ~5s per ledger
// 30 days  ≈  518_400 ledgers
// 180 days ≈ 3_110_400 ledgers (near testnet max)
const INSTANCE_LIFETIME_THRESHOLD: u32 = 100_800; // ~7 days, extend if below this
const INSTANCE_BUMP_AMOUNT: u32 = 518_400;        // bump to ~30 days
const BALANCE_LIFETIME_THRESHOLD: u32 = 518_400;  // ~30 days, extend persistent if below this
const BALANCE_BUMP_AMOUNT: u32 = 3_110_400;       // bump to ~180 days

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Admin,
    Minter,
    Allowance(AllowanceKey),
    Balance(Address),
    TotalSupply,
    Name,
    Symbol,
    Decimals,
    // set once the minter has been handed over
    MinterLocked,
}

#[derive(Clone)]
#[contracttype]
pub struct AllowanceKey {
    pub from: Address,
    pub spender: Address,
}

#[derive(Clone)]
#[contracttype]
pub struct AllowanceValue {
    pub amount: i128,
    pub expiration_ledger: u32,
}

// ---------- Storage helpers ----------

fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn read_admin(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)
}

fn read_minter(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Minter)
        .ok_or(Error::NotInitialized)
}

fn read_balance(env: &Env, addr: &Address) -> i128 {
    let key = DataKey::Balance(addr.clone());
    let val: i128 = env.storage().persistent().get(&key).unwrap_or(0);
    if val > 0 {
        env.storage()
            .persistent()
            .extend_ttl(&key, BALANCE_LIFETIME_THRESHOLD, BALANCE_BUMP_AMOUNT);
    }
    val
}

fn write_balance(env: &Env, addr: &Address, amount: i128) {
    let key = DataKey::Balance(addr.clone());
    env.storage().persistent().set(&key, &amount);
    env.storage()
        .persistent()
        .extend_ttl(&key, BALANCE_LIFETIME_THRESHOLD, BALANCE_BUMP_AMOUNT);
}

fn read_total_supply(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalSupply)
        .unwrap_or(0)
}

fn write_total_supply(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::TotalSupply, &amount);
}

fn read_allowance(env: &Env, from: &Address, spender: &Address) -> i128 {
    let key = DataKey::Allowance(AllowanceKey {
        from: from.clone(),
        spender: spender.clone(),
    });
    match env.storage().temporary().get::<_, AllowanceValue>(&key) {
        Some(allowance) if allowance.expiration_ledger >= env.ledger().sequence() => {
            allowance.amount
        }
        _ => 0,
    }
}

fn write_allowance(env: &Env, from: &Address, spender: &Address, amount: i128, expiration_ledger: u32) {
    let key = DataKey::Allowance(AllowanceKey {
        from: from.clone(),
        spender: spender.clone(),
    });
    let value = AllowanceValue {
        amount,
        expiration_ledger,
    };
    env.storage().temporary().set(&key, &value);
    if amount > 0 {
        let live_for = expiration_ledger.saturating_sub(env.ledger().sequence());
        env.storage().temporary().extend_ttl(&key, live_for, live_for);
    }
}

fn check_nonnegative(amount: i128) -> Result<(), Error> {
    if amount < 0 {
        return Err(Error::NegativeAmount);
    }
    Ok(())
}

fn spend_allowance(env: &Env, from: &Address, spender: &Address, amount: i128) -> Result<(), Error> {
    let key = DataKey::Allowance(AllowanceKey {
        from: from.clone(),
        spender: spender.clone(),
    });
    let allowance = read_allowance(env, from, spender);
    if allowance < amount {
        return Err(Error::InsufficientAllowance);
    }
    if amount > 0 {
        let expiration_ledger = env
            .storage()
            .temporary()
            .get::<_, AllowanceValue>(&key)
            .map(|a| a.expiration_ledger)
            .unwrap_or(0);
        write_allowance(env, from, spender, allowance - amount, expiration_ledger);
    }
    Ok(())
}

fn move_balance(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), Error> {
    let from_balance = read_balance(env, from);
    if from_balance < amount {
        return Err(Error::InsufficientBalance);
    }
    write_balance(env, from, from_balance - amount);
    write_balance(env, to, read_balance(env, to) + amount);
    Ok(())
}

/// Decentralized stable coin (DSC), pegged to one US dollar.
///
/// Supply only changes through `mint` and `burn`, both gated on the minter
/// address. At deployment the minter is handed over to the DSC engine
/// contract, which then owns issuance for the lifetime of the system.
#[contract]
pub struct DscToken;

#[contractimpl]
impl DscToken {
    /// Initialize the DSC token contract.
    /// `admin`  - deployer, allowed to rotate the minter
    /// `minter` - the only address allowed to mint/burn
    pub fn initialize(
        env: Env,
        admin: Address,
        minter: Address,
        decimals: u32,
        name: String,
        symbol: String,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(Error::AlreadyInitialized);
        }

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Minter, &minter);
        env.storage().instance().set(&DataKey::Decimals, &decimals);
        env.storage().instance().set(&DataKey::Name, &name);
        env.storage().instance().set(&DataKey::Symbol, &symbol);
        write_total_supply(&env, 0);
        extend_instance(&env);

        log!(&env, "DscToken: initialized, minter={}", minter);
        Ok(())
    }

    /// Bump instance TTL. Anyone may call it to keep the contract alive.
    pub fn bump_instance(env: Env) {
        extend_instance(&env);
    }

    /// Mint DSC to `to`. Only callable by the minter.
    pub fn mint(env: Env, to: Address, amount: i128) -> Result<bool, Error> {
        if amount <= 0 {
            return Err(Error::MustBeMoreThanZero);
        }
        let minter = read_minter(&env)?;
        minter.require_auth();
        extend_instance(&env);

        let balance = read_balance(&env, &to);
        write_balance(&env, &to, balance + amount);
        write_total_supply(&env, read_total_supply(&env) + amount);

        TokenUtils::new(&env).events().mint(minter, to, amount);
        Ok(true)
    }

    /// Burn DSC held by the minter itself. Only callable by the minter.
    pub fn burn(env: Env, amount: i128) -> Result<(), Error> {
        if amount <= 0 {
            return Err(Error::MustBeMoreThanZero);
        }
        let minter = read_minter(&env)?;
        minter.require_auth();
        extend_instance(&env);

        let balance = read_balance(&env, &minter);
        if balance < amount {
            return Err(Error::BurnAmountExceedsBalance);
        }
        write_balance(&env, &minter, balance - amount);
        write_total_supply(&env, read_total_supply(&env) - amount);

        TokenUtils::new(&env).events().burn(minter, amount);
        Ok(())
    }

    // --- SEP-41 shaped token interface ---

    pub fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        extend_instance(&env);
        read_allowance(&env, &from, &spender)
    }

    pub fn approve(
        env: Env,
        from: Address,
        spender: Address,
        amount: i128,
        expiration_ledger: u32,
    ) -> Result<(), Error> {
        from.require_auth();
        check_nonnegative(amount)?;
        extend_instance(&env);
        write_allowance(&env, &from, &spender, amount, expiration_ledger);

        TokenUtils::new(&env)
            .events()
            .approve(from, spender, amount, expiration_ledger);
        Ok(())
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        extend_instance(&env);
        read_balance(&env, &id)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), Error> {
        from.require_auth();
        check_nonnegative(amount)?;
        extend_instance(&env);

        move_balance(&env, &from, &to, amount)?;

        TokenUtils::new(&env).events().transfer(from, to, amount);
        Ok(())
    }

    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), Error> {
        spender.require_auth();
        check_nonnegative(amount)?;
        extend_instance(&env);

        spend_allowance(&env, &from, &spender, amount)?;
        move_balance(&env, &from, &to, amount)?;

        TokenUtils::new(&env).events().transfer(from, to, amount);
        Ok(())
    }

    pub fn total_supply(env: Env) -> i128 {
        extend_instance(&env);
        read_total_supply(&env)
    }

    pub fn decimals(env: Env) -> Result<u32, Error> {
        extend_instance(&env);
        env.storage()
            .instance()
            .get(&DataKey::Decimals)
            .ok_or(Error::NotInitialized)
    }

    pub fn name(env: Env) -> Result<String, Error> {
        extend_instance(&env);
        env.storage()
            .instance()
            .get(&DataKey::Name)
            .ok_or(Error::NotInitialized)
    }

    pub fn symbol(env: Env) -> Result<String, Error> {
        extend_instance(&env);
        env.storage()
            .instance()
            .get(&DataKey::Symbol)
            .ok_or(Error::NotInitialized)
    }

    // --- Admin functions ---

    /// Hand mint/burn authority to the engine. Can only be done once; after
    /// that the minter is fixed for the life of the token.
    pub fn set_minter(env: Env, new_minter: Address) -> Result<(), Error> {
        let admin = read_admin(&env)?;
        admin.require_auth();
        extend_instance(&env);
        if env.storage().instance().has(&DataKey::MinterLocked) {
            return Err(Error::MinterLocked);
        }
        env.storage().instance().set(&DataKey::Minter, &new_minter);
        env.storage().instance().set(&DataKey::MinterLocked, &true);
        log!(&env, "DscToken: minter handed over", new_minter);
        Ok(())
    }

    /// Transfer admin role.
    pub fn set_admin(env: Env, new_admin: Address) -> Result<(), Error> {
        let admin = read_admin(&env)?;
        admin.require_auth();
        extend_instance(&env);
        env.storage().instance().set(&DataKey::Admin, &new_admin);
        Ok(())
    }

    pub fn minter(env: Env) -> Result<Address, Error> {
        extend_instance(&env);
        read_minter(&env)
    }

    pub fn admin(env: Env) -> Result<Address, Error> {
        extend_instance(&env);
        read_admin(&env)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::{Env, String};

    fn setup_token(env: &Env) -> (DscTokenClient<'_>, Address, Address) {
        let contract_id = env.register_contract(None, DscToken);
        let client = DscTokenClient::new(env, &contract_id);
        let admin = Address::generate(env);
        let minter = Address::generate(env);

        client.initialize(
            &admin,
            &minter,
            &7u32,
            &String::from_str(env, "Decentralized Stable Coin"),
            &String::from_str(env, "DSC"),
        );

        (client, admin, minter)
    }

    #[test]
    fn test_initialize() {
        let env = Env::default();
        let (client, admin, minter) = setup_token(&env);
        assert_eq!(client.name(), String::from_str(&env, "Decentralized Stable Coin"));
        assert_eq!(client.symbol(), String::from_str(&env, "DSC"));
        assert_eq!(client.decimals(), 7u32);
        assert_eq!(client.total_supply(), 0i128);
        assert_eq!(client.admin(), admin);
        assert_eq!(client.minter(), minter);
    }

    #[test]
    fn test_mint_and_burn() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, _, minter) = setup_token(&env);
        let user = Address::generate(&env);

        assert!(client.mint(&user, &1_000_0000000i128));
        assert_eq!(client.balance(&user), 1_000_0000000i128);
        assert_eq!(client.total_supply(), 1_000_0000000i128);

        // burn only ever debits the minter's own balance
        client.transfer(&user, &minter, &400_0000000i128);
        client.burn(&400_0000000i128);
        assert_eq!(client.balance(&user), 600_0000000i128);
        assert_eq!(client.balance(&minter), 0);
        assert_eq!(client.total_supply(), 600_0000000i128);
    }

    #[test]
    fn test_mint_requires_minter_auth() {
        let env = Env::default();
        let (client, _, _) = setup_token(&env);
        let user = Address::generate(&env);

        // no auths mocked: the minter never signed
        assert!(client.try_mint(&user, &1_0000000i128).is_err());
        assert_eq!(client.total_supply(), 0);
    }

    #[test]
    fn test_mint_zero_rejected() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, _, _) = setup_token(&env);
        let user = Address::generate(&env);

        assert_eq!(
            client.try_mint(&user, &0i128),
            Err(Ok(Error::MustBeMoreThanZero))
        );
    }

    #[test]
    fn test_transfer() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, _, _) = setup_token(&env);
        let user1 = Address::generate(&env);
        let user2 = Address::generate(&env);

        client.mint(&user1, &1_000_0000000i128);
        client.transfer(&user1, &user2, &300_0000000i128);
        assert_eq!(client.balance(&user1), 700_0000000i128);
        assert_eq!(client.balance(&user2), 300_0000000i128);
        assert_eq!(client.total_supply(), 1_000_0000000i128);
    }

    #[test]
    fn test_transfer_more_than_balance_fails() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, _, _) = setup_token(&env);
        let user1 = Address::generate(&env);
        let user2 = Address::generate(&env);

        client.mint(&user1, &10_0000000i128);
        assert_eq!(
            client.try_transfer(&user1, &user2, &11_0000000i128),
            Err(Ok(Error::InsufficientBalance))
        );
        assert_eq!(
            client.try_transfer(&user1, &user2, &-1i128),
            Err(Ok(Error::NegativeAmount))
        );
    }

    #[test]
    fn test_approve_and_transfer_from() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, _, _) = setup_token(&env);
        let owner = Address::generate(&env);
        let spender = Address::generate(&env);
        let recipient = Address::generate(&env);

        client.mint(&owner, &1_000_0000000i128);
        client.approve(&owner, &spender, &500_0000000i128, &1000u32);
        assert_eq!(client.allowance(&owner, &spender), 500_0000000i128);

        client.transfer_from(&spender, &owner, &recipient, &200_0000000i128);
        assert_eq!(client.balance(&owner), 800_0000000i128);
        assert_eq!(client.balance(&recipient), 200_0000000i128);
        assert_eq!(client.allowance(&owner, &spender), 300_0000000i128);

        assert_eq!(
            client.try_transfer_from(&spender, &owner, &recipient, &400_0000000i128),
            Err(Ok(Error::InsufficientAllowance))
        );
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1)")]
    fn test_double_initialize_panics() {
        let env = Env::default();
        let (client, admin, minter) = setup_token(&env);
        client.initialize(
            &admin,
            &minter,
            &7u32,
            &String::from_str(&env, "Decentralized Stable Coin"),
            &String::from_str(&env, "DSC"),
        );
    }

    #[test]
    fn test_burn_more_than_balance_fails() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, _, minter) = setup_token(&env);

        client.mint(&minter, &100_0000000i128);
        assert_eq!(
            client.try_burn(&200_0000000i128),
            Err(Ok(Error::BurnAmountExceedsBalance))
        );
        assert_eq!(client.total_supply(), 100_0000000i128);
    }

    #[test]
    fn test_set_minter() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, _, minter) = setup_token(&env);
        let new_minter = Address::generate(&env);

        assert_eq!(client.minter(), minter);
        client.set_minter(&new_minter);
        assert_eq!(client.minter(), new_minter);
    }

    #[test]
    fn test_set_minter_only_once() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, _, _) = setup_token(&env);
        let engine = Address::generate(&env);
        let rogue = Address::generate(&env);

        client.set_minter(&engine);
        assert_eq!(client.try_set_minter(&rogue), Err(Ok(Error::MinterLocked)));
        assert_eq!(client.try_set_minter(&engine), Err(Ok(Error::MinterLocked)));
        assert_eq!(client.minter(), engine);
    }
}
