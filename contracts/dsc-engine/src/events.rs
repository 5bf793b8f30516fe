use soroban_sdk::{symbol_short, Address, Env};

// Event emitted when a user locks collateral
pub fn collateral_deposited_event(env: &Env, user: &Address, asset: &Address, amount: i128) {
    let topics = (symbol_short!("deposit"), user.clone(), asset.clone());
    env.events().publish(topics, amount);
}

// Event emitted when collateral leaves custody, to its owner or to a liquidator
pub fn collateral_redeemed_event(
    env: &Env,
    from: &Address,
    to: &Address,
    asset: &Address,
    amount: i128,
) {
    let topics = (symbol_short!("redeem"), from.clone(), to.clone());
    env.events().publish(topics, (asset.clone(), amount));
}

pub fn dsc_minted_event(env: &Env, user: &Address, amount: i128) {
    let topics = (symbol_short!("mint"), user.clone());
    env.events().publish(topics, amount);
}

pub fn dsc_burned_event(env: &Env, on_behalf_of: &Address, dsc_from: &Address, amount: i128) {
    let topics = (symbol_short!("burn"), on_behalf_of.clone(), dsc_from.clone());
    env.events().publish(topics, amount);
}

pub fn liquidated_event(
    env: &Env,
    liquidator: &Address,
    user: &Address,
    asset: &Address,
    debt_covered: i128,
    collateral_seized: i128,
) {
    let topics = (symbol_short!("liq"), liquidator.clone(), user.clone());
    env.events()
        .publish(topics, (asset.clone(), debt_covered, collateral_seized));
}
