use soroban_sdk::{symbol_short, Env};

// Event emitted when the admin pushes a new answer
pub fn price_updated_event(env: &Env, price: i128, updated_at: u64) {
    let topics = (symbol_short!("set_price"),);
    env.events().publish(topics, (price, updated_at));
}
