use cosmwasm_std::Response;

use crate::phase::MigrationPhase;

pub fn instantiate_response(admin: String, current_denom: String, next_denom: String) -> Response {
    Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("admin", admin)
        .add_attribute("current_denom", current_denom)
        .add_attribute("next_denom", next_denom)
}

pub fn execute_deposit_response(
    user: String,
    amount: String,
    user_deposit: String,
    total_deposited: String,
) -> Response {
    Response::new()
        .add_attribute("action", "deposit")
        .add_attribute("user", user)
        .add_attribute("amount", amount)
        .add_attribute("user_deposit", user_deposit)
        .add_attribute("total_deposited", total_deposited)
}

pub fn execute_withdraw_response(
    user: String,
    amount: String,
    total_deposited: String,
) -> Response {
    Response::new()
        .add_attribute("action", "withdraw")
        .add_attribute("user", user)
        .add_attribute("amount", amount)
        .add_attribute("total_deposited", total_deposited)
}

pub fn execute_claim_response(user: String, amount: String, fee: String) -> Response {
    Response::new()
        .add_attribute("action", "claim")
        .add_attribute("user", user)
        .add_attribute("amount", amount)
        .add_attribute("fee", fee)
}

pub fn execute_phase_transition_response(
    action: &str,
    from: MigrationPhase,
    to: MigrationPhase,
) -> Response {
    Response::new()
        .add_attribute("action", action)
        .add_attribute("from_phase", from.to_string())
        .add_attribute("to_phase", to.to_string())
}
