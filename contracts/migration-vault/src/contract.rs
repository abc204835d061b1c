use cosmwasm_std::{
    coins, entry_point, to_json_binary, Addr, BankMsg, Binary, Decimal, Deps, DepsMut, Env,
    MessageInfo, Response, StdError, Uint128,
};
use cw2::set_contract_version;
use cw_utils::{must_pay, nonpayable};
use migration_vault_api::api::{
    ConfigResponse, MigrationWindow, VaultStateResponse, VaultStatusParams, VaultStatusResponse,
    WithdrawMsg,
};
use migration_vault_api::error::VaultError::{
    ClaimNotAvailable, InsufficientPosition, NoPosition, NothingToClaim, ZeroAmount,
};
use migration_vault_api::error::VaultResult;
use migration_vault_api::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use migration_vault_api::phase::MigrationPhase;
use migration_vault_api::response::{
    execute_claim_response, execute_deposit_response, execute_phase_transition_response,
    execute_withdraw_response, instantiate_response,
};

use crate::state::{
    Config, Position, CONFIG, CONVERSION_RATE, PARTICIPANT_COUNT, POSITIONS, TOTAL_DEPOSITED,
    WINDOW,
};
use crate::validate::{
    admin_caller_only, validate_deposit_allowed, validate_instantiate, validate_transition,
    validate_withdrawal_allowed,
};

// version info for migration info
const CONTRACT_NAME: &str = "crates.io:migration-vault";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

const BPS_DENOMINATOR: u128 = 10_000;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> VaultResult<Response> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    validate_instantiate(&msg.current_denom, &msg.next_denom, msg.fee_bps)?;

    let admin = deps.api.addr_validate(&msg.admin)?;

    let config = Config {
        admin: admin.clone(),
        current_denom: msg.current_denom,
        next_denom: msg.next_denom,
        fee_bps: msg.fee_bps,
    };
    CONFIG.save(deps.storage, &config)?;

    WINDOW.save(
        deps.storage,
        &MigrationWindow {
            phase: MigrationPhase::DepositsOpen,
            deposits_open_at: Some(env.block.time),
            deposits_close_at: msg.deposits_close_at,
            migration_starts_at: msg.migration_starts_at,
            migration_completed_at: None,
        },
    )?;
    TOTAL_DEPOSITED.save(deps.storage, &Uint128::zero())?;
    PARTICIPANT_COUNT.save(deps.storage, &0)?;

    Ok(instantiate_response(
        admin.to_string(),
        config.current_denom,
        config.next_denom,
    ))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> VaultResult<Response> {
    match msg {
        ExecuteMsg::Deposit {} => deposit(deps, env, info),
        ExecuteMsg::Withdraw(msg) => withdraw(deps, info, msg),
        ExecuteMsg::Claim {} => claim(deps, info),
        ExecuteMsg::CloseDeposits {} => close_deposits(deps, env, info),
        ExecuteMsg::StartMigration {} => start_migration(deps, env, info),
        ExecuteMsg::CompleteMigration {} => complete_migration(deps, env, info),
    }
}

fn deposit(deps: DepsMut, env: Env, info: MessageInfo) -> VaultResult<Response> {
    let window = WINDOW.load(deps.storage)?;
    validate_deposit_allowed(&window, env.block.time)?;

    let config = CONFIG.load(deps.storage)?;
    let amount = must_pay(&info, &config.current_denom)?;

    let user = info.sender;
    let mut position = POSITIONS
        .may_load(deps.storage, user.clone())?
        .unwrap_or_default();

    if position.deposited.is_zero() {
        PARTICIPANT_COUNT.update(deps.storage, |count| -> VaultResult<u64> { Ok(count + 1) })?;
    }

    position.deposited = position.deposited.checked_add(amount)?;
    POSITIONS.save(deps.storage, user.clone(), &position)?;

    let total_deposited = TOTAL_DEPOSITED.load(deps.storage)?.checked_add(amount)?;
    TOTAL_DEPOSITED.save(deps.storage, &total_deposited)?;

    Ok(execute_deposit_response(
        user.to_string(),
        amount.to_string(),
        position.deposited.to_string(),
        total_deposited.to_string(),
    ))
}

/// Before the swap this returns current tokens. Once the migration is completed
/// the position can only be settled in the next token, exactly like a claim.
fn withdraw(deps: DepsMut, info: MessageInfo, msg: WithdrawMsg) -> VaultResult<Response> {
    let window = WINDOW.load(deps.storage)?;
    validate_withdrawal_allowed(&window)?;

    if window.phase == MigrationPhase::Completed {
        return settle_position(deps, info.sender);
    }

    let user = info.sender;
    let mut position = POSITIONS
        .may_load(deps.storage, user.clone())?
        .filter(|position| !position.deposited.is_zero())
        .ok_or(NoPosition)?;

    let amount = msg.amount.unwrap_or(position.deposited);
    if amount.is_zero() {
        return Err(ZeroAmount);
    }
    if amount > position.deposited {
        return Err(InsufficientPosition);
    }

    position.deposited = position.deposited.checked_sub(amount)?;
    if position.deposited.is_zero() {
        POSITIONS.remove(deps.storage, user.clone());
        PARTICIPANT_COUNT.update(deps.storage, |count| -> VaultResult<u64> {
            Ok(count.saturating_sub(1))
        })?;
    } else {
        POSITIONS.save(deps.storage, user.clone(), &position)?;
    }

    let total_deposited = TOTAL_DEPOSITED.load(deps.storage)?.checked_sub(amount)?;
    TOTAL_DEPOSITED.save(deps.storage, &total_deposited)?;

    let denom = CONFIG.load(deps.storage)?.current_denom;

    Ok(execute_withdraw_response(
        user.to_string(),
        amount.to_string(),
        total_deposited.to_string(),
    )
    .add_message(BankMsg::Send {
        to_address: user.to_string(),
        amount: coins(amount.u128(), denom),
    }))
}

fn claim(deps: DepsMut, info: MessageInfo) -> VaultResult<Response> {
    let window = WINDOW.load(deps.storage)?;

    if window.phase != MigrationPhase::Completed {
        return Err(ClaimNotAvailable {
            phase: window.phase,
        });
    }

    settle_position(deps, info.sender)
}

/// Pays out the user's share of the swapped tokens, minus the fee.
fn settle_position(deps: DepsMut, user: Addr) -> VaultResult<Response> {
    let mut position = POSITIONS
        .may_load(deps.storage, user.clone())?
        .ok_or(NoPosition)?;

    if !position.claimed.is_zero() {
        return Err(NothingToClaim);
    }

    let config = CONFIG.load(deps.storage)?;
    let rate = CONVERSION_RATE.load(deps.storage)?;

    let (amount, fee) = claim_amounts(position.deposited, rate, config.fee_bps)?;
    if amount.is_zero() {
        return Err(NothingToClaim);
    }

    position.claimed = amount;
    POSITIONS.save(deps.storage, user.clone(), &position)?;

    let mut response =
        execute_claim_response(user.to_string(), amount.to_string(), fee.to_string())
            .add_message(BankMsg::Send {
                to_address: user.to_string(),
                amount: coins(amount.u128(), config.next_denom.clone()),
            });

    if !fee.is_zero() {
        response = response.add_message(BankMsg::Send {
            to_address: config.admin.to_string(),
            amount: coins(fee.u128(), config.next_denom),
        });
    }

    Ok(response)
}

/// Returns (amount paid to the user, fee) for a deposit at the given conversion rate.
fn claim_amounts(
    deposited: Uint128,
    rate: Decimal,
    fee_bps: u16,
) -> VaultResult<(Uint128, Uint128)> {
    let gross = deposited * rate;
    let fee = gross.multiply_ratio(fee_bps as u128, BPS_DENOMINATOR);
    let amount = gross.checked_sub(fee)?;

    Ok((amount, fee))
}

fn close_deposits(deps: DepsMut, env: Env, info: MessageInfo) -> VaultResult<Response> {
    let config = CONFIG.load(deps.storage)?;
    admin_caller_only(&config, &info.sender)?;

    let mut window = WINDOW.load(deps.storage)?;
    let from = window.phase;
    validate_transition(from, MigrationPhase::DepositsClosed)?;

    window.phase = MigrationPhase::DepositsClosed;
    window.deposits_close_at = Some(env.block.time);
    WINDOW.save(deps.storage, &window)?;

    Ok(execute_phase_transition_response(
        "close_deposits",
        from,
        window.phase,
    ))
}

/// Locks positions and hands the pooled current tokens to the admin for swapping.
fn start_migration(deps: DepsMut, env: Env, info: MessageInfo) -> VaultResult<Response> {
    let config = CONFIG.load(deps.storage)?;
    admin_caller_only(&config, &info.sender)?;

    let mut window = WINDOW.load(deps.storage)?;
    let from = window.phase;
    validate_transition(from, MigrationPhase::Migrating)?;

    window.phase = MigrationPhase::Migrating;
    window.migration_starts_at = Some(env.block.time);
    WINDOW.save(deps.storage, &window)?;

    let total_deposited = TOTAL_DEPOSITED.load(deps.storage)?;

    let mut response = execute_phase_transition_response("start_migration", from, window.phase)
        .add_attribute("swap_amount", total_deposited.to_string());

    if !total_deposited.is_zero() {
        response = response.add_message(BankMsg::Send {
            to_address: config.admin.to_string(),
            amount: coins(total_deposited.u128(), config.current_denom),
        });
    }

    Ok(response)
}

/// Admin sends back the swapped next tokens; their amount fixes the conversion rate.
fn complete_migration(deps: DepsMut, env: Env, info: MessageInfo) -> VaultResult<Response> {
    let config = CONFIG.load(deps.storage)?;
    admin_caller_only(&config, &info.sender)?;

    let mut window = WINDOW.load(deps.storage)?;
    let from = window.phase;
    validate_transition(from, MigrationPhase::Completed)?;

    let total_deposited = TOTAL_DEPOSITED.load(deps.storage)?;

    // an empty vault has nothing to convert, so it takes no funds either
    let (received, rate) = if total_deposited.is_zero() {
        nonpayable(&info)?;
        (Uint128::zero(), Decimal::zero())
    } else {
        let received = must_pay(&info, &config.next_denom)?;
        let rate = Decimal::checked_from_ratio(received, total_deposited)
            .map_err(|e| StdError::generic_err(e.to_string()))?;
        (received, rate)
    };
    CONVERSION_RATE.save(deps.storage, &rate)?;

    window.phase = MigrationPhase::Completed;
    window.migration_completed_at = Some(env.block.time);
    WINDOW.save(deps.storage, &window)?;

    Ok(
        execute_phase_transition_response("complete_migration", from, window.phase)
            .add_attribute("received", received.to_string())
            .add_attribute("conversion_rate", rate.to_string()),
    )
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> VaultResult<Binary> {
    let response = match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?)?,
        QueryMsg::VaultState {} => to_json_binary(&query_vault_state(deps)?)?,
        QueryMsg::VaultStatus(params) => to_json_binary(&query_vault_status(deps, params)?)?,
    };

    Ok(response)
}

pub fn query_config(deps: Deps) -> VaultResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;

    Ok(ConfigResponse {
        admin: config.admin,
        current_denom: config.current_denom,
        next_denom: config.next_denom,
        fee_bps: config.fee_bps,
    })
}

pub fn query_vault_state(deps: Deps) -> VaultResult<VaultStateResponse> {
    let window = WINDOW.load(deps.storage)?;

    Ok(VaultStateResponse {
        permissions: window.permissions(),
        window,
        total_deposited: TOTAL_DEPOSITED.load(deps.storage)?,
        participant_count: PARTICIPANT_COUNT.load(deps.storage)?,
        conversion_rate: CONVERSION_RATE.may_load(deps.storage)?,
    })
}

pub fn query_vault_status(
    deps: Deps,
    params: VaultStatusParams,
) -> VaultResult<VaultStatusResponse> {
    let user = deps.api.addr_validate(&params.user)?;
    let config = CONFIG.load(deps.storage)?;

    let position = POSITIONS.may_load(deps.storage, user)?;
    let swap_executed = CONVERSION_RATE.may_load(deps.storage)?.is_some();

    let Position { deposited, claimed } = position.clone().unwrap_or_default();

    Ok(VaultStatusResponse {
        initialized: position.is_some(),
        deposited_amount: deposited,
        old_token_denom: config.current_denom,
        new_token_denom: config.next_denom,
        swap_executed,
        claimable: swap_executed && !deposited.is_zero() && claimed.is_zero(),
        claimed_amount: claimed,
    })
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> VaultResult<Response> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new().add_attribute("action", "migrate"))
}
