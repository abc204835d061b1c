use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Timestamp;

use crate::api::{
    ConfigResponse, VaultStateResponse, VaultStatusParams, VaultStatusResponse, WithdrawMsg,
};

#[cw_serde]
pub struct InstantiateMsg {
    /// Migration operator. Drives phase transitions and receives fees.
    pub admin: String,
    /// Denom users deposit.
    pub current_denom: String,
    /// Denom users claim after the swap.
    pub next_denom: String,
    /// Fee taken from claimed amounts, in basis points.
    pub fee_bps: u16,
    pub deposits_close_at: Option<Timestamp>,
    pub migration_starts_at: Option<Timestamp>,
}

#[cw_serde]
pub enum ExecuteMsg {
    Deposit {},
    Withdraw(WithdrawMsg),
    Claim {},
    CloseDeposits {},
    StartMigration {},
    CompleteMigration {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    #[returns(VaultStateResponse)]
    VaultState {},
    #[returns(VaultStatusResponse)]
    VaultStatus(VaultStatusParams),
}

#[cw_serde]
pub struct MigrateMsg {}
