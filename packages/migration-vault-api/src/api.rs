use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Decimal, Timestamp, Uint128};
use strum_macros::{Display, EnumString};

use crate::phase::{MigrationPhase, PhasePermissions};

#[cw_serde]
/// Descriptor of a token taking part in a migration.
pub struct TokenInfo {
    pub id: String,
    pub name: String,
    pub ticker: String,
    pub description: String,
    pub market_cap: Option<String>,
    pub volume_24h: Option<String>,
    /// 24h price change in signed basis points, e.g. 1560 for +15.6%.
    pub price_change_24h_bps: Option<i32>,
    pub contract_address: String,
    pub emoji: Option<String>,
}

#[derive(Copy, Eq, Hash, Display, EnumString)]
#[cw_serde]
#[strum(serialize_all = "snake_case")]
pub enum MetaStatus {
    Current,
    Candidate,
    Past,
}

#[cw_serde]
/// A trending token theme tracked as a migration target.
pub struct Meta {
    pub id: String,
    pub name: String,
    pub ticker: String,
    pub pimped_name: Option<String>,
    pub pimped_ticker: Option<String>,
    pub description: String,
    pub status: MetaStatus,
    pub market_cap: Option<String>,
    pub volume_24h: Option<String>,
    pub price_change_24h_bps: Option<i32>,
    pub contract_address: Option<String>,
    pub emoji: Option<String>,
}

#[cw_serde]
/// Current phase and the timestamps bounding it.
pub struct MigrationWindow {
    pub phase: MigrationPhase,
    pub deposits_open_at: Option<Timestamp>,
    pub deposits_close_at: Option<Timestamp>,
    pub migration_starts_at: Option<Timestamp>,
    pub migration_completed_at: Option<Timestamp>,
}

impl MigrationWindow {
    pub fn new(phase: MigrationPhase) -> Self {
        MigrationWindow {
            phase,
            deposits_open_at: None,
            deposits_close_at: None,
            migration_starts_at: None,
            migration_completed_at: None,
        }
    }

    pub fn permissions(&self) -> PhasePermissions {
        self.phase.into()
    }
}

#[cw_serde]
/// Read-only snapshot of the vault, as shown to every visitor.
pub struct VaultState {
    pub current_token: TokenInfo,
    pub next_token: Option<TokenInfo>,
    pub migration_window: MigrationWindow,
    /// Current token amount deposited across all users.
    pub total_deposited: Decimal,
    pub user_count: u64,
}

#[cw_serde]
pub struct PastMigration {
    pub id: String,
    pub from_token: TokenInfo,
    pub to_token: TokenInfo,
    pub migrated_at: Timestamp,
    pub total_migrated: Decimal,
    pub participant_count: u64,
}

#[cw_serde]
pub struct WithdrawMsg {
    /// Amount to withdraw. Withdraws the whole position if None.
    pub amount: Option<Uint128>,
}

#[cw_serde]
pub struct VaultStatusParams {
    pub user: String,
}

////// Responses

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub current_denom: String,
    pub next_denom: String,
    pub fee_bps: u16,
}

#[cw_serde]
pub struct VaultStateResponse {
    pub window: MigrationWindow,
    pub permissions: PhasePermissions,
    pub total_deposited: Uint128,
    pub participant_count: u64,
    /// Next-token units received per deposited unit, known once the swap is done.
    pub conversion_rate: Option<Decimal>,
}

#[cw_serde]
/// A single user's position in the vault.
pub struct VaultStatusResponse {
    pub initialized: bool,
    pub deposited_amount: Uint128,
    pub old_token_denom: String,
    pub new_token_denom: String,
    pub swap_executed: bool,
    pub claimable: bool,
    pub claimed_amount: Uint128,
}
