use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Decimal, Uint128};
use cw_storage_plus::{Item, Map};
use migration_vault_api::api::MigrationWindow;

#[cw_serde]
pub struct Config {
    pub admin: Addr,
    pub current_denom: String,
    pub next_denom: String,
    pub fee_bps: u16,
}

#[derive(Default)]
#[cw_serde]
pub struct Position {
    /// Current-token units deposited by the user.
    pub deposited: Uint128,
    /// Next-token units paid out to the user, zero until claimed.
    pub claimed: Uint128,
}

pub const CONFIG: Item<Config> = Item::new("config");

pub const WINDOW: Item<MigrationWindow> = Item::new("migration_window");

pub const TOTAL_DEPOSITED: Item<Uint128> = Item::new("total_deposited");

pub const PARTICIPANT_COUNT: Item<u64> = Item::new("participant_count");

/// Set once, when the migration completes.
pub const CONVERSION_RATE: Item<Decimal> = Item::new("conversion_rate");

pub const POSITIONS: Map<Addr, Position> = Map::new("positions");
