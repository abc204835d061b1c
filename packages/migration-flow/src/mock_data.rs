use cosmwasm_std::{Decimal, Timestamp};
use migration_vault_api::api::{
    Meta, MetaStatus, MigrationWindow, PastMigration, TokenInfo, VaultState,
};
use migration_vault_api::phase::MigrationPhase;

const ONE_HOUR: u64 = 3_600;

/// 2026-01-15T00:00:00Z
const FIRST_MIGRATION_AT: u64 = 1_768_435_200;

/// Fixed vault fixture standing in for on-chain data. Timestamps are relative
/// to the `now` it was built with, everything else is constant.
#[derive(Clone, Debug, PartialEq)]
pub struct MockDataProvider {
    vault_state: VaultState,
    past_migrations: Vec<PastMigration>,
    metas: Vec<Meta>,
}

impl MockDataProvider {
    pub fn new(now: Timestamp) -> Self {
        let vault_state = VaultState {
            current_token: penguin_token(
                "Current trending meta on Solana. Deposit to vault for next migration.",
            ),
            next_token: Some(frog_token()),
            migration_window: MigrationWindow {
                phase: MigrationPhase::DepositsOpen,
                deposits_open_at: Some(now.minus_seconds(ONE_HOUR)),
                deposits_close_at: Some(now.plus_seconds(ONE_HOUR)),
                migration_starts_at: Some(now.plus_seconds(2 * ONE_HOUR)),
                migration_completed_at: None,
            },
            total_deposited: Decimal::raw(1_247_532_450_000_000_000_000_000),
            user_count: 89,
        };

        let past_migrations = vec![PastMigration {
            id: "migration-001".to_string(),
            from_token: dog_token(),
            to_token: TokenInfo {
                market_cap: None,
                volume_24h: None,
                price_change_24h_bps: None,
                ..penguin_token("Current meta.")
            },
            migrated_at: Timestamp::from_seconds(FIRST_MIGRATION_AT),
            total_migrated: Decimal::raw(2_840_921_120_000_000_000_000_000),
            participant_count: 156,
        }];

        let metas = vec![
            meta_from(&vault_state.current_token, MetaStatus::Current),
            meta_from(&frog_token(), MetaStatus::Candidate),
            meta_from(&dog_token(), MetaStatus::Past),
        ];

        MockDataProvider {
            vault_state,
            past_migrations,
            metas,
        }
    }

    /// Same fixture in a different phase.
    pub fn with_phase(mut self, phase: MigrationPhase) -> Self {
        self.vault_state.migration_window.phase = phase;
        self
    }

    pub fn current_token(&self) -> &TokenInfo {
        &self.vault_state.current_token
    }

    pub fn next_token(&self) -> Option<&TokenInfo> {
        self.vault_state.next_token.as_ref()
    }

    pub fn migration_window(&self) -> &MigrationWindow {
        &self.vault_state.migration_window
    }

    pub fn vault_state(&self) -> &VaultState {
        &self.vault_state
    }

    pub fn past_migrations(&self) -> &[PastMigration] {
        &self.past_migrations
    }

    pub fn metas(&self) -> &[Meta] {
        &self.metas
    }

    pub fn current_meta(&self) -> Option<&Meta> {
        self.metas
            .iter()
            .find(|meta| meta.status == MetaStatus::Current)
    }

    pub fn candidate_metas(&self) -> Vec<&Meta> {
        self.metas_with_status(MetaStatus::Candidate)
    }

    pub fn past_metas(&self) -> Vec<&Meta> {
        self.metas_with_status(MetaStatus::Past)
    }

    /// Catalog entries with the given status, in catalog order.
    pub fn metas_with_status(&self, status: MetaStatus) -> Vec<&Meta> {
        self.metas
            .iter()
            .filter(|meta| meta.status == status)
            .collect()
    }
}

fn penguin_token(description: &str) -> TokenInfo {
    TokenInfo {
        id: "penguin-2026-q1".to_string(),
        name: "Pudgy Penguin".to_string(),
        ticker: "$PENGU".to_string(),
        description: description.to_string(),
        market_cap: Some("$42M".to_string()),
        volume_24h: Some("$2.1M".to_string()),
        price_change_24h_bps: Some(1560),
        contract_address: "PENGxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx".to_string(),
        emoji: Some("🐧".to_string()),
    }
}

fn frog_token() -> TokenInfo {
    TokenInfo {
        id: "frog-meta-next".to_string(),
        name: "Pepe Frog".to_string(),
        ticker: "$FROG".to_string(),
        description: "Next migration target. Rising meta with strong community.".to_string(),
        market_cap: Some("$8M".to_string()),
        volume_24h: Some("$420K".to_string()),
        price_change_24h_bps: Some(820),
        contract_address: "FROGxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx".to_string(),
        emoji: Some("🐸".to_string()),
    }
}

fn dog_token() -> TokenInfo {
    TokenInfo {
        id: "dog-meta-2025".to_string(),
        name: "Dog With Hat".to_string(),
        ticker: "$WIF".to_string(),
        description: "Previous meta from Q4 2025.".to_string(),
        market_cap: Some("$120M".to_string()),
        volume_24h: Some("$5.2M".to_string()),
        price_change_24h_bps: Some(-320),
        contract_address: "DOGxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx".to_string(),
        emoji: Some("🐕".to_string()),
    }
}

/// Catalog entries are not pimped yet, so the pimped names mirror the originals.
fn meta_from(token: &TokenInfo, status: MetaStatus) -> Meta {
    Meta {
        id: token.id.clone(),
        name: token.name.clone(),
        ticker: token.ticker.clone(),
        pimped_name: Some(token.name.clone()),
        pimped_ticker: Some(token.ticker.clone()),
        description: token.description.clone(),
        status,
        market_cap: token.market_cap.clone(),
        volume_24h: token.volume_24h.clone(),
        price_change_24h_bps: token.price_change_24h_bps,
        contract_address: Some(token.contract_address.clone()),
        emoji: token.emoji.clone(),
    }
}
