mod logger;

use std::env;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use cosmwasm_std::Timestamp;
use log::{info, warn};
use migration_flow::address::shorten_address;
use migration_flow::amount::{
    format_price_change, format_token_amount, DEFAULT_SLIPPAGE_BPS, MOCK_CONVERSION_RATE,
    MOCK_WALLET_BALANCE,
};
use migration_flow::client::{DemoVaultClient, VaultClient};
use migration_flow::config::FlowConfig;
use migration_flow::countdown::TimeRemaining;
use migration_flow::flow::MigrationFlow;
use migration_flow::mock_data::MockDataProvider;
use migration_flow::session::{FlowDriver, Session};
use migration_vault_api::phase::MigrationPhase;
use tokio::runtime::Runtime;

const DEMO_WALLET_VAR: &str = "DEMO_WALLET";
const DEMO_AMOUNT_VAR: &str = "DEMO_AMOUNT";
const DEMO_SLIPPAGE_BPS_VAR: &str = "DEMO_SLIPPAGE_BPS";

const DEFAULT_DEMO_WALLET: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";
const DEFAULT_DEMO_AMOUNT: &str = "500";

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logger::enable_info_logger();
    let runtime = Runtime::new()?;

    runtime.block_on(run())
}

async fn run() -> anyhow::Result<()> {
    let config = FlowConfig::from_env();
    info!("{} | {}", config.site.name, config.site.tagline);
    info!(
        "RPC {} ({}), vault program {}",
        config.solana.rpc_endpoint(),
        config.solana.wallet_network(),
        shorten_address(&config.solana.vault_program_id, 4)
    );

    let now = Timestamp::from_seconds(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs());
    let data = MockDataProvider::new(now);
    log_vault_state(&data, now);

    let session = Session::new();
    let client = Arc::new(DemoVaultClient::new(&config.solana));
    let mut driver = FlowDriver::new(
        MigrationFlow::new(data.migration_window().phase, MOCK_WALLET_BALANCE),
        client.clone(),
        session.token(),
        config.solana.current_token_mint.clone(),
    )
    .with_slippage_bps(slippage_bps());

    let wallet = env::var(DEMO_WALLET_VAR).unwrap_or_else(|_| DEFAULT_DEMO_WALLET.to_string());
    driver.connect(&wallet)?;
    info!(
        "Connected {} holding {} {}",
        shorten_address(&wallet, 4),
        format_token_amount(driver.flow().balance(), 2),
        data.current_token().ticker
    );
    log_step(&driver);

    let over_balance = "15000";
    if let Err(e) = driver.deposit(over_balance).await {
        warn!("Deposit of {} rejected: {}", over_balance, e);
    }

    let amount = env::var(DEMO_AMOUNT_VAR).unwrap_or_else(|_| DEFAULT_DEMO_AMOUNT.to_string());
    let receipt = driver.deposit(&amount).await?;
    info!("Deposit confirmed: {}", shorten_address(&receipt.signature, 8));
    log_step(&driver);

    let estimate = driver
        .flow()
        .claim_estimate(MOCK_CONVERSION_RATE, config.solana.fee_bps);
    info!(
        "Expected claim: {} gross, {} fee, {} net",
        format_token_amount(estimate.gross, 2),
        format_token_amount(estimate.fee, 2),
        format_token_amount(estimate.net, 2)
    );

    for phase in [MigrationPhase::DepositsClosed, MigrationPhase::Migrating] {
        driver.set_phase(phase);
        info!("Phase is now: {}", phase.short_label());
    }

    if let Err(e) = driver.withdraw().await {
        warn!("Withdraw blocked: {}", e);
    }

    driver.advance();
    log_step(&driver);

    driver.set_phase(MigrationPhase::Completed);
    info!("Phase is now: {}", MigrationPhase::Completed.label());
    info!(
        "Estimated network fee: {} lamports",
        client.estimate_fee().await?
    );

    client.fail_next();
    if let Err(e) = driver.claim().await {
        warn!("{}: {}", driver.status().status_message(), e);
    }

    let receipt = driver.retry().await?;
    info!(
        "{} Claim signature {}",
        driver.status().status_message(),
        shorten_address(&receipt.signature, 8)
    );

    let status = driver.refresh_status().await?;
    info!(
        "Position: deposited {}, claimed {}",
        format_token_amount(status.deposited_amount, 2),
        format_token_amount(status.claimed_amount, 2)
    );

    driver.finish();
    log_step(&driver);

    Ok(())
}

fn slippage_bps() -> u16 {
    match env::var(DEMO_SLIPPAGE_BPS_VAR) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!(
                "Could not parse {} '{}' ({}), using {}",
                DEMO_SLIPPAGE_BPS_VAR, raw, e, DEFAULT_SLIPPAGE_BPS
            );
            DEFAULT_SLIPPAGE_BPS
        }),
        Err(_) => DEFAULT_SLIPPAGE_BPS,
    }
}

fn log_vault_state(data: &MockDataProvider, now: Timestamp) {
    let state = data.vault_state();
    let token = data.current_token();

    info!(
        "Current meta: {} {} ({})",
        token.name,
        token.ticker,
        token
            .price_change_24h_bps
            .map(format_price_change)
            .unwrap_or_default()
    );
    if let Some(next) = data.next_token() {
        info!("Next meta: {} {}", next.name, next.ticker);
    }

    let window = data.migration_window();
    info!(
        "{}: {} deposited by {} users",
        window.phase.label(),
        format_token_amount(state.total_deposited, 2),
        state.user_count
    );
    if let Some(close_at) = window.deposits_close_at {
        info!("Deposits close in {}", TimeRemaining::until(close_at, now));
    }

    for migration in data.past_migrations() {
        info!(
            "Past migration {}: {} -> {}, {} migrated by {} participants",
            migration.id,
            migration.from_token.ticker,
            migration.to_token.ticker,
            format_token_amount(migration.total_migrated, 2),
            migration.participant_count
        );
    }

    for meta in data.candidate_metas() {
        info!("Candidate meta: {} {}", meta.name, meta.ticker);
    }
}

fn log_step<C: VaultClient>(driver: &FlowDriver<C>) {
    let step = driver.flow().step();
    info!(
        "Step {}/4 {}: {}",
        step.ordinal(),
        step.title(),
        step.description()
    );
}
