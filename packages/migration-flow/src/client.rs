use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cosmwasm_std::Decimal;
use log::{info, warn};
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::address::WalletAddress;
use crate::amount::{ClaimEstimate, MOCK_CONVERSION_RATE};
use crate::config::SolanaConfig;
use crate::error::FlowError::TransactionFailed;
use crate::error::FlowResult;

/// Typical network fee of a single transaction, in lamports.
pub const DEFAULT_TX_FEE_LAMPORTS: u64 = 5_000;

const SIGNATURE_LENGTH: usize = 88;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepositParams {
    pub old_token_mint: String,
    pub amount: Decimal,
    /// Maximum accepted slippage on the swap, 100 = 1%.
    pub slippage_bps: u16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    pub signature: String,
}

/// A user's position as seen by the client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VaultStatus {
    pub initialized: bool,
    pub deposited_amount: Decimal,
    pub old_token_mint: String,
    pub new_token_mint: String,
    pub swap_executed: bool,
    pub claimable: bool,
    pub claimed_amount: Decimal,
}

/// Transactions the wizard needs from a vault backend. Every call may take a
/// while and can be dropped half way when the session goes away.
#[async_trait]
pub trait VaultClient: Send + Sync {
    async fn submit_deposit(
        &self,
        wallet: &WalletAddress,
        params: &DepositParams,
    ) -> FlowResult<TxReceipt>;

    async fn withdraw(&self, wallet: &WalletAddress, amount: Decimal) -> FlowResult<TxReceipt>;

    async fn execute_swap(&self, wallet: &WalletAddress) -> FlowResult<TxReceipt>;

    async fn claim(&self, wallet: &WalletAddress) -> FlowResult<TxReceipt>;

    async fn get_status(&self, wallet: &WalletAddress) -> FlowResult<VaultStatus>;

    /// Network fee estimate for one transaction, in lamports.
    async fn estimate_fee(&self) -> FlowResult<u64> {
        Ok(DEFAULT_TX_FEE_LAMPORTS)
    }
}

#[async_trait]
impl<T: VaultClient + ?Sized> VaultClient for Arc<T> {
    async fn submit_deposit(
        &self,
        wallet: &WalletAddress,
        params: &DepositParams,
    ) -> FlowResult<TxReceipt> {
        (**self).submit_deposit(wallet, params).await
    }

    async fn withdraw(&self, wallet: &WalletAddress, amount: Decimal) -> FlowResult<TxReceipt> {
        (**self).withdraw(wallet, amount).await
    }

    async fn execute_swap(&self, wallet: &WalletAddress) -> FlowResult<TxReceipt> {
        (**self).execute_swap(wallet).await
    }

    async fn claim(&self, wallet: &WalletAddress) -> FlowResult<TxReceipt> {
        (**self).claim(wallet).await
    }

    async fn get_status(&self, wallet: &WalletAddress) -> FlowResult<VaultStatus> {
        (**self).get_status(wallet).await
    }

    async fn estimate_fee(&self) -> FlowResult<u64> {
        (**self).estimate_fee().await
    }
}

/// Signature returned by the demo client for every transaction.
pub fn placeholder_signature() -> String {
    format!("5{}", "x".repeat(SIGNATURE_LENGTH - 1))
}

/// Simulated confirmation time of each transaction kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DemoDelays {
    pub deposit: Duration,
    pub withdraw: Duration,
    pub swap: Duration,
    pub claim: Duration,
}

impl Default for DemoDelays {
    fn default() -> Self {
        DemoDelays {
            deposit: Duration::from_secs(2),
            withdraw: Duration::from_secs(2),
            swap: Duration::from_secs(3),
            claim: Duration::from_secs(2),
        }
    }
}

/// Client that never touches a network. It waits, keeps an in-memory position
/// and hands out placeholder signatures.
pub struct DemoVaultClient {
    delays: DemoDelays,
    fee_bps: u16,
    fail_next: AtomicBool,
    status: Mutex<VaultStatus>,
}

impl DemoVaultClient {
    pub fn new(config: &SolanaConfig) -> Self {
        DemoVaultClient {
            delays: DemoDelays::default(),
            fee_bps: config.fee_bps,
            fail_next: AtomicBool::new(false),
            status: Mutex::new(VaultStatus {
                old_token_mint: config.current_token_mint.clone(),
                new_token_mint: config.next_token_mint.clone(),
                ..VaultStatus::default()
            }),
        }
    }

    pub fn with_delays(mut self, delays: DemoDelays) -> Self {
        self.delays = delays;
        self
    }

    /// Makes the next transaction fail once it has "confirmed".
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    async fn confirm(&self, action: &str, delay: Duration) -> FlowResult<TxReceipt> {
        sleep(delay).await;

        if self.fail_next.swap(false, Ordering::SeqCst) {
            warn!("[DEMO] {} failed", action);
            return Err(TransactionFailed {
                msg: format!("simulated {} failure", action),
            });
        }

        Ok(TxReceipt {
            signature: placeholder_signature(),
        })
    }
}

#[async_trait]
impl VaultClient for DemoVaultClient {
    async fn submit_deposit(
        &self,
        wallet: &WalletAddress,
        params: &DepositParams,
    ) -> FlowResult<TxReceipt> {
        info!(
            "[DEMO] Depositing {} of {} for {} (slippage {} bps)",
            params.amount,
            params.old_token_mint,
            wallet.shortened(),
            params.slippage_bps
        );
        let receipt = self.confirm("deposit", self.delays.deposit).await?;

        let mut status = self.status.lock().await;
        status.initialized = true;
        status.old_token_mint = params.old_token_mint.clone();
        status.deposited_amount = status
            .deposited_amount
            .checked_add(params.amount)
            .unwrap_or(Decimal::MAX);

        Ok(receipt)
    }

    async fn withdraw(&self, wallet: &WalletAddress, amount: Decimal) -> FlowResult<TxReceipt> {
        info!("[DEMO] Withdrawing {} for {}", amount, wallet.shortened());
        let receipt = self.confirm("withdraw", self.delays.withdraw).await?;

        let mut status = self.status.lock().await;
        if status.swap_executed {
            // the old tokens were swapped, so the position settles in the next token
            settle_in_next_token(&mut status, self.fee_bps)?;
        } else {
            status.deposited_amount = status
                .deposited_amount
                .checked_sub(amount)
                .unwrap_or_default();
        }

        Ok(receipt)
    }

    async fn execute_swap(&self, wallet: &WalletAddress) -> FlowResult<TxReceipt> {
        info!("[DEMO] Executing swap for {}", wallet.shortened());
        let receipt = self.confirm("swap", self.delays.swap).await?;

        let mut status = self.status.lock().await;
        status.swap_executed = true;
        status.claimable = !status.deposited_amount.is_zero();

        Ok(receipt)
    }

    async fn claim(&self, wallet: &WalletAddress) -> FlowResult<TxReceipt> {
        info!("[DEMO] Claiming new tokens for {}", wallet.shortened());
        let receipt = self.confirm("claim", self.delays.claim).await?;

        settle_in_next_token(&mut *self.status.lock().await, self.fee_bps)?;

        Ok(receipt)
    }

    async fn get_status(&self, wallet: &WalletAddress) -> FlowResult<VaultStatus> {
        info!("[DEMO] Fetching vault status for {}", wallet.shortened());

        Ok(self.status.lock().await.clone())
    }
}

/// Pays out a position in the next token. Each position settles once.
fn settle_in_next_token(status: &mut VaultStatus, fee_bps: u16) -> FlowResult<()> {
    if status.deposited_amount.is_zero() || !status.claimed_amount.is_zero() {
        return Err(TransactionFailed {
            msg: "nothing to claim".to_string(),
        });
    }

    let estimate = ClaimEstimate::new(status.deposited_amount, MOCK_CONVERSION_RATE, fee_bps);
    status.swap_executed = true;
    status.claimable = false;
    status.claimed_amount = estimate.net;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::error::FlowError;

    const WALLET: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";

    fn wallet() -> WalletAddress {
        WALLET.parse().unwrap()
    }

    fn client() -> DemoVaultClient {
        DemoVaultClient::new(&SolanaConfig {
            fee_bps: 100,
            ..SolanaConfig::default()
        })
    }

    fn deposit_params(amount: &str) -> DepositParams {
        DepositParams {
            old_token_mint: "PENGxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx".to_string(),
            amount: Decimal::from_str(amount).unwrap(),
            slippage_bps: 100,
        }
    }

    #[test]
    fn placeholder_signature_shape() {
        let signature = placeholder_signature();

        assert_eq!(signature.len(), 88);
        assert!(signature.starts_with('5'));
        assert!(signature[1..].chars().all(|c| c == 'x'));
    }

    #[tokio::test(start_paused = true)]
    async fn deposit_waits_for_confirmation() {
        let client = client();
        let started = tokio::time::Instant::now();

        let receipt = client
            .submit_deposit(&wallet(), &deposit_params("500"))
            .await
            .unwrap();

        assert_eq!(receipt.signature, placeholder_signature());
        assert!(started.elapsed() >= Duration::from_secs(2));

        let status = client.get_status(&wallet()).await.unwrap();
        assert!(status.initialized);
        assert_eq!(status.deposited_amount, Decimal::from_str("500").unwrap());
        assert_eq!(status.old_token_mint, "PENGxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx");
    }

    #[tokio::test(start_paused = true)]
    async fn swap_then_claim_settles_position() {
        let client = client();
        client
            .submit_deposit(&wallet(), &deposit_params("1000"))
            .await
            .unwrap();

        client.execute_swap(&wallet()).await.unwrap();
        assert!(client.get_status(&wallet()).await.unwrap().claimable);

        client.claim(&wallet()).await.unwrap();
        let status = client.get_status(&wallet()).await.unwrap();

        assert!(status.swap_executed);
        assert!(!status.claimable);
        // 1000 * 1.02 minus 1%
        assert_eq!(status.claimed_amount, Decimal::from_str("1009.8").unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn withdraw_reduces_position() {
        let client = client();
        client
            .submit_deposit(&wallet(), &deposit_params("1000"))
            .await
            .unwrap();

        client
            .withdraw(&wallet(), Decimal::from_str("1000").unwrap())
            .await
            .unwrap();

        let status = client.get_status(&wallet()).await.unwrap();
        assert_eq!(status.deposited_amount, Decimal::zero());
    }

    #[tokio::test(start_paused = true)]
    async fn withdraw_after_swap_settles_once() {
        let client = client();
        client
            .submit_deposit(&wallet(), &deposit_params("1000"))
            .await
            .unwrap();
        client.execute_swap(&wallet()).await.unwrap();

        client
            .withdraw(&wallet(), Decimal::from_str("1000").unwrap())
            .await
            .unwrap();

        let status = client.get_status(&wallet()).await.unwrap();
        assert_eq!(status.deposited_amount, Decimal::from_str("1000").unwrap());
        assert_eq!(status.claimed_amount, Decimal::from_str("1009.8").unwrap());
        assert!(!status.claimable);

        let nothing_left = Err(FlowError::TransactionFailed {
            msg: "nothing to claim".to_string(),
        });
        assert_eq!(client.claim(&wallet()).await, nothing_left);
        assert_eq!(
            client
                .withdraw(&wallet(), Decimal::from_str("1000").unwrap())
                .await,
            nothing_left
        );
        assert_eq!(
            client.get_status(&wallet()).await.unwrap().claimed_amount,
            Decimal::from_str("1009.8").unwrap()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn fail_next_fails_exactly_once() {
        let client = client();
        client.fail_next();

        let result = client.submit_deposit(&wallet(), &deposit_params("500")).await;
        assert_eq!(
            result,
            Err(FlowError::TransactionFailed {
                msg: "simulated deposit failure".to_string()
            })
        );
        assert!(!client.get_status(&wallet()).await.unwrap().initialized);

        let result = client.submit_deposit(&wallet(), &deposit_params("500")).await;
        assert!(result.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn custom_delays() {
        let client = client().with_delays(DemoDelays {
            swap: Duration::from_millis(10),
            ..DemoDelays::default()
        });
        let started = tokio::time::Instant::now();

        client.execute_swap(&wallet()).await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn default_fee_estimate() {
        assert_eq!(client().estimate_fee().await, Ok(DEFAULT_TX_FEE_LAMPORTS));
    }
}
