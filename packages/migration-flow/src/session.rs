use std::future::Future;

use cosmwasm_std::Decimal;
use log::{debug, info, warn};
use migration_vault_api::phase::MigrationPhase;
use strum_macros::Display;
use tokio::sync::watch;

use crate::address::WalletAddress;
use crate::amount::{parse_amount, DEFAULT_SLIPPAGE_BPS};
use crate::client::{DepositParams, TxReceipt, VaultClient, VaultStatus};
use crate::error::FlowError::{
    Cancelled, ClaimUnavailable, NonPositiveAmount, NothingToRetry, WalletNotConnected,
    WithdrawalsLocked,
};
use crate::error::{FlowError, FlowResult};
use crate::flow::{FlowStep, MigrationFlow};

/// Owner side of a wizard session. Cancelling it, or dropping it, aborts
/// every transaction still waiting on a [CancelToken] handed out by it.
#[derive(Debug)]
pub struct Session {
    cancelled: watch::Sender<bool>,
}

impl Session {
    pub fn new() -> Self {
        let (cancelled, _) = watch::channel(false);
        Session { cancelled }
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            cancelled: self.cancelled.subscribe(),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.send_replace(true);
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

#[derive(Clone, Debug)]
pub struct CancelToken {
    cancelled: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow() || self.cancelled.has_changed().is_err()
    }

    /// Resolves once the session is cancelled or gone.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.cancelled.borrow_and_update() {
                return;
            }
            if self.cancelled.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Runs `call` unless the session goes away first, in which case the call is dropped.
async fn until_cancelled<T, F>(token: &CancelToken, call: F) -> FlowResult<T>
where
    F: Future<Output = FlowResult<T>>,
{
    let mut token = token.clone();

    tokio::select! {
        biased;
        _ = token.cancelled() => Err(Cancelled),
        result = call => result,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TxStatus {
    Idle,
    Depositing,
    Withdrawing,
    Swapping,
    Claiming,
    Completed,
    Error,
}

impl TxStatus {
    pub fn status_message(self) -> &'static str {
        match self {
            TxStatus::Idle => "Ready to execute migration",
            TxStatus::Depositing => "Depositing tokens to vault...",
            TxStatus::Withdrawing => "Withdrawing your position...",
            TxStatus::Swapping => "Executing swap on-chain...",
            TxStatus::Claiming => "Claiming your new tokens...",
            TxStatus::Completed => "Migration complete!",
            TxStatus::Error => "Transaction failed",
        }
    }

    /// True while a transaction is waiting for confirmation.
    pub fn is_processing(self) -> bool {
        match self {
            TxStatus::Depositing
            | TxStatus::Withdrawing
            | TxStatus::Swapping
            | TxStatus::Claiming => true,
            TxStatus::Idle | TxStatus::Completed | TxStatus::Error => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum MigrationStage {
    Deposit,
    Swap,
    Claim,
}

/// An action that failed and can be run again with [FlowDriver::retry].
#[derive(Clone, Copy, Debug, PartialEq)]
enum FailedAction {
    Deposit(Decimal),
    Withdraw,
    Claim,
    Migration {
        amount: Decimal,
        stage: MigrationStage,
    },
}

/// Drives a [MigrationFlow] through real transactions on an injected client.
/// The controller is only updated after a transaction confirms.
pub struct FlowDriver<C: VaultClient> {
    flow: MigrationFlow,
    client: C,
    cancel: CancelToken,
    token_mint: String,
    slippage_bps: u16,
    status: TxStatus,
    last_error: Option<FlowError>,
    failed_action: Option<FailedAction>,
    last_signature: Option<String>,
}

impl<C: VaultClient> FlowDriver<C> {
    pub fn new(
        flow: MigrationFlow,
        client: C,
        cancel: CancelToken,
        token_mint: impl Into<String>,
    ) -> Self {
        FlowDriver {
            flow,
            client,
            cancel,
            token_mint: token_mint.into(),
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
            status: TxStatus::Idle,
            last_error: None,
            failed_action: None,
            last_signature: None,
        }
    }

    pub fn with_slippage_bps(mut self, slippage_bps: u16) -> Self {
        self.slippage_bps = slippage_bps;
        self
    }

    pub fn flow(&self) -> &MigrationFlow {
        &self.flow
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn status(&self) -> TxStatus {
        self.status
    }

    pub fn last_error(&self) -> Option<&FlowError> {
        self.last_error.as_ref()
    }

    pub fn last_signature(&self) -> Option<&str> {
        self.last_signature.as_deref()
    }

    pub fn can_retry(&self) -> bool {
        self.failed_action.is_some()
    }

    pub fn set_phase(&mut self, phase: MigrationPhase) {
        self.flow.set_phase(phase);
    }

    pub fn advance(&mut self) -> FlowStep {
        self.flow.advance()
    }

    pub fn retreat(&mut self) -> FlowStep {
        self.flow.retreat()
    }

    /// Connects the wallet and moves past the connect step.
    pub fn connect(&mut self, address: &str) -> FlowResult<()> {
        self.flow.connect_wallet(address)?;

        if self.flow.step() == FlowStep::ConnectWallet {
            self.flow.advance();
        }

        Ok(())
    }

    /// Validates the amount field, submits the deposit and records it once
    /// confirmed. Only the deposit screen submits deposits.
    pub async fn deposit(&mut self, input: &str) -> FlowResult<TxReceipt> {
        let amount = parse_amount(input)?;
        self.deposit_amount(amount).await
    }

    /// Withdraws the whole position from the position screen and steps back
    /// to the deposit screen.
    pub async fn withdraw(&mut self) -> FlowResult<TxReceipt> {
        let wallet = self.wallet()?;
        if !self.flow.can_withdraw() {
            return Err(WithdrawalsLocked {
                phase: self.flow.phase(),
            });
        }

        let amount = self.flow.deposited_amount();
        if amount.is_zero() {
            return Err(NonPositiveAmount);
        }
        self.flow.ensure_step(FlowStep::ManagePosition)?;

        self.status = TxStatus::Withdrawing;
        let result = until_cancelled(&self.cancel, self.client.withdraw(&wallet, amount)).await;
        let receipt = self.settle(result, FailedAction::Withdraw)?;

        self.status = TxStatus::Idle;
        self.flow.record_withdrawal();

        Ok(receipt)
    }

    /// Claims the next token. Only possible once the migration is completed.
    pub async fn claim(&mut self) -> FlowResult<TxReceipt> {
        let wallet = self.wallet()?;
        if !self.flow.can_claim() {
            return Err(ClaimUnavailable {
                phase: self.flow.phase(),
            });
        }

        self.status = TxStatus::Claiming;
        let result = until_cancelled(&self.cancel, self.client.claim(&wallet)).await;
        let receipt = self.settle(result, FailedAction::Claim)?;

        self.status = TxStatus::Completed;

        Ok(receipt)
    }

    /// Deposits, swaps and claims in one go, ending on the status step.
    pub async fn execute_migration(&mut self, input: &str) -> FlowResult<TxReceipt> {
        let amount = parse_amount(input)?;
        self.run_migration(amount, MigrationStage::Deposit).await
    }

    /// Runs the last failed action again. A failed migration resumes at the
    /// stage that failed.
    pub async fn retry(&mut self) -> FlowResult<TxReceipt> {
        let action = self.failed_action.ok_or(NothingToRetry)?;
        info!("Retrying {:?}", action);

        match action {
            FailedAction::Deposit(amount) => self.deposit_amount(amount).await,
            FailedAction::Withdraw => self.withdraw().await,
            FailedAction::Claim => self.claim().await,
            FailedAction::Migration { amount, stage } => self.run_migration(amount, stage).await,
        }
    }

    /// Current on-chain view of the connected wallet's position.
    pub async fn refresh_status(&self) -> FlowResult<VaultStatus> {
        let wallet = self.wallet()?;
        until_cancelled(&self.cancel, self.client.get_status(&wallet)).await
    }

    /// Closes the wizard and starts over at the connect step.
    pub fn finish(&mut self) {
        self.flow.complete();
        self.status = TxStatus::Idle;
        self.last_error = None;
        self.failed_action = None;
        self.last_signature = None;
    }

    async fn deposit_amount(&mut self, amount: Decimal) -> FlowResult<TxReceipt> {
        let wallet = self.wallet()?;
        self.flow.ensure_step(FlowStep::Deposit)?;
        self.flow.validate_deposit(amount)?;

        self.status = TxStatus::Depositing;
        let params = self.deposit_params(amount);
        let result =
            until_cancelled(&self.cancel, self.client.submit_deposit(&wallet, &params)).await;
        let receipt = self.settle(result, FailedAction::Deposit(amount))?;

        self.status = TxStatus::Idle;
        self.flow.record_deposit(amount)?;

        Ok(receipt)
    }

    async fn run_migration(
        &mut self,
        amount: Decimal,
        from: MigrationStage,
    ) -> FlowResult<TxReceipt> {
        let wallet = self.wallet()?;
        let failed = move |stage| FailedAction::Migration { amount, stage };

        if from <= MigrationStage::Deposit {
            self.flow.ensure_step(FlowStep::Deposit)?;
            self.flow.validate_deposit(amount)?;

            self.status = TxStatus::Depositing;
            let params = self.deposit_params(amount);
            let result =
                until_cancelled(&self.cancel, self.client.submit_deposit(&wallet, &params)).await;
            self.settle(result, failed(MigrationStage::Deposit))?;
            self.flow.record_deposit(amount)?;
        }

        if from <= MigrationStage::Swap {
            self.status = TxStatus::Swapping;
            let result = until_cancelled(&self.cancel, self.client.execute_swap(&wallet)).await;
            self.settle(result, failed(MigrationStage::Swap))?;
            self.flow.set_phase(MigrationPhase::Completed);
        }

        self.status = TxStatus::Claiming;
        let result = until_cancelled(&self.cancel, self.client.claim(&wallet)).await;
        let receipt = self.settle(result, failed(MigrationStage::Claim))?;

        self.status = TxStatus::Completed;
        if self.flow.step() < FlowStep::MigrationStatus {
            self.flow.advance();
        }

        Ok(receipt)
    }

    fn wallet(&self) -> FlowResult<WalletAddress> {
        self.flow.wallet().cloned().ok_or(WalletNotConnected)
    }

    fn deposit_params(&self, amount: Decimal) -> DepositParams {
        DepositParams {
            old_token_mint: self.token_mint.clone(),
            amount,
            slippage_bps: self.slippage_bps,
        }
    }

    /// Records the outcome of a transaction. Failures are kept for [FlowDriver::retry],
    /// a cancelled call is dropped without a trace.
    fn settle(
        &mut self,
        result: FlowResult<TxReceipt>,
        action: FailedAction,
    ) -> FlowResult<TxReceipt> {
        match result {
            Ok(receipt) => {
                debug!("confirmed {:?}: {}", action, receipt.signature);
                self.last_error = None;
                self.failed_action = None;
                self.last_signature = Some(receipt.signature.clone());
                Ok(receipt)
            }
            Err(Cancelled) => {
                info!("Session closed, dropping {:?}", action);
                self.status = TxStatus::Idle;
                Err(Cancelled)
            }
            Err(e) => {
                warn!("{:?} failed: {}", action, e);
                self.status = TxStatus::Error;
                self.last_error = Some(e.clone());
                self.failed_action = Some(action);
                Err(e)
            }
        }
    }
}
