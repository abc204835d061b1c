use cosmwasm_std::Decimal;
use migration_vault_api::phase::MigrationPhase;
use thiserror::Error;

use crate::flow::FlowStep;

pub type FlowResult<T> = Result<T, FlowError>;

/// Everything that can go wrong in a vault session. None of these are fatal:
/// the session stays usable and its state is left untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    #[error("Invalid Solana address")]
    InvalidAddress { address: String },

    #[error("Invalid amount: {input}")]
    InvalidAmount { input: String },

    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    #[error("Amount {amount} exceeds available balance {balance}")]
    InsufficientBalance { amount: Decimal, balance: Decimal },

    #[error("Deposits are closed ({phase})")]
    DepositsClosed { phase: MigrationPhase },

    #[error("Withdrawals are locked ({phase})")]
    WithdrawalsLocked { phase: MigrationPhase },

    #[error("Nothing to claim yet ({phase})")]
    ClaimUnavailable { phase: MigrationPhase },

    #[error("Only possible on the {expected} step, not on {step}")]
    WrongStep { expected: FlowStep, step: FlowStep },

    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Transaction failed: {msg}")]
    TransactionFailed { msg: String },

    #[error("Session was closed before the transaction finished")]
    Cancelled,

    #[error("No failed action to retry")]
    NothingToRetry,
}
