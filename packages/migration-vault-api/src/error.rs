use cosmwasm_std::{OverflowError, StdError};
use cw_utils::PaymentError;
use thiserror::Error;

use crate::phase::MigrationPhase;

pub type VaultResult<T> = Result<T, VaultError>;

#[derive(Error, Debug, PartialEq)]
pub enum VaultError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Deposits are not allowed in phase {phase}")]
    DepositsNotAllowed { phase: MigrationPhase },

    #[error("Deposit window has already closed")]
    DepositWindowClosed,

    #[error("Withdrawals are not allowed in phase {phase}")]
    WithdrawalsNotAllowed { phase: MigrationPhase },

    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Insufficient deposited amount")]
    InsufficientPosition,

    #[error("User has no position in the vault")]
    NoPosition,

    #[error("Cannot move from phase {from} to {to}")]
    InvalidPhaseTransition {
        from: MigrationPhase,
        to: MigrationPhase,
    },

    #[error("Claims are not available in phase {phase}")]
    ClaimNotAvailable { phase: MigrationPhase },

    #[error("Nothing to claim")]
    NothingToClaim,

    #[error("Invalid fee of {fee_bps} bps, must be at most 10000")]
    InvalidFeeBps { fee_bps: u16 },

    #[error("Current and next denom must differ")]
    SameDenom,
}
