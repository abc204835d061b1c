use cosmwasm_std::{Addr, Timestamp};
use migration_vault_api::api::MigrationWindow;
use migration_vault_api::error::VaultError::{
    DepositWindowClosed, DepositsNotAllowed, InvalidFeeBps, InvalidPhaseTransition, SameDenom,
    Unauthorized, WithdrawalsNotAllowed,
};
use migration_vault_api::error::VaultResult;
use migration_vault_api::phase::MigrationPhase;

use crate::state::Config;

const MAX_FEE_BPS: u16 = 10_000;

pub fn validate_instantiate(current_denom: &str, next_denom: &str, fee_bps: u16) -> VaultResult<()> {
    if fee_bps > MAX_FEE_BPS {
        return Err(InvalidFeeBps { fee_bps });
    }

    if current_denom == next_denom {
        return Err(SameDenom);
    }

    Ok(())
}

pub fn admin_caller_only(config: &Config, sender: &Addr) -> VaultResult<()> {
    if &config.admin != sender {
        return Err(Unauthorized);
    }

    Ok(())
}

pub fn validate_deposit_allowed(window: &MigrationWindow, now: Timestamp) -> VaultResult<()> {
    if !window.phase.deposits_allowed() {
        return Err(DepositsNotAllowed {
            phase: window.phase,
        });
    }

    // deposits stop at the scheduled close time even before the admin closes them
    match window.deposits_close_at {
        Some(close_at) if now >= close_at => Err(DepositWindowClosed),
        _ => Ok(()),
    }
}

pub fn validate_withdrawal_allowed(window: &MigrationWindow) -> VaultResult<()> {
    if !window.phase.withdrawals_allowed() {
        return Err(WithdrawalsNotAllowed {
            phase: window.phase,
        });
    }

    Ok(())
}

/// Phases only ever move one step forward.
pub fn validate_transition(from: MigrationPhase, to: MigrationPhase) -> VaultResult<()> {
    if from.next() != Some(to) {
        return Err(InvalidPhaseTransition { from, to });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_above_100_percent_is_rejected() {
        assert_eq!(
            validate_instantiate("uold", "unew", 10_001),
            Err(InvalidFeeBps { fee_bps: 10_001 })
        );
        assert_eq!(validate_instantiate("uold", "unew", 10_000), Ok(()));
    }

    #[test]
    fn same_denoms_are_rejected() {
        assert_eq!(validate_instantiate("uold", "uold", 0), Err(SameDenom));
    }

    #[test]
    fn transitions_cannot_skip_phases() {
        assert_eq!(
            validate_transition(MigrationPhase::DepositsOpen, MigrationPhase::Migrating),
            Err(InvalidPhaseTransition {
                from: MigrationPhase::DepositsOpen,
                to: MigrationPhase::Migrating,
            })
        );
        assert_eq!(
            validate_transition(MigrationPhase::Completed, MigrationPhase::DepositsOpen),
            Err(InvalidPhaseTransition {
                from: MigrationPhase::Completed,
                to: MigrationPhase::DepositsOpen,
            })
        );
        assert_eq!(
            validate_transition(MigrationPhase::DepositsOpen, MigrationPhase::DepositsClosed),
            Ok(())
        );
    }

    #[test]
    fn deposits_stop_at_scheduled_close() {
        let mut window = MigrationWindow::new(MigrationPhase::DepositsOpen);
        window.deposits_close_at = Some(Timestamp::from_seconds(100));

        assert_eq!(
            validate_deposit_allowed(&window, Timestamp::from_seconds(99)),
            Ok(())
        );
        assert_eq!(
            validate_deposit_allowed(&window, Timestamp::from_seconds(100)),
            Err(DepositWindowClosed)
        );
    }
}
