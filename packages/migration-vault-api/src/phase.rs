use std::str::FromStr;

use cosmwasm_schema::cw_serde;
use strum_macros::{Display, EnumString};

/// Returned by [phase_label] for anything that does not parse as a [MigrationPhase].
pub const UNKNOWN_PHASE_LABEL: &str = "Unknown";

#[derive(Copy, Eq, Hash, Display, EnumString)]
#[cw_serde]
#[strum(serialize_all = "snake_case")]
/// Stage of the migration lifecycle. Exactly one is active at a time.
pub enum MigrationPhase {
    /// Users may deposit the current token.
    DepositsOpen,
    /// Deposit window is over, waiting for the swap to start.
    DepositsClosed,
    /// Pooled deposits are being swapped into the next token.
    Migrating,
    /// Swap is done, positions can be claimed in the next token.
    Completed,
}

impl MigrationPhase {
    /// All phases, in lifecycle order.
    pub const ALL: [MigrationPhase; 4] = [
        MigrationPhase::DepositsOpen,
        MigrationPhase::DepositsClosed,
        MigrationPhase::Migrating,
        MigrationPhase::Completed,
    ];

    pub fn deposits_allowed(self) -> bool {
        match self {
            MigrationPhase::DepositsOpen => true,
            MigrationPhase::DepositsClosed
            | MigrationPhase::Migrating
            | MigrationPhase::Completed => false,
        }
    }

    /// Positions are locked only while the swap is running.
    pub fn withdrawals_allowed(self) -> bool {
        match self {
            MigrationPhase::Migrating => false,
            MigrationPhase::DepositsOpen
            | MigrationPhase::DepositsClosed
            | MigrationPhase::Completed => true,
        }
    }

    /// Human-readable status, as shown next to a position.
    pub fn label(self) -> &'static str {
        match self {
            MigrationPhase::DepositsOpen => "Deposits Open",
            MigrationPhase::DepositsClosed => "Deposits Closed - Waiting for Migration",
            MigrationPhase::Migrating => "Migration In Progress",
            MigrationPhase::Completed => "Migration Complete - Claim Available",
        }
    }

    /// Compact status used in banners and badges.
    pub fn short_label(self) -> &'static str {
        match self {
            MigrationPhase::DepositsOpen => "Deposits Open",
            MigrationPhase::DepositsClosed => "Deposits Closed - Waiting",
            MigrationPhase::Migrating => "Migration In Progress",
            MigrationPhase::Completed => "Migration Complete",
        }
    }

    /// The phase that follows this one, or None once the migration is completed.
    pub fn next(self) -> Option<MigrationPhase> {
        match self {
            MigrationPhase::DepositsOpen => Some(MigrationPhase::DepositsClosed),
            MigrationPhase::DepositsClosed => Some(MigrationPhase::Migrating),
            MigrationPhase::Migrating => Some(MigrationPhase::Completed),
            MigrationPhase::Completed => None,
        }
    }
}

pub fn deposits_allowed(phase: MigrationPhase) -> bool {
    phase.deposits_allowed()
}

pub fn withdrawals_allowed(phase: MigrationPhase) -> bool {
    phase.withdrawals_allowed()
}

/// Label for a raw phase value, e.g. one read from an untyped source.
/// Never fails: unrecognized values map to [UNKNOWN_PHASE_LABEL].
pub fn phase_label(raw: &str) -> &'static str {
    MigrationPhase::from_str(raw)
        .map(MigrationPhase::label)
        .unwrap_or(UNKNOWN_PHASE_LABEL)
}

#[cw_serde]
/// Everything the UI needs to enable or disable actions for a phase.
pub struct PhasePermissions {
    pub phase: MigrationPhase,
    pub deposits_allowed: bool,
    pub withdrawals_allowed: bool,
    pub label: String,
}

impl From<MigrationPhase> for PhasePermissions {
    fn from(phase: MigrationPhase) -> Self {
        PhasePermissions {
            phase,
            deposits_allowed: phase.deposits_allowed(),
            withdrawals_allowed: phase.withdrawals_allowed(),
            label: phase.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use cosmwasm_std::{from_json, to_json_binary};

    use super::*;

    #[test]
    fn deposits_allowed_only_while_open() {
        for phase in MigrationPhase::ALL {
            assert_eq!(
                deposits_allowed(phase),
                phase == MigrationPhase::DepositsOpen,
                "{}",
                phase
            );
        }
    }

    #[test]
    fn withdrawals_allowed_except_while_migrating() {
        for phase in MigrationPhase::ALL {
            assert_eq!(
                withdrawals_allowed(phase),
                phase != MigrationPhase::Migrating,
                "{}",
                phase
            );
        }
    }

    #[test]
    fn gate_is_idempotent() {
        for phase in MigrationPhase::ALL {
            assert_eq!(
                PhasePermissions::from(phase),
                PhasePermissions::from(phase)
            );
        }
    }

    #[test]
    fn labels_for_known_phases() {
        assert_eq!(phase_label("deposits_open"), "Deposits Open");
        assert_eq!(
            phase_label("deposits_closed"),
            "Deposits Closed - Waiting for Migration"
        );
        assert_eq!(phase_label("migrating"), "Migration In Progress");
        assert_eq!(
            phase_label("completed"),
            "Migration Complete - Claim Available"
        );
    }

    #[test]
    fn unrecognized_phase_label_falls_back_to_unknown() {
        assert_eq!(phase_label("paused"), UNKNOWN_PHASE_LABEL);
        assert_eq!(phase_label(""), UNKNOWN_PHASE_LABEL);
        assert_eq!(phase_label("Deposits_Open"), UNKNOWN_PHASE_LABEL);
    }

    #[test]
    fn next_walks_the_lifecycle_once() {
        let mut phase = MigrationPhase::DepositsOpen;
        let mut visited = vec![phase];
        while let Some(next) = phase.next() {
            visited.push(next);
            phase = next;
        }

        assert_eq!(visited, MigrationPhase::ALL.to_vec());
    }

    #[test]
    fn display_and_serde_use_the_same_names() {
        for phase in MigrationPhase::ALL {
            let json = to_json_binary(&phase).unwrap();
            assert_eq!(json.to_vec(), format!("\"{}\"", phase).into_bytes());

            let parsed: MigrationPhase = from_json(&json).unwrap();
            assert_eq!(parsed, phase);
        }
    }

    #[test]
    fn migrating_permissions_lock_withdrawals() {
        let permissions = PhasePermissions::from(MigrationPhase::Migrating);

        assert!(!permissions.deposits_allowed);
        assert!(!permissions.withdrawals_allowed);
        assert_eq!(permissions.label, "Migration In Progress");
    }
}
