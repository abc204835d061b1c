use cosmwasm_std::Decimal;
use log::debug;
use migration_vault_api::phase::{MigrationPhase, PhasePermissions};
use strum_macros::Display;

use crate::address::WalletAddress;
use crate::amount::{parse_amount, ClaimEstimate};
use crate::error::FlowError::{
    DepositsClosed, InsufficientBalance, NonPositiveAmount, WrongStep,
};
use crate::error::FlowResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FlowStep {
    ConnectWallet = 1,
    Deposit = 2,
    ManagePosition = 3,
    MigrationStatus = 4,
}

impl FlowStep {
    pub const FIRST: FlowStep = FlowStep::ConnectWallet;
    pub const LAST: FlowStep = FlowStep::MigrationStatus;

    pub const ALL: [FlowStep; 4] = [
        FlowStep::ConnectWallet,
        FlowStep::Deposit,
        FlowStep::ManagePosition,
        FlowStep::MigrationStatus,
    ];

    /// Position in the wizard, 1 to 4.
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<FlowStep> {
        match ordinal {
            1 => Some(FlowStep::ConnectWallet),
            2 => Some(FlowStep::Deposit),
            3 => Some(FlowStep::ManagePosition),
            4 => Some(FlowStep::MigrationStatus),
            _ => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FlowStep::ConnectWallet => "Connect Wallet",
            FlowStep::Deposit => "Deposit",
            FlowStep::ManagePosition => "Manage Position",
            FlowStep::MigrationStatus => "Migration Status",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FlowStep::ConnectWallet => "Connect your Solana wallet",
            FlowStep::Deposit => "Deposit current token",
            FlowStep::ManagePosition => "View & withdraw position",
            FlowStep::MigrationStatus => "Track migration & claim",
        }
    }

    /// The following step, staying on the last one.
    pub fn next(self) -> FlowStep {
        FlowStep::from_ordinal(self.ordinal() + 1).unwrap_or(FlowStep::LAST)
    }

    /// The preceding step, staying on the first one.
    pub fn previous(self) -> FlowStep {
        FlowStep::from_ordinal(self.ordinal() - 1).unwrap_or(FlowStep::FIRST)
    }
}

/// State of one wizard session: where the user is, what they deposited and
/// which actions the current phase permits.
#[derive(Clone, Debug, PartialEq)]
pub struct MigrationFlow {
    step: FlowStep,
    deposited: Decimal,
    wallet: Option<WalletAddress>,
    phase: MigrationPhase,
    balance: Decimal,
}

impl MigrationFlow {
    pub fn new(phase: MigrationPhase, balance: Decimal) -> Self {
        MigrationFlow {
            step: FlowStep::FIRST,
            deposited: Decimal::zero(),
            wallet: None,
            phase,
            balance,
        }
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    pub fn deposited_amount(&self) -> Decimal {
        self.deposited
    }

    pub fn wallet(&self) -> Option<&WalletAddress> {
        self.wallet.as_ref()
    }

    pub fn phase(&self) -> MigrationPhase {
        self.phase
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn advance(&mut self) -> FlowStep {
        let from = self.step;
        self.step = from.next();
        debug!("advance: {} -> {}", from, self.step);
        self.step
    }

    pub fn retreat(&mut self) -> FlowStep {
        let from = self.step;
        self.step = from.previous();
        debug!("retreat: {} -> {}", from, self.step);
        self.step
    }

    /// Checks a deposit against the balance and the phase gate without recording it.
    pub fn validate_deposit(&self, amount: Decimal) -> FlowResult<()> {
        if amount.is_zero() {
            return Err(NonPositiveAmount);
        }

        if amount > self.balance {
            return Err(InsufficientBalance {
                amount,
                balance: self.balance,
            });
        }

        if !self.phase.deposits_allowed() {
            return Err(DepositsClosed { phase: self.phase });
        }

        Ok(())
    }

    /// Stores the deposited amount and moves on to position management.
    /// A rejected deposit leaves the session untouched.
    pub fn record_deposit(&mut self, amount: Decimal) -> FlowResult<()> {
        self.validate_deposit(amount)?;

        self.deposited = amount;
        debug!("recorded deposit of {}", amount);
        self.advance();

        Ok(())
    }

    /// Clears the position after a confirmed withdrawal and steps back to the deposit screen.
    pub fn record_withdrawal(&mut self) -> Decimal {
        let withdrawn = std::mem::take(&mut self.deposited);
        debug!("recorded withdrawal of {}", withdrawn);
        self.retreat();

        withdrawn
    }

    pub fn ensure_step(&self, expected: FlowStep) -> FlowResult<()> {
        if self.step != expected {
            return Err(WrongStep {
                expected,
                step: self.step,
            });
        }

        Ok(())
    }

    /// Parses a raw amount field and records it.
    pub fn record_deposit_input(&mut self, input: &str) -> FlowResult<Decimal> {
        let amount = parse_amount(input)?;
        self.record_deposit(amount)?;

        Ok(amount)
    }

    /// Ends the session, back to a fresh wizard. The wallet stays connected.
    pub fn complete(&mut self) {
        debug!(
            "completing flow at {} with {} deposited",
            self.step, self.deposited
        );
        self.step = FlowStep::FIRST;
        self.deposited = Decimal::zero();
    }

    pub fn connect_wallet(&mut self, input: &str) -> FlowResult<&WalletAddress> {
        let wallet: WalletAddress = input.parse()?;
        debug!("connected wallet {}", wallet.shortened());

        Ok(&*self.wallet.insert(wallet))
    }

    pub fn disconnect_wallet(&mut self) {
        if let Some(wallet) = self.wallet.take() {
            debug!("disconnected wallet {}", wallet.shortened());
        }
    }

    pub fn set_phase(&mut self, phase: MigrationPhase) {
        if phase != self.phase {
            debug!("phase: {} -> {}", self.phase, phase);
            self.phase = phase;
        }
    }

    pub fn can_deposit(&self) -> bool {
        self.phase.deposits_allowed()
    }

    pub fn can_withdraw(&self) -> bool {
        self.phase.withdrawals_allowed()
    }

    /// New tokens can be claimed only once the migration is complete.
    pub fn can_claim(&self) -> bool {
        self.phase == MigrationPhase::Completed
    }

    pub fn permissions(&self) -> PhasePermissions {
        self.phase.into()
    }

    /// Expected payout of the current deposit in the next token.
    pub fn claim_estimate(&self, conversion_rate: Decimal, fee_bps: u16) -> ClaimEstimate {
        ClaimEstimate::new(self.deposited, conversion_rate, fee_bps)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::amount::{MOCK_CONVERSION_RATE, MOCK_WALLET_BALANCE};
    use crate::error::FlowError;

    const WALLET: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn flow_at(step: FlowStep, phase: MigrationPhase) -> MigrationFlow {
        let mut flow = MigrationFlow::new(phase, MOCK_WALLET_BALANCE);
        while flow.step() < step {
            flow.advance();
        }
        flow
    }

    #[test]
    fn step_ordinals_round_trip() {
        for step in FlowStep::ALL {
            assert_eq!(FlowStep::from_ordinal(step.ordinal()), Some(step));
        }
        assert_eq!(FlowStep::from_ordinal(0), None);
        assert_eq!(FlowStep::from_ordinal(5), None);
    }

    #[test]
    fn step_titles() {
        assert_eq!(FlowStep::ConnectWallet.title(), "Connect Wallet");
        assert_eq!(FlowStep::ManagePosition.description(), "View & withdraw position");
        assert_eq!(FlowStep::MigrationStatus.to_string(), "migration_status");
    }

    #[test]
    fn advance_is_clamped() {
        for step in FlowStep::ALL {
            let mut flow = flow_at(step, MigrationPhase::DepositsOpen);

            let expected = (step.ordinal() + 1).min(4);
            assert_eq!(flow.advance().ordinal(), expected);
        }
    }

    #[test]
    fn retreat_is_clamped() {
        for step in FlowStep::ALL {
            let mut flow = flow_at(step, MigrationPhase::DepositsOpen);

            let expected = (step.ordinal() - 1).max(1);
            assert_eq!(flow.retreat().ordinal(), expected);
        }
    }

    #[test]
    fn deposit_within_balance_advances() {
        let mut flow = flow_at(FlowStep::Deposit, MigrationPhase::DepositsOpen);

        let amount = flow.record_deposit_input("500").unwrap();

        assert_eq!(amount, dec("500"));
        assert_eq!(flow.step(), FlowStep::ManagePosition);
        assert_eq!(flow.deposited_amount(), dec("500"));
    }

    #[test]
    fn deposit_of_whole_balance_is_accepted() {
        let mut flow = flow_at(FlowStep::Deposit, MigrationPhase::DepositsOpen);

        flow.record_deposit(MOCK_WALLET_BALANCE).unwrap();

        assert_eq!(flow.deposited_amount(), MOCK_WALLET_BALANCE);
    }

    #[test]
    fn deposit_over_balance_is_rejected() {
        let mut flow = flow_at(FlowStep::Deposit, MigrationPhase::DepositsOpen);

        let result = flow.record_deposit_input("15000");

        assert_eq!(
            result,
            Err(FlowError::InsufficientBalance {
                amount: dec("15000"),
                balance: dec("10000"),
            })
        );
        assert_eq!(flow.step(), FlowStep::Deposit);
        assert_eq!(flow.deposited_amount(), Decimal::zero());
    }

    #[test]
    fn zero_deposit_is_rejected() {
        let mut flow = flow_at(FlowStep::Deposit, MigrationPhase::DepositsOpen);
        let before = flow.clone();

        assert_eq!(flow.record_deposit_input("0"), Err(FlowError::NonPositiveAmount));
        assert_eq!(flow.record_deposit_input("0.000"), Err(FlowError::NonPositiveAmount));
        assert_eq!(flow, before);
    }

    #[test]
    fn malformed_input_is_rejected() {
        let mut flow = flow_at(FlowStep::Deposit, MigrationPhase::DepositsOpen);
        let before = flow.clone();

        let result = flow.record_deposit_input("-5");

        assert!(matches!(result, Err(FlowError::InvalidAmount { .. })));
        assert_eq!(flow, before);
    }

    #[test]
    fn deposits_rejected_outside_open_phase() {
        for phase in [
            MigrationPhase::DepositsClosed,
            MigrationPhase::Migrating,
            MigrationPhase::Completed,
        ] {
            let mut flow = flow_at(FlowStep::Deposit, phase);

            assert!(!flow.can_deposit());
            assert_eq!(
                flow.record_deposit(dec("500")),
                Err(FlowError::DepositsClosed { phase })
            );
            assert_eq!(flow.step(), FlowStep::Deposit);
            assert_eq!(flow.deposited_amount(), Decimal::zero());
        }
    }

    #[test]
    fn deposit_carries_through_later_steps() {
        let mut flow = flow_at(FlowStep::Deposit, MigrationPhase::DepositsOpen);
        flow.record_deposit(dec("500")).unwrap();

        flow.set_phase(MigrationPhase::Migrating);
        flow.advance();
        assert_eq!(flow.step(), FlowStep::MigrationStatus);
        assert_eq!(flow.deposited_amount(), dec("500"));

        flow.retreat();
        assert_eq!(flow.deposited_amount(), dec("500"));
    }

    #[test]
    fn withdrawal_clears_position() {
        let mut flow = flow_at(FlowStep::Deposit, MigrationPhase::DepositsOpen);
        flow.record_deposit(dec("500")).unwrap();

        assert_eq!(flow.record_withdrawal(), dec("500"));
        assert_eq!(flow.step(), FlowStep::Deposit);
        assert_eq!(flow.deposited_amount(), Decimal::zero());
        assert_eq!(flow.claim_estimate(MOCK_CONVERSION_RATE, 0).net, Decimal::zero());
    }

    #[test]
    fn ensure_step_names_both_steps() {
        let flow = flow_at(FlowStep::MigrationStatus, MigrationPhase::Completed);

        assert_eq!(flow.ensure_step(FlowStep::MigrationStatus), Ok(()));
        assert_eq!(
            flow.ensure_step(FlowStep::ManagePosition),
            Err(FlowError::WrongStep {
                expected: FlowStep::ManagePosition,
                step: FlowStep::MigrationStatus,
            })
        );
    }

    #[test]
    fn complete_resets_session() {
        let mut flow = flow_at(FlowStep::Deposit, MigrationPhase::DepositsOpen);
        flow.connect_wallet(WALLET).unwrap();
        flow.record_deposit(dec("500")).unwrap();
        flow.advance();

        flow.complete();

        assert_eq!(flow.step(), FlowStep::ConnectWallet);
        assert_eq!(flow.deposited_amount(), Decimal::zero());
        assert_eq!(flow.wallet().map(|w| w.as_str()), Some(WALLET));
    }

    #[test]
    fn withdrawals_locked_while_migrating() {
        let flow = flow_at(FlowStep::ManagePosition, MigrationPhase::Migrating);

        assert!(!flow.can_withdraw());
        assert!(!flow.permissions().withdrawals_allowed);
        assert_eq!(flow.permissions().label, "Migration In Progress");
    }

    #[test]
    fn withdrawals_allowed_in_other_phases() {
        for phase in [
            MigrationPhase::DepositsOpen,
            MigrationPhase::DepositsClosed,
            MigrationPhase::Completed,
        ] {
            assert!(MigrationFlow::new(phase, MOCK_WALLET_BALANCE).can_withdraw());
        }
    }

    #[test]
    fn claims_only_when_completed() {
        for phase in MigrationPhase::ALL {
            let flow = MigrationFlow::new(phase, MOCK_WALLET_BALANCE);
            assert_eq!(flow.can_claim(), phase == MigrationPhase::Completed);
        }
    }

    #[test]
    fn wallet_connection() {
        let mut flow = MigrationFlow::new(MigrationPhase::DepositsOpen, MOCK_WALLET_BALANCE);

        assert!(matches!(
            flow.connect_wallet("0OIl"),
            Err(FlowError::InvalidAddress { .. })
        ));
        assert_eq!(flow.wallet(), None);

        flow.connect_wallet(WALLET).unwrap();
        assert_eq!(flow.step(), FlowStep::ConnectWallet);
        assert_eq!(flow.wallet().map(|w| w.shortened()), Some("7xKX...gAsU".to_string()));

        flow.disconnect_wallet();
        assert_eq!(flow.wallet(), None);
    }

    #[test]
    fn claim_estimate_uses_deposit() {
        let mut flow = flow_at(FlowStep::Deposit, MigrationPhase::DepositsOpen);
        flow.record_deposit(dec("1000")).unwrap();

        let estimate = flow.claim_estimate(MOCK_CONVERSION_RATE, 100);

        assert_eq!(estimate.gross, dec("1020"));
        assert_eq!(estimate.fee, dec("10.2"));
        assert_eq!(estimate.net, dec("1009.8"));
    }
}
