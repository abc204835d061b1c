use std::str::FromStr;
use std::sync::OnceLock;

use cosmwasm_std::{Decimal, Uint128, Uint256};
use regex::Regex;

use crate::error::{FlowError, FlowResult};

/// Balance shown for a freshly connected demo wallet.
pub const MOCK_WALLET_BALANCE: Decimal = Decimal::raw(10_000_000_000_000_000_000_000);

/// Next-token units received per deposited unit in the demo, i.e. 1.02.
pub const MOCK_CONVERSION_RATE: Decimal = Decimal::raw(1_020_000_000_000_000_000);

pub const DEFAULT_SLIPPAGE_BPS: u16 = 100;

pub const BPS_DENOMINATOR: u16 = 10_000;

const AMOUNT_INPUT_PATTERN: &str = r"^[0-9]*\.?[0-9]*$";

const DECIMAL_PLACES: u32 = 18;

fn amount_input_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(AMOUNT_INPUT_PATTERN).expect("valid amount pattern"))
}

/// Keystroke filter for the amount field: digits with at most one dot.
/// Partial entries such as `""`, `"."` or `"12."` pass.
pub fn accepts_amount_input(input: &str) -> bool {
    amount_input_regex().is_match(input)
}

/// Parses a user-entered amount. Accepts `.5` and `5.` as well as plain numbers.
pub fn parse_amount(input: &str) -> FlowResult<Decimal> {
    let invalid = || FlowError::InvalidAmount {
        input: input.to_string(),
    };

    let trimmed = input.trim();
    if !accepts_amount_input(trimmed) || trimmed.is_empty() || trimmed == "." {
        return Err(invalid());
    }

    let normalized = match (trimmed.starts_with('.'), trimmed.strip_suffix('.')) {
        (_, Some(whole)) => whole.to_string(),
        (true, None) => format!("0{}", trimmed),
        (false, None) => trimmed.to_string(),
    };

    Decimal::from_str(&normalized).map_err(|_| invalid())
}

/// Formats a token amount with a `K`, `M` or `B` suffix and a fixed number of
/// decimals, rounding half up. `1_247_532.45` with 2 decimals becomes `1.25M`.
pub fn format_token_amount(amount: Decimal, decimals: u32) -> String {
    let decimals = decimals.min(DECIMAL_PLACES);

    let (exponent, suffix) = if amount >= Decimal::from_ratio(1_000_000_000u128, 1u128) {
        (9, "B")
    } else if amount >= Decimal::from_ratio(1_000_000u128, 1u128) {
        (6, "M")
    } else if amount >= Decimal::from_ratio(1_000u128, 1u128) {
        (3, "K")
    } else {
        (0, "")
    };

    let divisor = ten_pow(DECIMAL_PLACES + exponent);
    let scaled = Uint256::from(amount.atomics()) * ten_pow(decimals);
    let rounded = (scaled + divisor / Uint256::from(2u8)) / divisor;

    let unit = ten_pow(decimals);
    let whole = rounded / unit;

    if decimals == 0 {
        return format!("{}{}", whole, suffix);
    }

    let fraction = (rounded % unit).to_string();
    format!(
        "{}.{:0>width$}{}",
        whole,
        fraction,
        suffix,
        width = decimals as usize
    )
}

/// Formats a signed basis point change as a percentage, e.g. `+15.60%`.
pub fn format_price_change(bps: i32) -> String {
    let sign = if bps < 0 { "-" } else { "+" };
    let abs = bps.unsigned_abs();

    format!("{}{}.{:02}%", sign, abs / 100, abs % 100)
}

fn ten_pow(exponent: u32) -> Uint256 {
    (0..exponent).fold(Uint256::from(1u8), |acc, _| acc * Uint256::from(10u8))
}

/// What a position is expected to yield in the next token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClaimEstimate {
    pub gross: Decimal,
    pub fee: Decimal,
    pub net: Decimal,
}

impl ClaimEstimate {
    pub fn new(deposited: Decimal, conversion_rate: Decimal, fee_bps: u16) -> Self {
        let gross = deposited
            .checked_mul(conversion_rate)
            .unwrap_or(Decimal::MAX);
        let fee_rate = Decimal::from_ratio(
            Uint128::from(fee_bps.min(BPS_DENOMINATOR)),
            Uint128::from(BPS_DENOMINATOR),
        );
        let fee = gross.checked_mul(fee_rate).unwrap_or(gross);
        let net = gross.checked_sub(fee).unwrap_or_default();

        ClaimEstimate { gross, fee, net }
    }
}
