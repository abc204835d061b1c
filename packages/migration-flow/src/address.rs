use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{FlowError, FlowResult};

// base58 without 0, O, I and l
const SOLANA_ADDRESS_PATTERN: &str = r"^[1-9A-HJ-NP-Za-km-z]{32,44}$";

fn solana_address_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(SOLANA_ADDRESS_PATTERN).expect("valid address pattern"))
}

/// Format check only: 32 to 44 base58 characters. Says nothing about whether
/// the key exists or is on the curve.
pub fn is_valid_solana_address(address: &str) -> bool {
    solana_address_regex().is_match(address)
}

/// Shortens an address to its first and last `chars` characters, e.g. `7xKX...9fQe`.
pub fn shorten_address(address: &str, chars: usize) -> String {
    if address.is_empty() {
        return String::new();
    }

    let symbols: Vec<char> = address.chars().collect();
    if symbols.len() <= chars * 2 {
        return address.to_string();
    }

    let head: String = symbols[..chars].iter().collect();
    let tail: String = symbols[symbols.len() - chars..].iter().collect();

    format!("{}...{}", head, tail)
}

/// A wallet address that passed [is_valid_solana_address].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn shortened(&self) -> String {
        shorten_address(&self.0, 4)
    }
}

impl FromStr for WalletAddress {
    type Err = FlowError;

    fn from_str(s: &str) -> FlowResult<Self> {
        let trimmed = s.trim();

        if !is_valid_solana_address(trimmed) {
            return Err(FlowError::InvalidAddress {
                address: s.to_string(),
            });
        }

        Ok(WalletAddress(trimmed.to_string()))
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for WalletAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYSTEM_PROGRAM: &str = "11111111111111111111111111111111";
    const TOKEN_PROGRAM: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

    #[test]
    fn accepts_real_addresses() {
        assert!(is_valid_solana_address(SYSTEM_PROGRAM));
        assert!(is_valid_solana_address(TOKEN_PROGRAM));
    }

    #[test]
    fn rejects_ambiguous_characters() {
        for bad in ['0', 'O', 'I', 'l'] {
            let address = format!("{}{}", bad, &SYSTEM_PROGRAM[1..]);
            assert!(!is_valid_solana_address(&address), "{}", address);
        }
    }

    #[test]
    fn rejects_out_of_range_lengths() {
        assert!(!is_valid_solana_address(&"1".repeat(31)));
        assert!(is_valid_solana_address(&"1".repeat(32)));
        assert!(is_valid_solana_address(&"1".repeat(44)));
        assert!(!is_valid_solana_address(&"1".repeat(45)));
        assert!(!is_valid_solana_address(""));
    }

    #[test]
    fn rejects_surrounding_garbage() {
        assert!(!is_valid_solana_address(&format!(" {}", TOKEN_PROGRAM)));
        assert!(!is_valid_solana_address(&format!("{}!", SYSTEM_PROGRAM)));
    }

    #[test]
    fn wallet_address_trims_input() {
        let wallet: WalletAddress = format!("  {}\n", TOKEN_PROGRAM).parse().unwrap();

        assert_eq!(wallet.as_str(), TOKEN_PROGRAM);
    }

    #[test]
    fn wallet_address_reports_invalid_input() {
        let result = "not-an-address".parse::<WalletAddress>();

        assert_eq!(
            result,
            Err(FlowError::InvalidAddress {
                address: "not-an-address".to_string()
            })
        );
    }

    #[test]
    fn shortens_addresses() {
        assert_eq!(shorten_address(TOKEN_PROGRAM, 4), "Toke...Q5DA");
        assert_eq!(shorten_address(TOKEN_PROGRAM, 6), "Tokenk...3VQ5DA");
        assert_eq!(shorten_address("", 4), "");
        assert_eq!(shorten_address("abcdef", 4), "abcdef");
    }
}
