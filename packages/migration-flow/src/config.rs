use std::env;
use std::str::FromStr;

use log::warn;
use strum_macros::{Display, EnumString};

use crate::amount::BPS_DENOMINATOR;

pub const SITE_NAME_VAR: &str = "SITE_NAME";
pub const SITE_URL_VAR: &str = "SITE_URL";
pub const SOLANA_RPC_VAR: &str = "SOLANA_RPC";
pub const SOLANA_NETWORK_VAR: &str = "SOLANA_NETWORK";
pub const VAULT_PROGRAM_ID_VAR: &str = "VAULT_PROGRAM_ID";
pub const CURRENT_TOKEN_MINT_VAR: &str = "CURRENT_TOKEN_MINT";
pub const NEXT_TOKEN_MINT_VAR: &str = "NEXT_TOKEN_MINT";
pub const FEE_BPS_VAR: &str = "FEE_BPS";

pub const DEFAULT_SITE_NAME: &str = "Pimp My Meta";
pub const DEFAULT_SITE_URL: &str = "https://pimpmymeta.com";
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_NETWORK: &str = "mainnet-beta";
/// The system program id, used as a placeholder for every unset program or mint.
pub const PLACEHOLDER_PROGRAM_ID: &str = "11111111111111111111111111111111";

const SITE_DESCRIPTION: &str =
    "Surf the meta. Keep the shrimp. Automated migrations for trending tokens on Solana.";
const SITE_TAGLINE: &str = "Surf the meta. Keep the shrimp.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Network {
    MainnetBeta,
    Devnet,
    Testnet,
}

impl Network {
    /// Public RPC endpoint of the cluster.
    pub fn cluster_url(self) -> &'static str {
        match self {
            Network::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Network::Devnet => "https://api.devnet.solana.com",
            Network::Testnet => "https://api.testnet.solana.com",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteConfig {
    pub name: String,
    pub url: String,
    pub description: String,
    pub tagline: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            name: DEFAULT_SITE_NAME.to_string(),
            url: DEFAULT_SITE_URL.to_string(),
            description: SITE_DESCRIPTION.to_string(),
            tagline: SITE_TAGLINE.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolanaConfig {
    pub rpc_url: String,
    /// Raw cluster name as configured, e.g. `mainnet-beta` or `devnet`.
    pub network: String,
    pub vault_program_id: String,
    pub current_token_mint: String,
    pub next_token_mint: String,
    pub fee_bps: u16,
}

impl Default for SolanaConfig {
    fn default() -> Self {
        SolanaConfig {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            network: DEFAULT_NETWORK.to_string(),
            vault_program_id: PLACEHOLDER_PROGRAM_ID.to_string(),
            current_token_mint: PLACEHOLDER_PROGRAM_ID.to_string(),
            next_token_mint: PLACEHOLDER_PROGRAM_ID.to_string(),
            fee_bps: 0,
        }
    }
}

impl SolanaConfig {
    /// Network the wallet connects to. Anything but mainnet-beta is treated as devnet.
    pub fn wallet_network(&self) -> Network {
        match Network::from_str(self.network.trim()) {
            Ok(Network::MainnetBeta) => Network::MainnetBeta,
            _ => Network::Devnet,
        }
    }

    /// Configured RPC url, or the public cluster url when none is set.
    pub fn rpc_endpoint(&self) -> &str {
        if self.rpc_url.trim().is_empty() {
            self.wallet_network().cluster_url()
        } else {
            &self.rpc_url
        }
    }
}

/// Settings read once at startup. Nothing here changes afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlowConfig {
    pub site: SiteConfig,
    pub solana: SolanaConfig,
}

impl FlowConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Missing or blank values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let site_defaults = SiteConfig::default();
        let site = SiteConfig {
            name: value(SITE_NAME_VAR).unwrap_or(site_defaults.name),
            url: value(SITE_URL_VAR).unwrap_or(site_defaults.url),
            ..site_defaults
        };

        let solana_defaults = SolanaConfig::default();
        let solana = SolanaConfig {
            rpc_url: value(SOLANA_RPC_VAR).unwrap_or(solana_defaults.rpc_url),
            network: value(SOLANA_NETWORK_VAR).unwrap_or(solana_defaults.network),
            vault_program_id: value(VAULT_PROGRAM_ID_VAR)
                .unwrap_or(solana_defaults.vault_program_id),
            current_token_mint: value(CURRENT_TOKEN_MINT_VAR)
                .unwrap_or(solana_defaults.current_token_mint),
            next_token_mint: value(NEXT_TOKEN_MINT_VAR)
                .unwrap_or(solana_defaults.next_token_mint),
            fee_bps: value(FEE_BPS_VAR)
                .map(|raw| parse_fee_bps(&raw))
                .unwrap_or(solana_defaults.fee_bps),
        };

        FlowConfig { site, solana }
    }
}

fn parse_fee_bps(raw: &str) -> u16 {
    match raw.trim().parse::<u16>() {
        Ok(fee_bps) if fee_bps <= BPS_DENOMINATOR => fee_bps,
        Ok(fee_bps) => {
            warn!(
                "{} of {} exceeds {}, falling back to 0",
                FEE_BPS_VAR, fee_bps, BPS_DENOMINATOR
            );
            0
        }
        Err(e) => {
            warn!(
                "Could not parse {} '{}' ({}), falling back to 0",
                FEE_BPS_VAR, raw, e
            );
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> FlowConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        FlowConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = config_from(&[]);

        assert_eq!(config, FlowConfig::default());
        assert_eq!(config.site.name, "Pimp My Meta");
        assert_eq!(config.site.url, "https://pimpmymeta.com");
        assert_eq!(config.site.tagline, "Surf the meta. Keep the shrimp.");
        assert_eq!(config.solana.rpc_endpoint(), DEFAULT_RPC_URL);
        assert_eq!(config.solana.wallet_network(), Network::MainnetBeta);
        assert_eq!(config.solana.vault_program_id, PLACEHOLDER_PROGRAM_ID);
        assert_eq!(config.solana.current_token_mint, PLACEHOLDER_PROGRAM_ID);
        assert_eq!(config.solana.next_token_mint, PLACEHOLDER_PROGRAM_ID);
        assert_eq!(config.solana.fee_bps, 0);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            (SITE_NAME_VAR, "Meta Vault"),
            (SOLANA_RPC_VAR, "http://localhost:8899"),
            (SOLANA_NETWORK_VAR, "devnet"),
            (VAULT_PROGRAM_ID_VAR, "Vau1tProgram1111111111111111111111111111111"),
            (FEE_BPS_VAR, "250"),
        ]);

        assert_eq!(config.site.name, "Meta Vault");
        assert_eq!(config.site.url, DEFAULT_SITE_URL);
        assert_eq!(config.solana.rpc_endpoint(), "http://localhost:8899");
        assert_eq!(config.solana.wallet_network(), Network::Devnet);
        assert_eq!(
            config.solana.vault_program_id,
            "Vau1tProgram1111111111111111111111111111111"
        );
        assert_eq!(config.solana.fee_bps, 250);
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = config_from(&[(SITE_NAME_VAR, "  "), (SOLANA_RPC_VAR, "")]);

        assert_eq!(config.site.name, DEFAULT_SITE_NAME);
        assert_eq!(config.solana.rpc_url, DEFAULT_RPC_URL);
    }

    #[test]
    fn bad_fees_fall_back_to_zero() {
        for raw in ["abc", "-5", "10001", "70000"] {
            let config = config_from(&[(FEE_BPS_VAR, raw)]);
            assert_eq!(config.solana.fee_bps, 0, "{}", raw);
        }

        let config = config_from(&[(FEE_BPS_VAR, "10000")]);
        assert_eq!(config.solana.fee_bps, 10_000);
    }

    #[test]
    fn unknown_networks_use_devnet() {
        for network in ["devnet", "testnet", "localnet", ""] {
            let solana = SolanaConfig {
                network: network.to_string(),
                ..SolanaConfig::default()
            };
            assert_eq!(solana.wallet_network(), Network::Devnet, "{}", network);
        }
    }

    #[test]
    fn blank_rpc_uses_cluster_url() {
        let solana = SolanaConfig {
            rpc_url: String::new(),
            network: "devnet".to_string(),
            ..SolanaConfig::default()
        };

        assert_eq!(solana.rpc_endpoint(), "https://api.devnet.solana.com");
    }

    #[test]
    fn network_names() {
        assert_eq!(Network::MainnetBeta.to_string(), "mainnet-beta");
        assert_eq!(Network::from_str("testnet").unwrap(), Network::Testnet);
    }
}
