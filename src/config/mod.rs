pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::toml_config::LookupConfig;
#[cfg(feature = "cli")]
use crate::core::client::{DEFAULT_REGISTRY_URL, DEFAULT_RELAY_URL};
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_range, validate_url, Validate};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "cnpj-lookup")]
#[command(about = "Consulta de CNPJ na base pública da Receita Federal (ReceitaWS)")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Registry base URL; the 14 digits are appended as the last path segment
    #[arg(long, global = true)]
    pub registry_url: Option<String>,

    /// Route requests through a cross-origin relay (allorigins unless overridden)
    #[arg(long, global = true)]
    pub relay: bool,

    /// Relay endpoint; implies --relay
    #[arg(long, global = true)]
    pub relay_url: Option<String>,

    /// Minimum seconds between registry requests (ReceitaWS allows 3 per minute)
    #[arg(long, global = true)]
    pub min_interval: Option<u64>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum Command {
    /// Look up one CNPJ and print its registration card
    Lookup {
        /// CNPJ, masked or digits only
        cnpj: String,
        /// Also print the card to a file in this directory
        #[arg(short, long)]
        print: Option<String>,
    },
    /// Show the masked form of an input
    Format { input: String },
    /// Interactive search session (":nova" starts over, ":imprimir" prints, ":sair" quits)
    Interactive {
        /// Directory for printed cards
        #[arg(short, long)]
        print_dir: Option<String>,
    },
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the configuration file, if any, and applies the command-line
    /// flags on top of it.
    pub fn resolve(&self) -> Result<LookupConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                LookupConfig::from_file(path)?
            }
            None => LookupConfig::default(),
        };

        // 應用命令列覆蓋設定
        if let Some(url) = &self.registry_url {
            config.registry.base_url = url.clone();
        }
        if self.relay || self.relay_url.is_some() {
            config.relay.enabled = true;
        }
        if let Some(endpoint) = &self.relay_url {
            config.relay.endpoint = endpoint.clone();
        }
        if let Some(secs) = self.min_interval {
            config.registry.min_interval_secs = secs;
        }
        if self.timeout.is_some() {
            config.registry.timeout_seconds = self.timeout;
        }
        match &self.command {
            Command::Lookup {
                print: Some(dir), ..
            }
            | Command::Interactive {
                print_dir: Some(dir),
            } => config.output.print_dir = dir.clone(),
            _ => {}
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn registry_base_url(&self) -> &str {
        self.registry_url.as_deref().unwrap_or(DEFAULT_REGISTRY_URL)
    }

    fn relay_endpoint(&self) -> Option<&str> {
        self.relay_url
            .as_deref()
            .or(self.relay.then_some(DEFAULT_RELAY_URL))
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout
    }

    fn min_interval_secs(&self) -> u64 {
        self.min_interval.unwrap_or(0)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("registry_url", self.registry_base_url())?;
        if let Some(endpoint) = self.relay_endpoint() {
            validate_url("relay_url", endpoint)?;
        }
        if let Some(timeout) = self.timeout {
            validate_range("timeout", timeout, 1, toml_config::MAX_TIMEOUT_SECONDS)?;
        }
        validate_range(
            "min_interval",
            self.min_interval_secs(),
            0,
            toml_config::MAX_INTERVAL_SECONDS,
        )
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = CliConfig::parse_from([
            "cnpj-lookup",
            "--relay",
            "--min-interval",
            "20",
            "lookup",
            "11.222.333/0001-81",
            "--print",
            "./cartoes",
        ]);
        assert!(cli.validate().is_ok());

        let config = cli.resolve().unwrap();
        assert_eq!(config.relay_endpoint(), Some(DEFAULT_RELAY_URL));
        assert_eq!(config.min_interval_secs(), 20);
        assert_eq!(config.print_dir(), "./cartoes");
        assert_eq!(config.registry_base_url(), DEFAULT_REGISTRY_URL);
    }

    #[test]
    fn test_direct_mode_is_default() {
        let cli = CliConfig::parse_from(["cnpj-lookup", "format", "11222333000181"]);
        assert_eq!(cli.relay_endpoint(), None);
        assert_eq!(cli.resolve().unwrap().relay_endpoint(), None);
    }

    #[test]
    fn test_invalid_registry_url_is_rejected() {
        let cli = CliConfig::parse_from([
            "cnpj-lookup",
            "--registry-url",
            "not a url",
            "format",
            "1",
        ]);
        assert!(cli.validate().is_err());
        assert!(cli.resolve().is_err());
    }

    #[test]
    fn test_relay_flag_before_subcommand_keeps_positional() {
        let cli = CliConfig::try_parse_from(["cnpj-lookup", "--relay", "lookup", "11222333000181"])
            .unwrap();

        match &cli.command {
            Command::Lookup { cnpj, print } => {
                assert_eq!(cnpj, "11222333000181");
                assert!(print.is_none());
            }
            other => panic!("expected lookup, got {:?}", other),
        }
        assert!(cli.relay);
        assert_eq!(cli.relay_endpoint(), Some(DEFAULT_RELAY_URL));
        assert_eq!(
            cli.resolve().unwrap().relay_endpoint(),
            Some(DEFAULT_RELAY_URL)
        );
    }

    #[test]
    fn test_relay_url_implies_relay() {
        let cli = CliConfig::try_parse_from([
            "cnpj-lookup",
            "lookup",
            "11222333000181",
            "--relay-url",
            "https://relay.example.com/get",
        ])
        .unwrap();

        assert!(!cli.relay);
        assert_eq!(cli.relay_endpoint(), Some("https://relay.example.com/get"));
        assert_eq!(
            cli.resolve().unwrap().relay_endpoint(),
            Some("https://relay.example.com/get")
        );
    }

    #[test]
    fn test_invalid_relay_url_is_rejected() {
        let cli = CliConfig::try_parse_from([
            "cnpj-lookup",
            "--relay-url",
            "not a url",
            "format",
            "1",
        ])
        .unwrap();
        assert!(cli.validate().is_err());
    }
}
