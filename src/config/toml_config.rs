use crate::core::client::{DEFAULT_REGISTRY_URL, DEFAULT_RELAY_URL};
use crate::core::ConfigProvider;
use crate::utils::error::{LookupError, Result};
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

pub const MAX_TIMEOUT_SECONDS: u64 = 300;
pub const MAX_INTERVAL_SECONDS: u64 = 3600;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_registry_url")]
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    /// Minimum seconds between two requests; 0 disables throttling.
    #[serde(default)]
    pub min_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_relay_url")]
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_print_dir")]
    pub print_dir: String,
}

fn default_registry_url() -> String {
    DEFAULT_REGISTRY_URL.to_string()
}

fn default_relay_url() -> String {
    DEFAULT_RELAY_URL.to_string()
}

fn default_print_dir() -> String {
    ".".to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: default_registry_url(),
            timeout_seconds: None,
            min_interval_secs: 0,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_relay_url(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            print_dir: default_print_dir(),
        }
    }
}

impl LookupConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LookupError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| LookupError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${RECEITAWS_URL})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn print_dir(&self) -> &str {
        &self.output.print_dir
    }
}

impl ConfigProvider for LookupConfig {
    fn registry_base_url(&self) -> &str {
        &self.registry.base_url
    }

    fn relay_endpoint(&self) -> Option<&str> {
        self.relay.enabled.then_some(self.relay.endpoint.as_str())
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.registry.timeout_seconds
    }

    fn min_interval_secs(&self) -> u64 {
        self.registry.min_interval_secs
    }
}

impl Validate for LookupConfig {
    fn validate(&self) -> Result<()> {
        validate_url("registry.base_url", &self.registry.base_url)?;
        if self.relay.enabled {
            validate_url("relay.endpoint", &self.relay.endpoint)?;
        }
        if let Some(timeout) = self.registry.timeout_seconds {
            validate_range("registry.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }
        validate_range(
            "registry.min_interval_secs",
            self.registry.min_interval_secs,
            0,
            MAX_INTERVAL_SECONDS,
        )?;
        validate_path("output.print_dir", &self.output.print_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = LookupConfig::from_toml_str("").unwrap();

        assert_eq!(config.registry_base_url(), DEFAULT_REGISTRY_URL);
        assert_eq!(config.relay_endpoint(), None);
        assert_eq!(config.timeout_seconds(), None);
        assert_eq!(config.min_interval_secs(), 0);
        assert_eq!(config.print_dir(), ".");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[registry]
base_url = "https://www.receitaws.com.br/v1/cnpj"
timeout_seconds = 30
min_interval_secs = 20

[relay]
enabled = true
endpoint = "https://api.allorigins.win/get"

[output]
print_dir = "./cartoes"
"#;

        let config = LookupConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.relay_endpoint(), Some("https://api.allorigins.win/get"));
        assert_eq!(config.timeout_seconds(), Some(30));
        assert_eq!(config.min_interval_secs(), 20);
        assert_eq!(config.print_dir(), "./cartoes");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CNPJ_LOOKUP_TEST_REGISTRY", "https://registry.test/v1/cnpj");

        let toml_content = r#"
[registry]
base_url = "${CNPJ_LOOKUP_TEST_REGISTRY}"
"#;

        let config = LookupConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.registry.base_url, "https://registry.test/v1/cnpj");

        std::env::remove_var("CNPJ_LOOKUP_TEST_REGISTRY");
    }

    #[test]
    fn test_config_validation() {
        let invalid_url = LookupConfig::from_toml_str(
            r#"
[registry]
base_url = "receitaws"
"#,
        )
        .unwrap();
        assert!(invalid_url.validate().is_err());

        let zero_timeout = LookupConfig::from_toml_str(
            r#"
[registry]
timeout_seconds = 0
"#,
        )
        .unwrap();
        assert!(zero_timeout.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = LookupConfig::from_toml_str("[registry\nbase_url = 1").unwrap_err();
        assert!(matches!(err, LookupError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\nprint_dir = \"./saida\"\n")
            .unwrap();

        let config = LookupConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.print_dir(), "./saida");
    }
}
