pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{cli::LocalStorage, toml_config::LookupConfig};

pub use crate::core::client::{RegistryClient, Transport};
pub use crate::core::formatter::{format_cnpj, normalize};
pub use crate::core::presenter::{present, print_card, render, RecordView};
pub use crate::core::session::{SearchSession, SearchState};
pub use crate::domain::model::CnpjRecord;
pub use crate::utils::error::{LookupError, Result};
