pub mod error;
pub mod logger;
#[cfg(feature = "cli")]
pub mod ui;
pub mod validation;
