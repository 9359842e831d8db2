pub mod client;
pub mod formatter;
pub mod presenter;
pub mod session;

pub use crate::domain::model::{Activity, CnpjRecord, Partner};
pub use crate::domain::ports::{ConfigProvider, RegistrySource, Storage};
pub use crate::utils::error::Result;
