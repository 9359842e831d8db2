use crate::domain::model::CnpjRecord;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn registry_base_url(&self) -> &str;
    /// Cross-origin relay endpoint; `None` calls the registry directly.
    fn relay_endpoint(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> Option<u64>;
    fn min_interval_secs(&self) -> u64;
}

#[async_trait]
pub trait RegistrySource: Send + Sync {
    async fn fetch_record(&self, raw_identifier: &str) -> Result<CnpjRecord>;
}
