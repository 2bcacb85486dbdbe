use async_trait::async_trait;
use std::time::Duration;

use crate::types::OutputDataset;

#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult, String>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Time source for pacing. `now` is measured from an arbitrary fixed origin.
#[async_trait]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> Duration;
    async fn sleep(&self, duration: Duration);
}

#[async_trait]
pub trait RateLimiterPort: Send + Sync {
    /// Waits until another request to the geocoding service is allowed.
    async fn acquire(&self);
}

#[async_trait]
pub trait DatasetOutputPort: Send + Sync {
    async fn write_dataset(&self, dataset: &OutputDataset) -> crate::error::Result<()>;
}
