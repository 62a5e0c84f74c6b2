use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::errors::AppError;

/// Blob side of an image: bytes in, opaque locator out. Metadata lives in
/// the database; only the locator ties the two together.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PayloadStore: Send + Sync {
    /// Persists the payload and returns a fresh locator for it.
    async fn put(&self, data: &[u8]) -> Result<String, AppError>;
    /// Reads a payload back. Unknown locators are `NotFound`.
    async fn get(&self, locator: &str) -> Result<Vec<u8>, AppError>;
}
