use async_trait::async_trait;

#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Writes the photo bytes under the given filename, replacing any
    /// previous version. Returns the stored filename.
    async fn save(&self, filename: &str, bytes: &[u8]) -> anyhow::Result<String>;
}
