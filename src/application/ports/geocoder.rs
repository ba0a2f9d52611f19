use async_trait::async_trait;

use crate::domain::bootcamps::Location;

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves a free-form address or zipcode to a location.
    /// `Ok(None)` when the provider finds no match.
    async fn geocode(&self, query: &str) -> anyhow::Result<Option<Location>>;
}
