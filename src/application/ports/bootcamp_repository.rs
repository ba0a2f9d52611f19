use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::bootcamps::{Bootcamp, Location};

#[derive(Debug, Clone)]
pub struct NewBootcamp {
    pub user_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub location: Location,
    pub careers: Vec<String>,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub average_cost: Option<i32>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct BootcampPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub careers: Option<Vec<String>>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
    pub average_cost: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone)]
pub struct ListBootcampsParams {
    /// Whitelisted column name plus direction.
    pub sort: Vec<(String, SortOrder)>,
    pub career: Option<String>,
    pub housing: Option<bool>,
    pub offset: i64,
    pub limit: i64,
}

#[async_trait]
pub trait BootcampRepository: Send + Sync {
    async fn list(&self, params: &ListBootcampsParams) -> anyhow::Result<(Vec<Bootcamp>, i64)>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Bootcamp>>;
    async fn count_by_owner(&self, user_id: Uuid) -> anyhow::Result<i64>;
    async fn create(&self, new: &NewBootcamp) -> anyhow::Result<Bootcamp>;
    async fn update(&self, id: Uuid, patch: &BootcampPatch) -> anyhow::Result<Option<Bootcamp>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    /// Bootcamps within `miles` of the given point, nearest first.
    async fn find_within_radius(
        &self,
        lat: f64,
        lng: f64,
        miles: f64,
    ) -> anyhow::Result<Vec<Bootcamp>>;
    async fn set_photo(&self, id: Uuid, filename: &str) -> anyhow::Result<bool>;
}
