//! In-memory ports used by the bootcamp use-case tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::application::ports::bootcamp_repository::{
    BootcampPatch, BootcampRepository, ListBootcampsParams, NewBootcamp, SortOrder,
};
use crate::application::ports::geocoder::Geocoder;
use crate::application::ports::photo_store::PhotoStore;
use crate::domain::bootcamps::{Bootcamp, Location, slugify};

#[derive(Default)]
pub struct InMemoryBootcamps {
    items: Mutex<Vec<Bootcamp>>,
}

fn haversine_miles(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let to_rad = std::f64::consts::PI / 180.0;
    let dlat = (lat2 - lat1) * to_rad;
    let dlng = (lng2 - lng1) * to_rad;
    let a = (dlat / 2.0).sin().powi(2)
        + (lat1 * to_rad).cos() * (lat2 * to_rad).cos() * (dlng / 2.0).sin().powi(2);
    2.0 * 3963.0 * a.sqrt().asin()
}

#[async_trait]
impl BootcampRepository for InMemoryBootcamps {
    async fn list(&self, params: &ListBootcampsParams) -> anyhow::Result<(Vec<Bootcamp>, i64)> {
        let items = self.items.lock().unwrap();
        let mut filtered: Vec<Bootcamp> = items
            .iter()
            .filter(|b| {
                params
                    .career
                    .as_ref()
                    .map(|c| b.careers.contains(c))
                    .unwrap_or(true)
                    && params.housing.map(|h| b.housing == h).unwrap_or(true)
            })
            .cloned()
            .collect();
        if let Some((col, order)) = params.sort.first() {
            filtered.sort_by(|a, b| {
                let ord = match col.as_str() {
                    "name" => a.name.cmp(&b.name),
                    _ => a.created_at.cmp(&b.created_at),
                };
                match order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }
        let total = filtered.len() as i64;
        let page: Vec<Bootcamp> = filtered
            .into_iter()
            .skip(params.offset as usize)
            .take(params.limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Bootcamp>> {
        let items = self.items.lock().unwrap();
        Ok(items.iter().find(|b| b.id == id).cloned())
    }

    async fn count_by_owner(&self, user_id: Uuid) -> anyhow::Result<i64> {
        let items = self.items.lock().unwrap();
        Ok(items.iter().filter(|b| b.user_id == user_id).count() as i64)
    }

    async fn create(&self, new: &NewBootcamp) -> anyhow::Result<Bootcamp> {
        let mut items = self.items.lock().unwrap();
        let b = Bootcamp {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            name: new.name.clone(),
            slug: new.slug.clone(),
            description: new.description.clone(),
            website: new.website.clone(),
            phone: new.phone.clone(),
            email: new.email.clone(),
            location: new.location.clone(),
            careers: new.careers.clone(),
            housing: new.housing,
            job_assistance: new.job_assistance,
            job_guarantee: new.job_guarantee,
            accept_gi: new.accept_gi,
            average_rating: None,
            average_cost: new.average_cost,
            photo: "no-photo.jpg".into(),
            created_at: Utc::now(),
        };
        items.push(b.clone());
        Ok(b)
    }

    async fn update(&self, id: Uuid, patch: &BootcampPatch) -> anyhow::Result<Option<Bootcamp>> {
        let mut items = self.items.lock().unwrap();
        let Some(b) = items.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        if let Some(v) = &patch.name {
            b.name = v.clone();
        }
        if let Some(v) = &patch.slug {
            b.slug = v.clone();
        }
        if let Some(v) = &patch.description {
            b.description = v.clone();
        }
        if let Some(v) = &patch.careers {
            b.careers = v.clone();
        }
        if let Some(v) = patch.housing {
            b.housing = v;
        }
        if let Some(v) = patch.average_cost {
            b.average_cost = Some(v);
        }
        Ok(Some(b.clone()))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|b| b.id != id);
        Ok(items.len() < before)
    }

    async fn find_within_radius(
        &self,
        lat: f64,
        lng: f64,
        miles: f64,
    ) -> anyhow::Result<Vec<Bootcamp>> {
        let items = self.items.lock().unwrap();
        Ok(items
            .iter()
            .filter(|b| match (b.location.lat, b.location.lng) {
                (Some(blat), Some(blng)) => haversine_miles(lat, lng, blat, blng) <= miles,
                _ => false,
            })
            .cloned()
            .collect())
    }

    async fn set_photo(&self, id: Uuid, filename: &str) -> anyhow::Result<bool> {
        let mut items = self.items.lock().unwrap();
        match items.iter_mut().find(|b| b.id == id) {
            Some(b) => {
                b.photo = filename.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

pub struct StaticGeocoder {
    result: Option<Location>,
}

impl StaticGeocoder {
    pub fn boston() -> Self {
        Self {
            result: Some(Location {
                formatted_address: Some("233 Bay State Rd, Boston, MA 02215".into()),
                street: Some("233 Bay State Rd".into()),
                city: Some("Boston".into()),
                state: Some("MA".into()),
                zipcode: Some("02215".into()),
                country: Some("US".into()),
                lat: Some(42.3504),
                lng: Some(-71.1053),
            }),
        }
    }

    pub fn unresolvable() -> Self {
        Self { result: None }
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, _query: &str) -> anyhow::Result<Option<Location>> {
        Ok(self.result.clone())
    }
}

#[derive(Default)]
pub struct MemoryPhotoStore {
    pub files: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl PhotoStore for MemoryPhotoStore {
    async fn save(&self, filename: &str, bytes: &[u8]) -> anyhow::Result<String> {
        self.files
            .lock()
            .unwrap()
            .insert(filename.to_string(), bytes.to_vec());
        Ok(filename.to_string())
    }
}

pub async fn seed_bootcamp(repo: &InMemoryBootcamps, owner: Uuid, name: &str) -> Bootcamp {
    seed_bootcamp_at(repo, owner, name, 42.35, -71.10).await
}

pub async fn seed_bootcamp_at(
    repo: &InMemoryBootcamps,
    owner: Uuid,
    name: &str,
    lat: f64,
    lng: f64,
) -> Bootcamp {
    repo.create(&NewBootcamp {
        user_id: owner,
        name: name.to_string(),
        slug: slugify(name),
        description: "Learn to code".into(),
        website: None,
        phone: None,
        email: None,
        address: None,
        location: Location {
            lat: Some(lat),
            lng: Some(lng),
            ..Default::default()
        },
        careers: vec!["Web Development".into()],
        housing: false,
        job_assistance: false,
        job_guarantee: false,
        accept_gi: false,
        average_cost: None,
    })
    .await
    .unwrap()
}
