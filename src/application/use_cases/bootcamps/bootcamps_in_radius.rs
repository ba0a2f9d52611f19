use crate::application::ports::bootcamp_repository::BootcampRepository;
use crate::application::ports::geocoder::Geocoder;
use crate::domain::bootcamps::Bootcamp;

pub struct BootcampsInRadius<'a, R: BootcampRepository + ?Sized, G: Geocoder + ?Sized> {
    pub repo: &'a R,
    pub geocoder: &'a G,
}

impl<'a, R: BootcampRepository + ?Sized, G: Geocoder + ?Sized> BootcampsInRadius<'a, R, G> {
    /// `Ok(None)` when the zipcode cannot be geocoded.
    pub async fn execute(
        &self,
        zipcode: &str,
        distance_miles: f64,
    ) -> anyhow::Result<Option<Vec<Bootcamp>>> {
        let loc = match self.geocoder.geocode(zipcode).await? {
            Some(l) => l,
            None => return Ok(None),
        };
        let (lat, lng) = match (loc.lat, loc.lng) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => return Ok(None),
        };
        let items = self
            .repo
            .find_within_radius(lat, lng, distance_miles)
            .await?;
        Ok(Some(items))
    }
}
