use uuid::Uuid;

use crate::application::ports::bootcamp_repository::{BootcampRepository, NewBootcamp};
use crate::application::ports::geocoder::Geocoder;
use crate::domain::bootcamps::{Bootcamp, Location, slugify};
use crate::domain::users::Role;

pub struct CreateBootcamp<'a, R: BootcampRepository + ?Sized, G: Geocoder + ?Sized> {
    pub repo: &'a R,
    pub geocoder: &'a G,
}

#[derive(Debug, Clone)]
pub struct CreateBootcampInput {
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub careers: Vec<String>,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub average_cost: Option<i32>,
}

pub enum CreateOutcome {
    Created(Bootcamp),
    /// A publisher may only list one bootcamp; admins are exempt.
    AlreadyPublished,
}

impl<'a, R: BootcampRepository + ?Sized, G: Geocoder + ?Sized> CreateBootcamp<'a, R, G> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        role: Role,
        input: CreateBootcampInput,
    ) -> anyhow::Result<CreateOutcome> {
        if role != Role::Admin && self.repo.count_by_owner(user_id).await? > 0 {
            return Ok(CreateOutcome::AlreadyPublished);
        }

        let location = match &input.address {
            Some(addr) => self
                .geocoder
                .geocode(addr)
                .await?
                .unwrap_or_default(),
            None => Location::default(),
        };

        let new = NewBootcamp {
            user_id,
            slug: slugify(&input.name),
            name: input.name,
            description: input.description,
            website: input.website,
            phone: input.phone,
            email: input.email,
            address: input.address,
            location,
            careers: input.careers,
            housing: input.housing,
            job_assistance: input.job_assistance,
            job_guarantee: input.job_guarantee,
            accept_gi: input.accept_gi,
            average_cost: input.average_cost,
        };
        let created = self.repo.create(&new).await?;
        Ok(CreateOutcome::Created(created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::bootcamps::testing::{InMemoryBootcamps, StaticGeocoder};

    fn input(name: &str) -> CreateBootcampInput {
        CreateBootcampInput {
            name: name.into(),
            description: "Full stack in 12 weeks".into(),
            website: None,
            phone: None,
            email: None,
            address: Some("233 Bay State Rd Boston MA 02215".into()),
            careers: vec!["Web Development".into()],
            housing: true,
            job_assistance: false,
            job_guarantee: false,
            accept_gi: false,
            average_cost: Some(10000),
        }
    }

    #[tokio::test]
    async fn publisher_is_limited_to_one_bootcamp() {
        let repo = InMemoryBootcamps::default();
        let geo = StaticGeocoder::boston();
        let uc = CreateBootcamp {
            repo: &repo,
            geocoder: &geo,
        };
        let publisher = Uuid::new_v4();

        let first = uc
            .execute(publisher, Role::Publisher, input("Devworks"))
            .await
            .unwrap();
        assert!(matches!(first, CreateOutcome::Created(_)));

        let second = uc
            .execute(publisher, Role::Publisher, input("Codemasters"))
            .await
            .unwrap();
        assert!(matches!(second, CreateOutcome::AlreadyPublished));
    }

    #[tokio::test]
    async fn admin_can_create_many_and_address_is_geocoded() {
        let repo = InMemoryBootcamps::default();
        let geo = StaticGeocoder::boston();
        let uc = CreateBootcamp {
            repo: &repo,
            geocoder: &geo,
        };
        let admin = Uuid::new_v4();

        for name in ["Devworks", "Codemasters"] {
            let out = uc.execute(admin, Role::Admin, input(name)).await.unwrap();
            let CreateOutcome::Created(b) = out else {
                panic!("admin create should succeed");
            };
            assert_eq!(b.slug, slugify(name));
            assert_eq!(b.location.city.as_deref(), Some("Boston"));
            assert!(b.location.lat.is_some());
        }
    }
}
