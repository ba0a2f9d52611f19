use uuid::Uuid;

use crate::application::ports::bootcamp_repository::BootcampRepository;
use crate::domain::bootcamps::Bootcamp;

pub struct GetBootcamp<'a, R: BootcampRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: BootcampRepository + ?Sized> GetBootcamp<'a, R> {
    pub async fn execute(&self, id: Uuid) -> anyhow::Result<Option<Bootcamp>> {
        self.repo.find_by_id(id).await
    }
}
