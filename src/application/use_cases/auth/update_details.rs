use uuid::Uuid;

use crate::application::ports::user_repository::{UserRepository, UserRow};

pub struct UpdateDetails<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> UpdateDetails<'a, R> {
    pub async fn execute(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
    ) -> anyhow::Result<Option<UserRow>> {
        self.repo.update_details(id, name, email).await
    }
}
