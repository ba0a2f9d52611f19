use uuid::Uuid;

use crate::application::ports::bootcamp_repository::BootcampRepository;
use crate::application::use_cases::bootcamps::update_bootcamp::MutateOutcome;
use crate::domain::users::Role;

pub struct DeleteBootcamp<'a, R: BootcampRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: BootcampRepository + ?Sized> DeleteBootcamp<'a, R> {
    pub async fn execute(
        &self,
        actor: Uuid,
        role: Role,
        id: Uuid,
    ) -> anyhow::Result<MutateOutcome<()>> {
        let existing = match self.repo.find_by_id(id).await? {
            Some(b) => b,
            None => return Ok(MutateOutcome::NotFound),
        };
        if existing.user_id != actor && role != Role::Admin {
            return Ok(MutateOutcome::NotOwner);
        }
        if self.repo.delete(id).await? {
            Ok(MutateOutcome::Done(()))
        } else {
            Ok(MutateOutcome::NotFound)
        }
    }
}
