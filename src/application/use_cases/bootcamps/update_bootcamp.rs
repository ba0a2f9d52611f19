use uuid::Uuid;

use crate::application::ports::bootcamp_repository::{BootcampPatch, BootcampRepository};
use crate::domain::bootcamps::{Bootcamp, slugify};
use crate::domain::users::Role;

pub struct UpdateBootcamp<'a, R: BootcampRepository + ?Sized> {
    pub repo: &'a R,
}

pub enum MutateOutcome<T> {
    Done(T),
    NotFound,
    /// Caller is neither the owner nor an admin.
    NotOwner,
}

impl<'a, R: BootcampRepository + ?Sized> UpdateBootcamp<'a, R> {
    pub async fn execute(
        &self,
        actor: Uuid,
        role: Role,
        id: Uuid,
        mut patch: BootcampPatch,
    ) -> anyhow::Result<MutateOutcome<Bootcamp>> {
        let existing = match self.repo.find_by_id(id).await? {
            Some(b) => b,
            None => return Ok(MutateOutcome::NotFound),
        };
        if existing.user_id != actor && role != Role::Admin {
            return Ok(MutateOutcome::NotOwner);
        }
        if let Some(name) = &patch.name {
            patch.slug = Some(slugify(name));
        }
        match self.repo.update(id, &patch).await? {
            Some(b) => Ok(MutateOutcome::Done(b)),
            None => Ok(MutateOutcome::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::bootcamps::testing::{seed_bootcamp, InMemoryBootcamps};

    #[tokio::test]
    async fn only_owner_or_admin_may_update() {
        let repo = InMemoryBootcamps::default();
        let owner = Uuid::new_v4();
        let b = seed_bootcamp(&repo, owner, "Devworks").await;

        let uc = UpdateBootcamp { repo: &repo };
        let patch = BootcampPatch {
            name: Some("Devworks 2.0".into()),
            ..Default::default()
        };

        let stranger = Uuid::new_v4();
        let denied = uc
            .execute(stranger, Role::Publisher, b.id, patch.clone())
            .await
            .unwrap();
        assert!(matches!(denied, MutateOutcome::NotOwner));

        let by_owner = uc
            .execute(owner, Role::Publisher, b.id, patch.clone())
            .await
            .unwrap();
        let MutateOutcome::Done(updated) = by_owner else {
            panic!("owner update should succeed");
        };
        assert_eq!(updated.name, "Devworks 2.0");
        assert_eq!(updated.slug, "devworks-2-0");

        let by_admin = uc
            .execute(stranger, Role::Admin, b.id, patch)
            .await
            .unwrap();
        assert!(matches!(by_admin, MutateOutcome::Done(_)));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let repo = InMemoryBootcamps::default();
        let uc = UpdateBootcamp { repo: &repo };
        let out = uc
            .execute(
                Uuid::new_v4(),
                Role::Admin,
                Uuid::new_v4(),
                BootcampPatch::default(),
            )
            .await
            .unwrap();
        assert!(matches!(out, MutateOutcome::NotFound));
    }
}
