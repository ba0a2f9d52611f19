use uuid::Uuid;

use crate::application::ports::bootcamp_repository::BootcampRepository;
use crate::application::ports::photo_store::PhotoStore;
use crate::application::use_cases::bootcamps::update_bootcamp::MutateOutcome;
use crate::domain::users::Role;

pub struct UploadPhoto<'a, R: BootcampRepository + ?Sized, S: PhotoStore + ?Sized> {
    pub repo: &'a R,
    pub store: &'a S,
}

impl<'a, R: BootcampRepository + ?Sized, S: PhotoStore + ?Sized> UploadPhoto<'a, R, S> {
    /// `ext` includes the leading dot (".jpg"); content-type and size checks
    /// happen at the HTTP layer where the multipart metadata lives.
    pub async fn execute(
        &self,
        actor: Uuid,
        role: Role,
        id: Uuid,
        bytes: &[u8],
        ext: &str,
    ) -> anyhow::Result<MutateOutcome<String>> {
        let existing = match self.repo.find_by_id(id).await? {
            Some(b) => b,
            None => return Ok(MutateOutcome::NotFound),
        };
        if existing.user_id != actor && role != Role::Admin {
            return Ok(MutateOutcome::NotOwner);
        }
        let filename = format!("photo_{id}{ext}");
        let stored = self.store.save(&filename, bytes).await?;
        self.repo.set_photo(id, &stored).await?;
        Ok(MutateOutcome::Done(stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::bootcamps::testing::{
        seed_bootcamp, InMemoryBootcamps, MemoryPhotoStore,
    };

    #[tokio::test]
    async fn photo_is_stored_and_recorded_for_the_owner() {
        let repo = InMemoryBootcamps::default();
        let store = MemoryPhotoStore::default();
        let owner = Uuid::new_v4();
        let b = seed_bootcamp(&repo, owner, "Devworks").await;

        let uc = UploadPhoto {
            repo: &repo,
            store: &store,
        };
        let out = uc
            .execute(owner, Role::Publisher, b.id, b"jpegbytes", ".jpg")
            .await
            .unwrap();
        let MutateOutcome::Done(filename) = out else {
            panic!("owner upload should succeed");
        };
        assert_eq!(filename, format!("photo_{}.jpg", b.id));
        assert_eq!(
            store.files.lock().unwrap().get(&filename).unwrap(),
            b"jpegbytes"
        );
        assert_eq!(repo.find_by_id(b.id).await.unwrap().unwrap().photo, filename);

        let denied = uc
            .execute(Uuid::new_v4(), Role::Publisher, b.id, b"x", ".png")
            .await
            .unwrap();
        assert!(matches!(denied, MutateOutcome::NotOwner));
    }
}
