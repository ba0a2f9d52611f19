use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::application::ports::photo_store::PhotoStore;

pub struct FsPhotoStore {
    pub root: PathBuf,
}

impl FsPhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl PhotoStore for FsPhotoStore {
    async fn save(&self, filename: &str, bytes: &[u8]) -> anyhow::Result<String> {
        // Filenames are generated (`photo_{uuid}{ext}`) but never trust a
        // path separator slipping through.
        let name = Path::new(filename);
        if name
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
            || name.components().count() != 1
        {
            anyhow::bail!("invalid photo filename: {filename}");
        }
        tokio::fs::create_dir_all(&self.root).await?;
        let dest = self.root.join(name);
        tokio::fs::write(&dest, bytes).await?;
        Ok(filename.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_under_root_and_rejects_traversal() {
        let root = std::env::temp_dir().join(format!("photo-store-{}", uuid::Uuid::new_v4()));
        let store = FsPhotoStore::new(&root);

        let name = store.save("photo_x.jpg", b"bytes").await.unwrap();
        assert_eq!(name, "photo_x.jpg");
        let on_disk = tokio::fs::read(root.join("photo_x.jpg")).await.unwrap();
        assert_eq!(on_disk, b"bytes");

        assert!(store.save("../escape.jpg", b"x").await.is_err());
        assert!(store.save("a/b.jpg", b"x").await.is_err());

        tokio::fs::remove_dir_all(&root).await.ok();
    }
}
