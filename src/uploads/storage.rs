use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;

/// Persists uploaded images and hands back the public URL they will be
/// served under.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn save(&self, key: &str, body: Bytes) -> anyhow::Result<String>;
}

pub struct DiskStore {
    root: PathBuf,
    base_path: String,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>, base_path: &str) -> Self {
        Self {
            root: root.into(),
            base_path: base_path.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ImageStore for DiskStore {
    async fn save(&self, key: &str, body: Bytes) -> anyhow::Result<String> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(key);
        tokio::fs::write(&path, &body).await?;
        Ok(format!("{}/{}", self.base_path, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn saves_and_returns_public_url() {
        let dir = std::env::temp_dir().join(format!("acai-uploads-{}", uuid::Uuid::new_v4()));
        let store = DiskStore::new(&dir, "/attached_assets/");

        let url = store
            .save("test.png", Bytes::from_static(b"\x89PNG"))
            .await
            .unwrap();
        assert_eq!(url, "/attached_assets/test.png");

        let on_disk = tokio::fs::read(dir.join("test.png")).await.unwrap();
        assert_eq!(on_disk, b"\x89PNG");

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }
}
