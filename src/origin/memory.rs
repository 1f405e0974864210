// In-process origin store

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use super::{content_type_for_key, OriginError, OriginObject, OriginStore};

/// Keeps originals in memory
///
/// Used by tests and local demos. A store seeded from a directory exposes
/// every regular file under it, keyed by its `/`-separated relative path.
#[derive(Debug, Default)]
pub struct MemoryOrigin {
    objects: RwLock<HashMap<String, OriginObject>>,
}

impl MemoryOrigin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_object(self, key: impl Into<String>, object: OriginObject) -> Self {
        self.insert(key, object);
        self
    }

    pub fn insert(&self, key: impl Into<String>, object: OriginObject) {
        self.objects
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.into(), object);
    }

    pub fn len(&self) -> usize {
        self.objects
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load every file under `dir`; content types come from file extensions
    pub fn from_dir(dir: &Path) -> Result<Self, String> {
        let origin = Self::new();
        load_dir(&origin, dir, dir)?;
        tracing::info!(dir = %dir.display(), objects = origin.len(), "Seeded memory origin");
        Ok(origin)
    }
}

fn load_dir(origin: &MemoryOrigin, root: &Path, dir: &Path) -> Result<(), String> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| format!("Failed to read directory '{}': {}", dir.display(), e))?;

    for entry in entries {
        let path = entry
            .map_err(|e| format!("Failed to read entry in '{}': {}", dir.display(), e))?
            .path();

        if path.is_dir() {
            load_dir(origin, root, &path)?;
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .map_err(|e| format!("Invalid path '{}': {}", path.display(), e))?;
        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let data = std::fs::read(&path)
            .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
        let content_type = content_type_for_key(&key);
        origin.insert(key, OriginObject::new(data, content_type));
    }

    Ok(())
}

#[async_trait]
impl OriginStore for MemoryOrigin {
    async fn fetch(&self, key: &str) -> Result<OriginObject, OriginError> {
        self.objects
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
            .ok_or_else(|| OriginError::NotFound {
                key: key.to_string(),
            })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_inserted_object() {
        let origin = MemoryOrigin::new()
            .with_object("u1/img1", OriginObject::new(vec![9, 9], "image/jpeg"));

        let object = origin.fetch("u1/img1").await.unwrap();
        assert_eq!(object.data.as_ref(), &[9, 9]);
        assert_eq!(object.content_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_missing_key_is_not_found() {
        let origin = MemoryOrigin::new();
        assert!(origin.is_empty());
        let err = origin.fetch("u1/missing").await.unwrap_err();
        assert!(matches!(err, OriginError::NotFound { key } if key == "u1/missing"));
    }

    #[tokio::test]
    async fn test_from_dir_loads_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("u1")).unwrap();
        std::fs::write(dir.path().join("u1/photo.png"), b"png-bytes").unwrap();
        std::fs::write(dir.path().join("readme"), b"text").unwrap();

        let origin = MemoryOrigin::from_dir(dir.path()).unwrap();
        assert_eq!(origin.len(), 2);

        let object = origin.fetch("u1/photo.png").await.unwrap();
        assert_eq!(object.content_type, "image/png");
        assert_eq!(object.data.as_ref(), b"png-bytes");

        let object = origin.fetch("readme").await.unwrap();
        assert_eq!(object.content_type, "application/octet-stream");
    }

    #[test]
    fn test_from_missing_dir_fails() {
        assert!(MemoryOrigin::from_dir(Path::new("/definitely/not/here")).is_err());
    }
}
