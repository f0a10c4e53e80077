use super::RecordStore;
use crate::models::{Image, NewImage, NewTransformation, NewUser, Transformation, User};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// One entity kind: rows keyed by id plus the last id handed out.
struct Table<T> {
    rows: BTreeMap<u64, T>,
    last_id: u64,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }

    fn next_id(&mut self) -> Result<u64> {
        self.last_id = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| Error::Internal("record id overflow".to_string()))?;
        Ok(self.last_id)
    }

    fn get(&self, id: u64) -> Option<T> {
        self.rows.get(&id).cloned()
    }
}

struct Tables {
    users: Table<User>,
    images: Table<Image>,
    transformations: Table<Transformation>,
}

/// In-memory [`RecordStore`].
///
/// Each create runs under one lock, so ids are assigned without gaps or
/// duplicates even when requests run on several workers.
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables {
                users: Table::new(),
                images: Table::new(),
                transformations: Table::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // Rows are inserted in a single step, so a poisoned table is still consistent.
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.lock();
        if tables
            .users
            .rows
            .values()
            .any(|existing| existing.username == user.username)
        {
            return Err(Error::InvalidRequest(format!(
                "username '{}' is already taken",
                user.username
            )));
        }

        let id = tables.users.next_id()?;
        let record = User {
            id,
            username: user.username,
            password: user.password,
        };
        tables.users.rows.insert(id, record.clone());
        tracing::debug!("Created user {}", id);
        Ok(record)
    }

    async fn get_user(&self, id: u64) -> Result<Option<User>> {
        Ok(self.lock().users.get(id))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .lock()
            .users
            .rows
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create_image(&self, image: NewImage) -> Result<Image> {
        let mut tables = self.lock();
        let id = tables.images.next_id()?;
        let record = Image {
            id,
            original_filename: image.original_filename,
            original_url: image.original_url,
            user_id: image.user_id,
            created_at: Utc::now(),
        };
        tables.images.rows.insert(id, record.clone());
        tracing::debug!("Created image {}", id);
        Ok(record)
    }

    async fn get_image(&self, id: u64) -> Result<Option<Image>> {
        Ok(self.lock().images.get(id))
    }

    async fn create_transformation(
        &self,
        transformation: NewTransformation,
    ) -> Result<Transformation> {
        let mut tables = self.lock();
        let id = tables.transformations.next_id()?;
        let record = Transformation {
            id,
            image_id: transformation.image_id,
            style: transformation.style,
            transformed_url: transformation.transformed_url,
            created_at: Utc::now(),
        };
        tables.transformations.rows.insert(id, record.clone());
        tracing::debug!(
            "Created transformation {} for image {}",
            id,
            record.image_id
        );
        Ok(record)
    }

    async fn get_transformation(&self, id: u64) -> Result<Option<Transformation>> {
        Ok(self.lock().transformations.get(id))
    }

    async fn list_transformations_by_image(&self, image_id: u64) -> Result<Vec<Transformation>> {
        // BTreeMap iterates in id order, which is creation order.
        Ok(self
            .lock()
            .transformations
            .rows
            .values()
            .filter(|t| t.image_id == image_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StyleId;
    use pretty_assertions::assert_eq;

    fn new_image(name: &str) -> NewImage {
        NewImage {
            original_filename: name.to_string(),
            original_url: format!("upload:{}", name),
            user_id: None,
        }
    }

    fn new_transformation(image_id: u64, style: StyleId, url: &str) -> NewTransformation {
        NewTransformation {
            image_id,
            style,
            transformed_url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_ids_start_at_one_and_increase() {
        let store = MemoryStore::new();

        let mut ids = Vec::new();
        for i in 0..5 {
            let image = store.create_image(new_image(&format!("{}.png", i))).await.unwrap();
            ids.push(image.id);
        }

        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_counters_are_per_kind() {
        let store = MemoryStore::new();

        let image = store.create_image(new_image("a.png")).await.unwrap();
        let transformation = store
            .create_transformation(new_transformation(image.id, StyleId::Lego, "u1"))
            .await
            .unwrap();
        let user = store
            .create_user(NewUser {
                username: "ada".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(image.id, 1);
        assert_eq!(transformation.id, 1);
        assert_eq!(user.id, 1);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryStore::new();

        assert!(store.get_user(1).await.unwrap().is_none());
        assert!(store.get_image(42).await.unwrap().is_none());
        assert!(store.get_transformation(0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_returns_created_record() {
        let store = MemoryStore::new();
        let created = store.create_image(new_image("cat.jpg")).await.unwrap();

        let fetched = store.get_image(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.original_filename, "cat.jpg");
    }

    #[tokio::test]
    async fn test_users_by_username() {
        let store = MemoryStore::new();
        store
            .create_user(NewUser {
                username: "ada".to_string(),
                password: "one".to_string(),
            })
            .await
            .unwrap();
        let grace = store
            .create_user(NewUser {
                username: "grace".to_string(),
                password: "two".to_string(),
            })
            .await
            .unwrap();

        let found = store.get_user_by_username("grace").await.unwrap().unwrap();
        assert_eq!(found, grace);
        assert!(store.get_user_by_username("linus").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected_without_consuming_an_id() {
        let store = MemoryStore::new();
        let first = NewUser {
            username: "ada".to_string(),
            password: "one".to_string(),
        };
        store.create_user(first.clone()).await.unwrap();

        let err = store.create_user(first).await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));

        let next = store
            .create_user(NewUser {
                username: "grace".to_string(),
                password: "two".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn test_list_by_image_filters_and_keeps_creation_order() {
        let store = MemoryStore::new();

        store
            .create_transformation(new_transformation(1, StyleId::Anime, "a"))
            .await
            .unwrap();
        store
            .create_transformation(new_transformation(2, StyleId::Lego, "b"))
            .await
            .unwrap();
        store
            .create_transformation(new_transformation(1, StyleId::Vintage, "c"))
            .await
            .unwrap();

        let urls: Vec<String> = store
            .list_transformations_by_image(1)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.transformed_url)
            .collect();
        assert_eq!(urls, vec!["a".to_string(), "c".to_string()]);

        assert!(store.list_transformations_by_image(3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dangling_image_reference_is_accepted() {
        let store = MemoryStore::new();

        let transformation = store
            .create_transformation(new_transformation(99, StyleId::Ghibli, "x"))
            .await
            .unwrap();

        assert_eq!(transformation.image_id, 99);
        assert!(store.get_image(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let store = std::sync::Arc::new(MemoryStore::new());

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .create_image(new_image(&format!("{}.webp", i)))
                    .await
                    .unwrap()
                    .id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=20).collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn test_id_overflow_is_internal_error() {
        let store = MemoryStore::new();
        store.lock().images.last_id = u64::MAX;

        let err = store.create_image(new_image("last.png")).await.unwrap_err();

        assert!(matches!(err, Error::Internal(_)));
        assert!(!err.is_client_error());
        assert!(store.get_image(u64::MAX).await.unwrap().is_none());
    }
}
