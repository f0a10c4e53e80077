//! Record storage for users, images, and transformations
//!
//! The store is an explicit object built once at startup and shared with the
//! handlers. Only an in-memory implementation exists; everything it holds is
//! lost when the process exits.

pub mod memory;

pub use memory::MemoryStore;

use crate::models::{Image, NewImage, NewTransformation, NewUser, Transformation, User};
use crate::Result;
use async_trait::async_trait;

/// Keyed storage per entity kind.
///
/// Identifiers start at 1 and increase by 1 per kind; they are never reused.
/// Lookups that find nothing return `Ok(None)`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn get_user(&self, id: u64) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn create_image(&self, image: NewImage) -> Result<Image>;
    async fn get_image(&self, id: u64) -> Result<Option<Image>>;

    /// Does not check that `image_id` refers to an existing image.
    async fn create_transformation(&self, transformation: NewTransformation)
        -> Result<Transformation>;
    async fn get_transformation(&self, id: u64) -> Result<Option<Transformation>>;
    /// Transformations for one image, oldest first.
    async fn list_transformations_by_image(&self, image_id: u64) -> Result<Vec<Transformation>>;
}
