use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Billboard, Category, CategoryDetail, Color, ProductDetail, ProductFilter, Size, Store,
};
use crate::validation::{
    BillboardInput, CategoryInput, ColorInput, ProductInput, SettingsInput, SizeInput, StoreInput,
};

/// Data access used by every route handler.
///
/// Item operations are scoped by store: an id that exists under another store
/// behaves exactly like an id that does not exist (`Ok(None)`). Referential
/// rules are the implementation's job and surface as
/// [`DatabaseError::ForeignKeyViolation`].
#[async_trait]
pub trait Catalog: Send + Sync + 'static {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    // Stores
    async fn owned_store(&self, store_id: Uuid, user_id: &str) -> Result<Option<Store>, DatabaseError>;
    async fn list_stores(&self, user_id: &str) -> Result<Vec<Store>, DatabaseError>;
    async fn create_store(&self, user_id: &str, input: &StoreInput) -> Result<Store, DatabaseError>;
    async fn rename_store(
        &self,
        store_id: Uuid,
        user_id: &str,
        input: &SettingsInput,
    ) -> Result<Option<Store>, DatabaseError>;
    async fn delete_store(&self, store_id: Uuid, user_id: &str) -> Result<Option<Store>, DatabaseError>;

    // Billboards
    async fn list_billboards(&self, store_id: Uuid) -> Result<Vec<Billboard>, DatabaseError>;
    async fn find_billboard(&self, store_id: Uuid, id: Uuid) -> Result<Option<Billboard>, DatabaseError>;
    async fn create_billboard(&self, store_id: Uuid, input: &BillboardInput) -> Result<Billboard, DatabaseError>;
    async fn update_billboard(
        &self,
        store_id: Uuid,
        id: Uuid,
        input: &BillboardInput,
    ) -> Result<Option<Billboard>, DatabaseError>;
    async fn delete_billboard(&self, store_id: Uuid, id: Uuid) -> Result<Option<Billboard>, DatabaseError>;

    // Categories
    async fn list_categories(&self, store_id: Uuid) -> Result<Vec<CategoryDetail>, DatabaseError>;
    async fn find_category(&self, store_id: Uuid, id: Uuid) -> Result<Option<CategoryDetail>, DatabaseError>;
    async fn create_category(&self, store_id: Uuid, input: &CategoryInput) -> Result<Category, DatabaseError>;
    async fn update_category(
        &self,
        store_id: Uuid,
        id: Uuid,
        input: &CategoryInput,
    ) -> Result<Option<Category>, DatabaseError>;
    async fn delete_category(&self, store_id: Uuid, id: Uuid) -> Result<Option<Category>, DatabaseError>;

    // Colors
    async fn list_colors(&self, store_id: Uuid) -> Result<Vec<Color>, DatabaseError>;
    async fn find_color(&self, store_id: Uuid, id: Uuid) -> Result<Option<Color>, DatabaseError>;
    async fn create_color(&self, store_id: Uuid, input: &ColorInput) -> Result<Color, DatabaseError>;
    async fn update_color(&self, store_id: Uuid, id: Uuid, input: &ColorInput) -> Result<Option<Color>, DatabaseError>;
    async fn delete_color(&self, store_id: Uuid, id: Uuid) -> Result<Option<Color>, DatabaseError>;

    // Sizes
    async fn list_sizes(&self, store_id: Uuid) -> Result<Vec<Size>, DatabaseError>;
    async fn find_size(&self, store_id: Uuid, id: Uuid) -> Result<Option<Size>, DatabaseError>;
    async fn create_size(&self, store_id: Uuid, input: &SizeInput) -> Result<Size, DatabaseError>;
    async fn update_size(&self, store_id: Uuid, id: Uuid, input: &SizeInput) -> Result<Option<Size>, DatabaseError>;
    async fn delete_size(&self, store_id: Uuid, id: Uuid) -> Result<Option<Size>, DatabaseError>;

    // Products
    async fn list_products(&self, store_id: Uuid, filter: &ProductFilter) -> Result<Vec<ProductDetail>, DatabaseError>;
    async fn find_product(&self, store_id: Uuid, id: Uuid) -> Result<Option<ProductDetail>, DatabaseError>;
    async fn create_product(&self, store_id: Uuid, input: &ProductInput) -> Result<ProductDetail, DatabaseError>;
    /// Replaces the scalar fields and the whole image set atomically.
    async fn update_product(
        &self,
        store_id: Uuid,
        id: Uuid,
        input: &ProductInput,
    ) -> Result<Option<ProductDetail>, DatabaseError>;
    async fn delete_product(&self, store_id: Uuid, id: Uuid) -> Result<Option<ProductDetail>, DatabaseError>;
}
