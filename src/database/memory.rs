use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::catalog::Catalog;
use crate::database::manager::DatabaseError;
use crate::database::models::{
    Billboard, Category, CategoryDetail, Color, Image, Product, ProductDetail, ProductFilter, Size, Store,
};
use crate::validation::{
    BillboardInput, CategoryInput, ColorInput, ImageInput, ProductInput, SettingsInput, SizeInput, StoreInput,
};

#[derive(Default)]
struct Tables {
    stores: HashMap<Uuid, Store>,
    billboards: HashMap<Uuid, Billboard>,
    categories: HashMap<Uuid, Category>,
    colors: HashMap<Uuid, Color>,
    sizes: HashMap<Uuid, Size>,
    products: HashMap<Uuid, Product>,
    images: HashMap<Uuid, Image>,
    /// Monotonic tick so rows created within the same clock reading still sort
    clock: u32,
}

impl Tables {
    fn now(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        Utc::now() + chrono::Duration::microseconds(self.clock as i64)
    }

    fn require_store(&self, store_id: Uuid) -> Result<(), DatabaseError> {
        if self.stores.contains_key(&store_id) {
            Ok(())
        } else {
            Err(DatabaseError::ForeignKeyViolation(format!("store {} does not exist", store_id)))
        }
    }

    fn require_billboard(&self, id: Uuid) -> Result<(), DatabaseError> {
        if self.billboards.contains_key(&id) {
            Ok(())
        } else {
            Err(DatabaseError::ForeignKeyViolation(format!("billboard {} does not exist", id)))
        }
    }

    fn require_product_refs(&self, input: &ProductInput) -> Result<(), DatabaseError> {
        if !self.categories.contains_key(&input.category_id) {
            return Err(DatabaseError::ForeignKeyViolation(format!(
                "category {} does not exist",
                input.category_id
            )));
        }
        if !self.colors.contains_key(&input.color_id) {
            return Err(DatabaseError::ForeignKeyViolation(format!("color {} does not exist", input.color_id)));
        }
        if !self.sizes.contains_key(&input.size_id) {
            return Err(DatabaseError::ForeignKeyViolation(format!("size {} does not exist", input.size_id)));
        }
        Ok(())
    }

    fn store_has_children(&self, store_id: Uuid) -> bool {
        self.billboards.values().any(|r| r.store_id == store_id)
            || self.categories.values().any(|r| r.store_id == store_id)
            || self.colors.values().any(|r| r.store_id == store_id)
            || self.sizes.values().any(|r| r.store_id == store_id)
            || self.products.values().any(|r| r.store_id == store_id)
    }

    fn replace_images(&mut self, product_id: Uuid, images: &[ImageInput]) {
        self.images.retain(|_, image| image.product_id != product_id);
        let now = self.now();
        for (position, input) in (0..).zip(images) {
            let image = Image {
                id: Uuid::new_v4(),
                product_id,
                url: input.url.clone(),
                position,
                created_at: now,
                updated_at: now,
            };
            self.images.insert(image.id, image);
        }
    }

    fn category_detail(&self, category: &Category) -> Result<CategoryDetail, DatabaseError> {
        let billboard = self
            .billboards
            .get(&category.billboard_id)
            .cloned()
            .ok_or_else(|| DatabaseError::QueryError(format!("category {} lost its billboard", category.id)))?;
        Ok(CategoryDetail {
            category: category.clone(),
            billboard,
        })
    }

    fn product_detail(&self, product: &Product) -> Result<ProductDetail, DatabaseError> {
        let lost = |what: &str| DatabaseError::QueryError(format!("product {} lost its {}", product.id, what));

        let mut images: Vec<Image> = self
            .images
            .values()
            .filter(|image| image.product_id == product.id)
            .cloned()
            .collect();
        images.sort_by_key(|image| image.position);

        Ok(ProductDetail {
            product: product.clone(),
            images,
            category: self.categories.get(&product.category_id).cloned().ok_or_else(|| lost("category"))?,
            color: self.colors.get(&product.color_id).cloned().ok_or_else(|| lost("color"))?,
            size: self.sizes.get(&product.size_id).cloned().ok_or_else(|| lost("size"))?,
        })
    }
}

/// Rows scoped to `store_id`, newest first
fn newest_first<T: Clone>(
    rows: &HashMap<Uuid, T>,
    store_id: Uuid,
    store_of: impl Fn(&T) -> Uuid,
    created_at: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    let mut out: Vec<T> = rows.values().filter(|r| store_of(r) == store_id).cloned().collect();
    out.sort_by_key(|r| std::cmp::Reverse(created_at(r)));
    out
}

/// Catalog held in process memory.
///
/// Applies the same referential rules as the relational schema: references
/// must exist, deletes are restricted while dependents exist, and images go
/// away with their product. Every write holds the table lock for its whole
/// duration, so multi-step writes are atomic.
#[derive(Default)]
pub struct MemoryCatalog {
    tables: RwLock<Tables>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn owned_store(&self, store_id: Uuid, user_id: &str) -> Result<Option<Store>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .stores
            .get(&store_id)
            .filter(|store| store.user_id == user_id)
            .cloned())
    }

    async fn list_stores(&self, user_id: &str) -> Result<Vec<Store>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut stores: Vec<Store> = tables
            .stores
            .values()
            .filter(|store| store.user_id == user_id)
            .cloned()
            .collect();
        stores.sort_by_key(|store| store.created_at);
        Ok(stores)
    }

    async fn create_store(&self, user_id: &str, input: &StoreInput) -> Result<Store, DatabaseError> {
        let mut tables = self.tables.write().await;
        let now = tables.now();
        let store = Store {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            user_id: user_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.stores.insert(store.id, store.clone());
        Ok(store)
    }

    async fn rename_store(
        &self,
        store_id: Uuid,
        user_id: &str,
        input: &SettingsInput,
    ) -> Result<Option<Store>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let now = tables.now();
        let Some(store) = tables
            .stores
            .get_mut(&store_id)
            .filter(|store| store.user_id == user_id)
        else {
            return Ok(None);
        };
        store.name = input.name.clone();
        store.updated_at = now;
        Ok(Some(store.clone()))
    }

    async fn delete_store(&self, store_id: Uuid, user_id: &str) -> Result<Option<Store>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .stores
            .get(&store_id)
            .is_some_and(|store| store.user_id == user_id);
        if !owned {
            return Ok(None);
        }
        if tables.store_has_children(store_id) {
            return Err(DatabaseError::ForeignKeyViolation(format!(
                "store {} still has catalog rows",
                store_id
            )));
        }
        Ok(tables.stores.remove(&store_id))
    }

    async fn list_billboards(&self, store_id: Uuid) -> Result<Vec<Billboard>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.billboards, store_id, |r| r.store_id, |r| r.created_at))
    }

    async fn find_billboard(&self, store_id: Uuid, id: Uuid) -> Result<Option<Billboard>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.billboards.get(&id).filter(|r| r.store_id == store_id).cloned())
    }

    async fn create_billboard(&self, store_id: Uuid, input: &BillboardInput) -> Result<Billboard, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.require_store(store_id)?;
        let now = tables.now();
        let row = Billboard {
            id: Uuid::new_v4(),
            store_id,
            label: input.label.clone(),
            image_url: input.image_url.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.billboards.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_billboard(
        &self,
        store_id: Uuid,
        id: Uuid,
        input: &BillboardInput,
    ) -> Result<Option<Billboard>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let now = tables.now();
        let Some(row) = tables.billboards.get_mut(&id).filter(|r| r.store_id == store_id) else {
            return Ok(None);
        };
        row.label = input.label.clone();
        row.image_url = input.image_url.clone();
        row.updated_at = now;
        Ok(Some(row.clone()))
    }

    async fn delete_billboard(&self, store_id: Uuid, id: Uuid) -> Result<Option<Billboard>, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.billboards.get(&id).is_some_and(|r| r.store_id == store_id) {
            return Ok(None);
        }
        if tables.categories.values().any(|c| c.billboard_id == id) {
            return Err(DatabaseError::ForeignKeyViolation(format!(
                "billboard {} is used by categories",
                id
            )));
        }
        Ok(tables.billboards.remove(&id))
    }

    async fn list_categories(&self, store_id: Uuid) -> Result<Vec<CategoryDetail>, DatabaseError> {
        let tables = self.tables.read().await;
        newest_first(&tables.categories, store_id, |r| r.store_id, |r| r.created_at)
            .iter()
            .map(|category| tables.category_detail(category))
            .collect()
    }

    async fn find_category(&self, store_id: Uuid, id: Uuid) -> Result<Option<CategoryDetail>, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .categories
            .get(&id)
            .filter(|r| r.store_id == store_id)
            .map(|category| tables.category_detail(category))
            .transpose()
    }

    async fn create_category(&self, store_id: Uuid, input: &CategoryInput) -> Result<Category, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.require_store(store_id)?;
        tables.require_billboard(input.billboard_id)?;
        let now = tables.now();
        let row = Category {
            id: Uuid::new_v4(),
            store_id,
            billboard_id: input.billboard_id,
            name: input.name.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.categories.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_category(
        &self,
        store_id: Uuid,
        id: Uuid,
        input: &CategoryInput,
    ) -> Result<Option<Category>, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.categories.get(&id).is_some_and(|r| r.store_id == store_id) {
            return Ok(None);
        }
        tables.require_billboard(input.billboard_id)?;
        let now = tables.now();
        let Some(row) = tables.categories.get_mut(&id) else {
            return Ok(None);
        };
        row.name = input.name.clone();
        row.billboard_id = input.billboard_id;
        row.updated_at = now;
        Ok(Some(row.clone()))
    }

    async fn delete_category(&self, store_id: Uuid, id: Uuid) -> Result<Option<Category>, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.categories.get(&id).is_some_and(|r| r.store_id == store_id) {
            return Ok(None);
        }
        if tables.products.values().any(|p| p.category_id == id) {
            return Err(DatabaseError::ForeignKeyViolation(format!(
                "category {} is used by products",
                id
            )));
        }
        Ok(tables.categories.remove(&id))
    }

    async fn list_colors(&self, store_id: Uuid) -> Result<Vec<Color>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.colors, store_id, |r| r.store_id, |r| r.created_at))
    }

    async fn find_color(&self, store_id: Uuid, id: Uuid) -> Result<Option<Color>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.colors.get(&id).filter(|r| r.store_id == store_id).cloned())
    }

    async fn create_color(&self, store_id: Uuid, input: &ColorInput) -> Result<Color, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.require_store(store_id)?;
        let now = tables.now();
        let row = Color {
            id: Uuid::new_v4(),
            store_id,
            name: input.name.clone(),
            value: input.value.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.colors.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_color(&self, store_id: Uuid, id: Uuid, input: &ColorInput) -> Result<Option<Color>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let now = tables.now();
        let Some(row) = tables.colors.get_mut(&id).filter(|r| r.store_id == store_id) else {
            return Ok(None);
        };
        row.name = input.name.clone();
        row.value = input.value.clone();
        row.updated_at = now;
        Ok(Some(row.clone()))
    }

    async fn delete_color(&self, store_id: Uuid, id: Uuid) -> Result<Option<Color>, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.colors.get(&id).is_some_and(|r| r.store_id == store_id) {
            return Ok(None);
        }
        if tables.products.values().any(|p| p.color_id == id) {
            return Err(DatabaseError::ForeignKeyViolation(format!("color {} is used by products", id)));
        }
        Ok(tables.colors.remove(&id))
    }

    async fn list_sizes(&self, store_id: Uuid) -> Result<Vec<Size>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.sizes, store_id, |r| r.store_id, |r| r.created_at))
    }

    async fn find_size(&self, store_id: Uuid, id: Uuid) -> Result<Option<Size>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.sizes.get(&id).filter(|r| r.store_id == store_id).cloned())
    }

    async fn create_size(&self, store_id: Uuid, input: &SizeInput) -> Result<Size, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.require_store(store_id)?;
        let now = tables.now();
        let row = Size {
            id: Uuid::new_v4(),
            store_id,
            name: input.name.clone(),
            value: input.value.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.sizes.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_size(&self, store_id: Uuid, id: Uuid, input: &SizeInput) -> Result<Option<Size>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let now = tables.now();
        let Some(row) = tables.sizes.get_mut(&id).filter(|r| r.store_id == store_id) else {
            return Ok(None);
        };
        row.name = input.name.clone();
        row.value = input.value.clone();
        row.updated_at = now;
        Ok(Some(row.clone()))
    }

    async fn delete_size(&self, store_id: Uuid, id: Uuid) -> Result<Option<Size>, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.sizes.get(&id).is_some_and(|r| r.store_id == store_id) {
            return Ok(None);
        }
        if tables.products.values().any(|p| p.size_id == id) {
            return Err(DatabaseError::ForeignKeyViolation(format!("size {} is used by products", id)));
        }
        Ok(tables.sizes.remove(&id))
    }

    async fn list_products(&self, store_id: Uuid, filter: &ProductFilter) -> Result<Vec<ProductDetail>, DatabaseError> {
        let tables = self.tables.read().await;
        newest_first(&tables.products, store_id, |r| r.store_id, |r| r.created_at)
            .iter()
            .filter(|product| filter.matches(product))
            .map(|product| tables.product_detail(product))
            .collect()
    }

    async fn find_product(&self, store_id: Uuid, id: Uuid) -> Result<Option<ProductDetail>, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .products
            .get(&id)
            .filter(|r| r.store_id == store_id)
            .map(|product| tables.product_detail(product))
            .transpose()
    }

    async fn create_product(&self, store_id: Uuid, input: &ProductInput) -> Result<ProductDetail, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.require_store(store_id)?;
        tables.require_product_refs(input)?;
        let now = tables.now();
        let product = Product {
            id: Uuid::new_v4(),
            store_id,
            category_id: input.category_id,
            color_id: input.color_id,
            size_id: input.size_id,
            name: input.name.clone(),
            price: input.price,
            is_featured: input.is_featured,
            is_archived: input.is_archived,
            created_at: now,
            updated_at: now,
        };
        tables.products.insert(product.id, product.clone());
        tables.replace_images(product.id, &input.images);
        tables.product_detail(&product)
    }

    async fn update_product(
        &self,
        store_id: Uuid,
        id: Uuid,
        input: &ProductInput,
    ) -> Result<Option<ProductDetail>, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.products.get(&id).is_some_and(|r| r.store_id == store_id) {
            return Ok(None);
        }
        // All checks happen before the first mutation
        tables.require_product_refs(input)?;

        let now = tables.now();
        let Some(product) = tables.products.get_mut(&id) else {
            return Ok(None);
        };
        product.name = input.name.clone();
        product.price = input.price;
        product.category_id = input.category_id;
        product.color_id = input.color_id;
        product.size_id = input.size_id;
        product.is_featured = input.is_featured;
        product.is_archived = input.is_archived;
        product.updated_at = now;
        let product = product.clone();

        tables.replace_images(id, &input.images);
        tables.product_detail(&product).map(Some)
    }

    async fn delete_product(&self, store_id: Uuid, id: Uuid) -> Result<Option<ProductDetail>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let Some(product) = tables.products.get(&id).filter(|r| r.store_id == store_id).cloned() else {
            return Ok(None);
        };
        let detail = tables.product_detail(&product)?;
        tables.products.remove(&id);
        tables.images.retain(|_, image| image.product_id != id);
        Ok(Some(detail))
    }
}
