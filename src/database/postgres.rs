use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::catalog::Catalog;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    Billboard, Category, CategoryDetail, Color, Image, Product, ProductDetail, ProductFilter, Size, Store,
};
use crate::validation::{
    BillboardInput, CategoryInput, ColorInput, ImageInput, ProductInput, SettingsInput, SizeInput, StoreInput,
};

const STORE_COLUMNS: &str = "id, name, user_id, created_at, updated_at";
const BILLBOARD_COLUMNS: &str = "id, store_id, label, image_url, created_at, updated_at";
const CATEGORY_COLUMNS: &str = "id, store_id, billboard_id, name, created_at, updated_at";
const COLOR_COLUMNS: &str = "id, store_id, name, value, created_at, updated_at";
const SIZE_COLUMNS: &str = "id, store_id, name, value, created_at, updated_at";
const PRODUCT_COLUMNS: &str =
    "id, store_id, category_id, color_id, size_id, name, price, is_featured, is_archived, created_at, updated_at";
const IMAGE_COLUMNS: &str = "id, product_id, url, position, created_at, updated_at";

/// Catalog backed by PostgreSQL through a shared sqlx pool
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn images_for(&self, product_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Image>>, DatabaseError> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let images = sqlx::query_as::<_, Image>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM images WHERE product_id = ANY($1) ORDER BY product_id, position ASC"
        ))
        .bind(product_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<Image>> = HashMap::new();
        for image in images {
            grouped.entry(image.product_id).or_default().push(image);
        }
        Ok(grouped)
    }

    /// Attach images and referenced rows to bare product rows
    async fn detail_products(&self, products: Vec<Product>) -> Result<Vec<ProductDetail>, DatabaseError> {
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
        let category_ids: Vec<Uuid> = products.iter().map(|p| p.category_id).collect();
        let color_ids: Vec<Uuid> = products.iter().map(|p| p.color_id).collect();
        let size_ids: Vec<Uuid> = products.iter().map(|p| p.size_id).collect();

        let (mut images, categories, colors, sizes) = futures::try_join!(
            self.images_for(&ids),
            self.rows_by_id::<Category>("categories", CATEGORY_COLUMNS, &category_ids),
            self.rows_by_id::<Color>("colors", COLOR_COLUMNS, &color_ids),
            self.rows_by_id::<Size>("sizes", SIZE_COLUMNS, &size_ids),
        )?;
        let categories: HashMap<Uuid, Category> = categories.into_iter().map(|row| (row.id, row)).collect();
        let colors: HashMap<Uuid, Color> = colors.into_iter().map(|row| (row.id, row)).collect();
        let sizes: HashMap<Uuid, Size> = sizes.into_iter().map(|row| (row.id, row)).collect();

        let mut details = Vec::with_capacity(products.len());
        for product in products {
            let (Some(category), Some(color), Some(size)) = (
                categories.get(&product.category_id),
                colors.get(&product.color_id),
                sizes.get(&product.size_id),
            ) else {
                return Err(DatabaseError::QueryError(format!(
                    "product {} references missing rows",
                    product.id
                )));
            };
            details.push(ProductDetail {
                images: images.remove(&product.id).unwrap_or_default(),
                category: category.clone(),
                color: color.clone(),
                size: size.clone(),
                product,
            });
        }
        Ok(details)
    }

    async fn rows_by_id<T>(&self, table: &str, columns: &str, ids: &[Uuid]) -> Result<Vec<T>, DatabaseError>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        let rows = sqlx::query_as::<_, T>(&format!("SELECT {columns} FROM {table} WHERE id = ANY($1)"))
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert_images(
        tx: &mut Transaction<'_, Postgres>,
        product_id: Uuid,
        images: &[ImageInput],
    ) -> Result<(), DatabaseError> {
        for (position, image) in images.iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|_| DatabaseError::QueryError(format!("image position {} out of range", position)))?;
            sqlx::query("INSERT INTO images (id, product_id, url, position) VALUES ($1, $2, $3, $4)")
                .bind(Uuid::new_v4())
                .bind(product_id)
                .bind(&image.url)
                .bind(position)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn owned_store(&self, store_id: Uuid, user_id: &str) -> Result<Option<Store>, DatabaseError> {
        let store = sqlx::query_as::<_, Store>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE id = $1 AND user_id = $2"
        ))
        .bind(store_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(store)
    }

    async fn list_stores(&self, user_id: &str) -> Result<Vec<Store>, DatabaseError> {
        let stores = sqlx::query_as::<_, Store>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE user_id = $1 ORDER BY created_at ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(stores)
    }

    async fn create_store(&self, user_id: &str, input: &StoreInput) -> Result<Store, DatabaseError> {
        let store = sqlx::query_as::<_, Store>(&format!(
            "INSERT INTO stores (id, name, user_id) VALUES ($1, $2, $3) RETURNING {STORE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(store)
    }

    async fn rename_store(
        &self,
        store_id: Uuid,
        user_id: &str,
        input: &SettingsInput,
    ) -> Result<Option<Store>, DatabaseError> {
        let store = sqlx::query_as::<_, Store>(&format!(
            "UPDATE stores SET name = $3, updated_at = now() WHERE id = $1 AND user_id = $2 RETURNING {STORE_COLUMNS}"
        ))
        .bind(store_id)
        .bind(user_id)
        .bind(&input.name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(store)
    }

    async fn delete_store(&self, store_id: Uuid, user_id: &str) -> Result<Option<Store>, DatabaseError> {
        let store = sqlx::query_as::<_, Store>(&format!(
            "DELETE FROM stores WHERE id = $1 AND user_id = $2 RETURNING {STORE_COLUMNS}"
        ))
        .bind(store_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(store)
    }

    async fn list_billboards(&self, store_id: Uuid) -> Result<Vec<Billboard>, DatabaseError> {
        let rows = sqlx::query_as::<_, Billboard>(&format!(
            "SELECT {BILLBOARD_COLUMNS} FROM billboards WHERE store_id = $1 ORDER BY created_at DESC"
        ))
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_billboard(&self, store_id: Uuid, id: Uuid) -> Result<Option<Billboard>, DatabaseError> {
        let row = sqlx::query_as::<_, Billboard>(&format!(
            "SELECT {BILLBOARD_COLUMNS} FROM billboards WHERE id = $1 AND store_id = $2"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_billboard(&self, store_id: Uuid, input: &BillboardInput) -> Result<Billboard, DatabaseError> {
        let row = sqlx::query_as::<_, Billboard>(&format!(
            "INSERT INTO billboards (id, store_id, label, image_url) VALUES ($1, $2, $3, $4) RETURNING {BILLBOARD_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(store_id)
        .bind(&input.label)
        .bind(&input.image_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_billboard(
        &self,
        store_id: Uuid,
        id: Uuid,
        input: &BillboardInput,
    ) -> Result<Option<Billboard>, DatabaseError> {
        let row = sqlx::query_as::<_, Billboard>(&format!(
            "UPDATE billboards SET label = $3, image_url = $4, updated_at = now() \
             WHERE id = $1 AND store_id = $2 RETURNING {BILLBOARD_COLUMNS}"
        ))
        .bind(id)
        .bind(store_id)
        .bind(&input.label)
        .bind(&input.image_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_billboard(&self, store_id: Uuid, id: Uuid) -> Result<Option<Billboard>, DatabaseError> {
        let row = sqlx::query_as::<_, Billboard>(&format!(
            "DELETE FROM billboards WHERE id = $1 AND store_id = $2 RETURNING {BILLBOARD_COLUMNS}"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_categories(&self, store_id: Uuid) -> Result<Vec<CategoryDetail>, DatabaseError> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE store_id = $1 ORDER BY created_at DESC"
        ))
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        let billboard_ids: Vec<Uuid> = categories.iter().map(|c| c.billboard_id).collect();
        let billboards: HashMap<Uuid, Billboard> = sqlx::query_as::<_, Billboard>(&format!(
            "SELECT {BILLBOARD_COLUMNS} FROM billboards WHERE id = ANY($1)"
        ))
        .bind(&billboard_ids)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|b| (b.id, b))
        .collect();

        categories
            .into_iter()
            .map(|category| {
                let billboard = billboards.get(&category.billboard_id).cloned().ok_or_else(|| {
                    DatabaseError::QueryError(format!("category {} lost its billboard", category.id))
                })?;
                Ok(CategoryDetail { category, billboard })
            })
            .collect()
    }

    async fn find_category(&self, store_id: Uuid, id: Uuid) -> Result<Option<CategoryDetail>, DatabaseError> {
        let Some(category) = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1 AND store_id = $2"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let billboard = sqlx::query_as::<_, Billboard>(&format!(
            "SELECT {BILLBOARD_COLUMNS} FROM billboards WHERE id = $1"
        ))
        .bind(category.billboard_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Some(CategoryDetail { category, billboard }))
    }

    async fn create_category(&self, store_id: Uuid, input: &CategoryInput) -> Result<Category, DatabaseError> {
        let row = sqlx::query_as::<_, Category>(&format!(
            "INSERT INTO categories (id, store_id, billboard_id, name) VALUES ($1, $2, $3, $4) RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(store_id)
        .bind(input.billboard_id)
        .bind(&input.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_category(
        &self,
        store_id: Uuid,
        id: Uuid,
        input: &CategoryInput,
    ) -> Result<Option<Category>, DatabaseError> {
        let row = sqlx::query_as::<_, Category>(&format!(
            "UPDATE categories SET name = $3, billboard_id = $4, updated_at = now() \
             WHERE id = $1 AND store_id = $2 RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(id)
        .bind(store_id)
        .bind(&input.name)
        .bind(input.billboard_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_category(&self, store_id: Uuid, id: Uuid) -> Result<Option<Category>, DatabaseError> {
        let row = sqlx::query_as::<_, Category>(&format!(
            "DELETE FROM categories WHERE id = $1 AND store_id = $2 RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_colors(&self, store_id: Uuid) -> Result<Vec<Color>, DatabaseError> {
        let rows = sqlx::query_as::<_, Color>(&format!(
            "SELECT {COLOR_COLUMNS} FROM colors WHERE store_id = $1 ORDER BY created_at DESC"
        ))
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_color(&self, store_id: Uuid, id: Uuid) -> Result<Option<Color>, DatabaseError> {
        let row = sqlx::query_as::<_, Color>(&format!(
            "SELECT {COLOR_COLUMNS} FROM colors WHERE id = $1 AND store_id = $2"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_color(&self, store_id: Uuid, input: &ColorInput) -> Result<Color, DatabaseError> {
        let row = sqlx::query_as::<_, Color>(&format!(
            "INSERT INTO colors (id, store_id, name, value) VALUES ($1, $2, $3, $4) RETURNING {COLOR_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(store_id)
        .bind(&input.name)
        .bind(&input.value)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_color(&self, store_id: Uuid, id: Uuid, input: &ColorInput) -> Result<Option<Color>, DatabaseError> {
        let row = sqlx::query_as::<_, Color>(&format!(
            "UPDATE colors SET name = $3, value = $4, updated_at = now() \
             WHERE id = $1 AND store_id = $2 RETURNING {COLOR_COLUMNS}"
        ))
        .bind(id)
        .bind(store_id)
        .bind(&input.name)
        .bind(&input.value)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_color(&self, store_id: Uuid, id: Uuid) -> Result<Option<Color>, DatabaseError> {
        let row = sqlx::query_as::<_, Color>(&format!(
            "DELETE FROM colors WHERE id = $1 AND store_id = $2 RETURNING {COLOR_COLUMNS}"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_sizes(&self, store_id: Uuid) -> Result<Vec<Size>, DatabaseError> {
        let rows = sqlx::query_as::<_, Size>(&format!(
            "SELECT {SIZE_COLUMNS} FROM sizes WHERE store_id = $1 ORDER BY created_at DESC"
        ))
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_size(&self, store_id: Uuid, id: Uuid) -> Result<Option<Size>, DatabaseError> {
        let row = sqlx::query_as::<_, Size>(&format!(
            "SELECT {SIZE_COLUMNS} FROM sizes WHERE id = $1 AND store_id = $2"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_size(&self, store_id: Uuid, input: &SizeInput) -> Result<Size, DatabaseError> {
        let row = sqlx::query_as::<_, Size>(&format!(
            "INSERT INTO sizes (id, store_id, name, value) VALUES ($1, $2, $3, $4) RETURNING {SIZE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(store_id)
        .bind(&input.name)
        .bind(&input.value)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_size(&self, store_id: Uuid, id: Uuid, input: &SizeInput) -> Result<Option<Size>, DatabaseError> {
        let row = sqlx::query_as::<_, Size>(&format!(
            "UPDATE sizes SET name = $3, value = $4, updated_at = now() \
             WHERE id = $1 AND store_id = $2 RETURNING {SIZE_COLUMNS}"
        ))
        .bind(id)
        .bind(store_id)
        .bind(&input.name)
        .bind(&input.value)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_size(&self, store_id: Uuid, id: Uuid) -> Result<Option<Size>, DatabaseError> {
        let row = sqlx::query_as::<_, Size>(&format!(
            "DELETE FROM sizes WHERE id = $1 AND store_id = $2 RETURNING {SIZE_COLUMNS}"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_products(&self, store_id: Uuid, filter: &ProductFilter) -> Result<Vec<ProductDetail>, DatabaseError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE store_id = $1 \
               AND ($2::uuid IS NULL OR category_id = $2) \
               AND ($3::uuid IS NULL OR color_id = $3) \
               AND ($4::uuid IS NULL OR size_id = $4) \
               AND ($5::boolean IS NULL OR is_featured = $5) \
               AND ($6 OR is_archived = false) \
             ORDER BY created_at DESC"
        ))
        .bind(store_id)
        .bind(filter.category_id)
        .bind(filter.color_id)
        .bind(filter.size_id)
        .bind(filter.is_featured)
        .bind(filter.include_archived)
        .fetch_all(&self.pool)
        .await?;

        self.detail_products(products).await
    }

    async fn find_product(&self, store_id: Uuid, id: Uuid) -> Result<Option<ProductDetail>, DatabaseError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 AND store_id = $2"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;

        match product {
            Some(product) => Ok(self.detail_products(vec![product]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create_product(&self, store_id: Uuid, input: &ProductInput) -> Result<ProductDetail, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (id, store_id, category_id, color_id, size_id, name, price, is_featured, is_archived) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(store_id)
        .bind(input.category_id)
        .bind(input.color_id)
        .bind(input.size_id)
        .bind(&input.name)
        .bind(input.price)
        .bind(input.is_featured)
        .bind(input.is_archived)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_images(&mut tx, product.id, &input.images).await?;
        tx.commit().await?;

        self.find_product(store_id, product.id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("product {} vanished after insert", product.id)))
    }

    async fn update_product(
        &self,
        store_id: Uuid,
        id: Uuid,
        input: &ProductInput,
    ) -> Result<Option<ProductDetail>, DatabaseError> {
        // Scalar replace, image purge and image insert commit together or not at all
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET name = $3, price = $4, category_id = $5, color_id = $6, size_id = $7, \
             is_featured = $8, is_archived = $9, updated_at = now() \
             WHERE id = $1 AND store_id = $2 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(store_id)
        .bind(&input.name)
        .bind(input.price)
        .bind(input.category_id)
        .bind(input.color_id)
        .bind(input.size_id)
        .bind(input.is_featured)
        .bind(input.is_archived)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query("DELETE FROM images WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::insert_images(&mut tx, id, &input.images).await?;
        tx.commit().await?;

        self.find_product(store_id, id).await
    }

    async fn delete_product(&self, store_id: Uuid, id: Uuid) -> Result<Option<ProductDetail>, DatabaseError> {
        let Some(detail) = self.find_product(store_id, id).await? else {
            return Ok(None);
        };

        // Images cascade
        let deleted = sqlx::query("DELETE FROM products WHERE id = $1 AND store_id = $2")
            .bind(id)
            .bind(store_id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(detail))
    }
}
