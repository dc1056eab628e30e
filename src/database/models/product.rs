use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Category, Color, Size};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub store_id: Uuid,
    pub category_id: Uuid,
    pub color_id: Uuid,
    pub size_id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub is_featured: bool,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: Uuid,
    pub product_id: Uuid,
    pub url: String,
    /// Index within the submitted image list
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product as returned by reads and writes: images plus the referenced rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<Image>,
    pub category: Category,
    pub color: Color,
    pub size: Size,
}

/// Query-string filters accepted by GET /api/:store_id/products
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub category_id: Option<Uuid>,
    pub color_id: Option<Uuid>,
    pub size_id: Option<Uuid>,
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub include_archived: bool,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if !self.include_archived && product.is_archived {
            return false;
        }
        if self.category_id.is_some_and(|id| id != product.category_id) {
            return false;
        }
        if self.color_id.is_some_and(|id| id != product.color_id) {
            return false;
        }
        if self.size_id.is_some_and(|id| id != product.size_id) {
            return false;
        }
        if self.is_featured.is_some_and(|featured| featured != product.is_featured) {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(is_featured: bool, is_archived: bool) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            store_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            color_id: Uuid::new_v4(),
            size_id: Uuid::new_v4(),
            name: "Hoodie".into(),
            price: Decimal::from(40),
            is_featured,
            is_archived,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn archived_products_are_hidden_by_default() {
        let archived = product(false, true);
        assert!(!ProductFilter::default().matches(&archived));
        let filter = ProductFilter { include_archived: true, ..Default::default() };
        assert!(filter.matches(&archived));
    }

    #[test]
    fn filters_by_reference_and_flag() {
        let p = product(true, false);
        let by_category = ProductFilter { category_id: Some(p.category_id), ..Default::default() };
        assert!(by_category.matches(&p));
        let other_color = ProductFilter { color_id: Some(Uuid::new_v4()), ..Default::default() };
        assert!(!other_color.matches(&p));
        let not_featured = ProductFilter { is_featured: Some(false), ..Default::default() };
        assert!(!not_featured.matches(&p));
    }
}
