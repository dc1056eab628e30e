use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{Candidate, Rule, Validate, ValidationError};

/// POST /api/stores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreInput {
    pub name: String,
}

impl Validate for StoreInput {
    fn validate(candidate: &Value) -> Result<Self, ValidationError> {
        let mut c = Candidate::new(candidate)?;
        let name = c.string("name", &[Rule::MinLen(1)]);
        c.finish()?;
        Ok(Self { name })
    }
}

/// PATCH /api/stores/:store_id (store settings form)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsInput {
    pub name: String,
}

impl Validate for SettingsInput {
    fn validate(candidate: &Value) -> Result<Self, ValidationError> {
        let mut c = Candidate::new(candidate)?;
        let name = c.string("name", &[Rule::MinLen(2)]);
        c.finish()?;
        Ok(Self { name })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillboardInput {
    pub label: String,
    pub image_url: String,
}

impl Validate for BillboardInput {
    fn validate(candidate: &Value) -> Result<Self, ValidationError> {
        let mut c = Candidate::new(candidate)?;
        let label = c.string("label", &[Rule::MinLen(1)]);
        let image_url = c.string("imageUrl", &[Rule::MinLen(1)]);
        c.finish()?;
        Ok(Self { label, image_url })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    pub billboard_id: Uuid,
}

impl Validate for CategoryInput {
    fn validate(candidate: &Value) -> Result<Self, ValidationError> {
        let mut c = Candidate::new(candidate)?;
        let name = c.string("name", &[Rule::MinLen(2)]);
        let billboard_id = c.uuid("billboardId");
        c.finish()?;
        Ok(Self { name, billboard_id })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorInput {
    pub name: String,
    /// Hex code such as `#abc123`
    pub value: String,
}

impl Validate for ColorInput {
    fn validate(candidate: &Value) -> Result<Self, ValidationError> {
        let mut c = Candidate::new(candidate)?;
        let name = c.string("name", &[Rule::MinLen(2)]);
        let value = c.string(
            "value",
            &[
                Rule::MinLen(4),
                Rule::MaxLen(9),
                Rule::StartsWith("#", "String must be a valid hex code"),
            ],
        );
        c.finish()?;
        Ok(Self { name, value })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeInput {
    pub name: String,
    pub value: String,
}

impl Validate for SizeInput {
    fn validate(candidate: &Value) -> Result<Self, ValidationError> {
        let mut c = Candidate::new(candidate)?;
        let name = c.string("name", &[Rule::MinLen(2)]);
        let value = c.string("value", &[Rule::MinLen(1)]);
        c.finish()?;
        Ok(Self { name, value })
    }
}

/// Fits the NUMERIC(12, 2) price column
const PRICE_SCALE: u32 = 2;
const PRICE_LIMIT: i64 = 10_000_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInput {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category_id: Uuid,
    pub color_id: Uuid,
    pub size_id: Uuid,
    pub images: Vec<ImageInput>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_archived: bool,
}

impl Validate for ProductInput {
    fn validate(candidate: &Value) -> Result<Self, ValidationError> {
        let mut c = Candidate::new(candidate)?;
        let name = c.string("name", &[Rule::MinLen(1)]);
        let price = c.positive_decimal("price", PRICE_SCALE, Decimal::from(PRICE_LIMIT));
        let category_id = c.uuid("categoryId");
        let color_id = c.uuid("colorId");
        let size_id = c.uuid("sizeId");
        let images = c.objects("images", 1, |image| ImageInput {
            url: image.string("url", &[Rule::MinLen(1)]),
        });
        let is_featured = c.boolean("isFeatured", false);
        let is_archived = c.boolean("isArchived", false);
        c.finish()?;
        Ok(Self {
            name,
            price,
            category_id,
            color_id,
            size_id,
            images,
            is_featured,
            is_archived,
        })
    }
}
