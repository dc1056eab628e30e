/// Shared types used across the server and the client

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-scoped resource families exposed under `/api/:store_id/*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Billboard,
    Category,
    Color,
    Size,
    Product,
}

impl Entity {
    /// URL path segment, e.g. `billboards`
    pub fn segment(&self) -> &'static str {
        match self {
            Entity::Billboard => "billboards",
            Entity::Category => "categories",
            Entity::Color => "colors",
            Entity::Size => "sizes",
            Entity::Product => "products",
        }
    }

    /// Capitalized singular, used in toasts ("Billboard created.")
    pub fn title(&self) -> &'static str {
        match self {
            Entity::Billboard => "Billboard",
            Entity::Category => "Category",
            Entity::Color => "Color",
            Entity::Size => "Size",
            Entity::Product => "Product",
        }
    }

    /// Lowercase singular ("billboard already taken.")
    pub fn noun(&self) -> &'static str {
        match self {
            Entity::Billboard => "billboard",
            Entity::Category => "category",
            Entity::Color => "color",
            Entity::Size => "size",
            Entity::Product => "product",
        }
    }

    /// Hint shown when a delete is refused because other rows still reference this one.
    pub fn dependents_hint(&self) -> &'static str {
        match self {
            Entity::Billboard => "Make sure you removed all categories using this billboard first.",
            Entity::Category => "Make sure you removed all products using this category first.",
            Entity::Color => "Make sure you removed all products using this color first.",
            Entity::Size => "Make sure you removed all products using this size first.",
            Entity::Product => "Something went wrong.",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}
