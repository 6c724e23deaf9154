//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use copperleaf_core::{Category, ProductId};

/// A catalog product.
///
/// Read-only from the cart and order flows; only seeding and admin tooling
/// create or modify products.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    pub title: String,
    pub description: String,
    /// Current sale price, non-negative.
    pub price: Decimal,
    /// Pre-discount price, when the product is discounted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    /// Discount percentage in [0, 100].
    pub discount: i32,
    pub category: Category,
    pub image_url: String,
    /// Average review rating in [0, 5].
    pub rating: f32,
    /// Number of reviews behind the rating.
    pub reviews: i32,
    pub in_stock: bool,
    pub stock: i32,
    pub featured: bool,
    pub is_new: bool,
    pub specs: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a product (seeding / admin tooling).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub discount: i32,
    pub category: Category,
    pub image_url: String,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub reviews: i32,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default = "default_stock")]
    pub stock: i32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub specs: Vec<String>,
}

const fn default_true() -> bool {
    true
}

const fn default_stock() -> i32 {
    100
}
