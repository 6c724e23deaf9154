//! Product repository for catalog reads and seeding.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use copperleaf_core::{Category, ProductId};

use super::RepositoryError;
use crate::models::product::{NewProduct, Product};

/// Database row for a product, before domain validation.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    title: String,
    description: String,
    price: Decimal,
    original_price: Option<Decimal>,
    discount: i32,
    category: String,
    image_url: String,
    rating: f32,
    reviews: i32,
    in_stock: bool,
    stock: i32,
    featured: bool,
    is_new: bool,
    specs: Json<Vec<String>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let category: Category = row.category.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid category in database: {e}"))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            title: row.title,
            description: row.description,
            price: row.price,
            original_price: row.original_price,
            discount: row.discount,
            category,
            image_url: row.image_url,
            rating: row.rating,
            reviews: row.reviews,
            in_stock: row.in_stock,
            stock: row.stock,
            featured: row.featured,
            is_new: row.is_new,
            specs: row.specs.0,
            created_at: row.created_at,
        })
    }
}

const PRODUCT_COLUMNS: &str = "id, title, description, price, original_price, discount, \
     category, image_url, rating, reviews, in_stock, stock, featured, is_new, specs, created_at";

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, optionally filtered by category and/or featured flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        category: Option<Category>,
        featured: Option<bool>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE ($1::text IS NULL OR category = $1)
               AND ($2::boolean IS NULL OR featured = $2)
             ORDER BY id"
        ))
        .bind(category.map(|c| c.as_str().to_owned()))
        .bind(featured)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Get every product in `ids` that still exists.
    ///
    /// Used for the read-time join that hydrates cart and wishlist responses;
    /// ids whose product is gone are simply absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw_ids: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(raw_ids)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Insert a product (seeding / admin tooling).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products
                 (title, description, price, original_price, discount, category,
                  image_url, rating, reviews, in_stock, stock, featured, is_new, specs)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&product.title)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.original_price)
        .bind(product.discount)
        .bind(product.category.as_str())
        .bind(&product.image_url)
        .bind(product.rating)
        .bind(product.reviews)
        .bind(product.in_stock)
        .bind(product.stock)
        .bind(product.featured)
        .bind(product.is_new)
        .bind(Json(&product.specs))
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Number of products in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
