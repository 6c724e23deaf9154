//! Order repository.
//!
//! Every read is scoped to the owning user; there is no unscoped order
//! lookup on purpose.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use copperleaf_core::{OrderId, OrderStatus, PaymentMethod, UserId};

use super::RepositoryError;
use crate::models::order::{NewOrder, Order, OrderItem, PaymentDetails};
use crate::models::user::Address;

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    items: Json<Vec<OrderItem>>,
    shipping_address: Json<Address>,
    payment_method: String,
    payment_details: Option<Json<PaymentDetails>>,
    subtotal: Decimal,
    tax: Decimal,
    total: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let payment_method: PaymentMethod = row.payment_method.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid payment method in database: {e}"))
        })?;
        let status: OrderStatus = row.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            items: row.items.0,
            shipping_address: row.shipping_address.0,
            payment_method,
            payment_details: row.payment_details.map(|d| d.0),
            subtotal: row.subtotal,
            tax: row.tax,
            total: row.total,
            status,
            created_at: row.created_at,
        })
    }
}

const ORDER_COLUMNS: &str = "id, user_id, items, shipping_address, payment_method, \
     payment_details, subtotal, tax, total, status, created_at";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a validated order with initial status `pending`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders
                 (user_id, items, shipping_address, payment_method, payment_details,
                  subtotal, tax, total)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order.user_id.as_i32())
        .bind(Json(&order.items))
        .bind(Json(&order.shipping_address))
        .bind(order.payment_method.to_string())
        .bind(order.payment_details.as_ref().map(Json))
        .bind(order.subtotal)
        .bind(order.tax)
        .bind(order.total)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// All orders for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// A single order, scoped to its owner.
    ///
    /// Returns `None` both when the order is absent and when it belongs to
    /// someone else; callers cannot distinguish the two.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2"
        ))
        .bind(id.as_i32())
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }

    /// Move an order's status, conditional on the status it was read at.
    ///
    /// # Returns
    ///
    /// `true` if the transition landed; `false` if the order vanished or its
    /// status moved underneath us.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_status_if(
        &self,
        id: OrderId,
        user_id: UserId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders SET status = $3 WHERE id = $1 AND user_id = $2 AND status = $4",
        )
        .bind(id.as_i32())
        .bind(user_id.as_i32())
        .bind(to.to_string())
        .bind(from.to_string())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an order, scoped to its owner.
    ///
    /// # Returns
    ///
    /// Returns `true` if the order was deleted, `false` if it didn't exist
    /// or belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1 AND user_id = $2")
            .bind(id.as_i32())
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
