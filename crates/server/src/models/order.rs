//! Order domain types.
//!
//! An order captures a snapshot of the purchased items (title, price, image,
//! quantity) at creation time, deliberately decoupled from later catalog
//! changes. Orders are immutable after creation except for the status field.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use copperleaf_core::{OrderId, OrderStatus, PaymentMethod, ProductId, UserId};

use super::user::Address;

/// One purchased item, copied from the basket at order-creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub quantity: u32,
    pub image_url: String,
}

impl OrderItem {
    /// The line's contribution to the order subtotal.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Partial payment metadata kept with the order.
///
/// Only the card fields the checkout form collects; never a full PAN
/// verification trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_name: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(skip)]
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub shipping_address: Address,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_details: Option<PaymentDetails>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// A validated order ready to persist.
///
/// Built by the order pipeline after validation; `total` is computed
/// server-side as `subtotal + tax`.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub shipping_address: Address,
    pub payment_method: PaymentMethod,
    pub payment_details: Option<PaymentDetails>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            product_id: ProductId::new(1),
            title: "Aurora Wireless Headphones".to_owned(),
            price: Decimal::new(100, 0),
            quantity: 2,
            image_url: "https://img.example.com/headphones".to_owned(),
        };
        assert_eq!(item.line_total(), Decimal::new(200, 0));
    }

    #[test]
    fn test_item_wire_format() {
        let item = OrderItem {
            product_id: ProductId::new(7),
            title: "Desk Lamp".to_owned(),
            price: Decimal::new(4500, 2),
            quantity: 1,
            image_url: "https://img.example.com/lamp".to_owned(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["productId"], 7);
        // Money travels as strings to keep decimal precision on the wire.
        assert_eq!(json["price"], "45.00");
        assert_eq!(json["imageUrl"], "https://img.example.com/lamp");
    }
}
