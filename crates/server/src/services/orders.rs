//! Order pipeline.
//!
//! Snapshots a client-supplied basket plus shipping and payment input into an
//! immutable order record. Validation enumerates every invalid field in one
//! pass; the order total is computed server-side as `subtotal + tax` so the
//! invariant holds by construction.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use copperleaf_core::{OrderId, OrderStatus, PaymentMethod, ProductId, UserId};

use crate::db::RepositoryError;
use crate::db::orders::OrderRepository;
use crate::error::FieldError;
use crate::models::order::{NewOrder, Order, OrderItem, PaymentDetails};
use crate::models::user::Address;
use crate::services::auth::AuthService;

/// Errors from order operations.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// One or more request fields are invalid.
    #[error("order validation failed")]
    Validation(Vec<FieldError>),

    /// The order is absent or belongs to someone else.
    #[error("order not found")]
    NotFound,

    /// The requested status change breaks the fulfillment sequence.
    #[error("cannot change status from {from} to {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    /// The order's status moved while this request was in flight.
    #[error("order was modified concurrently, please retry")]
    ConcurrentUpdate,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Unvalidated order input, exactly as the client sent it.
///
/// Every field is optional or defaulted so one validation pass can report
/// all problems at once instead of failing on the first missing field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderDraft {
    pub items: Vec<ItemDraft>,
    pub shipping_address: AddressDraft,
    pub payment_method: Option<String>,
    pub payment_details: Option<PaymentDetails>,
    pub subtotal: Option<Decimal>,
    pub tax: Option<Decimal>,
}

/// One unvalidated basket line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemDraft {
    pub product_id: Option<ProductId>,
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<u32>,
    pub image_url: Option<String>,
}

/// Unvalidated shipping address.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressDraft {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

/// Order pipeline service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
    accounts: AuthService<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            accounts: AuthService::new(pool),
        }
    }

    /// Validate and persist an order with initial status `pending`.
    ///
    /// As a side effect the shipping address is appended to the user's saved
    /// addresses unless an equivalent one (street + postal code) is already
    /// present. The two writes are independent: a failed address save is
    /// logged and the order stands.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` enumerating every invalid field.
    pub async fn create(&self, user_id: UserId, draft: OrderDraft) -> Result<Order, OrderError> {
        let new_order = validate_draft(user_id, draft).map_err(OrderError::Validation)?;

        let order = self.orders.create(&new_order).await?;

        if let Err(e) = self
            .accounts
            .save_address_if_new(user_id, &order.shipping_address)
            .await
        {
            tracing::warn!(%user_id, error = %e, "failed to save shipping address from order");
        }

        Ok(order)
    }

    /// All of the caller's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_mine(&self, user_id: UserId) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_for_user(user_id).await?)
    }

    /// A single order, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order is absent or not owned by
    /// the caller.
    pub async fn get(&self, id: OrderId, user_id: UserId) -> Result<Order, OrderError> {
        self.orders
            .get_for_user(id, user_id)
            .await?
            .ok_or(OrderError::NotFound)
    }

    /// Move an order along the status sequence.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order is absent or not owned by
    /// the caller, and `OrderError::InvalidTransition` if the change breaks
    /// the fulfillment sequence.
    pub async fn update_status(
        &self,
        id: OrderId,
        user_id: UserId,
        next: OrderStatus,
    ) -> Result<Order, OrderError> {
        let order = self.get(id, user_id).await?;

        if !order.status.can_transition_to(next) {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: next,
            });
        }

        if self
            .orders
            .set_status_if(id, user_id, order.status, next)
            .await?
        {
            Ok(Order {
                status: next,
                ..order
            })
        } else {
            Err(OrderError::ConcurrentUpdate)
        }
    }

    /// Delete an order, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order is absent or not owned by
    /// the caller.
    pub async fn delete(&self, id: OrderId, user_id: UserId) -> Result<(), OrderError> {
        let deleted = self.orders.delete_for_user(id, user_id).await?;
        if !deleted {
            return Err(OrderError::NotFound);
        }
        Ok(())
    }
}

/// Check every field of the draft, collecting all problems.
///
/// On success returns the order ready to persist, with
/// `total = subtotal + tax` computed here.
fn validate_draft(user_id: UserId, draft: OrderDraft) -> Result<NewOrder, Vec<FieldError>> {
    let mut errors = Vec::new();

    let items = validate_items(&draft.items, &mut errors);
    let shipping_address = validate_address(&draft.shipping_address, &mut errors);

    let payment_method = match draft.payment_method.as_deref() {
        None | Some("") => {
            errors.push(FieldError::new("paymentMethod", "is required"));
            None
        }
        Some(raw) => match raw.parse::<PaymentMethod>() {
            Ok(method) => Some(method),
            Err(_) => {
                errors.push(FieldError::new(
                    "paymentMethod",
                    "must be one of card, paypal, cod",
                ));
                None
            }
        },
    };

    let subtotal = validate_amount(draft.subtotal, "subtotal", &mut errors);
    let tax = validate_amount(draft.tax, "tax", &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    // All Options are Some here; the guards above pushed an error otherwise.
    let (Some(shipping_address), Some(payment_method), Some(subtotal), Some(tax)) =
        (shipping_address, payment_method, subtotal, tax)
    else {
        return Err(vec![FieldError::new("request", "is invalid")]);
    };

    Ok(NewOrder {
        user_id,
        items,
        shipping_address,
        payment_method,
        payment_details: draft.payment_details,
        subtotal,
        tax,
        total: subtotal + tax,
    })
}

fn validate_items(drafts: &[ItemDraft], errors: &mut Vec<FieldError>) -> Vec<OrderItem> {
    if drafts.is_empty() {
        errors.push(FieldError::new("items", "at least one item is required"));
        return Vec::new();
    }

    let mut items = Vec::with_capacity(drafts.len());
    for (i, draft) in drafts.iter().enumerate() {
        let product_id = draft.product_id;
        if product_id.is_none() {
            errors.push(FieldError::new(format!("items[{i}].productId"), "is required"));
        }

        let title = draft.title.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() {
            errors.push(FieldError::new(format!("items[{i}].title"), "is required"));
        }

        match draft.price {
            None => errors.push(FieldError::new(format!("items[{i}].price"), "is required")),
            Some(price) if price < Decimal::ZERO => {
                errors.push(FieldError::new(
                    format!("items[{i}].price"),
                    "must be non-negative",
                ));
            }
            Some(_) => {}
        }

        match draft.quantity {
            None => errors.push(FieldError::new(
                format!("items[{i}].quantity"),
                "is required",
            )),
            Some(0) => errors.push(FieldError::new(
                format!("items[{i}].quantity"),
                "must be at least 1",
            )),
            Some(_) => {}
        }

        if let (Some(product_id), Some(price), Some(quantity)) =
            (product_id, draft.price, draft.quantity)
            && !title.is_empty()
            && price >= Decimal::ZERO
            && quantity >= 1
        {
            items.push(OrderItem {
                product_id,
                title: title.to_owned(),
                price,
                quantity,
                image_url: draft.image_url.clone().unwrap_or_default(),
            });
        }
    }

    items
}

fn validate_address(draft: &AddressDraft, errors: &mut Vec<FieldError>) -> Option<Address> {
    let mut require = |value: &Option<String>, field: &str| -> Option<String> {
        let trimmed = value.as_deref().map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            errors.push(FieldError::new(
                format!("shippingAddress.{field}"),
                "is required",
            ));
            None
        } else {
            Some(trimmed.to_owned())
        }
    };

    let address = require(&draft.address, "address");
    let city = require(&draft.city, "city");
    let state = require(&draft.state, "state");
    let zip_code = require(&draft.zip_code, "zipCode");
    let country = require(&draft.country, "country");

    Some(Address {
        full_name: draft.full_name.clone(),
        email: draft.email.clone(),
        phone: draft.phone.clone(),
        address: address?,
        city: city?,
        state: state?,
        zip_code: zip_code?,
        country: country?,
    })
}

fn validate_amount(
    value: Option<Decimal>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<Decimal> {
    match value {
        None => {
            errors.push(FieldError::new(field, "is required"));
            None
        }
        Some(amount) if amount < Decimal::ZERO => {
            errors.push(FieldError::new(field, "must be non-negative"));
            None
        }
        Some(amount) => Some(amount),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn address_draft() -> AddressDraft {
        AddressDraft {
            full_name: Some("Jo Shopper".to_owned()),
            email: None,
            phone: None,
            address: Some("12 Oak Ave".to_owned()),
            city: Some("Springfield".to_owned()),
            state: Some("IL".to_owned()),
            zip_code: Some("62704".to_owned()),
            country: Some("US".to_owned()),
        }
    }

    fn item_draft(id: i32, price: i64, quantity: u32) -> ItemDraft {
        ItemDraft {
            product_id: Some(ProductId::new(id)),
            title: Some(format!("Product {id}")),
            price: Some(Decimal::new(price, 0)),
            quantity: Some(quantity),
            image_url: Some("https://img.example.com/p".to_owned()),
        }
    }

    fn valid_draft() -> OrderDraft {
        OrderDraft {
            items: vec![item_draft(1, 100, 2), item_draft(2, 50, 1)],
            shipping_address: address_draft(),
            payment_method: Some("card".to_owned()),
            payment_details: Some(PaymentDetails {
                card_number: Some("4242".to_owned()),
                card_name: Some("Jo Shopper".to_owned()),
            }),
            subtotal: Some(Decimal::new(250, 0)),
            tax: Some(Decimal::new(25, 0)),
        }
    }

    #[test]
    fn test_valid_draft_computes_total() {
        // A:100x2 + B:50x1 -> subtotal 250, tax at 10% is 25, total 275.
        let order = validate_draft(UserId::new(1), valid_draft()).unwrap();

        assert_eq!(order.subtotal, Decimal::new(250, 0));
        assert_eq!(order.tax, Decimal::new(25, 0));
        assert_eq!(order.total, Decimal::new(275, 0));
        assert_eq!(order.total, order.subtotal + order.tax);
        assert_eq!(order.items.len(), 2);
    }

    #[test]
    fn test_empty_draft_enumerates_every_field() {
        let errors = validate_draft(UserId::new(1), OrderDraft::default()).unwrap_err();

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"items"));
        assert!(fields.contains(&"shippingAddress.address"));
        assert!(fields.contains(&"shippingAddress.city"));
        assert!(fields.contains(&"shippingAddress.zipCode"));
        assert!(fields.contains(&"paymentMethod"));
        assert!(fields.contains(&"subtotal"));
        assert!(fields.contains(&"tax"));
    }

    #[test]
    fn test_unknown_payment_method_rejected() {
        let mut draft = valid_draft();
        draft.payment_method = Some("bank-transfer".to_owned());

        let errors = validate_draft(UserId::new(1), draft).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().unwrap().field, "paymentMethod");
    }

    #[test]
    fn test_item_problems_reported_per_line() {
        let mut draft = valid_draft();
        draft.items = vec![
            item_draft(1, 100, 2),
            ItemDraft {
                quantity: Some(0),
                price: Some(Decimal::new(-5, 0)),
                ..item_draft(2, 0, 1)
            },
        ];

        let errors = validate_draft(UserId::new(1), draft).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"items[1].quantity"));
        assert!(fields.contains(&"items[1].price"));
        assert!(!fields.iter().any(|f| f.starts_with("items[0]")));
    }

    #[test]
    fn test_negative_amounts_rejected() {
        let mut draft = valid_draft();
        draft.subtotal = Some(Decimal::new(-1, 0));
        draft.tax = Some(Decimal::new(-1, 0));

        let errors = validate_draft(UserId::new(1), draft).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["subtotal", "tax"]);
    }

    #[test]
    fn test_draft_deserializes_camel_case() {
        let draft: OrderDraft = serde_json::from_str(
            r#"{
                "items": [{"productId": 3, "title": "Lamp", "price": "45.00", "quantity": 1}],
                "shippingAddress": {
                    "address": "12 Oak Ave", "city": "Springfield", "state": "IL",
                    "zipCode": "62704", "country": "US"
                },
                "paymentMethod": "cod",
                "subtotal": "45.00",
                "tax": "4.50"
            }"#,
        )
        .unwrap();

        let order = validate_draft(UserId::new(9), draft).unwrap();
        assert_eq!(order.payment_method, PaymentMethod::Cod);
        assert_eq!(order.total, Decimal::new(4950, 2));
        assert!(order.payment_details.is_none());
    }
}
