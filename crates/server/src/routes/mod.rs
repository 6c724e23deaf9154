//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (verifies database)
//!
//! # Auth
//! POST /api/auth/register           - Create account, issue bearer token
//! POST /api/auth/login              - Verify credentials, issue bearer token
//! GET  /api/auth/profile            - Current user's profile (auth)
//! PUT  /api/auth/profile            - Update name/phone, append address (auth)
//! POST /api/auth/change-password    - Rotate password (auth)
//! DELETE /api/auth/delete-account   - Remove account and owned data (auth)
//!
//! # Catalog
//! GET  /api/products                - List products (?category=&featured=)
//! GET  /api/products/{id}           - Product detail
//!
//! # Cart (auth, responses always hydrated)
//! GET    /api/cart                  - Fetch-or-create the cart
//! POST   /api/cart                  - Add item (merge by product id)
//! PUT    /api/cart/{productId}      - Overwrite quantity (<= 0 removes)
//! DELETE /api/cart/{productId}      - Remove item (idempotent)
//! DELETE /api/cart                  - Clear
//!
//! # Wishlist (auth)
//! GET    /api/wishlist              - Fetch-or-create the wishlist
//! POST   /api/wishlist              - Add product (conflict on duplicate)
//! DELETE /api/wishlist/{productId}  - Remove product
//! DELETE /api/wishlist              - Clear
//!
//! # Orders (auth, owner-scoped)
//! POST   /api/orders                - Create order from basket snapshot
//! GET    /api/orders/my-orders      - Caller's orders, newest first
//! GET    /api/orders/{id}           - Order detail
//! PATCH  /api/orders/{id}/status    - Advance status along the sequence
//! DELETE /api/orders/{id}           - Delete order
//!
//! # Contact (public)
//! POST   /api/contact               - Submit message
//! GET    /api/contact               - List messages, newest first
//! PATCH  /api/contact/{id}/read     - Mark message read
//! DELETE /api/contact/{id}          - Delete message
//! ```

pub mod auth;
pub mod cart;
pub mod contact;
pub mod orders;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::middleware;
use crate::state::AppState;

/// Create the auth routes router.
///
/// Register and login sit behind the strict rate limiter; the profile and
/// password routes are protected by the bearer guard instead.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(middleware::auth_rate_limiter())
        .route("/profile", get(auth::profile).put(auth::update_profile))
        .route("/change-password", post(auth::change_password))
        .route("/delete-account", delete(auth::delete_account))
}

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(cart::show).post(cart::add_item).delete(cart::clear),
        )
        .route(
            "/{product_id}",
            put(cart::update_item).delete(cart::remove_item),
        )
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(wishlist::show)
                .post(wishlist::add_item)
                .delete(wishlist::clear),
        )
        .route("/{product_id}", delete(wishlist::remove_item))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create))
        .route("/my-orders", get(orders::my_orders))
        .route("/{id}", get(orders::show).delete(orders::remove))
        .route("/{id}/status", patch(orders::update_status))
}

/// Create the contact routes router.
pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(contact::submit).get(contact::index))
        .route("/{id}/read", patch(contact::mark_read))
        .route("/{id}", delete(contact::remove))
}

/// Create all routes for the storefront API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/wishlist", wishlist_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/contact", contact_routes())
}
