//! Business services for the storefront.
//!
//! Services wrap the repositories with the domain rules: credential checks,
//! document merge semantics, order validation, and the conditional-write
//! retry discipline for cart and wishlist documents.

pub mod auth;
pub mod cart;
pub mod orders;
pub mod token;
pub mod wishlist;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService};
pub use orders::{OrderError, OrderService};
pub use token::{Claims, TokenError, TokenService};
pub use wishlist::{WishlistError, WishlistService};
