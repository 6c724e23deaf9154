//! Domain types for the storefront.
//!
//! These types represent validated domain objects separate from database row
//! types. The cart and wishlist documents also carry the line-manipulation
//! logic so it can be exercised without a database.

pub mod cart;
pub mod contact;
pub mod order;
pub mod product;
pub mod user;
pub mod wishlist;

pub use cart::{Cart, CartLine};
pub use contact::ContactMessage;
pub use order::{NewOrder, Order, OrderItem, PaymentDetails};
pub use product::{NewProduct, Product};
pub use user::{Address, User};
pub use wishlist::Wishlist;
