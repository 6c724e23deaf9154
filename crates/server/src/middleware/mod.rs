//! HTTP middleware stack for the storefront API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. CORS (SPA origin)
//! 4. Rate limiting (governor, auth endpoints only)
//!
//! Authentication is not a layer: protected handlers take the
//! [`auth::CurrentUser`] extractor, which verifies the bearer credential per
//! request.

pub mod auth;
pub mod rate_limit;

pub use auth::{AuthRejection, CurrentUser};
pub use rate_limit::auth_rate_limiter;
