//! HTTP middleware stack for the accounts API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. CORS (permissive)
//! 3. `TraceLayer` (request span with `request_id` and `account_id` fields)
//! 4. Request ID (fill the span field, echo the header)
//!
//! Bearer authentication is an extractor, not a layer: see [`RequireAuth`].

pub mod auth;
pub mod request_id;

pub use auth::RequireAuth;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
