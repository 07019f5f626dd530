//! # Middleware Module
//!
//! Filters run ahead of the handler for every request whose path matches
//! their pattern, in registration order. A filter either lets the request
//! through or answers it on the spot.
//!
//! ```rust
//! use cable::{ResponseEntity, RequestEntity, Router};
//! use http::StatusCode;
//!
//! let mut router = Router::new();
//! router
//!     .filter("/admin.*", |req: &RequestEntity| {
//!         req.header("x-admin")
//!             .is_none()
//!             .then(|| ResponseEntity::with_status(StatusCode::FORBIDDEN))
//!     })
//!     .unwrap();
//! ```

mod auth;
mod filter;

pub use auth::TokenAuthFilter;
pub use filter::Filter;
