//! # Router Module
//!
//! Regex-based route resolution for handlers and filters.
//!
//! ## Overview
//!
//! The router keeps one ordered list of handler registrations per supported
//! method (GET, POST, PUT, PATCH, DELETE) and a single ordered list of
//! filters. Matching is a linear scan over the compiled patterns.
//!
//! - **Handlers** compete: every handler whose pattern matches the path is a
//!   candidate, candidates are ranked by the length of the span they matched,
//!   and the first one wins. Equal spans keep registration order.
//! - **Filters** do not compete: every matching filter applies, in
//!   registration order.
//!
//! When nothing matches under the requested method the path is probed under
//! the other methods. A hit there yields a 405 with an `Allow` header listing
//! those methods, otherwise the request gets a 404.
//!
//! ## Patterns
//!
//! Templates are regular expressions, see [`RoutePattern`] for the anchoring
//! rules. `/persons` also matches `/persons/`; `/persons/.*` matches anything
//! below `/persons/`.
//!
//! ## Example
//!
//! ```rust
//! use cable::{RequestEntity, ResponseEntity, Router};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router
//!     .get("/persons", |_req: &RequestEntity, res: &mut ResponseEntity| {
//!         res.set_body("All Persons");
//!     })
//!     .unwrap()
//!     .delete("/persons/[0-9]+", |_req: &RequestEntity, res: &mut ResponseEntity| {
//!         res.set_body("Deleted One Person");
//!     })
//!     .unwrap();
//!
//! assert!(router.resolve_handler("/persons/", &Method::GET).is_matched());
//! let resolution = router.resolve_handler("/persons", &Method::POST);
//! assert_eq!(resolution.allow_header(), Some("GET"));
//! ```

mod core;
mod error;
mod pattern;
mod rank;
#[cfg(test)]
mod tests;

pub use core::{
    FilterRoute, FilterVec, HandlerRoute, Resolution, Router, SyntheticHandler, SUPPORTED_METHODS,
};
pub use error::RouteError;
pub use pattern::RoutePattern;
pub use rank::{rank_by_specificity, CandidateVec, Matched, MAX_INLINE_CANDIDATES};
