//! # Dispatcher Module
//!
//! Runs one request through the filter chain and the resolved handler.
//!
//! ## Request Flow
//!
//! ```text
//! ReceivedRequest ─▶ RunningFilters ─┬─▶ ShortCircuited ──────────┐
//!                                    └─▶ RunningHandler ─▶ Finalized ◀┘
//! ```
//!
//! 1. Filters whose pattern matches the path run in registration order.
//!    A filter returning `Some(response)` ends the dispatch; its response is
//!    sent unchanged and no further filter or handler runs.
//! 2. The router resolves the handler for path and method, falling back to
//!    the synthetic 404/405 handlers.
//! 3. The handler fills a fresh [`ResponseEntity`]. It decodes and encodes
//!    bodies itself through [`RequestEntity::decode_body`] and
//!    [`RequestEntity::encode_body`]; the dispatcher never negotiates on its
//!    own.
//! 4. The response entity is finalized: unset status becomes `200 OK`, `Allow`
//!    is added on a 405 and the request id is echoed in `x-request-id`.
//!
//! ## Error Handling
//!
//! Routing misses are ordinary 404/405 responses. Panics raised by filters
//! and handlers are caught per request and answered with a 500 unless
//! [`DispatchConfig::recover_panics`](crate::DispatchConfig::recover_panics)
//! is disabled.
//!
//! ## Concurrency
//!
//! [`Dispatcher::handle`] takes `&self` and may be called from any number of
//! server threads at once. Request and response entities belong to a single
//! call.

mod core;
mod entity;

pub use core::Dispatcher;
pub use entity::{Handler, RequestEntity, ResponseEntity};
