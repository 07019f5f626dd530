//! # cable
//!
//! **cable** is an in-process HTTP request dispatcher: it selects the most
//! specific handler for a request, runs path-scoped filters ahead of it, and
//! negotiates request and response bodies through pluggable codecs.
//!
//! It does not listen on a socket. The hosting server turns each inbound
//! request into an [`http::Request<Vec<u8>>`], calls [`Dispatcher::handle`],
//! and writes the returned [`http::Response<Vec<u8>>`].
//!
//! ## Architecture
//!
//! - **[`router`]** - Regex route patterns, specificity ranking, 404/405
//!   resolution with `Allow`
//! - **[`dispatcher`]** - Filter chain, handler invocation, response
//!   finalization, per-request panic recovery
//! - **[`middleware`]** - The [`Filter`] trait and ready-made filters
//! - **[`negotiation`]** - `Accept` ranking, `Content-Type` resolution and the
//!   [`CodecRegistry`]
//! - **[`codec`]** - The [`Codec`] trait with JSON and XML implementations
//! - **[`config`]** - [`DispatchConfig`] from defaults, environment or TOML
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `cable` developer binary
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Server as Hosting server
//!     participant Dispatcher
//!     participant Router
//!     participant Filter as Filters
//!     participant Handler
//!     participant Codecs as CodecRegistry
//!
//!     Server->>Dispatcher: handle(Request)
//!     Dispatcher->>Router: resolve_filters(path)
//!     Router-->>Dispatcher: matching filters, registration order
//!     loop each filter
//!         Dispatcher->>Filter: apply(&RequestEntity)
//!         alt Some(response)
//!             Filter-->>Dispatcher: response
//!             Dispatcher-->>Server: response, unchanged
//!         end
//!     end
//!     Dispatcher->>Router: resolve_handler(path, method)
//!     alt matched
//!         Router-->>Dispatcher: most specific handler
//!     else other methods match
//!         Router-->>Dispatcher: 405 handler + Allow
//!     else nothing matches
//!         Router-->>Dispatcher: 404 handler
//!     end
//!     Dispatcher->>Handler: handle(&RequestEntity, &mut ResponseEntity)
//!     opt handler negotiates
//!         Handler->>Codecs: decode by Content-Type
//!         Handler->>Codecs: encode by ranked Accept
//!     end
//!     Dispatcher-->>Server: finalized response
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use cable::{Dispatcher, RequestEntity, ResponseEntity, Router};
//! use http::{Method, Request, StatusCode};
//! use serde_json::json;
//!
//! let mut router = Router::new();
//! router
//!     .get("/persons", |req: &RequestEntity, res: &mut ResponseEntity| {
//!         match req.encode_body(&json!([{"name": "Mario"}])) {
//!             Ok(encoded) => res.set_negotiated_body(encoded),
//!             Err(e) => res.set_status(e.status()),
//!         }
//!     })
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::new(router);
//! let response = dispatcher.handle(
//!     Request::builder()
//!         .method(Method::GET)
//!         .uri("/persons/")
//!         .header("accept", "application/xml")
//!         .body(Vec::new())
//!         .unwrap(),
//! );
//! assert_eq!(response.status(), StatusCode::OK);
//! assert_eq!(
//!     response.body(),
//!     b"<root><item><name>Mario</name></item></root>"
//! );
//! ```
//!
//! ## Concurrency
//!
//! Routers and codec registries are populated during single-threaded setup
//! and are read-only afterwards. [`Dispatcher::handle`] is safe to call from
//! many server threads at once, and [`Dispatcher::swap_router`] replaces the
//! whole routing table atomically while traffic is flowing.

pub mod cli;
pub mod codec;
pub mod config;
pub mod dispatcher;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod negotiation;
pub mod router;

pub use codec::{Codec, CodecError, JsonCodec, XmlCodec};
pub use config::DispatchConfig;
pub use dispatcher::{Dispatcher, Handler, RequestEntity, ResponseEntity};
pub use ids::RequestId;
pub use middleware::{Filter, TokenAuthFilter};
pub use negotiation::{CodecRegistry, Encoded, MediaTypeCandidate, NegotiationError, QualityParsing};
pub use router::{Resolution, RouteError, RoutePattern, Router, SyntheticHandler};
