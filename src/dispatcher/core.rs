use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use http::{Request, Response, StatusCode};
use tracing::{debug, error, info, info_span};

use super::entity::{RequestEntity, ResponseEntity};
use crate::config::DispatchConfig;
use crate::ids::REQUEST_ID_HEADER;
use crate::negotiation::CodecRegistry;
use crate::router::Router;

/// Entry point the hosting HTTP server calls once per request.
///
/// Holds the routing table, the codec registry and the configuration. All
/// three are read-only while requests are in flight; the routing table can be
/// replaced as a whole with [`Dispatcher::swap_router`].
pub struct Dispatcher {
    router: ArcSwap<Router>,
    codecs: Arc<CodecRegistry>,
    config: Arc<DispatchConfig>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Router::new())
    }
}

impl Dispatcher {
    /// Dispatcher over `router` with the JSON and XML codecs and default
    /// configuration.
    #[must_use]
    pub fn new(router: Router) -> Self {
        info!(
            handlers = router.handler_count(),
            filters = router.filter_count(),
            "Dispatcher created"
        );
        Self {
            router: ArcSwap::from_pointee(router),
            codecs: Arc::new(CodecRegistry::with_defaults()),
            config: Arc::new(DispatchConfig::default()),
        }
    }

    /// Replace the codec registry.
    #[must_use]
    pub fn with_codecs(mut self, codecs: CodecRegistry) -> Self {
        self.codecs = Arc::new(codecs);
        self
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Snapshot of the current routing table
    #[must_use]
    pub fn router(&self) -> Arc<Router> {
        self.router.load_full()
    }

    /// Atomically install a new routing table and return the previous one.
    ///
    /// Requests already running finish against the table they started with.
    pub fn swap_router(&self, router: Router) -> Arc<Router> {
        info!(
            handlers = router.handler_count(),
            filters = router.filter_count(),
            "Swapping routing table"
        );
        self.router.swap(Arc::new(router))
    }

    #[must_use]
    pub fn codecs(&self) -> &CodecRegistry {
        &self.codecs
    }

    #[must_use]
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Dispatch one request.
    ///
    /// Filters matching the path run first, in registration order; the first
    /// one that returns a response ends the dispatch and its response is
    /// returned unchanged. Otherwise the resolved handler fills a fresh
    /// [`ResponseEntity`], which is finalized with `200 OK` for an unset
    /// status, the `Allow` header on a 405, and the `x-request-id` header.
    ///
    /// A panicking filter or handler yields `500 Internal Server Error` unless
    /// [`DispatchConfig::recover_panics`] is off, in which case the panic
    /// propagates to the caller.
    pub fn handle(&self, request: Request<Vec<u8>>) -> Response<Vec<u8>> {
        let request = RequestEntity::with_context(
            request,
            Arc::clone(&self.codecs),
            Arc::clone(&self.config),
        );
        let span = info_span!(
            "dispatch",
            request_id = %request.request_id(),
            method = %request.method(),
            path = %request.path(),
        );
        let _enter = span.enter();
        let start = Instant::now();
        debug!("Handling request");

        let router = self.router.load();
        let response = if self.config.recover_panics {
            match catch_unwind(AssertUnwindSafe(|| dispatch(&router, &request))) {
                Ok(response) => response,
                Err(panic) => {
                    error!(panic_message = %panic_message(panic.as_ref()), "Callback panicked");
                    internal_error(&request)
                }
            }
        } else {
            dispatch(&router, &request)
        };

        debug!(
            status = response.status().as_u16(),
            duration_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX),
            "Handling response"
        );
        response
    }
}

fn dispatch(router: &Router, request: &RequestEntity) -> Response<Vec<u8>> {
    for route in router.resolve_filters(request.path()) {
        if let Some(response) = route.filter().apply(request) {
            debug!(
                filter = %route.pattern().template(),
                status = ?response.status(),
                "Filter answered request"
            );
            return response.into_response();
        }
    }

    let resolution = router.resolve_handler(request.path(), request.method());
    let mut response = ResponseEntity::new();
    resolution.handler().handle(request, &mut response);

    let mut response = response.into_response_with_allow(resolution.allow_header());
    response
        .headers_mut()
        .insert(REQUEST_ID_HEADER, request.request_id().to_header_value());
    response
}

fn internal_error(request: &RequestEntity) -> Response<Vec<u8>> {
    let mut response =
        ResponseEntity::text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            .into_response();
    response
        .headers_mut()
        .insert(REQUEST_ID_HEADER, request.request_id().to_header_value());
    response
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
