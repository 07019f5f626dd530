use std::fmt;
use std::sync::Arc;

use http::{Method, StatusCode};
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use super::error::RouteError;
use super::pattern::RoutePattern;
use super::rank::{rank_by_specificity, CandidateVec, Matched, MAX_INLINE_CANDIDATES};
use crate::dispatcher::{Handler, RequestEntity, ResponseEntity};
use crate::middleware::Filter;

const METHOD_COUNT: usize = 5;

/// Methods handlers can be registered for, in the order they are probed when
/// building an `Allow` header.
pub static SUPPORTED_METHODS: [Method; METHOD_COUNT] = [
    Method::GET,
    Method::PATCH,
    Method::POST,
    Method::PUT,
    Method::DELETE,
];

fn method_slot(method: &Method) -> Option<usize> {
    SUPPORTED_METHODS.iter().position(|m| m == method)
}

/// A handler registered for one method and pattern.
pub struct HandlerRoute {
    method: Method,
    pattern: RoutePattern,
    handler: Arc<dyn Handler>,
}

impl HandlerRoute {
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    #[must_use]
    pub fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for HandlerRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRoute")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// A filter registered for a pattern, regardless of method.
pub struct FilterRoute {
    pattern: RoutePattern,
    filter: Arc<dyn Filter>,
}

impl FilterRoute {
    #[must_use]
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    #[must_use]
    pub fn filter(&self) -> &dyn Filter {
        self.filter.as_ref()
    }
}

impl fmt::Debug for FilterRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRoute")
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// Handlers standing in for a user registration.
///
/// The router falls back to `NotFound` and `MethodNotAllowed`. The other two
/// are available to handler code that answers negotiation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticHandler {
    NotFound,
    MethodNotAllowed,
    NotAcceptable,
    UnsupportedMediaType,
}

impl SyntheticHandler {
    #[must_use]
    pub fn status(self) -> StatusCode {
        match self {
            SyntheticHandler::NotFound => StatusCode::NOT_FOUND,
            SyntheticHandler::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            SyntheticHandler::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            SyntheticHandler::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }
}

impl Handler for SyntheticHandler {
    fn handle(&self, _request: &RequestEntity, response: &mut ResponseEntity) {
        response.set_status(self.status());
    }
}

/// Outcome of [`Router::resolve_handler`]. Resolution never fails.
#[derive(Debug)]
pub enum Resolution<'a> {
    /// The most specific handler registered for the method
    Matched {
        route: &'a HandlerRoute,
        /// Span of the path matched by the route's pattern
        matched: &'a str,
    },
    /// The path matches under other methods only
    MethodNotAllowed {
        /// Comma-joined methods that match the path
        allow: String,
    },
    NotFound,
}

impl Resolution<'_> {
    /// The handler to invoke: the user's, or a synthetic 404/405 handler.
    #[must_use]
    pub fn handler(&self) -> &dyn Handler {
        match self {
            Resolution::Matched { route, .. } => route.handler(),
            Resolution::MethodNotAllowed { .. } => &SyntheticHandler::MethodNotAllowed,
            Resolution::NotFound => &SyntheticHandler::NotFound,
        }
    }

    /// Value for the `Allow` response header, on 405 only.
    #[must_use]
    pub fn allow_header(&self) -> Option<&str> {
        match self {
            Resolution::MethodNotAllowed { allow } => Some(allow),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, Resolution::Matched { .. })
    }
}

/// Filters matching a path, in registration order.
pub type FilterVec<'a> = SmallVec<[&'a FilterRoute; MAX_INLINE_CANDIDATES]>;

/// Handler and filter registrations.
///
/// Registration is meant to happen during single-threaded setup; a populated
/// router is read-only and can be shared across threads. To change routes
/// under live traffic, build a new router and hand it to
/// [`Dispatcher::swap_router`](crate::Dispatcher::swap_router).
#[derive(Default)]
pub struct Router {
    /// One list per entry of [`SUPPORTED_METHODS`], in registration order
    handlers: [Vec<HandlerRoute>; METHOD_COUNT],
    filters: Vec<FilterRoute>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` requests whose path matches `pattern`.
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidPattern`] for a template that does not compile,
    /// [`RouteError::UnsupportedMethod`] for a method other than GET, POST,
    /// PUT, PATCH or DELETE.
    pub fn register_handler<H>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
    ) -> Result<&mut Self, RouteError>
    where
        H: Handler + 'static,
    {
        let slot =
            method_slot(&method).ok_or_else(|| RouteError::UnsupportedMethod(method.clone()))?;
        let pattern = RoutePattern::compile(pattern)?;
        info!(
            method = %method,
            pattern = %pattern.as_str(),
            "Registered handler"
        );
        self.handlers[slot].push(HandlerRoute {
            method,
            pattern,
            handler: Arc::new(handler),
        });
        Ok(self)
    }

    /// Register a GET handler. See [`Router::register_handler`].
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidPattern`] when the template does not compile.
    pub fn get<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouteError>
    where
        F: Fn(&RequestEntity, &mut ResponseEntity) + Send + Sync + 'static,
    {
        self.register_handler(Method::GET, pattern, handler)
    }

    /// Register a POST handler. See [`Router::register_handler`].
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidPattern`] when the template does not compile.
    pub fn post<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouteError>
    where
        F: Fn(&RequestEntity, &mut ResponseEntity) + Send + Sync + 'static,
    {
        self.register_handler(Method::POST, pattern, handler)
    }

    /// Register a PUT handler. See [`Router::register_handler`].
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidPattern`] when the template does not compile.
    pub fn put<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouteError>
    where
        F: Fn(&RequestEntity, &mut ResponseEntity) + Send + Sync + 'static,
    {
        self.register_handler(Method::PUT, pattern, handler)
    }

    /// Register a PATCH handler. See [`Router::register_handler`].
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidPattern`] when the template does not compile.
    pub fn patch<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouteError>
    where
        F: Fn(&RequestEntity, &mut ResponseEntity) + Send + Sync + 'static,
    {
        self.register_handler(Method::PATCH, pattern, handler)
    }

    /// Register a DELETE handler. See [`Router::register_handler`].
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidPattern`] when the template does not compile.
    pub fn delete<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouteError>
    where
        F: Fn(&RequestEntity, &mut ResponseEntity) + Send + Sync + 'static,
    {
        self.register_handler(Method::DELETE, pattern, handler)
    }

    /// Register a filter for every request whose path matches `pattern`.
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidPattern`] when the template does not compile.
    pub fn register_filter<F>(&mut self, pattern: &str, filter: F) -> Result<&mut Self, RouteError>
    where
        F: Filter + 'static,
    {
        let pattern = RoutePattern::compile(pattern)?;
        info!(pattern = %pattern.template(), "Registered filter");
        self.filters.push(FilterRoute {
            pattern,
            filter: Arc::new(filter),
        });
        Ok(self)
    }

    /// Register a closure filter. See [`Router::register_filter`].
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidPattern`] when the template does not compile.
    pub fn filter<F>(&mut self, pattern: &str, filter: F) -> Result<&mut Self, RouteError>
    where
        F: Fn(&RequestEntity) -> Option<ResponseEntity> + Send + Sync + 'static,
    {
        self.register_filter(pattern, filter)
    }

    /// Resolve the handler for `method` and `path`.
    ///
    /// The most specific match under `method` wins; ties go to the earlier
    /// registration. Without a match the path is probed under every other
    /// supported method to tell a 405 from a 404.
    #[must_use]
    pub fn resolve_handler<'a>(&'a self, path: &'a str, method: &Method) -> Resolution<'a> {
        if let Some(best) = method_slot(method)
            .and_then(|slot| self.ranked_handlers(slot, path).into_iter().next())
        {
            debug!(
                method = %method,
                path = %path,
                pattern = %best.item.pattern.template(),
                matched = %best.matched,
                "Route matched"
            );
            return Resolution::Matched {
                route: best.item,
                matched: best.matched,
            };
        }

        let allowed: SmallVec<[&str; METHOD_COUNT]> = SUPPORTED_METHODS
            .iter()
            .enumerate()
            .filter(|(_, m)| *m != method)
            .filter(|(slot, _)| self.handlers[*slot].iter().any(|r| r.pattern.matches(path)))
            .map(|(_, m)| m.as_str())
            .collect();

        if allowed.is_empty() {
            warn!(method = %method, path = %path, "No route matched");
            Resolution::NotFound
        } else {
            let allow = allowed.join(",");
            warn!(method = %method, path = %path, allow = %allow, "Method not allowed");
            Resolution::MethodNotAllowed { allow }
        }
    }

    /// Filters whose pattern matches `path`, in registration order.
    #[must_use]
    pub fn resolve_filters(&self, path: &str) -> FilterVec<'_> {
        self.filters
            .iter()
            .filter(|f| f.pattern.matches(path))
            .collect()
    }

    /// Drop every registration.
    pub fn clear(&mut self) {
        self.handlers.iter_mut().for_each(Vec::clear);
        self.filters.clear();
    }

    /// Number of registered handlers across all methods
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Registered handlers, grouped by method in [`SUPPORTED_METHODS`] order.
    pub fn handlers(&self) -> impl Iterator<Item = &HandlerRoute> {
        self.handlers.iter().flatten()
    }

    /// Registered filters in registration order.
    pub fn filters(&self) -> impl Iterator<Item = &FilterRoute> {
        self.filters.iter()
    }

    /// Log the routing table at info level.
    pub fn dump_routes(&self) {
        info!(
            handlers = self.handler_count(),
            filters = self.filter_count(),
            "Routing table"
        );
        for route in self.handlers() {
            info!(
                method = %route.method,
                pattern = %route.pattern.template(),
                regex = %route.pattern.as_str(),
                "Handler route"
            );
        }
        for route in &self.filters {
            info!(
                pattern = %route.pattern.template(),
                regex = %route.pattern.as_str(),
                "Filter route"
            );
        }
    }

    fn ranked_handlers<'a>(&'a self, slot: usize, path: &'a str) -> CandidateVec<'a, HandlerRoute> {
        let mut candidates: CandidateVec<'a, HandlerRoute> = self.handlers[slot]
            .iter()
            .filter_map(|route| route.pattern.find(path).map(|m| Matched::new(route, m)))
            .collect();
        rank_by_specificity(&mut candidates);
        candidates
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("handlers", &self.handlers().collect::<Vec<_>>())
            .field("filters", &self.filters)
            .finish()
    }
}
