use std::fmt;

use http::Method;

/// Registration error
///
/// Returned by [`Router`](super::Router) registration calls. Registration
/// errors are meant to stop application startup; resolution never fails.
#[derive(Debug)]
pub enum RouteError {
    /// The route template is not a valid regular expression once normalized
    InvalidPattern {
        /// The template as passed to the registration call
        template: String,
        /// The underlying regex or automaton build error
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Handlers can only be registered for GET, POST, PUT, PATCH and DELETE
    UnsupportedMethod(Method),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::InvalidPattern { template, source } => {
                write!(f, "invalid route pattern '{template}': {source}")
            }
            RouteError::UnsupportedMethod(method) => {
                write!(
                    f,
                    "unsupported method {method}: handlers can be registered for \
                     GET, POST, PUT, PATCH and DELETE"
                )
            }
        }
    }
}

impl std::error::Error for RouteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouteError::InvalidPattern { source, .. } => Some(source.as_ref()),
            RouteError::UnsupportedMethod(_) => None,
        }
    }
}
