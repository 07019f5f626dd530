use http::header::AUTHORIZATION;
use http::StatusCode;
use tracing::debug;

use super::Filter;
use crate::dispatcher::{RequestEntity, ResponseEntity};

/// Rejects requests whose `Authorization` header is not exactly `token`.
pub struct TokenAuthFilter {
    token: String,
}

impl TokenAuthFilter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Filter for TokenAuthFilter {
    fn apply(&self, request: &RequestEntity) -> Option<ResponseEntity> {
        match request.headers().get(AUTHORIZATION) {
            Some(value) if value.as_bytes() == self.token.as_bytes() => None,
            _ => {
                debug!(path = %request.path(), "Rejecting unauthenticated request");
                Some(ResponseEntity::text(StatusCode::UNAUTHORIZED, "Unauthorized"))
            }
        }
    }
}
