use crate::dispatcher::{RequestEntity, ResponseEntity};

/// Path-scoped callback that runs before the handler.
///
/// Returning `Some` answers the request: no later filter runs, the handler is
/// skipped, and the returned response is sent as is. Returning `None` passes
/// the request on.
///
/// Implemented for every `Fn(&RequestEntity) -> Option<ResponseEntity>` closure.
pub trait Filter: Send + Sync {
    fn apply(&self, request: &RequestEntity) -> Option<ResponseEntity>;
}

impl<F> Filter for F
where
    F: Fn(&RequestEntity) -> Option<ResponseEntity> + Send + Sync,
{
    fn apply(&self, request: &RequestEntity) -> Option<ResponseEntity> {
        self(request)
    }
}
