use http::{Method, Request, StatusCode};

use super::{Resolution, RouteError, Router, SyntheticHandler};
use crate::dispatcher::{Handler, RequestEntity, ResponseEntity};

fn body_handler(body: &'static str) -> impl Fn(&RequestEntity, &mut ResponseEntity) + Send + Sync {
    move |_req: &RequestEntity, res: &mut ResponseEntity| res.set_body(body)
}

/// Run whatever the resolution picked and return status and body.
fn run(router: &Router, method: Method, path: &str) -> (StatusCode, String) {
    let request = RequestEntity::new(
        Request::builder()
            .method(method.clone())
            .uri(path)
            .body(Vec::new())
            .unwrap(),
    );
    let resolution = router.resolve_handler(path, &method);
    let mut response = ResponseEntity::new();
    resolution.handler().handle(&request, &mut response);
    (
        response.status().unwrap_or(StatusCode::OK),
        String::from_utf8(response.body().to_vec()).unwrap(),
    )
}

fn persons_router() -> Router {
    let mut router = Router::new();
    router
        .get("/persons", body_handler("Got Some Persons"))
        .unwrap()
        .post("/persons", body_handler("Posted Some Persons"))
        .unwrap()
        .put("/persons", body_handler("Put Some Persons"))
        .unwrap()
        .patch("/persons", body_handler("Patched Some Persons"))
        .unwrap()
        .delete("/persons", body_handler("Deleted Some Persons"))
        .unwrap();
    router
}

#[test]
fn test_each_method_reaches_its_handler() {
    let router = persons_router();
    assert_eq!(router.handler_count(), 5);
    assert_eq!(run(&router, Method::GET, "/persons").1, "Got Some Persons");
    assert_eq!(run(&router, Method::POST, "/persons").1, "Posted Some Persons");
    assert_eq!(run(&router, Method::PUT, "/persons").1, "Put Some Persons");
    assert_eq!(run(&router, Method::PATCH, "/persons").1, "Patched Some Persons");
    assert_eq!(
        run(&router, Method::DELETE, "/persons/"),
        (StatusCode::OK, "Deleted Some Persons".to_string())
    );
}

#[test]
fn test_most_specific_handler_wins() {
    let mut router = Router::new();
    router
        .delete("/persons/*", body_handler("wildcard"))
        .unwrap()
        .delete("/persons/delete/1", body_handler("literal"))
        .unwrap();
    assert_eq!(run(&router, Method::DELETE, "/persons/delete/1").1, "literal");
    assert_eq!(run(&router, Method::DELETE, "/persons/delete/2").1, "wildcard");
}

#[test]
fn test_equal_spans_keep_registration_order() {
    let mut router = Router::new();
    router
        .get("/items/[0-9]+", body_handler("digits"))
        .unwrap()
        .get("/items/.+", body_handler("anything"))
        .unwrap();
    assert_eq!(run(&router, Method::GET, "/items/42").1, "digits");
    assert_eq!(run(&router, Method::GET, "/items/abc").1, "anything");
}

#[test]
fn test_method_not_allowed_lists_matching_methods() {
    let mut router = Router::new();
    router
        .delete("/persons", body_handler(""))
        .unwrap()
        .get("/persons", body_handler(""))
        .unwrap()
        .put("/persons", body_handler(""))
        .unwrap()
        .get("/other", body_handler(""))
        .unwrap();

    let resolution = router.resolve_handler("/persons", &Method::POST);
    assert!(matches!(resolution, Resolution::MethodNotAllowed { .. }));
    assert_eq!(resolution.allow_header(), Some("GET,PUT,DELETE"));
    assert_eq!(run(&router, Method::POST, "/persons").0, StatusCode::METHOD_NOT_ALLOWED);
}

#[test]
fn test_unregistrable_method_probes_every_method() {
    let router = persons_router();
    let resolution = router.resolve_handler("/persons", &Method::OPTIONS);
    assert_eq!(resolution.allow_header(), Some("GET,PATCH,POST,PUT,DELETE"));
}

#[test]
fn test_not_found() {
    let router = persons_router();
    let resolution = router.resolve_handler("/animals", &Method::GET);
    assert!(matches!(resolution, Resolution::NotFound));
    assert_eq!(resolution.allow_header(), None);
    assert_eq!(run(&router, Method::GET, "/animals"), (StatusCode::NOT_FOUND, String::new()));
}

#[test]
fn test_matched_span_is_reported() {
    let mut router = Router::new();
    router.get("/files/.*", body_handler("")).unwrap();
    match router.resolve_handler("/files/a/b.txt", &Method::GET) {
        Resolution::Matched { route, matched } => {
            assert_eq!(matched, "/files/a/b.txt");
            assert_eq!(route.pattern().template(), "/files/.*");
            assert_eq!(route.method(), Method::GET);
        }
        other => panic!("unexpected resolution: {other:?}"),
    }
}

#[test]
fn test_invalid_pattern_is_rejected() {
    let mut router = Router::new();
    let err = router.get("/persons/(", body_handler("")).err().unwrap();
    assert!(matches!(
        err,
        RouteError::InvalidPattern { ref template, .. } if template == "/persons/("
    ));
    assert!(router.filter("[", |_req: &RequestEntity| None).is_err());
    assert_eq!(router.handler_count(), 0);
    assert_eq!(router.filter_count(), 0);
}

#[test]
fn test_unsupported_method_is_rejected() {
    let mut router = Router::new();
    let err = router
        .register_handler(Method::OPTIONS, "/persons", body_handler(""))
        .err()
        .unwrap();
    assert!(matches!(err, RouteError::UnsupportedMethod(m) if m == Method::OPTIONS));
}

#[test]
fn test_filters_keep_registration_order() {
    let mut router = Router::new();
    router
        .filter("/.*", |_req: &RequestEntity| None)
        .unwrap()
        .filter("/admin", |_req: &RequestEntity| None)
        .unwrap()
        .filter("/adm.*", |_req: &RequestEntity| None)
        .unwrap();

    let templates: Vec<_> = router
        .resolve_filters("/admin/")
        .iter()
        .map(|f| f.pattern().template())
        .collect();
    assert_eq!(templates, vec!["/.*", "/admin", "/adm.*"]);

    let templates: Vec<_> = router
        .resolve_filters("/public")
        .iter()
        .map(|f| f.pattern().template())
        .collect();
    assert_eq!(templates, vec!["/.*"]);
}

#[test]
fn test_clear_drops_everything() {
    let mut router = persons_router();
    router.filter("/.*", |_req: &RequestEntity| None).unwrap();
    router.clear();
    assert_eq!(router.handler_count(), 0);
    assert_eq!(router.filter_count(), 0);
    assert!(matches!(
        router.resolve_handler("/persons", &Method::GET),
        Resolution::NotFound
    ));
}

#[test]
fn test_synthetic_handlers_set_status_only() {
    let request = RequestEntity::new(Request::new(Vec::new()));
    for (handler, status) in [
        (SyntheticHandler::NotFound, StatusCode::NOT_FOUND),
        (SyntheticHandler::MethodNotAllowed, StatusCode::METHOD_NOT_ALLOWED),
        (SyntheticHandler::NotAcceptable, StatusCode::NOT_ACCEPTABLE),
        (SyntheticHandler::UnsupportedMediaType, StatusCode::UNSUPPORTED_MEDIA_TYPE),
    ] {
        let mut response = ResponseEntity::new();
        handler.handle(&request, &mut response);
        assert_eq!(response.status(), Some(status));
        assert!(response.body().is_empty());
    }
}
