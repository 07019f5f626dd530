mod common;

use cable::{Dispatcher, Resolution, RouteError, Router};
use common::http_helpers::{bare, body_text, header, request};
use common::routes::{persons_router, reply};
use http::{Method, StatusCode};

fn post_json(dispatcher: &Dispatcher, path: &str) -> http::Response<Vec<u8>> {
    dispatcher.handle(request(
        Method::POST,
        path,
        &[("content-type", "application/json")],
        b"[]",
    ))
}

#[test]
fn test_not_found_without_handlers() {
    let dispatcher = Dispatcher::new(Router::new());
    let response = dispatcher.handle(request(Method::POST, "/persons", &[], b"[]"));
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(header(&response, "allow").is_none());
}

#[test]
fn test_method_not_allowed_lists_registered_methods() {
    let mut router = Router::new();
    router
        .get("/persons", reply("ok"))
        .unwrap()
        .delete("/persons", reply("ok"))
        .unwrap()
        .patch("/persons", reply("ok"))
        .unwrap()
        .put("/persons", reply("ok"))
        .unwrap();
    let dispatcher = Dispatcher::new(router);

    let response = dispatcher.handle(bare(Method::POST, "/persons"));
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(header(&response, "allow"), Some("GET,PATCH,PUT,DELETE"));
}

#[test]
fn test_unsupported_request_method_probes_all() {
    let mut router = Router::new();
    router.get("/persons", reply("ok")).unwrap();
    let dispatcher = Dispatcher::new(router);

    let response = dispatcher.handle(bare(Method::CONNECT, "/persons"));
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(header(&response, "allow"), Some("GET"));
}

#[test]
fn test_trailing_slash_is_optional() {
    let dispatcher = Dispatcher::new(persons_router());
    for path in ["/persons", "/persons/"] {
        let response = dispatcher.handle(request(Method::POST, path, &[], b"[]"));
        assert_eq!(response.status(), StatusCode::OK, "POST {path}");
        assert_eq!(body_text(&response), "Some Persons");
    }
}

#[test]
fn test_every_method_reaches_its_handler() {
    let dispatcher = Dispatcher::new(persons_router());
    let cases = [
        (Method::GET, ""),
        (Method::PUT, "Put Some Persons"),
        (Method::PATCH, "Patched Some Persons"),
        (Method::DELETE, "Deleted Some Persons"),
    ];
    for (method, body) in cases {
        let response = dispatcher.handle(request(
            method.clone(),
            "/persons",
            &[("content-type", "application/json")],
            b"[]",
        ));
        assert_eq!(response.status(), StatusCode::OK, "{method}");
        assert_eq!(body_text(&response), body, "{method}");
    }
}

#[test]
fn test_literal_route_beats_wildcard() {
    let mut router = Router::new();
    router
        .post("/persons", reply("Some Persons"))
        .unwrap()
        .post("/bikes/*", reply("Bikes"))
        .unwrap()
        .post("/bikes/sold", reply("Sold!"))
        .unwrap();
    let dispatcher = Dispatcher::new(router);

    assert_eq!(body_text(&post_json(&dispatcher, "/bikes/")), "Bikes");
    assert_eq!(body_text(&post_json(&dispatcher, "/bikes/sold")), "Sold!");
}

#[test]
fn test_open_ended_patterns() {
    let mut router = Router::new();
    router.post("/c.*", reply("C!")).unwrap();
    let c_only = Dispatcher::new(router);

    for path in ["/ca", "/ca/cb/1234"] {
        let response = post_json(&c_only, path);
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert_eq!(body_text(&response), "C!");
    }
    assert_eq!(post_json(&c_only, "/def").status(), StatusCode::NOT_FOUND);

    let mut router = Router::new();
    router.post("/d+", reply("D!")).unwrap();
    let d_only = Dispatcher::new(router);

    for path in ["/d", "/deeeab1", "/deeeab1/bcabc"] {
        let response = post_json(&d_only, path);
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert_eq!(body_text(&response), "D!");
    }
    assert_eq!(
        post_json(&d_only, "/Leeeab1/bcabc").status(),
        StatusCode::NOT_FOUND
    );
}

#[test]
fn test_registration_errors() {
    let mut router = Router::new();
    let err = router.get("/persons/(", reply("x")).unwrap_err();
    assert!(matches!(err, RouteError::InvalidPattern { .. }));

    let err = router
        .register_handler(Method::HEAD, "/persons", reply("x"))
        .unwrap_err();
    assert!(matches!(err, RouteError::UnsupportedMethod(_)));
    assert_eq!(router.handler_count(), 0);
}

#[test]
fn test_resolution_reports_matched_span() {
    let mut router = Router::new();
    router.get("/files/.*", reply("files")).unwrap();

    match router.resolve_handler("/files/a/b", &Method::GET) {
        Resolution::Matched { route, matched } => {
            assert_eq!(route.pattern().template(), "/files/.*");
            assert_eq!(matched, "/files/a/b");
        }
        other => panic!("expected a match, got {other:?}"),
    }
}
