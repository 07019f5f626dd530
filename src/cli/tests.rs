//! Unit tests for CLI commands

use crate::cli::{run_cli, Cli, Commands};
use clap::Parser;

fn run(args: &[&str]) -> String {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    run_cli(&cli, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_resolve_command_parses() {
    let cli = Cli::try_parse_from([
        "cable",
        "resolve",
        "--route",
        "GET /persons",
        "--route",
        "PUT /persons",
        "--filter",
        "/.*",
        "post",
        "/persons",
    ])
    .unwrap();

    match cli.command {
        Commands::Resolve {
            routes,
            filters,
            method,
            path,
        } => {
            assert_eq!(routes, vec!["GET /persons", "PUT /persons"]);
            assert_eq!(filters, vec!["/.*"]);
            assert_eq!(method, "post");
            assert_eq!(path, "/persons");
        }
        _ => panic!("Expected Resolve command"),
    }
}

#[test]
fn test_resolve_requires_a_route() {
    assert!(Cli::try_parse_from(["cable", "resolve", "GET", "/persons"]).is_err());
}

#[test]
fn test_resolve_matched() {
    let out = run(&[
        "cable",
        "resolve",
        "--route",
        "DELETE /persons/*",
        "--route",
        "DELETE /persons/delete/1",
        "--filter",
        "/persons.*",
        "DELETE",
        "/persons/delete/1",
    ]);
    assert_eq!(
        out,
        "DELETE /persons/delete/1\n\
         filter:  /persons.*\n\
         matched: DELETE /persons/delete/1 (span \"/persons/delete/1\")\n"
    );
}

#[test]
fn test_resolve_method_not_allowed() {
    let out = run(&[
        "cable",
        "resolve",
        "--route",
        "GET /persons",
        "--route",
        "PUT /persons",
        "POST",
        "/persons",
    ]);
    assert!(out.contains("filters: none"));
    assert!(out.contains("405 Method Not Allowed\nAllow: GET,PUT\n"));
}

#[test]
fn test_resolve_not_found() {
    let out = run(&["cable", "resolve", "--route", "GET /persons", "GET", "/animals"]);
    assert!(out.ends_with("404 Not Found\n"));
}

#[test]
fn test_resolve_rejects_malformed_route() {
    let cli = Cli::try_parse_from(["cable", "resolve", "--route", "/persons", "GET", "/"]).unwrap();
    assert!(run_cli(&cli, &mut Vec::new()).is_err());

    let cli = Cli::try_parse_from(["cable", "resolve", "--route", "GET /(", "GET", "/"]).unwrap();
    assert!(run_cli(&cli, &mut Vec::new()).is_err());
}

#[test]
fn test_negotiate_prefers_xml() {
    let out = run(&[
        "cable",
        "negotiate",
        "--accept",
        "application/json;q=0.1, application/xml",
        "--content-type",
        "application/json; charset=utf-8",
    ]);
    assert_eq!(
        out,
        "accept candidates:\n  \
         application/xml q=1\n  \
         application/json q=0.1\n\
         encode: xml as application/xml (matched application/xml)\n\
         decode: json for application/json\n"
    );
}

#[test]
fn test_negotiate_reports_failures() {
    let out = run(&[
        "cable",
        "negotiate",
        "--accept",
        "text/html",
        "--content-type",
        "text/plain",
    ]);
    assert!(out.contains("encode: 406 "));
    assert!(out.contains("decode: 415 "));
}

#[test]
fn test_negotiate_rfc_flag() {
    let out = run(&["cable", "negotiate", "--rfc", "--accept", "application/xml;q=0, */*;q=0.25"]);
    assert!(!out.contains("application/xml"));
    assert!(out.contains("*/* q=0.25"));
    assert!(out.contains("encode: json as application/json (matched */*)"));
}
