//! Tests for the per-request routing decision.
//!
//! The decision is a pure function of method, body bytes, and the
//! configuration snapshot, so everything here runs without a server.

use actix_web::http::Method;
use shunt_rs::models::mode::RoutingMode;
use shunt_rs::models::routing::RoutingConfig;
use shunt_rs::utils::decision::decide;
use std::collections::HashMap;

fn config(entries: &[(&str, &str)]) -> RoutingConfig {
    let source: HashMap<String, String> = entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    RoutingConfig::from_source(&source)
}

fn routed_post_config() -> RoutingConfig {
    config(&[
        ("Routing.NewService", "http://new/svc"),
        ("Routing.POST", "Foo|RN, Bar|RP"),
    ])
}

#[test]
fn invalid_config_always_routes_old() {
    // GET=RN without a new service URL is a configuration defect.
    let config = config(&[("Routing.GET", "RN")]);
    assert!(!config.is_valid);

    assert_eq!(decide(&Method::GET, None, &config), RoutingMode::RouteOld);
    assert_eq!(
        decide(
            &Method::POST,
            Some(b"<root><requests><Foo/></requests></root>"),
            &config
        ),
        RoutingMode::RouteOld
    );
}

#[test]
fn get_takes_the_configured_get_mode() {
    let config = config(&[
        ("Routing.NewService", "http://new/svc"),
        ("Routing.GET", "RP"),
    ]);

    assert_eq!(decide(&Method::GET, None, &config), RoutingMode::RunParallel);
}

#[test]
fn other_methods_route_old() {
    let config = config(&[
        ("Routing.NewService", "http://new/svc"),
        ("Routing.GET", "RN"),
        ("Routing.POST", "Foo|RN"),
    ]);

    let body = b"<root><requests><Foo/></requests></root>";
    assert_eq!(
        decide(&Method::DELETE, Some(body), &config),
        RoutingMode::RouteOld
    );
    assert_eq!(
        decide(&Method::PUT, Some(body), &config),
        RoutingMode::RouteOld
    );
}

#[test]
fn post_without_configured_types_routes_old() {
    let config = config(&[
        ("Routing.NewService", "http://new/svc"),
        ("Routing.GET", "RN"),
    ]);

    let body = b"<root><requests><Foo/></requests></root>";
    assert_eq!(
        decide(&Method::POST, Some(body), &config),
        RoutingMode::RouteOld
    );
}

#[test]
fn post_without_body_routes_old() {
    let config = routed_post_config();

    assert_eq!(decide(&Method::POST, None, &config), RoutingMode::RouteOld);
    assert_eq!(
        decide(&Method::POST, Some(b""), &config),
        RoutingMode::RouteOld
    );
}

#[test]
fn non_utf8_body_routes_old() {
    let config = routed_post_config();

    assert_eq!(
        decide(&Method::POST, Some(&[0xff, 0xfe, 0x00]), &config),
        RoutingMode::RouteOld
    );
}

#[test]
fn malformed_xml_routes_old() {
    let config = routed_post_config();

    assert_eq!(
        decide(&Method::POST, Some(b"<root></wrong>"), &config),
        RoutingMode::RouteOld
    );
    assert_eq!(
        decide(&Method::POST, Some(b"not xml at all"), &config),
        RoutingMode::RouteOld
    );
}

#[test]
fn missing_requests_element_routes_old() {
    let config = routed_post_config();

    assert_eq!(
        decide(
            &Method::POST,
            Some(b"<root><other><Foo/></other></root>"),
            &config
        ),
        RoutingMode::RouteOld
    );
}

#[test]
fn empty_requests_element_routes_old() {
    let config = routed_post_config();

    assert_eq!(
        decide(
            &Method::POST,
            Some(b"<root><requests></requests></root>"),
            &config
        ),
        RoutingMode::RouteOld
    );
    assert_eq!(
        decide(&Method::POST, Some(b"<root><requests/></root>"), &config),
        RoutingMode::RouteOld
    );
}

#[test]
fn first_configured_child_in_document_order_wins() {
    let config = routed_post_config();

    let body = b"<root><requests><Foo/><Bar/></requests></root>";
    assert_eq!(
        decide(&Method::POST, Some(body), &config),
        RoutingMode::RouteNew
    );

    let body = b"<root><requests><Bar/><Foo/></requests></root>";
    assert_eq!(
        decide(&Method::POST, Some(body), &config),
        RoutingMode::RunParallel
    );
}

#[test]
fn unconfigured_children_are_skipped() {
    let config = routed_post_config();

    let body = b"<root><requests><Unknown/><Bar/></requests></root>";
    assert_eq!(
        decide(&Method::POST, Some(body), &config),
        RoutingMode::RunParallel
    );
}

#[test]
fn no_configured_child_routes_old() {
    let config = routed_post_config();

    let body = b"<root><requests><Unknown/><AlsoUnknown/></requests></root>";
    assert_eq!(
        decide(&Method::POST, Some(body), &config),
        RoutingMode::RouteOld
    );
}

#[test]
fn element_lookup_is_case_insensitive() {
    let config = routed_post_config();

    let body = b"<root><requests><FOO/></requests></root>";
    assert_eq!(
        decide(&Method::POST, Some(body), &config),
        RoutingMode::RouteNew
    );
}

#[test]
fn element_children_with_content_also_match() {
    let config = routed_post_config();

    let body = b"<root><requests><Foo><detail>1</detail></Foo></requests></root>";
    assert_eq!(
        decide(&Method::POST, Some(body), &config),
        RoutingMode::RouteNew
    );
}
