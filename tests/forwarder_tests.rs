//! Tests for outbound forwarding: header hygiene, body rules, failure
//! markers, cancellation, and response mirroring.
//!
//! These run real loopback servers so the assertions cover what actually
//! goes over the wire, not what we intended to put there.

use actix_web::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use reqwest::Method;
use shunt_rs::services::forwarder::{copy_response, Forwarder};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Binds a throwaway loopback server and returns its base URL.
fn spawn_server<F>(configure: F) -> String
where
    F: Fn(&mut web::ServiceConfig) + Send + Clone + 'static,
{
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(move || App::new().configure(configure.clone()))
        .listen(listener)
        .unwrap()
        .workers(1)
        .run();
    actix_web::rt::spawn(server);
    format!("http://{}", addr)
}

/// Echoes the received headers and body back as JSON.
async fn echo_request(req: HttpRequest, body: web::Bytes) -> HttpResponse {
    let headers: std::collections::HashMap<String, String> = req
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_lowercase(),
                value.to_str().unwrap_or("").to_string(),
            )
        })
        .collect();

    HttpResponse::Ok().json(serde_json::json!({
        "headers": headers,
        "body": String::from_utf8_lossy(&body),
    }))
}

#[actix_web::test]
async fn forward_applies_header_hygiene() {
    let base = spawn_server(|cfg: &mut web::ServiceConfig| {
        cfg.route("/svc", web::post().to(echo_request));
    });
    let forwarder = Forwarder::new();

    let mut headers = HeaderMap::new();
    headers.insert(header::HOST, HeaderValue::from_static("inbound.example"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("999"));
    headers.insert(header::EXPECT, HeaderValue::from_static("100-continue"));
    headers.insert(
        header::TRANSFER_ENCODING,
        HeaderValue::from_static("chunked"),
    );
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    headers.insert(
        HeaderName::from_static("x-custom"),
        HeaderValue::from_static("kept"),
    );
    headers.insert(
        HeaderName::from_static("x-empty"),
        HeaderValue::from_static(""),
    );

    let response = forwarder
        .forward(
            &format!("{}/svc", base),
            Method::POST,
            &headers,
            Some("application/xml"),
            Some(b"<root/>"),
        )
        .await
        .expect("forward should succeed");

    let echoed: serde_json::Value = response.json().await.unwrap();
    let seen = &echoed["headers"];

    // The loop-break marker is always present.
    assert_eq!(seen["x-requestrouting-forwarded"], "true");
    // Ordinary headers survive; empty-valued ones do not.
    assert_eq!(seen["x-custom"], "kept");
    assert!(seen.get("x-empty").is_none());
    // Hop-by-hop and entity headers are the client's own, not the inbound
    // request's.
    assert_ne!(seen["host"], "inbound.example");
    assert_ne!(seen["content-length"], "999");
    assert!(seen.get("expect").is_none());
    assert!(seen.get("transfer-encoding").is_none());
    // Content-Type is re-set from the captured value, not copied.
    assert_eq!(seen["content-type"], "application/xml");

    assert_eq!(echoed["body"], "<root/>");
}

#[actix_web::test]
async fn forward_attaches_body_only_for_post_and_put() {
    let base = spawn_server(|cfg: &mut web::ServiceConfig| {
        cfg.route("/svc", web::route().to(echo_request));
    });
    let forwarder = Forwarder::new();
    let headers = HeaderMap::new();

    let response = forwarder
        .forward(
            &format!("{}/svc", base),
            Method::GET,
            &headers,
            Some("application/xml"),
            Some(b"<root/>"),
        )
        .await
        .expect("forward should succeed");
    let echoed: serde_json::Value = response.json().await.unwrap();
    assert_eq!(echoed["body"], "");
    assert!(echoed["headers"].get("content-type").is_none());

    let response = forwarder
        .forward(
            &format!("{}/svc", base),
            Method::PUT,
            &headers,
            Some("application/xml"),
            Some(b"<root/>"),
        )
        .await
        .expect("forward should succeed");
    let echoed: serde_json::Value = response.json().await.unwrap();
    assert_eq!(echoed["body"], "<root/>");
}

#[actix_web::test]
async fn unparseable_content_type_is_dropped() {
    let base = spawn_server(|cfg: &mut web::ServiceConfig| {
        cfg.route("/svc", web::post().to(echo_request));
    });
    let forwarder = Forwarder::new();

    let response = forwarder
        .forward(
            &format!("{}/svc", base),
            Method::POST,
            &HeaderMap::new(),
            Some("bad\nvalue"),
            Some(b"<root/>"),
        )
        .await
        .expect("forward should succeed");

    let echoed: serde_json::Value = response.json().await.unwrap();
    assert!(echoed["headers"].get("content-type").is_none());
    assert_eq!(echoed["body"], "<root/>");
}

#[actix_web::test]
async fn forward_returns_none_on_connection_failure() {
    // Grab a port and close it again so nothing is listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let forwarder = Forwarder::new();
    let result = forwarder
        .forward(
            &format!("http://{}/svc", addr),
            Method::GET,
            &HeaderMap::new(),
            None,
            None,
        )
        .await;

    assert!(result.is_none());
}

#[actix_web::test]
async fn shadow_returns_response_body_text() {
    let base = spawn_server(|cfg: &mut web::ServiceConfig| {
        cfg.route(
            "/svc",
            web::post().to(|| async { HttpResponse::Ok().body("<ok/>") }),
        );
    });
    let forwarder = Forwarder::new();

    let body = forwarder
        .forward_shadow(
            format!("{}/svc", base),
            Method::POST,
            HeaderMap::new(),
            Some("application/xml".to_string()),
            Some(actix_web::web::Bytes::from_static(b"<root/>")),
            CancellationToken::new(),
        )
        .await;

    assert_eq!(body.as_deref(), Some("<ok/>"));
}

#[actix_web::test]
async fn shadow_resolves_none_when_cancelled_in_flight() {
    let base = spawn_server(|cfg: &mut web::ServiceConfig| {
        cfg.route(
            "/svc",
            web::post().to(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                HttpResponse::Ok().body("late")
            }),
        );
    });
    let forwarder = Forwarder::new();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    actix_web::rt::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let body = forwarder
        .forward_shadow(
            format!("{}/svc", base),
            Method::POST,
            HeaderMap::new(),
            None,
            Some(actix_web::web::Bytes::from_static(b"<root/>")),
            cancel,
        )
        .await;

    assert!(body.is_none());
}

#[actix_web::test]
async fn shadow_resolves_none_on_connection_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let forwarder = Forwarder::new();
    let body = forwarder
        .forward_shadow(
            format!("http://{}/svc", addr),
            Method::POST,
            HeaderMap::new(),
            None,
            None,
            CancellationToken::new(),
        )
        .await;

    assert!(body.is_none());
}

#[actix_web::test]
async fn copy_response_mirrors_status_headers_and_body() {
    let base = spawn_server(|cfg: &mut web::ServiceConfig| {
        cfg.route(
            "/svc",
            web::get().to(|| async {
                HttpResponse::Created()
                    .insert_header(("content-type", "application/xml"))
                    .insert_header(("server", "old-iron"))
                    .insert_header(("x-powered-by", "asp"))
                    .append_header(("x-multi", "a"))
                    .append_header(("x-multi", "b"))
                    .body("<ok/>")
            }),
        );
    });
    let forwarder = Forwarder::new();

    let upstream = forwarder
        .forward(
            &format!("{}/svc", base),
            Method::GET,
            &HeaderMap::new(),
            None,
            None,
        )
        .await
        .expect("forward should succeed");

    let mirrored = copy_response(upstream).await.unwrap();

    assert_eq!(mirrored.status().as_u16(), 201);
    assert_eq!(
        mirrored.headers().get("content-type").unwrap(),
        "application/xml"
    );
    // Multi-valued headers are joined with a comma.
    assert_eq!(mirrored.headers().get("x-multi").unwrap(), "a,b");
    // The copy-back skip list.
    assert!(mirrored.headers().get("server").is_none());
    assert!(mirrored.headers().get("x-powered-by").is_none());

    let body = actix_web::body::to_bytes(mirrored.into_body()).await.unwrap();
    assert_eq!(&body[..], b"<ok/>");
}
