//! # shunt-rs
//!
//! A traffic-splitting HTTP interceptor for incremental legacy-service
//! migration, built with Rust and Actix Web. shunt-rs sits in front of a
//! legacy XML-over-HTTP endpoint and decides, per request, whether the
//! legacy handler answers, a new backend service answers in its place, or
//! both run in parallel with the two responses compared offline.
//!
//! ## Routing modes
//!
//! - **RO (route-old)** - the default: the request reaches the legacy
//!   handler untouched.
//! - **RN (route-new)** - the request is forwarded to the new service and
//!   its response is mirrored back to the client; the legacy handler never
//!   runs.
//! - **RP (run-parallel)** - the legacy handler answers the client while a
//!   shadow copy of the request goes to the new service; after the response
//!   is sent, the two bodies are compared and the outcome logged.
//!
//! GET requests take one configured mode; POST requests are routed by the
//! request-type element found inside their XML body.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use actix_web::{web, App, HttpResponse, HttpServer};
//! use shunt_rs::config::hot_reload::ConfigManager;
//! use shunt_rs::config::settings::load_routing_config;
//! use shunt_rs::middleware::interceptor::RequestInterceptor;
//! use shunt_rs::services::forwarder::Forwarder;
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = load_routing_config().expect("Failed to load routing configuration");
//!     let manager = Arc::new(ConfigManager::new(config, "./routing.json".to_string()));
//!     let forwarder = Arc::new(Forwarder::new());
//!
//!     HttpServer::new(move || {
//!         App::new()
//!             .wrap(RequestInterceptor::new(manager.clone(), forwarder.clone()))
//!             // the legacy handler keeps its seat on the intercepted path
//!             .route("/dctserver.aspx", web::route().to(|| async {
//!                 HttpResponse::Ok().body("<x/>")
//!             }))
//!     })
//!     .bind(("127.0.0.1", 5900))?
//!     .run()
//!     .await
//! }
//! ```
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────┐    ┌───────────────────────────┐    ┌──────────────────┐
//! │   Client    │───▶│  Interceptor (middleware) │───▶│  Legacy handler  │
//! └─────────────┘    │                           │    └──────────────────┘
//!                    │  loop break → path gate   │
//!                    │  → snapshot → decision    │    ┌──────────────────┐
//!                    │  → RO / RN / RP dispatch  │───▶│  New service     │
//!                    └───────────────────────────┘    └──────────────────┘
//!                            │ (RP teardown)
//!                      cancel shadow, compare bodies, log outcome
//! ```
//!
//! ## Module Organization
//!
//! - **[`config`]** - key/value configuration loading and the cached
//!   snapshot with hot reload
//! - **[`models`]** - routing modes, the parsed configuration snapshot, and
//!   the internal error taxonomy
//! - **[`services`]** - the outbound forwarder and the response comparator
//! - **[`middleware`]** - the interceptor hook and the response capture tee
//! - **[`routes`]** - health, config reload, and the standalone legacy seat
//! - **[`utils`]** - body buffering and the pure routing decision
//! - **[`logs`]** - logger configuration
//!
//! ## Configuration Example
//!
//! ```json
//! {
//!   "Routing.NewService": "http://new-backend:8080/svc",
//!   "Routing.GET": "RO",
//!   "Routing.POST": "GetInventory | RP, SubmitOrder | RN",
//!   "Routing.LegacyService": "http://legacy-origin:8080/dctserver.aspx"
//! }
//! ```
//!
//! ## Environment Variables
//!
//! - `SHUNT_CONFIG_PATH`: configuration file path (default: `./routing.json`)
//! - `SHUNT_HOST`: server bind address (default: `0.0.0.0`)
//! - `SHUNT_PORT`: server port (default: `5900`)
//! - `RUST_LOG`: log level filter (default: `info`)
//! - `NO_COLOR`: disable colored log output
//!
//! ## Guarantees
//!
//! - A request carrying `X-RequestRouting-Forwarded: true` is never
//!   intercepted, so the module cannot loop on its own traffic.
//! - Buffered POST bodies are re-readable by downstream handlers from
//!   offset 0 on every path.
//! - In run-parallel mode the client receives exactly the bytes the legacy
//!   handler produced; shadow failures are invisible to the client.
//! - An invalid configuration fails every request safe to the legacy
//!   handler.

pub mod config;
pub mod logs;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;
