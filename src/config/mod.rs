//! Configuration management for the shunt-rs interceptor.
//!
//! Routing rules come from a flat key/value source (a JSON object of
//! string keys to string values) read at startup and parsed into an
//! immutable [`crate::models::routing::RoutingConfig`] snapshot.
//!
//! # Recognized keys
//!
//! - `Routing.NewService` - absolute base URL of the new backend service.
//! - `Routing.GET` - routing mode (`RO`/`RN`/`RP`, case-insensitive) for
//!   all GET requests; absent or blank means `RO`.
//! - `Routing.POST` - comma-separated `Name | Mode` pairs keyed on the
//!   request-type element names found in POST bodies.
//! - `Routing.LegacyService` - legacy origin for the standalone binary's
//!   seat handler (optional).
//!
//! # Fail-safe parsing
//!
//! Defects in the routing grammar never abort startup or a reload: every
//! defect is logged, the snapshot is marked invalid, and an invalid snapshot
//! routes every request to the legacy handler.
//!
//! # Snapshot lifecycle
//!
//! [`hot_reload::ConfigManager`] caches the parsed snapshot and swaps it
//! atomically, either from the background file watcher or through the
//! `POST /api/config/reload` endpoint. The interceptor reads the snapshot
//! exactly once per request.
//!
//! # Environment variables
//!
//! - `SHUNT_CONFIG_PATH`: configuration file path (default `./routing.json`)

pub mod hot_reload;
pub mod settings;
