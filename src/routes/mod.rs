//! HTTP endpoints exposed by the standalone shunt-rs binary.
//!
//! The interceptor itself is middleware, not a route; what lives here is
//! the operational surface around it plus the seat the legacy handler
//! occupies when shunt-rs runs as its own process.
//!
//! # Module Organization
//!
//! - [`health`] - health, readiness, and liveness probes
//! - [`config_reload`] - manual snapshot refresh and status inspection
//! - [`legacy`] - proxy to the legacy origin on the intercepted path
//!
//! Embedders that wrap an existing Actix application with the interceptor
//! only need [`health`] and [`config_reload`]; their own handler takes the
//! legacy seat.

pub mod config_reload;
pub mod health;
pub mod legacy;
