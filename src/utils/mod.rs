//! Supporting utilities for the interception pipeline.
//!
//! # Module Organization
//!
//! - [`body`] - one-pass request body buffering that leaves the payload
//!   re-readable for downstream handlers
//! - [`decision`] - the pure per-request routing decision, including POST
//!   body XML inspection
//!
//! Both are deliberately free of interceptor state: `decision::decide` is a
//! pure function of `(method, body bytes, snapshot)` so routing behavior can
//! be tested without a running server, and `body::buffer_request_body` only
//! touches the payload it is handed.

pub mod body;
pub mod decision;
