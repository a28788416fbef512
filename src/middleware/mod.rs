//! Interception middleware for the traffic-splitting module.
//!
//! The middleware layer is the module's only coupling to the host: one
//! Actix middleware pair that hooks every mapped request, plus the response
//! body wrapper that carries run-parallel state to end-of-request.
//!
//! # Module Organization
//!
//! - [`interceptor`] - the per-request hook: loop break, path gate, body
//!   buffering, routing decision, and dispatch to the three modes
//! - [`capture`] - the response tee installed in run-parallel mode, whose
//!   teardown is the end-of-request comparison hook
//!
//! # Request Flow
//!
//! ```text
//! Client Request → Interceptor → decision
//!                      │
//!        RO ───────────┼──▶ legacy handler (untouched)
//!        RN ───────────┼──▶ new service ──▶ mirrored response, legacy skipped
//!        RP ───────────┴──▶ legacy handler + shadow request
//!                               │
//!                           CaptureBody tee
//!                               │ (end of request)
//!                           cancel shadow, compare if finished
//! ```
//!
//! The interceptor converts every internal failure into a pass-through, a
//! synthetic error response, or a log line; the host never sees an error
//! from this layer, and the legacy response is never altered by the shadow
//! path.

pub mod capture;
pub mod interceptor;
