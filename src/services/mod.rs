//! Service layer for outbound traffic and response analysis.
//!
//! This layer sits below the interceptor middleware and above the raw HTTP
//! client. It implements the two halves of traffic splitting that touch the
//! network and their offline follow-up:
//!
//! ```text
//! Interceptor ──▶ Forwarder ──▶ new backend service
//!      │                             │
//!      └── capture ──▶ Comparator ◀──┘ (shadow body)
//! ```
//!
//! # Module Organization
//!
//! - [`forwarder`] - the process-wide outbound client: header filtering,
//!   loop-break marker, body rules, timeout, cancellable shadow dispatch,
//!   and response mirroring
//! - [`comparator`] - byte-level equivalence check between the captured
//!   legacy response and the shadow response, logged after end-of-request
//!
//! Every failure in this layer resolves to `None` (a null marker) or a log
//! line; nothing here ever raises into the host's request pipeline.

pub mod comparator;
pub mod forwarder;
