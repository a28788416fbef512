//! Data models for the traffic-splitting interceptor.
//!
//! The models layer holds the routing vocabulary shared by every other
//! module: the three-way [`mode::RoutingMode`] decision, the immutable
//! [`routing::RoutingConfig`] snapshot parsed from the key/value
//! configuration source, and the [`error::RoutingError`] taxonomy used
//! inside the services layer.
//!
//! Everything here is plain data: parsing and validation happen when a
//! snapshot is created, and the result is shared read-only across worker
//! threads for the lifetime of a request.

pub mod error;
pub mod mode;
pub mod routing;
