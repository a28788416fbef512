//! Logging configuration for the shunt-rs interceptor.
//!
//! Every log line carries a module tag (the log target) so the routing
//! engine's output can be picked out of a busy host log: the decision
//! engine, forwarder, and comparator all log under their own module paths.
//! Two levels matter operationally: info for routing activity and
//! comparison outcomes, error for configuration and transport defects.

pub mod logger;
