use thiserror::Error;

/// Failures raised inside the routing engine's service layer.
///
/// These never cross the middleware boundary: the interceptor converts every
/// variant into a log line, a fail-safe legacy pass-through, or a synthetic
/// error response. They exist so the services layer can report *why*
/// something failed without deciding *what* the client sees.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("upstream request failed: {0}")]
    Upstream(String),
    #[error("upstream request timed out")]
    Timeout,
    #[error("response mirroring failed: {0}")]
    Mirror(String),
}
