use std::fmt;
use std::str::FromStr;

/// Per-request routing decision for the intercepted endpoint.
///
/// Every intercepted request resolves to exactly one of these modes. The
/// default on any parse failure, configuration defect, or unmatched request
/// is [`RoutingMode::RouteOld`], so a broken deployment degrades to the
/// legacy behavior rather than an outage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingMode {
    /// `RO`: let the request proceed to the legacy handler unchanged.
    RouteOld,
    /// `RN`: forward to the new service and answer the client with its
    /// response; the legacy handler never runs.
    RouteNew,
    /// `RP`: the legacy handler answers the client while a shadow copy of
    /// the request goes to the new service for offline comparison.
    RunParallel,
}

impl RoutingMode {
    /// Whether this mode sends any traffic to the new service.
    pub fn is_routed(self) -> bool {
        !matches!(self, RoutingMode::RouteOld)
    }
}

impl FromStr for RoutingMode {
    type Err = String;

    /// Parses the configuration token, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            t if t.eq_ignore_ascii_case("RO") => Ok(RoutingMode::RouteOld),
            t if t.eq_ignore_ascii_case("RN") => Ok(RoutingMode::RouteNew),
            t if t.eq_ignore_ascii_case("RP") => Ok(RoutingMode::RunParallel),
            other => Err(format!("unrecognized routing mode '{}'", other)),
        }
    }
}

impl fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            RoutingMode::RouteOld => "RO",
            RoutingMode::RouteNew => "RN",
            RoutingMode::RunParallel => "RP",
        };
        f.write_str(token)
    }
}
