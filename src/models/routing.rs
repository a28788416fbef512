use crate::models::mode::RoutingMode;
use log::error;
use std::collections::HashMap;

/// Configuration key holding the base URL of the new backend service.
pub const KEY_NEW_SERVICE: &str = "Routing.NewService";
/// Configuration key holding the routing mode applied to all GET requests.
pub const KEY_GET_MODE: &str = "Routing.GET";
/// Configuration key holding the `Name | Mode` pairs for POST request types.
pub const KEY_POST_MODES: &str = "Routing.POST";
/// Configuration key holding the legacy origin used by the standalone seat
/// handler. Optional; the interceptor itself never reads it.
pub const KEY_LEGACY_SERVICE: &str = "Routing.LegacyService";

/// Immutable routing snapshot parsed from the key/value configuration source.
///
/// A snapshot is parsed once and shared read-only for the duration of a
/// request. Any defect in the source marks the whole snapshot invalid
/// (`is_valid = false`), which makes every request resolve to
/// [`RoutingMode::RouteOld`]; parsing still continues past the first defect
/// so that every problem is logged in one pass.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// Absolute URL of the new service. Required whenever any configured
    /// mode sends traffic there.
    pub new_service_url: String,
    /// Mode applied to every GET request.
    pub get_mode: RoutingMode,
    /// Request-type name (lowercased) to mode, for POST requests.
    post_modes: HashMap<String, RoutingMode>,
    /// False when any configuration defect was found during parsing.
    pub is_valid: bool,
    /// Legacy origin for the standalone binary's seat handler.
    pub legacy_service_url: Option<String>,
}

impl Default for RoutingConfig {
    /// A valid snapshot that routes everything to the legacy handler.
    fn default() -> Self {
        Self {
            new_service_url: String::new(),
            get_mode: RoutingMode::RouteOld,
            post_modes: HashMap::new(),
            is_valid: true,
            legacy_service_url: None,
        }
    }
}

impl RoutingConfig {
    /// Parses a snapshot out of the raw key/value source.
    ///
    /// Grammar:
    /// - `Routing.GET`: one routing mode token; absent or blank means `RO`.
    /// - `Routing.POST`: comma-separated `Name | Mode` pairs, whitespace
    ///   around tokens ignored; absent or blank means no POST routing.
    /// - `Routing.NewService`: required (non-blank) when any parsed mode is
    ///   not `RO`.
    ///
    /// Defects never abort parsing. Each one is logged and the returned
    /// snapshot carries `is_valid = false`. Duplicate POST names are not a
    /// defect; the last occurrence wins.
    pub fn from_source(source: &HashMap<String, String>) -> Self {
        let mut is_valid = true;

        let new_service_url = source
            .get(KEY_NEW_SERVICE)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        let get_mode = match source.get(KEY_GET_MODE).map(|s| s.trim()) {
            None | Some("") => RoutingMode::RouteOld,
            Some(raw) => match raw.parse::<RoutingMode>() {
                Ok(mode) => mode,
                Err(e) => {
                    error!("{}: {}", KEY_GET_MODE, e);
                    is_valid = false;
                    RoutingMode::RouteOld
                }
            },
        };

        let mut post_modes = HashMap::new();
        if let Some(raw) = source.get(KEY_POST_MODES).map(|s| s.trim()) {
            if !raw.is_empty() {
                for pair in raw.split(',') {
                    let parts: Vec<&str> = pair.split('|').map(str::trim).collect();
                    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
                        error!(
                            "{}: malformed pair '{}' (expected Name|Mode)",
                            KEY_POST_MODES,
                            pair.trim()
                        );
                        is_valid = false;
                        continue;
                    }
                    match parts[1].parse::<RoutingMode>() {
                        Ok(mode) => {
                            // Last occurrence of a duplicate name wins.
                            post_modes.insert(parts[0].to_lowercase(), mode);
                        }
                        Err(e) => {
                            error!("{}: pair '{}': {}", KEY_POST_MODES, pair.trim(), e);
                            is_valid = false;
                        }
                    }
                }
            }
        }

        let routes_new =
            get_mode.is_routed() || post_modes.values().any(|mode| mode.is_routed());
        if routes_new && new_service_url.is_empty() {
            error!(
                "{} must be set when any routing mode is not RO",
                KEY_NEW_SERVICE
            );
            is_valid = false;
        }

        let legacy_service_url = source
            .get(KEY_LEGACY_SERVICE)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            new_service_url,
            get_mode,
            post_modes,
            is_valid,
            legacy_service_url,
        }
    }

    /// Looks up the mode configured for a POST request-type name,
    /// case-insensitively.
    pub fn post_mode_for(&self, request_type: &str) -> Option<RoutingMode> {
        self.post_modes.get(&request_type.to_lowercase()).copied()
    }

    /// Whether any POST request types are configured at all.
    pub fn has_post_modes(&self) -> bool {
        !self.post_modes.is_empty()
    }
}
