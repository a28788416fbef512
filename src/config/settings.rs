use crate::models::error::RoutingError;
use crate::models::routing::RoutingConfig;
use log::debug;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const MAX_CONFIG_SIZE: u64 = 1024 * 1024; // 1MB

/// Resolves the configuration file path.
///
/// Taken from the `SHUNT_CONFIG_PATH` environment variable when set,
/// otherwise `./routing.json` relative to the working directory.
pub fn config_path() -> String {
    std::env::var("SHUNT_CONFIG_PATH").unwrap_or_else(|_| "./routing.json".to_string())
}

/// Loads and parses the routing configuration from the default path.
///
/// See [`load_routing_config_from`] for the behavior.
pub fn load_routing_config() -> Result<RoutingConfig, RoutingError> {
    load_routing_config_from(&config_path())
}

/// Loads the key/value configuration source from `path` and parses it into a
/// [`RoutingConfig`].
///
/// The file is a flat JSON object mapping key strings to value strings:
///
/// ```json
/// {
///   "Routing.NewService": "http://new-backend:8080/svc",
///   "Routing.GET": "RO",
///   "Routing.POST": "GetInventory | RP, SubmitOrder | RN"
/// }
/// ```
///
/// Only *source-level* problems are errors here: a missing or unreadable
/// file, a file over the size limit, or malformed JSON. Defects in the
/// routing grammar itself (bad mode tokens, malformed pairs, missing new
/// service URL) are not errors; they come back as a snapshot with
/// `is_valid = false`, which fails every request safe to the legacy handler.
pub fn load_routing_config_from(path: &str) -> Result<RoutingConfig, RoutingError> {
    debug!("Loading routing configuration from: {}", path);

    let file = Path::new(path);
    if !file.exists() {
        return Err(RoutingError::Config(format!(
            "cannot resolve config path '{}'",
            path
        )));
    }

    let metadata = fs::metadata(file).map_err(|e| {
        RoutingError::Config(format!("cannot read config file metadata: {}", e))
    })?;
    if metadata.len() > MAX_CONFIG_SIZE {
        return Err(RoutingError::Config(format!(
            "config file too large: {} bytes (max: {} bytes)",
            metadata.len(),
            MAX_CONFIG_SIZE
        )));
    }

    let data = fs::read_to_string(file)
        .map_err(|e| RoutingError::Config(format!("cannot read config file: {}", e)))?;
    let source: HashMap<String, String> = serde_json::from_str(&data)
        .map_err(|e| RoutingError::Config(format!("invalid JSON: {}", e)))?;

    let config = RoutingConfig::from_source(&source);
    debug!(
        "Loaded routing configuration (valid: {}, GET mode: {})",
        config.is_valid, config.get_mode
    );
    Ok(config)
}
