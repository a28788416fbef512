//! The per-request routing decision.
//!
//! [`decide`] is a pure function of the HTTP method, the buffered request
//! body, and the configuration snapshot. It owns the POST body inspection:
//! the body is expected to be UTF-8 XML whose root element contains a
//! `requests` child, and the direct children of `requests` name the request
//! types that the `Routing.POST` table is keyed on.

use crate::models::mode::RoutingMode;
use crate::models::routing::RoutingConfig;
use actix_web::http::Method;
use log::{error, info};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Resolves the routing mode for one request.
///
/// The decision procedure, in order:
///
/// 1. Invalid configuration fails safe to `RO`.
/// 2. GET requests take the configured GET mode.
/// 3. Methods other than GET and POST are never routed.
/// 4. POST requests are only inspected when a POST table exists; a missing,
///    empty, non-UTF-8, or unparseable body falls back to `RO`.
/// 5. The first direct child of `root/requests`, in document order, whose
///    local name appears in the POST table (case-insensitive) decides the
///    mode. Namespaces are ignored. No match means `RO`.
pub fn decide(method: &Method, body: Option<&[u8]>, config: &RoutingConfig) -> RoutingMode {
    if !config.is_valid {
        return RoutingMode::RouteOld;
    }
    if method == Method::GET {
        return config.get_mode;
    }
    if method != Method::POST {
        return RoutingMode::RouteOld;
    }
    if !config.has_post_modes() {
        return RoutingMode::RouteOld;
    }

    let body = match body {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => {
            info!("POST request carried no body; routing to legacy handler");
            return RoutingMode::RouteOld;
        }
    };
    let text = match std::str::from_utf8(body) {
        Ok(text) => text,
        Err(e) => {
            error!("Request body is not valid UTF-8: {}", e);
            return RoutingMode::RouteOld;
        }
    };

    match first_configured_request_type(text, config) {
        Ok(Some(mode)) => mode,
        Ok(None) => RoutingMode::RouteOld,
        Err(e) => {
            error!("Failed to parse request body as XML: {}", e);
            RoutingMode::RouteOld
        }
    }
}

/// Walks `root/requests/*` and returns the mode of the first child whose
/// local name is configured. Only the first `requests` element under the
/// root is consulted.
fn first_configured_request_type(
    xml: &str,
    config: &RoutingConfig,
) -> Result<Option<RoutingMode>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut open = 0usize;
    let mut in_requests = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                open += 1;
                if open == 2 {
                    in_requests = e.local_name().as_ref() == b"requests";
                } else if open == 3 && in_requests {
                    if let Some(mode) = configured_mode(&e, config) {
                        return Ok(Some(mode));
                    }
                }
            }
            Event::Empty(e) => {
                if open == 2 && in_requests {
                    if let Some(mode) = configured_mode(&e, config) {
                        return Ok(Some(mode));
                    }
                }
            }
            Event::End(_) => {
                if open == 2 && in_requests {
                    // Done with the requests element; nothing matched.
                    return Ok(None);
                }
                open = open.saturating_sub(1);
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn configured_mode(element: &BytesStart<'_>, config: &RoutingConfig) -> Option<RoutingMode> {
    let local = element.local_name();
    let name = std::str::from_utf8(local.as_ref()).ok()?;
    config.post_mode_for(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(entries: &[(&str, &str)]) -> RoutingConfig {
        let source: HashMap<String, String> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RoutingConfig::from_source(&source)
    }

    #[test]
    fn first_child_in_document_order_wins() {
        let config = config(&[
            ("Routing.NewService", "http://new/svc"),
            ("Routing.POST", "Alpha|RN, Beta|RP"),
        ]);

        let body = b"<root><requests><Beta/><Alpha/></requests></root>";
        assert_eq!(
            decide(&Method::POST, Some(body), &config),
            RoutingMode::RunParallel
        );
    }

    #[test]
    fn lookup_ignores_namespace_prefixes() {
        let config = config(&[
            ("Routing.NewService", "http://new/svc"),
            ("Routing.POST", "Alpha|RN"),
        ]);

        let body =
            b"<root xmlns:x=\"urn:x\"><requests><x:Alpha/></requests></root>";
        assert_eq!(
            decide(&Method::POST, Some(body), &config),
            RoutingMode::RouteNew
        );
    }

    #[test]
    fn grandchildren_of_requests_are_not_consulted() {
        let config = config(&[
            ("Routing.NewService", "http://new/svc"),
            ("Routing.POST", "Alpha|RN"),
        ]);

        let body =
            b"<root><requests><Wrapper><Alpha/></Wrapper></requests></root>";
        assert_eq!(
            decide(&Method::POST, Some(body), &config),
            RoutingMode::RouteOld
        );
    }

    #[test]
    fn only_first_requests_element_is_consulted() {
        let config = config(&[
            ("Routing.NewService", "http://new/svc"),
            ("Routing.POST", "Alpha|RN"),
        ]);

        let body = b"<root><requests><Other/></requests>\
                     <requests><Alpha/></requests></root>";
        assert_eq!(
            decide(&Method::POST, Some(body), &config),
            RoutingMode::RouteOld
        );
    }
}
