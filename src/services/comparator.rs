//! Equivalence comparison between the legacy and shadow responses.
//!
//! Runs after the client has been answered; its only output is a log line.
//! The classification itself is a pure function so the null-handling rules
//! can be tested directly.

use log::{error, info};

/// Outcome of comparing the captured legacy bytes with the shadow body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// The captured bytes are not valid UTF-8; nothing was compared.
    Undecodable,
    BothEmpty,
    OneEmpty,
    Match,
    Mismatch,
}

/// Classifies the two response bodies under the null-handling rules: an
/// empty side counts as null, and comparison is only attempted when both
/// sides are present and the captured bytes decode as UTF-8.
pub fn classify(original: &[u8], shadow: Option<&str>) -> Comparison {
    let original = if original.is_empty() {
        None
    } else {
        match std::str::from_utf8(original) {
            Ok(text) => Some(text),
            Err(_) => return Comparison::Undecodable,
        }
    };
    let shadow = shadow.filter(|s| !s.is_empty());

    match (original, shadow) {
        (None, None) => Comparison::BothEmpty,
        (Some(_), None) | (None, Some(_)) => Comparison::OneEmpty,
        (Some(old), Some(new)) if old == new => Comparison::Match,
        _ => Comparison::Mismatch,
    }
}

/// Compares the two bodies and logs the outcome. Never touches the client
/// response.
pub fn compare_responses(original: &[u8], shadow: Option<&str>) {
    match classify(original, shadow) {
        Comparison::Undecodable => {
            error!("Captured response is not valid UTF-8; skipping comparison")
        }
        Comparison::BothEmpty => info!("Both responses are null/empty"),
        Comparison::OneEmpty => info!("One response is null/empty, the other is not"),
        Comparison::Match => info!("Responses match."),
        Comparison::Mismatch => info!("Responses DO NOT match."),
    }
}
