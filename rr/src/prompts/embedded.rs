//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Rescheduling instruction prompt
pub const RESCHEDULE: &str = include_str!("../../prompts/reschedule.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "reschedule" => Some(RESCHEDULE),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
