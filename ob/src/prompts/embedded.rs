//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Coach persona prompt, rendered with the user's current habits
pub const COACH: &str = include_str!("../../prompts/coach.pmt");

/// Habit suggestion prompt for the fast model
pub const SUGGEST: &str = include_str!("../../prompts/suggest.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "coach" => {
            debug!("get_embedded: matched coach");
            Some(COACH)
        }
        "suggest" => {
            debug!("get_embedded: matched suggest");
            Some(SUGGEST)
        }
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
