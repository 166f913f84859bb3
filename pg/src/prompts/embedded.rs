//! Embedded prompts
//!
//! Compiled into the binary from the .pmt files at build time.

use tracing::debug;

/// Feature extraction system prompt
pub const CLASSIFY: &str = include_str!("../../prompts/classify.pmt");

/// Deterministic image prompt template
pub const IMAGE: &str = include_str!("../../prompts/image.pmt");

/// Instructions for a model-authored image prompt
pub const NARRATE: &str = include_str!("../../prompts/narrate.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "classify" => Some(CLASSIFY),
        "image" => Some(IMAGE),
        "narrate" => Some(NARRATE),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
