//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files.
//!
//! Template loading chain:
//! 1. `.planetgen/prompts/{name}.pmt` (user override)
//! 2. `prompts/{name}.pmt` (repo default)
//! 3. Embedded fallback in code
//!
//! Templates use Handlebars syntax with HTML escaping disabled.

mod compose;
pub mod embedded;
mod loader;

pub use compose::{ImagePromptContext, compose};
pub use loader::PromptLoader;
