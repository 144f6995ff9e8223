//! STY file parsing
//!
//! Decodes GBST style files: the two-level palette tables, tile and sprite
//! graphics, and the delta patches that derive damage and animation variants
//! from base sprites.
//!
//! Based of specification from this webpage: https://wiki.gtamp.com/index.php/STY
pub mod constants;
pub mod error;

mod delta;
mod parser;
mod types;
mod utils;

pub use types::*;
