//! Display configuration
//!
//! The firmware embeds `flipdot.toml` and parses it at boot with the
//! no_std parser in [`parser`].

pub mod parser;
pub mod types;

pub use parser::{parse_config, ParseError};
pub use types::*;
