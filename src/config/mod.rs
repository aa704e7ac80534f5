//! Configuration system
//!
//! TOML file -> [`Config`] with embedded defaults, kept in a global slot so
//! the CLI and the controllers read the same values.

pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::*;
pub use utils::*;
