//! Configuration types
//!
//! Transport-agnostic node configuration. With the `serde` feature these
//! types deserialize directly from the node's TOML file.

pub mod timing;
pub mod types;

pub use timing::Timing;
pub use types::*;
