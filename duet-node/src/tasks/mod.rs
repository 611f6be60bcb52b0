//! Node tasks
//!
//! The receive thread feeds `RX_CHANNEL`; the node loop drains it once per
//! frame on the embassy executor.

pub mod link_rx;
pub mod node;

pub use link_rx::{spawn_link_rx, READ_TIMEOUT};
pub use node::{node_task, Runner};
