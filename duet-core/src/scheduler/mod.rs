//! Demo rotation
//!
//! The master decides which demo runs and for how long; the slave only
//! follows `DemoSync`.

pub mod rotation;

pub use rotation::{DemoScheduler, DemoSession};
