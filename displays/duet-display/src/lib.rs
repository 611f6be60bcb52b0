//! Renderer contract and shared screen composition for Duet nodes
//!
//! This crate provides:
//! - `DisplayBackend` trait for anything that can show a character screen
//! - `Screen`, an 8x21 text buffer matching a 128x64 OLED with a 6x8 font
//! - `compose`, which turns a `NodeView` into a `Screen`
//!
//! # Architecture
//!
//! The node loop takes a `NodeView` snapshot once per frame, composes it
//! into a `Screen` and hands that to its backend. Pixel positions from the
//! demo views are mapped onto character cells, so the same composer serves
//! a terminal as well as a text-mode OLED driver.

#![no_std]
#![deny(unsafe_code)]

pub mod backend;
pub mod compose;
pub mod screen;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError};
pub use compose::{compose, compose_error, compose_splash, splash_words, Identity};
pub use screen::{Screen, CELL_HEIGHT_PX, CELL_WIDTH_PX, SCREEN_COLS, SCREEN_ROWS};
