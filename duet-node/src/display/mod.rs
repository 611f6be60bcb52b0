//! Terminal display
//!
//! The node has no panel of its own. The composed 21x8 screen is drawn on
//! the controlling terminal with ANSI escapes: one redraw per changed frame,
//! inverted regions in reverse video.

pub mod terminal;

pub use terminal::TerminalDisplay;
