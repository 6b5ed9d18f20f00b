//! Turn context.
//!
//! - [`window::window`]: the bounded transcript slice fed to a turn

pub mod window;
