//! Completion session types.
//!
//! - [`stream::StreamEvent`]: incremental output of a completion call

pub mod stream;
