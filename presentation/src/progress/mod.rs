//! Batch-run progress reporting

pub mod reporter;
