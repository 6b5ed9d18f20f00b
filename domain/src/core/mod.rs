//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`error::ValidationError`]: out-of-range field values
//! - [`weight::InfluenceWeight`]: validated director influence scalar

pub mod error;
pub mod text;
pub mod weight;
