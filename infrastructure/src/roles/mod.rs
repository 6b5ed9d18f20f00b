//! Persona templates on disk.

mod library;

pub use library::{RoleError, RoleLibrary};
