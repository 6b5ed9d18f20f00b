//! Debate participants.
//!
//! - [`config::AgentConfig`]: a persona prompt plus model settings
//! - [`role_template::RoleTemplate`]: persona parsed from a role file

pub mod config;
pub mod role_template;
