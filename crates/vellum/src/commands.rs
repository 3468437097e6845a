//! CLI command implementations.

pub mod admin;
pub mod build;
pub mod dev;
pub mod init;
pub mod serve;
