//! CLI command implementations.

pub mod common;
pub mod config;
pub mod init;
pub mod profiles;
pub mod run;
pub mod sample;
