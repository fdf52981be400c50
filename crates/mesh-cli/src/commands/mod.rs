//! Subcommand implementations.

pub mod displace;
pub mod info;
