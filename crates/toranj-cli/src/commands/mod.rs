// Subcommand implementations, one module per `toranj` subcommand

pub mod build;
pub mod compare;
pub mod config;
pub mod sweep;
pub mod toolchain;
