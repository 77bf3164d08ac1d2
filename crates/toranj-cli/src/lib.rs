//! toranj CLI library
//!
//! Command-line front end for the toranj benchmark suite: configuration,
//! compiler discovery, CMake build orchestration, sweep execution and result
//! comparison. Measurement and analysis live in `toranj_core`; this crate
//! wires them to files, URLs, subprocesses and the terminal.

pub mod build;
pub mod charts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod fetch;
pub mod output;
pub mod toolchain;
