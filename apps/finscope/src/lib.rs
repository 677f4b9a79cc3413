//! # finscope
//!
//! HTTP API, CLI and configuration for the Finscope assessment engine.
//! The scoring logic itself lives in `finscope-core`.

pub mod api;
pub mod cli;
pub mod config;
