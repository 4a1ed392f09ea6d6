//! Tasks for deploying, linking and transferring through universal cross-chain contracts.

pub mod artifacts;
pub mod bindings;
pub mod calls;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod errors;
pub mod output;
