//! CLI library components for the `kb` tool.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
