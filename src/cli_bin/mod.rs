//! CLI module for the matterfix command-line interface
//!
//! Argument parsing lives in [`args`]; [`commands`] maps parsed arguments onto
//! library tasks and runs them through the batch runner.

pub mod args;
pub mod commands;
