//! TrueNavi command-line library.
//!
//! Subcommand handlers and terminal rendering for the `truenavi` binary.

pub mod commands;
pub mod output;
pub mod terminal;
