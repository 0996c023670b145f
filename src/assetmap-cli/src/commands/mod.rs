//! Command handlers for the assetmap CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod check;
pub mod configure;
pub mod images;
pub mod run;
