//! Formatted terminal output for the two commands.

pub mod format;

pub use format::*;
