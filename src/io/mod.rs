//! Input/output helpers.
//!
//! - region reference ingest (`reference`)
//! - dataset/history CSV exports (`export`)
//! - header-addressed CSV access shared by the ingest paths (`table`)

pub mod export;
pub mod reference;
pub(crate) mod table;

pub use export::*;
pub use reference::*;
