//! Reshaping fetched case records into a per-date, per-region table.
//!
//! - date-axis alignment across sources (`axis`)
//! - the pivoted table with running totals (`table`)

pub mod axis;
pub mod table;

pub use axis::*;
pub use table::*;
