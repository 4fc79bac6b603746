//! Remote data sources.
//!
//! - paginated feature-query client for case/death records (`rki`)
//! - one-shot snapshot-history download (`morgenpost`)

pub mod morgenpost;
pub mod rki;

pub use morgenpost::*;
pub use rki::*;
