//! Canonical domain types for tickwatch market data.
//!
//! All models validate their invariants at construction time and carry full
//! serde support; invalid states are unrepresentable downstream.

mod date;
mod models;
mod range;
mod symbol;

pub use date::CalendarDate;
pub use models::{Bar, BarSeries, CompanyProfile};
pub use range::FetchRange;
pub use symbol::Symbol;
