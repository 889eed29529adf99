//! Punctuality dataset: record types, calendar derivation and loading.

pub mod calendar;
pub mod loader;
pub mod types;

pub use calendar::CalendarFields;
pub use loader::{load_table, read_table};
pub use types::{TripRecord, TripTable};
