//! Measurement records and the store that owns them.

mod measurement;
mod store;

pub use measurement::Measurement;
pub use store::MeasurementStore;
