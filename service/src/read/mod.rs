//! Read entities definitions.

pub mod history;
pub mod workout;

pub use self::history::Metrics;
