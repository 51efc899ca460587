//! Display formatting for metric values and order-book levels.

pub mod num;

pub use num::{fixed, grouped, percent, UNDEFINED};
