//! Supporting utilities.
//!
//! - [`constraint`]: Value constraints checked at construction

pub mod constraint;
