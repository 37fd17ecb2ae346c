//! Core definitions shared by all lindex-* crates: the error type and the
//! argument verification helpers.

pub mod error;
pub mod result;

pub use result::Result;
