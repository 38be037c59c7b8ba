//! Shared Types

mod access;
mod privacy;

pub use access::*;
pub use privacy::*;
