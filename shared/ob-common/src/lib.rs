//! Orgbase Common Library
//!
//! Wire types shared between the server and API consumers.

pub mod types;

pub use types::*;
