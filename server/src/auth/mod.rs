//! Authentication
//!
//! Sessions are managed by the external auth provider. This module only
//! validates the access tokens it issues and exposes the caller to handlers.

mod error;
pub mod jwt;
mod middleware;

pub use error::{AuthError, AuthResult};
pub use middleware::{optional_auth, AuthUser};
