//! Credential value objects issued by the client-credentials token endpoint.

pub mod credential;
pub mod secret;

pub use credential::*;
pub use secret::*;
