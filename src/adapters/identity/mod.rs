//! Identity adapters. Session state plus token issuers.

pub mod secure_token;
pub mod session;
pub mod static_token;

pub use secure_token::{DEFAULT_SECURE_TOKEN_URL, SecureTokenIssuer};
pub use session::{AuthSession, ListenerId};
pub use static_token::StaticTokenIssuer;
