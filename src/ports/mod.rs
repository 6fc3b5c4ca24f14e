//! Port traits. API boundaries for the hexagon.
//!
//! - Outbound: Called by application into infrastructure (news backend,
//!   identity provider)

pub mod outbound;

pub use outbound::{IdentityPort, NewsPort, TokenIssuer};
