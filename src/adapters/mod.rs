//! Infrastructure adapters. Implement outbound ports.
//!
//! Callable HTTP functions and identity sessions. Map errors to DomainError.

pub mod callable;
pub mod identity;
