//! Callable-function adapter. Implements NewsPort over HTTPS POST.
//!
//! Request executor, response envelope decoding and the typed client.

pub mod client;
pub mod envelope;
pub mod executor;

pub use client::{CallableNewsClient, DEFAULT_COMMENTS_LIMIT, functions};
pub use executor::{CallableExecutor, DEFAULT_TIMEOUT, RawResponse};
