//! Registry access based on [OCI distribution specification](https://github.com/opencontainers/distribution-spec)

mod auth;
mod client;

pub use auth::*;
pub use client::{Client, CONTENT_DIGEST};
