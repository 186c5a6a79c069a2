//! retag
//! =====
//!
//! Publish an existing manifest under a new tag in the same registry and
//! repository, without moving any layer.
//!
//! ```no_run
//! use retag::{distribution::Client, ClientConfig, RetagOptions};
//!
//! let request = retag::parse_request("reg.example.com/ns/img:v1", "reg.example.com/ns/img:v2")?;
//! let mut client = Client::new(&ClientConfig::default())?;
//! retag::retag(&request, &RetagOptions::default(), &mut client)?;
//! # Ok::<(), retag::error::Error>(())
//! ```

pub mod config;
pub mod distribution;
pub mod endpoint;
pub mod error;
pub mod media_types;

mod digest;
mod manifest;
mod request;
mod retag;
mod tag_spec;

pub use config::{ClientConfig, MissingSource, RetagOptions};
pub use digest::Digest;
pub use endpoint::TransportMode;
pub use manifest::{ManifestClient, ManifestPayload};
pub use request::{validate, RetagRequest};
pub use retag::{parse_request, retag, RetagOutcome};
pub use tag_spec::TagSpec;
