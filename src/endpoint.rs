//! Registry API endpoints derived from a [TagSpec]

use crate::TagSpec;
use std::fmt;

/// Whether the registry is reached over TLS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportMode {
    #[default]
    Secure,
    Insecure,
}

impl TransportMode {
    pub fn from_insecure(insecure: bool) -> Self {
        if insecure {
            TransportMode::Insecure
        } else {
            TransportMode::Secure
        }
    }

    pub fn scheme(&self) -> &'static str {
        match self {
            TransportMode::Secure => "https",
            TransportMode::Insecure => "http",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.scheme())
    }
}

/// URL of the manifest for the tag
///
/// ```text
/// {scheme}://{registry}/v2/{repository}/manifests/{tag}
/// ```
///
/// ```
/// use retag::{endpoint::{manifest_url, TransportMode}, TagSpec};
///
/// let tag = TagSpec::parse("reg.example.com/ns/img:v1").unwrap();
/// assert_eq!(
///     manifest_url(&tag, TransportMode::Secure),
///     "https://reg.example.com/v2/ns/img/manifests/v1"
/// );
/// ```
pub fn manifest_url(tag: &TagSpec, transport: TransportMode) -> String {
    format!(
        "{}://{}/v2/{}/manifests/{}",
        transport.scheme(),
        tag.registry(),
        tag.repository(),
        tag.tag()
    )
}
