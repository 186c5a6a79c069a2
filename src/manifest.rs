use crate::{error::Result, Digest};

/// A manifest as stored in the registry, never parsed nor rewritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestPayload {
    pub media_type: String,
    pub body: Vec<u8>,
}

impl ManifestPayload {
    pub fn new(media_type: impl Into<String>, body: Vec<u8>) -> Self {
        ManifestPayload {
            media_type: media_type.into(),
            body,
        }
    }

    /// sha256 of the body, the digest the registry stores it under
    pub fn digest(&self) -> Digest {
        Digest::from_buf_sha256(&self.body)
    }
}

/// Read and write manifests by URL
///
/// [crate::distribution::Client] talks to a real registry.
/// Authentication and transport are the implementor's concern.
pub trait ManifestClient {
    /// `GET` the manifest at `url`
    ///
    /// Implementations should return [crate::error::Error::ManifestNotFound] when
    /// the registry answers that nothing is stored there.
    fn fetch_manifest(&mut self, url: &str) -> Result<ManifestPayload>;

    /// `PUT` the manifest at `url`, returning the digest the registry reports if any
    fn publish_manifest(
        &mut self,
        url: &str,
        manifest: &ManifestPayload,
    ) -> Result<Option<Digest>>;
}

impl<C: ManifestClient + ?Sized> ManifestClient for &mut C {
    fn fetch_manifest(&mut self, url: &str) -> Result<ManifestPayload> {
        (**self).fetch_manifest(url)
    }

    fn publish_manifest(
        &mut self,
        url: &str,
        manifest: &ManifestPayload,
    ) -> Result<Option<Digest>> {
        (**self).publish_manifest(url, manifest)
    }
}
