//! Manifest media types a registry may return for a tag
//!
//! A retag never interprets the manifest, so the index and list types are
//! accepted as well as single-platform manifests.

use oci_spec::image::MediaType;

pub const DOCKER_MANIFEST_V2: &str = "application/vnd.docker.distribution.manifest.v2+json";
pub const DOCKER_MANIFEST_LIST_V2: &str =
    "application/vnd.docker.distribution.manifest.list.v2+json";

/// Media types sent in the `Accept` header when fetching a manifest
pub fn accepted() -> Vec<String> {
    vec![
        DOCKER_MANIFEST_V2.to_string(),
        DOCKER_MANIFEST_LIST_V2.to_string(),
        MediaType::ImageManifest.to_string(),
        MediaType::ImageIndex.to_string(),
    ]
}

/// Value of the `Accept` header when fetching a manifest
pub fn accept_header() -> String {
    accepted().join(", ")
}
