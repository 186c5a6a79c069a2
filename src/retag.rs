use crate::{
    config::{MissingSource, RetagOptions},
    endpoint::{manifest_url, TransportMode},
    error::*,
    Digest, ManifestClient, RetagRequest, TagSpec,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetagOutcome {
    /// The destination tag now points to the manifest with this digest
    Retagged { digest: Digest },
    /// The source tag does not exist and [MissingSource::Warn] was set
    SourceMissing,
}

/// Parse both tags and check they form a valid retag
pub fn parse_request(from: &str, to: &str) -> Result<RetagRequest> {
    let source = TagSpec::parse(from)?;
    let destination = TagSpec::parse(to)?;
    Ok(RetagRequest::new(source, destination)?)
}

/// Publish the manifest of the source tag under the destination tag
///
/// The manifest is fetched once and pushed back byte-for-byte with its media
/// type, so no layer is touched. Nothing is retried: the whole call can be
/// repeated safely, since pushing the same manifest under the same tag again
/// changes nothing.
pub fn retag<C: ManifestClient>(
    request: &RetagRequest,
    options: &RetagOptions,
    mut client: C,
) -> Result<RetagOutcome> {
    let source = request.source();
    let destination = request.destination();
    log::info!("retag {} -> {}", source, destination);
    if options.transport == TransportMode::Insecure {
        log::warn!("using an insecure connection to the registry");
    }

    let source_url = manifest_url(source, options.transport);
    let destination_url = manifest_url(destination, options.transport);

    let manifest = match client.fetch_manifest(&source_url) {
        Ok(manifest) => manifest,
        Err(e) if e.is_not_found() && options.missing_source == MissingSource::Warn => {
            log::warn!("no manifest for {}, {}", source, e);
            return Ok(RetagOutcome::SourceMissing);
        }
        Err(e) => {
            return Err(Error::ManifestFetch {
                tag: source.clone(),
                source: Box::new(e),
            })
        }
    };
    let digest = manifest.digest();
    log::info!("{} is {} ({})", source, digest, manifest.media_type);

    let published = client
        .publish_manifest(&destination_url, &manifest)
        .map_err(|e| Error::ManifestPublish {
            tag: destination.clone(),
            source: Box::new(e),
        })?;
    if let Some(published) = published {
        if published != digest {
            log::warn!(
                "registry reports {} for {}, expected {}",
                published,
                destination,
                digest
            );
        }
    }
    log::info!("retag success");
    Ok(RetagOutcome::Retagged { digest })
}
