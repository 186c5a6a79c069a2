use crate::{
    config::{default_docker_config, ClientConfig},
    distribution::*,
    error::*,
    media_types, Digest, ManifestClient, ManifestPayload,
};
use std::io::Read;
use url::Url;

/// Header in which registries report the digest of a manifest
pub const CONTENT_DIGEST: &str = "Docker-Content-Digest";

/// A blocking client for the `/v2/<name>/manifests/<reference>` API endpoint
///
/// Answers `401 Unauthorized` by following the `WWW-Authenticate` challenge
/// with the credentials in the docker config, then retries once.
pub struct Client {
    agent: ureq::Agent,
    /// Loaded authentication info from filesystem
    auth: StoredAuth,
    /// `Authorization` header obtained by the last challenge
    authorization: Option<String>,
}

impl Client {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let auth = match &config.docker_config {
            Some(path) => StoredAuth::from_path(path)?,
            None => StoredAuth::from_default_path(&default_docker_config()?)?,
        };
        Ok(Self::with_auth(config, auth))
    }

    pub fn with_auth(config: &ClientConfig, auth: StoredAuth) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Client {
            agent: builder.build(),
            auth,
            authorization: None,
        }
    }

    fn send(
        &self,
        method: &str,
        url: &Url,
        headers: &[(&str, &str)],
        body: Option<&[u8]>,
    ) -> std::result::Result<ureq::Response, ureq::Error> {
        let mut req = self.agent.request(method, url.as_str());
        for (key, value) in headers {
            req = req.set(key, value);
        }
        if let Some(authorization) = self.authorization.as_ref() {
            req = req.set("Authorization", authorization);
        }
        match body {
            Some(body) => req.send_bytes(body),
            None => req.call(),
        }
    }

    /// `registry` is `host[:port]` exactly as written in the tag, used for the credential lookup
    fn call(
        &mut self,
        method: &str,
        url: &Url,
        registry: &str,
        headers: &[(&str, &str)],
        body: Option<&[u8]>,
    ) -> Result<ureq::Response> {
        log::info!("{} {}", method, url);
        match self.send(method, url, headers, body) {
            Err(ureq::Error::Status(401, res)) => {
                let header = res
                    .header("www-authenticate")
                    .ok_or_else(|| Error::AuthorizationFailed(url.to_string()))?
                    .to_string();
                let challenge = AuthChallenge::from_header(&header)?;
                log::debug!("{} requires authentication: {:?}", registry, challenge);
                if let Some(user) = self.auth.username(registry) {
                    log::debug!("Use credential of {} for {}", user, registry);
                }
                let authorization = self.auth.challenge(&self.agent, registry, &challenge)?;
                self.authorization = Some(authorization);
                match self.send(method, url, headers, body) {
                    Ok(res) => Ok(res),
                    Err(ureq::Error::Status(401, _)) => {
                        Err(Error::AuthorizationFailed(url.to_string()))
                    }
                    Err(e) => Err(e.into()),
                }
            }
            res => Ok(res?),
        }
    }
}

impl ManifestClient for Client {
    /// Get manifest
    ///
    /// ```text
    /// GET /v2/<name>/manifests/<reference>
    /// ```
    ///
    /// See [corresponding OCI distribution spec document](https://github.com/opencontainers/distribution-spec/blob/main/spec.md#pulling-manifests) for detail.
    fn fetch_manifest(&mut self, url: &str) -> Result<ManifestPayload> {
        let registry = registry_of(url);
        let url = Url::parse(url)?;
        let accept = media_types::accept_header();
        let res = self
            .call("GET", &url, registry, &[("Accept", accept.as_str())], None)
            .map_err(Error::into_not_found)?;
        let media_type = res
            .header("Content-Type")
            .ok_or_else(|| Error::MissingMediaType(url.to_string()))?
            .to_string();
        if let Some(digest) = res.header(CONTENT_DIGEST) {
            log::debug!("{} is {}", url, digest);
        }
        let mut body = Vec::new();
        res.into_reader().read_to_end(&mut body)?;
        Ok(ManifestPayload { media_type, body })
    }

    /// Push manifest
    ///
    /// ```text
    /// PUT /v2/<name>/manifests/<reference>
    /// ```
    ///
    /// Blobs referenced by the manifest must already exist in the repository.
    ///
    /// See [corresponding OCI distribution spec document](https://github.com/opencontainers/distribution-spec/blob/main/spec.md#pushing-manifests) for detail.
    fn publish_manifest(
        &mut self,
        url: &str,
        manifest: &ManifestPayload,
    ) -> Result<Option<Digest>> {
        let registry = registry_of(url);
        let url = Url::parse(url)?;
        let res = self.call(
            "PUT",
            &url,
            registry,
            &[("Content-Type", manifest.media_type.as_str())],
            Some(manifest.body.as_slice()),
        )?;
        Ok(res.header(CONTENT_DIGEST).and_then(Digest::parse))
    }
}

/// `host[:port]` of the URL as written, before [Url] drops a default port
fn registry_of(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_scheme, rest)| rest);
    rest.split('/').next().unwrap_or(rest)
}
