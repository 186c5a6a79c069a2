use crate::error::*;
use serde::Deserialize;
use std::{collections::HashMap, fs, io, path::*};
use url::Url;

/// Authentication info read from a docker `config.json`
///
/// Only the `auths` table is used; credential helpers are not consulted.
///
/// ```json
/// { "auths": { "reg.example.com": { "auth": "<base64 of user:password>" } } }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoredAuth {
    #[serde(default)]
    auths: HashMap<String, Auth>,
}

#[derive(Debug, Clone, Deserialize)]
struct Auth {
    #[serde(default)]
    auth: Option<String>,
}

impl StoredAuth {
    /// Load from an explicitly given file. A missing or unreadable file is an error.
    pub fn from_path(path: &Path) -> Result<Self> {
        let f = fs::File::open(path).map_err(|source| Error::CredentialFile {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_reader(io::BufReader::new(f)).map_err(|source| {
            Error::InvalidCredential {
                path: path.to_owned(),
                source,
            }
        })
    }

    /// Load from the default docker location, anonymous if the file does not exist
    pub fn from_default_path(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::from_path(path)
        } else {
            log::debug!("No docker config at {}, access anonymously", path.display());
            Ok(Self::default())
        }
    }

    pub fn insert(&mut self, registry: &str, octet: String) {
        self.auths
            .insert(registry.to_string(), Auth { auth: Some(octet) });
    }

    /// Base64 encoded `user:password` for the registry `host[:port]`
    ///
    /// Keys of `auths` are matched literally first, then as URLs such as
    /// `https://reg.example.com/v1/` which docker writes for some registries.
    pub fn basic(&self, registry: &str) -> Option<&str> {
        if let Some(auth) = self.auths.get(registry) {
            return auth.auth.as_deref();
        }
        self.auths
            .iter()
            .find(|(key, _)| registry_of_key(key).as_deref() == Some(registry))
            .and_then(|(_, auth)| auth.auth.as_deref())
    }

    /// User name stored for the registry, for logging
    pub fn username(&self, registry: &str) -> Option<String> {
        let decoded = base64::decode(self.basic(registry)?).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (user, _password) = decoded.split_once(':')?;
        Some(user.to_string())
    }

    /// Value for the `Authorization` header answering the challenge
    pub fn challenge(
        &self,
        agent: &ureq::Agent,
        registry: &str,
        challenge: &AuthChallenge,
    ) -> Result<String> {
        match challenge {
            AuthChallenge::Basic => {
                let octet = self
                    .basic(registry)
                    .ok_or_else(|| Error::AuthorizationFailed(registry.to_string()))?;
                Ok(format!("Basic {}", octet))
            }
            AuthChallenge::Bearer {
                realm,
                service,
                scope,
            } => {
                let token_url = Url::parse(realm)?;
                log::debug!("Request token from {}", token_url);
                let mut req = agent
                    .get(token_url.as_str())
                    .set("Accept", "application/json");
                if let Some(octet) = self.basic(registry) {
                    req = req.set("Authorization", &format!("Basic {}", octet));
                }
                if let Some(service) = service {
                    req = req.query("service", service);
                }
                if let Some(scope) = scope {
                    req = req.query("scope", scope);
                }
                match req.call() {
                    Ok(res) => {
                        let token = res.into_json::<Token>()?;
                        let token = token
                            .token
                            .or(token.access_token)
                            .ok_or_else(|| Error::AuthorizationFailed(token_url.to_string()))?;
                        Ok(format!("Bearer {}", token))
                    }
                    Err(ureq::Error::Status(..)) => {
                        Err(Error::AuthorizationFailed(token_url.to_string()))
                    }
                    Err(ureq::Error::Transport(e)) => Err(Error::Network(e.into())),
                }
            }
        }
    }
}

fn registry_of_key(key: &str) -> Option<String> {
    let url = Url::parse(key).ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// WWW-Authenticate challenge
///
/// ```
/// use retag::distribution::AuthChallenge;
///
/// let auth = AuthChallenge::from_header(
///   r#"Bearer realm="https://ghcr.io/token",service="ghcr.io",scope="repository:termoshtt/ocipkg/rust-lib:pull,push""#,
/// ).unwrap();
///
/// assert_eq!(auth, AuthChallenge::Bearer {
///   realm: "https://ghcr.io/token".to_string(),
///   service: Some("ghcr.io".to_string()),
///   scope: Some("repository:termoshtt/ocipkg/rust-lib:pull,push".to_string()),
/// });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthChallenge {
    Basic,
    Bearer {
        realm: String,
        service: Option<String>,
        scope: Option<String>,
    },
}

impl AuthChallenge {
    pub fn from_header(header: &str) -> Result<Self> {
        let err = || Error::UnsupportedAuthHeader(header.to_string());
        let (ty, params) = header.trim().split_once(' ').unwrap_or((header.trim(), ""));
        if ty.eq_ignore_ascii_case("basic") {
            return Ok(AuthChallenge::Basic);
        }
        if !ty.eq_ignore_ascii_case("bearer") {
            return Err(err());
        }

        let mut realm = None;
        let mut service = None;
        let mut scope = None;
        for (key, value) in split_params(params).ok_or_else(err)? {
            match key.to_ascii_lowercase().as_str() {
                "realm" => realm = Some(value),
                "service" => service = Some(value),
                "scope" => scope = Some(value),
                _ => continue,
            }
        }
        Ok(AuthChallenge::Bearer {
            realm: realm.ok_or_else(err)?,
            service,
            scope,
        })
    }
}

/// Split `key="value",key=value` where quoted values may contain `,`
fn split_params(input: &str) -> Option<Vec<(String, String)>> {
    let mut params = Vec::new();
    let mut rest = input.trim();
    while !rest.is_empty() {
        let (key, after) = rest.split_once('=')?;
        let key = key.trim().to_string();
        let (value, after) = if let Some(quoted) = after.strip_prefix('"') {
            let end = quoted.find('"')?;
            (quoted[..end].to_string(), &quoted[end + 1..])
        } else {
            let end = after.find(',').unwrap_or(after.len());
            (after[..end].trim().to_string(), &after[end..])
        };
        params.push((key, value));
        rest = after.trim_start().trim_start_matches(',').trim_start();
    }
    Some(params)
}

#[derive(Deserialize)]
struct Token {
    token: Option<String>,
    access_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;
    use std::io::Write;

    fn stored(auths: HashMap<&str, &str>) -> StoredAuth {
        let mut stored = StoredAuth::default();
        for (registry, octet) in auths {
            stored.insert(registry, octet.to_string());
        }
        stored
    }

    #[test]
    fn lookup() {
        let auth = stored(hashmap! {
            "reg.example.com" => "dXNlcjpwYXNz",
            "https://index.docker.io/v1/" => "aHViOmh1Yg==",
            "http://localhost:5000" => "bG9jYWw6bG9jYWw=",
            "tls.example.com:443" => "dGxzOnRscw==",
        });
        assert_eq!(auth.basic("reg.example.com"), Some("dXNlcjpwYXNz"));
        assert_eq!(auth.basic("index.docker.io"), Some("aHViOmh1Yg=="));
        assert_eq!(auth.basic("localhost:5000"), Some("bG9jYWw6bG9jYWw="));
        assert_eq!(auth.basic("localhost"), None);
        assert_eq!(auth.basic("ghcr.io"), None);
        assert_eq!(auth.basic("tls.example.com:443"), Some("dGxzOnRscw=="));

        assert_eq!(auth.username("reg.example.com").as_deref(), Some("user"));
        assert_eq!(auth.username("ghcr.io"), None);
    }

    #[test]
    fn docker_config() -> Result<()> {
        let path = std::env::temp_dir().join(format!("retag-auth-{}.json", std::process::id()));
        let mut f = fs::File::create(&path)?;
        f.write_all(
            br#"{
              "auths": {
                "reg.example.com": { "auth": "dXNlcjpwYXNz" },
                "helper.example.com": {}
              },
              "credsStore": "desktop"
            }"#,
        )?;
        let auth = StoredAuth::from_path(&path)?;
        fs::remove_file(&path)?;
        assert_eq!(auth.basic("reg.example.com"), Some("dXNlcjpwYXNz"));
        assert_eq!(auth.basic("helper.example.com"), None);
        Ok(())
    }

    #[test]
    fn credential_errors() -> Result<()> {
        let missing = std::env::temp_dir().join("retag-no-such-config.json");
        assert!(matches!(
            StoredAuth::from_path(&missing),
            Err(Error::CredentialFile { .. })
        ));
        assert!(StoredAuth::from_default_path(&missing)?.basic("any").is_none());

        let path = std::env::temp_dir().join(format!("retag-broken-{}.json", std::process::id()));
        fs::write(&path, "{ not json")?;
        let res = StoredAuth::from_default_path(&path);
        fs::remove_file(&path)?;
        assert!(matches!(res, Err(Error::InvalidCredential { .. })));
        Ok(())
    }

    #[test]
    fn challenge_header() -> Result<()> {
        assert_eq!(
            AuthChallenge::from_header(r#"Basic realm="Registry Realm""#)?,
            AuthChallenge::Basic
        );
        assert_eq!(
            AuthChallenge::from_header(r#"Bearer realm="https://auth.docker.io/token",service="registry.docker.io""#)?,
            AuthChallenge::Bearer {
                realm: "https://auth.docker.io/token".to_string(),
                service: Some("registry.docker.io".to_string()),
                scope: None,
            }
        );
        assert_eq!(
            AuthChallenge::from_header(
                r#"Bearer realm="https://r/token", scope="repository:a/b:pull,push", error="insufficient_scope""#
            )?,
            AuthChallenge::Bearer {
                realm: "https://r/token".to_string(),
                service: None,
                scope: Some("repository:a/b:pull,push".to_string()),
            }
        );
        assert!(AuthChallenge::from_header("Digest realm=\"x\"").is_err());
        assert!(AuthChallenge::from_header("Bearer service=\"x\"").is_err());
        assert!(AuthChallenge::from_header("Bearer realm=\"unterminated").is_err());
        Ok(())
    }
}
