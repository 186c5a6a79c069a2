use crate::TagSpec;
use oci_spec::distribution::ErrorResponse;
use std::path::PathBuf;

/// Failure to read `registry/repository:tag`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Missing '/' between registry and repository: {0}")]
    MissingRegistry(String),
    #[error("Missing ':' between repository and tag: {0}")]
    MissingTag(String),
    #[error("Ambiguous repository/tag split: {0}")]
    AmbiguousTag(String),
    #[error("Empty {field} in tag: {input}")]
    EmptyField { field: &'static str, input: String },
}

/// A retag request which would do something other than move a tag within one repository
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Registry must be the same: {from} != {to}")]
    CrossRegistry { from: String, to: String },
    #[error("Repository must be the same: {from} != {to}")]
    CrossRepository { from: String, to: String },
    #[error("Tags must be different: {0} == {0}")]
    IdenticalTag(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    //
    // Invalid user input
    //
    #[error(transparent)]
    InvalidTag(#[from] ParseError),
    #[error(transparent)]
    InvalidRequest(#[from] ValidationError),
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),

    //
    // Credentials
    //
    #[error("Cannot read credential file {}: {source}", .path.display())]
    CredentialFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid credential file {}: {source}", .path.display())]
    InvalidCredential {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("No valid home directory to look up the docker config")]
    NoValidHomeDirectory,

    //
    // Retag workflow
    //
    #[error("Failed to GET manifest for {tag}: {source}")]
    ManifestFetch { tag: TagSpec, source: Box<Error> },
    #[error("Failed to PUT manifest for {tag}: {source}")]
    ManifestPublish { tag: TagSpec, source: Box<Error> },

    //
    // Error from OCI registry
    //
    #[error(transparent)]
    Network(Box<ureq::Transport>),
    #[error("Registry returned {status} for {url}: {response}")]
    Registry {
        status: u16,
        url: String,
        response: ErrorResponse,
    },
    #[error("Registry returned {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },
    #[error("Manifest not found: {url}")]
    ManifestNotFound {
        url: String,
        response: Option<ErrorResponse>,
    },
    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),
    #[error("Unsupported WWW-Authenticate header: {0}")]
    UnsupportedAuthHeader(String),
    #[error("Registry response lacks Content-Type header: {0}")]
    MissingMediaType(String),

    //
    // System error
    //
    #[error(transparent)]
    InvalidJson(#[from] serde_json::Error),
    #[error(transparent)]
    UnknownIo(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True when fetching a manifest failed because nothing is stored under the tag,
    /// either directly or through [Error::ManifestFetch].
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::ManifestNotFound { .. } => true,
            Error::ManifestFetch { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// HTTP status of a failed registry response
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Registry { status, .. } | Error::UnexpectedStatus { status, .. } => {
                Some(*status)
            }
            Error::ManifestNotFound { .. } => Some(404),
            Error::ManifestFetch { source, .. } | Error::ManifestPublish { source, .. } => {
                source.status()
            }
            _ => None,
        }
    }

    /// Reclassify a `404` answer to a manifest `GET` as [Error::ManifestNotFound]
    pub(crate) fn into_not_found(self) -> Self {
        match self {
            Error::Registry {
                status: 404,
                url,
                response,
            } => Error::ManifestNotFound {
                url,
                response: Some(response),
            },
            Error::UnexpectedStatus { status: 404, url } => Error::ManifestNotFound {
                url,
                response: None,
            },
            e => e,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(status, res) => {
                let url = res.get_url().to_string();
                match res.into_json::<ErrorResponse>() {
                    Ok(response) => Error::Registry {
                        status,
                        url,
                        response,
                    },
                    Err(_) => Error::UnexpectedStatus { status, url },
                }
            }
            ureq::Error::Transport(e) => Error::Network(e.into()),
        }
    }
}
