use sha2::{Digest as _, Sha256};
use std::fmt;

/// Digest of contents
///
/// Defined in [OCI image spec](https://github.com/opencontainers/image-spec/blob/v1.0.1/descriptor.md#digests)
/// as `algorithm ":" encoded`. Registries report the digest of a stored manifest
/// in the `Docker-Content-Digest` header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    pub algorithm: String,
    pub encoded: String,
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.encoded)
    }
}

impl Digest {
    /// Parse `algorithm:encoded`, returns `None` for anything else
    pub fn parse(input: &str) -> Option<Self> {
        let (algorithm, encoded) = input.trim().split_once(':')?;
        if algorithm.is_empty() || encoded.is_empty() || encoded.contains(':') {
            return None;
        }
        Some(Digest {
            algorithm: algorithm.to_string(),
            encoded: encoded.to_string(),
        })
    }

    /// Calc digest using SHA-256 algorithm
    pub fn from_buf_sha256(buf: &[u8]) -> Self {
        let hash = Sha256::digest(buf);
        let digest = base16ct::lower::encode_string(&hash);
        Self {
            algorithm: "sha256".to_string(),
            encoded: digest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256() {
        assert_eq!(
            Digest::from_buf_sha256(b"").to_string(),
            "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn parse() {
        let digest = Digest::parse("sha256:abcdef").unwrap();
        assert_eq!(digest.algorithm, "sha256");
        assert_eq!(digest.encoded, "abcdef");
        assert!(Digest::parse("sha256").is_none());
        assert!(Digest::parse(":abc").is_none());
        assert!(Digest::parse("a:b:c").is_none());
    }
}
