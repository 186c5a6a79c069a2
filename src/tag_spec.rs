use crate::error::ParseError;
use std::{fmt, str::FromStr};

/// A fully qualified tag reference, `registry/repository:tag`
///
/// Unlike the short forms accepted by `docker pull`, every part is mandatory:
/// there is no default registry and no implicit `latest`.
///
/// - The registry is everything before the first `/`, and may carry a port, e.g. `localhost:5000`.
/// - The repository may contain further `/`, e.g. `org/team/image`.
/// - The tag is everything after the last `:`, and must not contain `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagSpec {
    registry: String,
    repository: String,
    tag: String,
}

impl TagSpec {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let (registry, remainder) = input
            .split_once('/')
            .ok_or_else(|| ParseError::MissingRegistry(input.to_string()))?;
        let (repository, tag) = remainder
            .rsplit_once(':')
            .ok_or_else(|| ParseError::MissingTag(input.to_string()))?;
        if repository.contains(':') || tag.contains('/') {
            return Err(ParseError::AmbiguousTag(input.to_string()));
        }
        for (field, value) in [
            ("registry", registry),
            ("repository", repository),
            ("tag", tag),
        ] {
            if value.is_empty() {
                return Err(ParseError::EmptyField {
                    field,
                    input: input.to_string(),
                });
            }
        }
        Ok(TagSpec {
            registry: registry.to_string(),
            repository: repository.to_string(),
            tag: tag.to_string(),
        })
    }

    /// Host, with optional port
    pub fn registry(&self) -> &str {
        &self.registry
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl FromStr for TagSpec {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TagSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.registry, self.repository, self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(registry: &str, repository: &str, tag: &str) -> TagSpec {
        TagSpec {
            registry: registry.to_string(),
            repository: repository.to_string(),
            tag: tag.to_string(),
        }
    }

    #[test]
    fn tag_spec() -> Result<(), ParseError> {
        assert_eq!(
            TagSpec::parse("reg.example.com/image:v1")?,
            spec("reg.example.com", "image", "v1")
        );
        assert_eq!(
            TagSpec::parse("ghcr.io/termoshtt/ocipkg/testing:latest")?,
            spec("ghcr.io", "termoshtt/ocipkg/testing", "latest")
        );
        assert_eq!(
            TagSpec::parse("localhost:5000/test_repo:tag1")?,
            spec("localhost:5000", "test_repo", "tag1")
        );
        Ok(())
    }

    #[test]
    fn round_trip() -> Result<(), ParseError> {
        for input in [
            "reg.example.com/ns/img:v1",
            "localhost:5000/a/b/c/d:1.2.3-rc_1",
            "r/x:t",
            "Registry.Example/Upper/Case:TAG",
        ] {
            assert_eq!(TagSpec::parse(input)?.to_string(), input);
            assert_eq!(input.parse::<TagSpec>()?.to_string(), input);
        }
        Ok(())
    }

    #[test]
    fn invalid() {
        assert_eq!(
            TagSpec::parse(""),
            Err(ParseError::MissingRegistry("".to_string()))
        );
        assert_eq!(
            TagSpec::parse("ubuntu:20.04"),
            Err(ParseError::MissingRegistry("ubuntu:20.04".to_string()))
        );
        assert_eq!(
            TagSpec::parse("reg.example.com/ns/img"),
            Err(ParseError::MissingTag("reg.example.com/ns/img".to_string()))
        );
        // The only ':' is in the registry port
        assert!(matches!(
            TagSpec::parse("localhost:5000/img"),
            Err(ParseError::MissingTag(_))
        ));
        assert!(matches!(
            TagSpec::parse("reg/img:v1:v2"),
            Err(ParseError::AmbiguousTag(_))
        ));
        assert!(matches!(
            TagSpec::parse("reg/img:v1/extra"),
            Err(ParseError::AmbiguousTag(_))
        ));
    }

    #[test]
    fn empty_field() {
        for (input, expected) in [
            ("/img:v1", "registry"),
            ("reg/:v1", "repository"),
            ("reg/img:", "tag"),
        ] {
            assert_eq!(
                TagSpec::parse(input),
                Err(ParseError::EmptyField {
                    field: expected,
                    input: input.to_string()
                })
            );
        }
    }
}
