use crate::{error::ValidationError, TagSpec};

/// A pair of tags in the same repository, checked to be a valid retag
///
/// This can only be created through [RetagRequest::new], so holding one means
/// the registry and repository match and the tags differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetagRequest {
    source: TagSpec,
    destination: TagSpec,
}

impl RetagRequest {
    pub fn new(source: TagSpec, destination: TagSpec) -> Result<Self, ValidationError> {
        validate(&source, &destination)?;
        Ok(RetagRequest {
            source,
            destination,
        })
    }

    pub fn source(&self) -> &TagSpec {
        &self.source
    }

    pub fn destination(&self) -> &TagSpec {
        &self.destination
    }
}

/// Check that moving `source` to `destination` stays within one repository and is not a no-op
pub fn validate(source: &TagSpec, destination: &TagSpec) -> Result<(), ValidationError> {
    if source.registry() != destination.registry() {
        return Err(ValidationError::CrossRegistry {
            from: source.registry().to_string(),
            to: destination.registry().to_string(),
        });
    }
    if source.repository() != destination.repository() {
        return Err(ValidationError::CrossRepository {
            from: source.repository().to_string(),
            to: destination.repository().to_string(),
        });
    }
    if source.tag() == destination.tag() {
        return Err(ValidationError::IdenticalTag(source.tag().to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    fn tag(input: &str) -> TagSpec {
        TagSpec::parse(input).unwrap()
    }

    #[test]
    fn accept() -> Result<(), ValidationError> {
        let req = RetagRequest::new(tag("a/x:t1"), tag("a/x:t2"))?;
        assert_eq!(req.source().tag(), "t1");
        assert_eq!(req.destination().tag(), "t2");
        Ok(())
    }

    #[test]
    fn reject() {
        assert_eq!(
            validate(&tag("a/x:t1"), &tag("b/x:t2")),
            Err(ValidationError::CrossRegistry {
                from: "a".to_string(),
                to: "b".to_string()
            })
        );
        assert_eq!(
            validate(&tag("a/x:t1"), &tag("a/y:t2")),
            Err(ValidationError::CrossRepository {
                from: "x".to_string(),
                to: "y".to_string()
            })
        );
        assert_eq!(
            validate(&tag("a/x:t1"), &tag("a/x:t1")),
            Err(ValidationError::IdenticalTag("t1".to_string()))
        );
    }

    #[test]
    fn first_violation_is_reported() {
        // Every invariant is violated, registry comes first
        assert!(matches!(
            RetagRequest::new(tag("a/x:t1"), tag("b/y:t1")),
            Err(ValidationError::CrossRegistry { .. })
        ));
        assert!(matches!(
            RetagRequest::new(tag("a/x:t1"), tag("a/y:t1")),
            Err(ValidationError::CrossRepository { .. })
        ));
    }

    #[test]
    fn port_is_part_of_registry() -> Result<(), ParseError> {
        let src = TagSpec::parse("localhost:5000/x:t1")?;
        let dst = TagSpec::parse("localhost:5001/x:t2")?;
        assert!(matches!(
            validate(&src, &dst),
            Err(ValidationError::CrossRegistry { .. })
        ));
        Ok(())
    }
}
