use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::instrument::InstrumentId;

/// Unique identifier for an annotation, assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationId(pub i64);

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AnnotationId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// A free-text note optionally attached to one instrument.
///
/// The back-reference is weak: deleting the instrument does not cascade, so
/// `instrument_id` may point at a record that no longer exists. Orphaned
/// annotations are a tolerated state, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub title: String,
    pub content: String,
    /// Set once when the annotation is created, never modified afterwards.
    pub created_on: DateTime<Utc>,
    pub instrument_id: Option<InstrumentId>,
}

/// The mutable field set of an annotation: create payload and update
/// replacement set alike. `created_on` and the instrument back-reference
/// are not part of it -- both are fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationFields {
    pub title: String,
    pub content: String,
}

impl AnnotationFields {
    /// Constraints checked at the transport boundary for both create and
    /// update.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.chars().count() < 5 {
            return Err("title must be at least 5 characters".to_string());
        }
        if self.title.chars().count() > 280 {
            return Err("title can't be over 280 characters".to_string());
        }
        if self.content.chars().count() < 5 {
            return Err("content must be at least 5 characters".to_string());
        }
        if self.content.chars().count() > 280 {
            return Err("content can't be over 280 characters".to_string());
        }
        Ok(())
    }
}

/// A fully formed annotation awaiting store-assigned identity.
#[derive(Debug, Clone)]
pub struct NewAnnotation {
    pub title: String,
    pub content: String,
    pub created_on: DateTime<Utc>,
    pub instrument_id: Option<InstrumentId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> AnnotationFields {
        AnnotationFields {
            title: "Earnings call".to_string(),
            content: "Guidance raised for Q3.".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_fields() {
        assert!(fields().validate().is_ok());
    }

    #[test]
    fn test_validate_title_too_short() {
        let mut f = fields();
        f.title = "abcd".to_string();
        assert!(f.validate().unwrap_err().contains("title"));
    }

    #[test]
    fn test_validate_title_bounds_inclusive() {
        let mut f = fields();
        f.title = "a".repeat(5);
        assert!(f.validate().is_ok());
        f.title = "a".repeat(280);
        assert!(f.validate().is_ok());
        f.title = "a".repeat(281);
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_validate_content_too_short() {
        let mut f = fields();
        f.content = "hey".to_string();
        assert!(f.validate().unwrap_err().contains("content"));
    }

    #[test]
    fn test_annotation_id_display_roundtrip() {
        let id = AnnotationId(7);
        let parsed: AnnotationId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
