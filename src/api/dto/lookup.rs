//! DTOs for lookup table endpoints.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::{LookupEntry, LookupPatch};

/// Compiled regex for structure type slugs.
static SLUG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

/// Lookup row as returned by the API. `slug` is present for structure types only.
#[derive(Debug, Serialize)]
pub struct LookupItem {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LookupEntry> for LookupItem {
    fn from(e: LookupEntry) -> Self {
        Self {
            id: e.id,
            name: e.name,
            slug: e.slug,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLookupRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(length(min = 1, max = 255))]
    #[validate(regex(path = "*SLUG_REGEX"))]
    pub slug: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLookupRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    #[validate(regex(path = "*SLUG_REGEX"))]
    pub slug: Option<String>,
}

impl UpdateLookupRequest {
    pub fn into_patch(self) -> LookupPatch {
        LookupPatch {
            name: self.name,
            slug: self.slug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_pattern() {
        let ok = CreateLookupRequest {
            name: "Bootcamp".to_string(),
            slug: Some("boot-camp-2".to_string()),
        };
        assert!(ok.validate().is_ok());

        let bad = CreateLookupRequest {
            name: "Bootcamp".to_string(),
            slug: Some("Boot Camp".to_string()),
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        let req = CreateLookupRequest {
            name: String::new(),
            slug: None,
        };
        assert!(req.validate().is_err());
    }
}
