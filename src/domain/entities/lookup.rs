//! Lookup tables: categories, statuses, structure types and course types.

use chrono::{DateTime, Utc};

/// The lookup tables served by the catalog.
///
/// All of them share the same shape; only structure types carry a slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Category,
    Status,
    StructureType,
    CourseType,
}

impl LookupKind {
    /// Backing table name.
    pub fn table(self) -> &'static str {
        match self {
            LookupKind::Category => "course_categories",
            LookupKind::Status => "course_statuses",
            LookupKind::StructureType => "course_structure_types",
            LookupKind::CourseType => "courses_types",
        }
    }

    /// Human-readable label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            LookupKind::Category => "Course category",
            LookupKind::Status => "Course status",
            LookupKind::StructureType => "Course structure type",
            LookupKind::CourseType => "Course type",
        }
    }

    pub fn has_slug(self) -> bool {
        matches!(self, LookupKind::StructureType)
    }
}

/// A row of a lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupEntry {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for creating a lookup row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLookupEntry {
    pub name: String,
    pub slug: Option<String>,
}

/// Partial update of a lookup row. `None` fields are unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_structure_types_have_slugs() {
        assert!(LookupKind::StructureType.has_slug());
        assert!(!LookupKind::Category.has_slug());
        assert!(!LookupKind::Status.has_slug());
        assert!(!LookupKind::CourseType.has_slug());
    }

    #[test]
    fn test_tables_are_distinct() {
        let kinds = [
            LookupKind::Category,
            LookupKind::Status,
            LookupKind::StructureType,
            LookupKind::CourseType,
        ];
        let tables: std::collections::HashSet<_> = kinds.iter().map(|k| k.table()).collect();
        assert_eq!(tables.len(), kinds.len());
    }
}
