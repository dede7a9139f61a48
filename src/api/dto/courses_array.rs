//! `courses_array` payloads and their conversion into sync plans.
//!
//! Items missing a required key are not errors: they are dropped, logged at
//! debug level, and counted in [`SyncPlan::skipped`]. Values that are present
//! but out of range (year or semester below 1) fail validation instead.

use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::{BundleCourseInput, ProgramCourseInput, SyncPlan};

/// One bundle entry: `{course_id, course_position}`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CourseSyncItem {
    pub course_id: Option<i64>,
    pub course_position: Option<i32>,
}

impl CourseSyncItem {
    fn complete(&self) -> Option<(i64, i32)> {
        Some((self.course_id?, self.course_position?))
    }
}

/// One program year: `{program_year, semesters: [...]}`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProgramYearItem {
    #[validate(range(min = 1))]
    pub program_year: Option<i32>,

    #[validate(nested)]
    pub semesters: Option<Vec<ProgramSemesterItem>>,
}

/// One program semester: `{program_semester, courses: [...]}`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProgramSemesterItem {
    #[validate(range(min = 1))]
    pub program_semester: Option<i32>,

    pub courses: Option<Vec<CourseSyncItem>>,
}

/// Accepts complete bundle items in input order.
pub fn bundle_plan(items: Vec<CourseSyncItem>) -> SyncPlan<BundleCourseInput> {
    let mut plan = SyncPlan::default();

    for (index, item) in items.into_iter().enumerate() {
        match item.complete() {
            Some((course_id, course_position)) => plan.accepted.push(BundleCourseInput {
                course_id,
                course_position,
            }),
            None => {
                tracing::debug!(index, ?item, "Skipping incomplete bundle course item");
                plan.skipped += 1;
            }
        }
    }

    plan
}

/// Flattens a year → semester → course tree in traversal order.
///
/// A missing key skips only the node it belongs to: a year without
/// `program_year` drops its whole subtree, a semester without
/// `program_semester` drops its courses, a course without `course_id` or
/// `course_position` drops that course. Skipped counts dropped leaves plus
/// dropped nodes with no leaves.
pub fn program_plan(years: Vec<ProgramYearItem>) -> SyncPlan<ProgramCourseInput> {
    let mut plan = SyncPlan::default();

    for year in years {
        let Some(program_year) = year.program_year else {
            let dropped = year
                .semesters
                .iter()
                .flatten()
                .map(|s| s.courses.as_ref().map_or(0, Vec::len))
                .sum::<usize>();
            tracing::debug!(dropped, "Skipping program year without program_year");
            plan.skipped += dropped.max(1);
            continue;
        };

        for semester in year.semesters.unwrap_or_default() {
            let Some(program_semester) = semester.program_semester else {
                let dropped = semester.courses.as_ref().map_or(0, Vec::len);
                tracing::debug!(
                    program_year,
                    dropped,
                    "Skipping program semester without program_semester"
                );
                plan.skipped += dropped.max(1);
                continue;
            };

            for item in semester.courses.unwrap_or_default() {
                match item.complete() {
                    Some((course_id, course_position)) => {
                        plan.accepted.push(ProgramCourseInput {
                            course_id,
                            course_position,
                            program_year,
                            program_semester,
                        })
                    }
                    None => {
                        tracing::debug!(
                            program_year,
                            program_semester,
                            ?item,
                            "Skipping incomplete program course item"
                        );
                        plan.skipped += 1;
                    }
                }
            }
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn years(value: serde_json::Value) -> Vec<ProgramYearItem> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_bundle_item_without_course_id_skipped() {
        let items: Vec<CourseSyncItem> = serde_json::from_value(json!([
            { "course_position": 3 },
            { "course_id": 10, "course_position": 1 },
            { "course_id": 11 }
        ]))
        .unwrap();

        let plan = bundle_plan(items);

        assert_eq!(
            plan.accepted,
            vec![BundleCourseInput {
                course_id: 10,
                course_position: 1
            }]
        );
        assert_eq!(plan.skipped, 2);
    }

    #[test]
    fn test_bundle_plan_keeps_input_order_and_duplicates() {
        let items: Vec<CourseSyncItem> = serde_json::from_value(json!([
            { "course_id": 10, "course_position": 2 },
            { "course_id": 11, "course_position": 1 },
            { "course_id": 10, "course_position": 3 }
        ]))
        .unwrap();

        let plan = bundle_plan(items);

        let ids: Vec<_> = plan.accepted.iter().map(|i| i.course_id).collect();
        assert_eq!(ids, vec![10, 11, 10]);
        assert_eq!(plan.skipped, 0);
    }

    #[test]
    fn test_program_plan_flattens_tree() {
        let plan = program_plan(years(json!([
            {
                "program_year": 1,
                "semesters": [
                    { "program_semester": 1, "courses": [{ "course_id": 20, "course_position": 1 }] },
                    { "program_semester": 2, "courses": [{ "course_id": 21, "course_position": 1 }] }
                ]
            }
        ])));

        assert_eq!(
            plan.accepted,
            vec![
                ProgramCourseInput {
                    course_id: 20,
                    course_position: 1,
                    program_year: 1,
                    program_semester: 1
                },
                ProgramCourseInput {
                    course_id: 21,
                    course_position: 1,
                    program_year: 1,
                    program_semester: 2
                },
            ]
        );
        assert_eq!(plan.skipped, 0);
    }

    #[test]
    fn test_program_missing_keys_skip_only_their_subtree() {
        let plan = program_plan(years(json!([
            {
                "semesters": [
                    { "program_semester": 1, "courses": [
                        { "course_id": 1, "course_position": 1 },
                        { "course_id": 2, "course_position": 2 }
                    ] }
                ]
            },
            {
                "program_year": 2,
                "semesters": [
                    { "courses": [{ "course_id": 3, "course_position": 1 }] },
                    { "program_semester": 2, "courses": [
                        { "course_position": 1 },
                        { "course_id": 4, "course_position": 2 }
                    ] }
                ]
            }
        ])));

        assert_eq!(
            plan.accepted,
            vec![ProgramCourseInput {
                course_id: 4,
                course_position: 2,
                program_year: 2,
                program_semester: 2
            }]
        );
        assert_eq!(plan.skipped, 4);
    }

    #[test]
    fn test_program_year_below_one_fails_validation() {
        let tree = years(json!([{ "program_year": 0, "semesters": [] }]));
        assert!(tree[0].validate().is_err());

        let tree = years(json!([{ "program_year": 1, "semesters": [{ "program_semester": 0 }] }]));
        assert!(tree[0].validate().is_err());
    }
}
