//! Projection of association rows into the shapes returned to clients.
//!
//! Pure functions: the caller reads the rows (already joined with their course)
//! and resolves media once for all course ids, then hands both in here.
//!
//! - [`format_bundle`] produces a flat list ordered by `course_position`.
//! - [`join_written`] and [`bundle_cards`] keep the order rows were written in,
//!   for responses to a write.
//! - [`group_program`] produces a year → semester → course tree. Years and
//!   semesters are emitted in ascending numeric order, courses within a semester
//!   by ascending position.
//!
//! Sorting is stable, so rows with equal positions keep the order the store
//! returned them in (insertion order).

use std::collections::BTreeMap;

use crate::domain::entities::{
    BundleCourse, Course, MediaIndex, MediaRef, PositionedCourse, ProgramCourseRow, media_for,
};

/// A course with its position and the media of one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseCard {
    pub course: Course,
    pub course_position: i32,
    pub media: Vec<MediaRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SemesterGroup {
    pub program_semester: i32,
    pub courses: Vec<CourseCard>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearGroup {
    pub program_year: i32,
    pub semesters: Vec<SemesterGroup>,
}

/// Distinct course ids in first-seen order, for a single bulk media lookup.
pub fn distinct_course_ids<'a>(courses: impl IntoIterator<Item = &'a Course>) -> Vec<i64> {
    let mut ids = Vec::new();
    for course in courses {
        if !ids.contains(&course.id) {
            ids.push(course.id);
        }
    }
    ids
}

fn card(course: Course, course_position: i32, media: &MediaIndex, collection: &str) -> CourseCard {
    let media = media_for(media, course.id, collection).to_vec();
    CourseCard {
        course,
        course_position,
        media,
    }
}

/// Pairs written association rows with their courses, keeping row order.
///
/// Rows whose course is not in `courses` are dropped.
pub fn join_written(rows: &[BundleCourse], courses: &[Course]) -> Vec<PositionedCourse> {
    rows.iter()
        .filter_map(|row| {
            let course = courses.iter().find(|c| c.id == row.course_id)?;
            Some(PositionedCourse {
                course: course.clone(),
                course_position: row.course_position,
            })
        })
        .collect()
}

/// Attaches media from `collection` without reordering.
pub fn bundle_cards(
    rows: Vec<PositionedCourse>,
    media: &MediaIndex,
    collection: &str,
) -> Vec<CourseCard> {
    rows.into_iter()
        .map(|row| card(row.course, row.course_position, media, collection))
        .collect()
}

/// Orders bundle rows by position and attaches media from `collection`.
pub fn format_bundle(
    mut rows: Vec<PositionedCourse>,
    media: &MediaIndex,
    collection: &str,
) -> Vec<CourseCard> {
    rows.sort_by_key(|row| row.course_position);
    bundle_cards(rows, media, collection)
}

/// Groups program rows into years and semesters and attaches media from `collection`.
pub fn group_program(
    mut rows: Vec<ProgramCourseRow>,
    media: &MediaIndex,
    collection: &str,
) -> Vec<YearGroup> {
    rows.sort_by_key(|row| (row.program_year, row.program_semester, row.course_position));

    let mut years: BTreeMap<i32, BTreeMap<i32, Vec<CourseCard>>> = BTreeMap::new();
    for row in rows {
        years
            .entry(row.program_year)
            .or_default()
            .entry(row.program_semester)
            .or_default()
            .push(card(row.course, row.course_position, media, collection));
    }

    years
        .into_iter()
        .map(|(program_year, semesters)| YearGroup {
            program_year,
            semesters: semesters
                .into_iter()
                .map(|(program_semester, courses)| SemesterGroup {
                    program_semester,
                    courses,
                })
                .collect(),
        })
        .collect()
}
