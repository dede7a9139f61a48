//! Random code generation for course access codes and uuids.

use rand::Rng;

const UPPER_ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const LOWER_ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of a generated access code.
pub const ACCESS_CODE_LEN: usize = 10;

/// Length of a generated course uuid.
pub const COURSE_UUID_LEN: usize = 32;

fn generate_from(charset: &[u8], len: usize) -> String {
    let mut rng = rand::rng();

    (0..len)
        .map(|_| {
            let idx = rng.random_range(0..charset.len());
            charset[idx] as char
        })
        .collect()
}

/// Generates a course access code students type to enroll.
///
/// Uppercase letters and digits only, so it can be read out loud.
pub fn generate_access_code() -> String {
    generate_from(UPPER_ALPHANUMERIC, ACCESS_CODE_LEN)
}

/// Generates the public identifier of a course.
///
/// Uniqueness is enforced by the `courses.course_uuid` constraint.
pub fn generate_course_uuid() -> String {
    generate_from(LOWER_ALPHANUMERIC, COURSE_UUID_LEN)
}
