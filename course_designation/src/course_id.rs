use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::UNKNOWN;

static COURSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]{3,4})\s*-?(\d{3})").expect("valid course pattern"));

// Length of the course text kept in the fallback code.
const FALLBACK_CODE_CHARS: usize = 20;

/// The department, number and code of a course.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CourseId {
    pub department: String,
    pub number: String,
    /// "DEPT NUM", or the truncated course text followed by "..." when no
    /// identifier was found.
    pub code: String,
}

/// Finds a course identifier such as "EDUC 210" or "EDUC-210" in free text.
///
/// The first identifier wins. Without one, the department and the number are
/// unknown and the code is a short prefix of the text, which keeps the audit
/// tables readable.
pub fn extract_course_id(text: &str) -> CourseId {
    match COURSE_RE.captures(text) {
        Some(cap) => CourseId {
            department: cap[1].to_string(),
            number: cap[2].to_string(),
            code: format!("{} {}", &cap[1], &cap[2]),
        },
        None => CourseId {
            department: UNKNOWN.to_string(),
            number: UNKNOWN.to_string(),
            code: format!(
                "{}...",
                text.chars().take(FALLBACK_CODE_CHARS).collect::<String>()
            ),
        },
    }
}
