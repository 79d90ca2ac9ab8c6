// ********* Input data structures ***********

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::Display;

/// Sentinel used for every field that could not be recovered from the survey.
pub const UNKNOWN: &str = "Unknown";

/// One row of the uploaded survey, once the columns have been matched.
///
/// Every field is untrusted free text. `None` means that the column is missing
/// from the export or that the cell was left blank.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RawRecord {
    /// The submission time. It is read but not used downstream.
    pub start: Option<String>,
    pub instructor: Option<String>,
    /// The free-text course department / number / title cell.
    pub course_info: Option<String>,
    pub terms_offered: Option<String>,
    pub virtues: Option<String>,
}

/// The four cardinal virtues a course may address.
///
/// The declaration order is the canonical order used when a cell names several
/// virtues.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Virtue {
    Justice,
    Prudence,
    Temperance,
    Fortitude,
}

impl Virtue {
    pub const ALL: [Virtue; 4] = [
        Virtue::Justice,
        Virtue::Prudence,
        Virtue::Temperance,
        Virtue::Fortitude,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Virtue::Justice => "Justice",
            Virtue::Prudence => "Prudence",
            Virtue::Temperance => "Temperance",
            Virtue::Fortitude => "Fortitude",
        }
    }

    /// Exact (case-insensitive, trimmed) lookup of a virtue name.
    pub fn from_name(name: &str) -> Option<Virtue> {
        let name = name.trim();
        Virtue::ALL
            .iter()
            .find(|v| v.name().eq_ignore_ascii_case(name))
            .cloned()
    }
}

impl Display for Virtue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Where a canonical row comes from.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Source {
    Form,
    Hardcoded,
}

impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Form => write!(f, "Form"),
            Source::Hardcoded => write!(f, "Hardcoded"),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum DeliveryMode {
    Virtual,
    #[serde(rename = "Not marked")]
    NotMarked,
}

impl Display for DeliveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryMode::Virtual => write!(f, "Virtual"),
            DeliveryMode::NotMarked => write!(f, "Not marked"),
        }
    }
}

/// A calendar term and the academic year it belongs to.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize)]
pub struct TermSlot {
    pub term: String,
    #[serde(rename = "academicYear")]
    pub academic_year: String,
}

impl TermSlot {
    pub fn new(term: &str, academic_year: &str) -> TermSlot {
        TermSlot {
            term: term.to_string(),
            academic_year: academic_year.to_string(),
        }
    }

    pub fn unknown() -> TermSlot {
        TermSlot::new(UNKNOWN, UNKNOWN)
    }

    /// The first whitespace-delimited token of the term ("Fall" for "Fall 2025").
    pub fn semester(&self) -> &str {
        self.term.split(' ').next().unwrap_or(self.term.as_str())
    }
}

// ******** Output data structures *********

/// A fully normalized row: exactly one virtue and one term.
///
/// The serialized names are the column headers of the exported table.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalRow {
    #[serde(rename = "Source")]
    pub source: Source,
    #[serde(rename = "Course Code")]
    pub course_code: String,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "Course Number")]
    pub course_number: String,
    #[serde(rename = "Course Title")]
    pub course_title: String,
    #[serde(rename = "Section")]
    pub section: String,
    #[serde(rename = "Instructor name")]
    pub instructor_name: String,
    #[serde(rename = "Cardinal virtues addressed")]
    pub virtue: Virtue,
    #[serde(rename = "Term")]
    pub term: String,
    #[serde(rename = "Academic Year")]
    pub academic_year: String,
    #[serde(rename = "DeliveryMode")]
    pub delivery_mode: DeliveryMode,
    #[serde(rename = "Semester")]
    pub semester: String,
    // Tracked separately from `source` so that exports keep the flag column.
    #[serde(rename = "Hardcoded")]
    pub hardcoded: bool,
}

/// Counters collected while building the master table.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct BuildStats {
    pub records_read: usize,
    /// Records dropped because no virtue could be recognized.
    pub records_skipped: usize,
    pub form_rows: usize,
    pub hardcoded_rows: usize,
}

/// Errors raised while loading the override table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum OverrideError {
    InvalidJson(String),
    UnknownVirtue { course: String, virtue: String },
    MissingVirtues { course: String },
    MissingTerms { course: String },
}

impl Error for OverrideError {}

impl Display for OverrideError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverrideError::InvalidJson(msg) => write!(f, "invalid override table: {}", msg),
            OverrideError::UnknownVirtue { course, virtue } => {
                write!(f, "override for {}: unknown virtue {:?}", course, virtue)
            }
            OverrideError::MissingVirtues { course } => {
                write!(f, "override for {}: no virtue listed", course)
            }
            OverrideError::MissingTerms { course } => {
                write!(f, "override for {}: no term listed", course)
            }
        }
    }
}

/// Errors raised by the table queries.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TableError {
    UnknownColumn(String),
}

impl Error for TableError {}

impl Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::UnknownColumn(name) => write!(f, "unknown column {:?}", name),
        }
    }
}

// ********* Configuration **********

// The academic year table, in lookup order. A label that appears twice keeps
// the first mapping.
const ACADEMIC_YEARS: [(&str, &str); 10] = [
    ("Fall 2025", "AY 25"),
    ("J-Term 2026", "AY 25"),
    ("Spring 2026", "AY 25"),
    ("Summer 2026", "AY 25"),
    ("Fall 2026", "AY 26"),
    ("J-Term 2027", "AY 26"),
    ("Spring 2027", "AY 26"),
    ("Summer 2027", "AY 26"),
    ("Fall 2027", "AY 27"),
    ("Spring 2027", "AY 26"),
];

// Terms accepted even when the table above does not list them.
const FALLBACK_TERMS: [(&str, &str); 1] = [("Fall 2025", "AY 25")];

// The window used for "every semester" style answers.
const DEFAULT_WINDOW: [(&str, &str); 4] = [
    ("Fall 2025", "AY 25"),
    ("Spring 2026", "AY 25"),
    ("Fall 2026", "AY 26"),
    ("Spring 2027", "AY 26"),
];

const BLANKET_KEYWORDS: [&str; 3] = ["every", "each", "all"];

const VIRTUAL_KEYWORDS: [&str; 1] = ["virtual"];

fn slots(pairs: &[(&str, &str)]) -> Vec<TermSlot> {
    pairs.iter().map(|(t, ay)| TermSlot::new(t, ay)).collect()
}

/// The rules that drive the term expansion.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TermRules {
    /// Ordered association list from term label to academic year.
    /// It is consulted by first match: a duplicated label never overrides an
    /// earlier entry.
    pub academic_years: Vec<TermSlot>,
    /// Consulted only when a label is missing from `academic_years`.
    pub fallback: Vec<TermSlot>,
    /// The terms assumed when the answer says "every", "each" or "all".
    pub default_window: Vec<TermSlot>,
    /// Lowercase substrings that trigger the default window.
    pub blanket_keywords: Vec<String>,
}

impl Default for TermRules {
    fn default() -> TermRules {
        TermRules {
            academic_years: slots(&ACADEMIC_YEARS),
            fallback: slots(&FALLBACK_TERMS),
            default_window: slots(&DEFAULT_WINDOW),
            blanket_keywords: BLANKET_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The vocabulary for detecting virtual delivery.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DeliveryRules {
    /// Lowercase substrings that mark a record as virtual.
    pub virtual_keywords: Vec<String>,
}

impl Default for DeliveryRules {
    fn default() -> DeliveryRules {
        DeliveryRules {
            virtual_keywords: VIRTUAL_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct NormalizationRules {
    pub terms: TermRules,
    pub delivery: DeliveryRules,
}
