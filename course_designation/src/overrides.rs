// ********* Hardcoded course records **********

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::*;

// The curated table shipped with the crate.
const BUILTIN_OVERRIDES: &str = include_str!("../data/overrides.json");

/// A course known to be missing or misreported in the survey.
///
/// The virtues are listed in one `;`-delimited string ("Justice;Prudence") and
/// the terms are listed explicitly, exceptions included.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub department: String,
    pub number: String,
    pub title: String,
    pub virtues: String,
    pub terms: Vec<TermSlot>,
    pub instructor: String,
    #[serde(rename = "virtual", default)]
    pub is_virtual: bool,
}

impl OverrideEntry {
    pub fn course_code(&self) -> String {
        format!("{} {}", self.department, self.number)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OverrideFile {
    courses: Vec<OverrideEntry>,
}

/// Checks an entry and returns its virtues, in the order they are listed.
pub(crate) fn validate_entry(entry: &OverrideEntry) -> Result<Vec<Virtue>, OverrideError> {
    let mut virtues: Vec<Virtue> = Vec::new();
    for name in entry.virtues.split(';').filter(|s| !s.trim().is_empty()) {
        let v = Virtue::from_name(name).ok_or_else(|| OverrideError::UnknownVirtue {
            course: entry.course_code(),
            virtue: name.trim().to_string(),
        })?;
        virtues.push(v);
    }
    if virtues.is_empty() {
        return Err(OverrideError::MissingVirtues {
            course: entry.course_code(),
        });
    }
    if entry.terms.is_empty() {
        return Err(OverrideError::MissingTerms {
            course: entry.course_code(),
        });
    }
    Ok(virtues)
}

/// The manually maintained records injected next to the survey rows.
///
/// The table does not depend on the upload: the same table always produces the
/// same rows, in the same order.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct OverrideTable {
    pub(crate) entries: Vec<(OverrideEntry, Vec<Virtue>)>,
}

impl OverrideTable {
    pub fn empty() -> OverrideTable {
        OverrideTable::default()
    }

    /// The table embedded in the crate (`data/overrides.json`).
    pub fn builtin() -> Result<OverrideTable, OverrideError> {
        OverrideTable::from_json(BUILTIN_OVERRIDES)
    }

    /// Reads a table in the `{"courses": [...]}` JSON layout.
    pub fn from_json(contents: &str) -> Result<OverrideTable, OverrideError> {
        let file: OverrideFile = serde_json::from_str(contents)
            .map_err(|e| OverrideError::InvalidJson(e.to_string()))?;
        OverrideTable::new(file.courses)
    }

    pub fn new(entries: Vec<OverrideEntry>) -> Result<OverrideTable, OverrideError> {
        let mut checked = Vec::with_capacity(entries.len());
        for entry in entries {
            let virtues = validate_entry(&entry)?;
            checked.push((entry, virtues));
        }
        Ok(OverrideTable { entries: checked })
    }

    pub fn to_json(&self) -> Result<String, OverrideError> {
        let file = OverrideFile {
            courses: self.entries().cloned().collect(),
        };
        serde_json::to_string_pretty(&file).map_err(|e| OverrideError::InvalidJson(e.to_string()))
    }

    pub fn entries(&self) -> impl Iterator<Item = &OverrideEntry> {
        self.entries.iter().map(|(e, _)| e)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Explodes every entry into one row per (term, virtue), entries first,
    /// then terms, then virtues.
    pub fn rows(&self) -> Vec<CanonicalRow> {
        let mut res: Vec<CanonicalRow> = Vec::new();
        for (entry, virtues) in self.entries.iter() {
            let delivery_mode = if entry.is_virtual {
                DeliveryMode::Virtual
            } else {
                DeliveryMode::NotMarked
            };
            for slot in entry.terms.iter() {
                for virtue in virtues.iter() {
                    res.push(CanonicalRow {
                        source: Source::Hardcoded,
                        course_code: entry.course_code(),
                        department: entry.department.clone(),
                        course_number: entry.number.clone(),
                        course_title: entry.title.clone(),
                        section: "All".to_string(),
                        instructor_name: entry.instructor.clone(),
                        virtue: *virtue,
                        term: slot.term.clone(),
                        academic_year: slot.academic_year.clone(),
                        delivery_mode,
                        semester: slot.semester().to_string(),
                        hardcoded: true,
                    });
                }
            }
        }
        debug!(
            "OverrideTable::rows: {} entries -> {} rows",
            self.entries.len(),
            res.len()
        );
        res
    }
}
