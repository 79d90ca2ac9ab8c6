pub use crate::config::*;
use crate::overrides::{validate_entry, OverrideEntry, OverrideTable};

/// A builder for the table of hardcoded courses.
///
/// Each entry is checked when it is added, so that building the table cannot
/// fail.
///
/// ```
/// use course_designation::builder::OverrideBuilder;
/// # use course_designation::OverrideError;
///
/// let mut builder = OverrideBuilder::new();
/// builder.add_course(
///     "EDUC",
///     "210",
///     "Introduction to Education",
///     "Justice;Prudence",
///     &[("Fall 2025", "AY 25"), ("Spring 2026", "AY 25")],
///     "Muffet Trout",
/// )?;
/// let table = builder.build();
/// assert_eq!(table.rows().len(), 4);
///
/// # Ok::<(), OverrideError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct OverrideBuilder {
    _table: OverrideTable,
}

impl OverrideBuilder {
    pub fn new() -> OverrideBuilder {
        OverrideBuilder::default()
    }

    /// Starts from an existing table, for example the builtin one.
    pub fn from_table(table: &OverrideTable) -> OverrideBuilder {
        OverrideBuilder {
            _table: table.clone(),
        }
    }

    /// Adds a course delivered in person.
    ///
    /// virtues: `;`-delimited virtue names.
    /// terms: (term label, academic year) pairs, in the order they should be exported.
    pub fn add_course(
        &mut self,
        department: &str,
        number: &str,
        title: &str,
        virtues: &str,
        terms: &[(&str, &str)],
        instructor: &str,
    ) -> Result<(), OverrideError> {
        self.add_entry(OverrideEntry {
            department: department.to_string(),
            number: number.to_string(),
            title: title.to_string(),
            virtues: virtues.to_string(),
            terms: terms
                .iter()
                .map(|(term, ay)| TermSlot::new(term, ay))
                .collect(),
            instructor: instructor.to_string(),
            is_virtual: false,
        })
    }

    pub fn add_entry(&mut self, entry: OverrideEntry) -> Result<(), OverrideError> {
        let virtues = validate_entry(&entry)?;
        self._table.entries.push((entry, virtues));
        Ok(())
    }

    pub fn build(self) -> OverrideTable {
        self._table
    }
}
