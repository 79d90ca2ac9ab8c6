// ********* Read-only queries over the canonical rows **********
//
// Everything here borrows the rows and never modifies them: views are
// recomputed from the master table on every request.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::str::FromStr;

use crate::config::*;

/// The columns of the master table, in export order.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Column {
    Source,
    CourseCode,
    Department,
    CourseNumber,
    CourseTitle,
    Section,
    InstructorName,
    Virtue,
    Term,
    AcademicYear,
    DeliveryMode,
    Semester,
    Hardcoded,
}

impl Column {
    pub const ALL: [Column; 13] = [
        Column::Source,
        Column::CourseCode,
        Column::Department,
        Column::CourseNumber,
        Column::CourseTitle,
        Column::Section,
        Column::InstructorName,
        Column::Virtue,
        Column::Term,
        Column::AcademicYear,
        Column::DeliveryMode,
        Column::Semester,
        Column::Hardcoded,
    ];

    /// The header used in exports.
    pub fn header(&self) -> &'static str {
        match self {
            Column::Source => "Source",
            Column::CourseCode => "Course Code",
            Column::Department => "Department",
            Column::CourseNumber => "Course Number",
            Column::CourseTitle => "Course Title",
            Column::Section => "Section",
            Column::InstructorName => "Instructor name",
            Column::Virtue => "Cardinal virtues addressed",
            Column::Term => "Term",
            Column::AcademicYear => "Academic Year",
            Column::DeliveryMode => "DeliveryMode",
            Column::Semester => "Semester",
            Column::Hardcoded => "Hardcoded",
        }
    }
}

impl FromStr for Column {
    type Err = TableError;

    /// Accepts the export header, case-insensitively. "Virtue" is accepted as
    /// a short name for the virtue column.
    fn from_str(name: &str) -> Result<Column, TableError> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("virtue") {
            return Ok(Column::Virtue);
        }
        Column::ALL
            .iter()
            .find(|c| c.header().eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }
}

impl CanonicalRow {
    /// The value of a column, as displayed.
    pub fn value(&self, column: Column) -> String {
        match column {
            Column::Source => self.source.to_string(),
            Column::CourseCode => self.course_code.clone(),
            Column::Department => self.department.clone(),
            Column::CourseNumber => self.course_number.clone(),
            Column::CourseTitle => self.course_title.clone(),
            Column::Section => self.section.clone(),
            Column::InstructorName => self.instructor_name.clone(),
            Column::Virtue => self.virtue.to_string(),
            Column::Term => self.term.clone(),
            Column::AcademicYear => self.academic_year.clone(),
            Column::DeliveryMode => self.delivery_mode.to_string(),
            Column::Semester => self.semester.clone(),
            Column::Hardcoded => self.hardcoded.to_string(),
        }
    }
}

/// Exact-match multi-select filters, one value list per column.
///
/// A row is kept when, for every column with a selection, its value is one of
/// the selected values. Columns without a selection do not filter.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Selection {
    criteria: Vec<(Column, Vec<String>)>,
}

impl Selection {
    pub fn new() -> Selection {
        Selection::default()
    }

    pub fn with(mut self, column: Column, values: &[&str]) -> Selection {
        for v in values {
            self.add(column, v);
        }
        self
    }

    pub fn add(&mut self, column: Column, value: &str) {
        match self.criteria.iter_mut().find(|(c, _)| *c == column) {
            Some((_, values)) => values.push(value.to_string()),
            None => self.criteria.push((column, vec![value.to_string()])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn matches(&self, row: &CanonicalRow) -> bool {
        self.criteria
            .iter()
            .all(|(column, values)| values.contains(&row.value(*column)))
    }

    pub fn apply<'a, I>(&self, rows: I) -> Vec<&'a CanonicalRow>
    where
        I: IntoIterator<Item = &'a CanonicalRow>,
    {
        rows.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Row counts grouped by two columns. Missing combinations count as zero.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PivotTable {
    pub index: Column,
    pub columns: Column,
    /// Sorted distinct values of the index column.
    pub row_labels: Vec<String>,
    /// Sorted distinct values of the column column.
    pub column_labels: Vec<String>,
    /// `counts[i][j]` is the number of rows for `row_labels[i]` and `column_labels[j]`.
    pub counts: Vec<Vec<u64>>,
}

impl PivotTable {
    pub fn get(&self, row_label: &str, column_label: &str) -> u64 {
        let i = self.row_labels.iter().position(|l| l == row_label);
        let j = self.column_labels.iter().position(|l| l == column_label);
        match (i, j) {
            (Some(i), Some(j)) => self.counts[i][j],
            _ => 0,
        }
    }

    pub fn row_total(&self, i: usize) -> u64 {
        self.counts.get(i).map(|r| r.iter().sum()).unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// The long format (row label, column label, count) used for charts.
    pub fn melt(&self) -> Vec<(String, String, u64)> {
        let mut res = Vec::new();
        for (i, rl) in self.row_labels.iter().enumerate() {
            for (j, cl) in self.column_labels.iter().enumerate() {
                res.push((rl.clone(), cl.clone(), self.counts[i][j]));
            }
        }
        res
    }
}

/// Counts the rows for each pair of values of `index` and `columns`.
pub fn pivot_count<'a, I>(rows: I, index: Column, columns: Column) -> PivotTable
where
    I: IntoIterator<Item = &'a CanonicalRow>,
{
    let mut cells: BTreeMap<(String, String), u64> = BTreeMap::new();
    let mut row_labels: BTreeSet<String> = BTreeSet::new();
    let mut column_labels: BTreeSet<String> = BTreeSet::new();
    for row in rows {
        let (rl, cl) = (row.value(index), row.value(columns));
        row_labels.insert(rl.clone());
        column_labels.insert(cl.clone());
        *cells.entry((rl, cl)).or_insert(0) += 1;
    }
    let row_labels: Vec<String> = row_labels.into_iter().collect();
    let column_labels: Vec<String> = column_labels.into_iter().collect();
    let counts = row_labels
        .iter()
        .map(|rl| {
            column_labels
                .iter()
                .map(|cl| cells.get(&(rl.clone(), cl.clone())).cloned().unwrap_or(0))
                .collect()
        })
        .collect();
    PivotTable {
        index,
        columns,
        row_labels,
        column_labels,
        counts,
    }
}

/// Number of rows per value, most frequent first. Ties are sorted by value.
pub fn value_counts<'a, I>(rows: I, column: Column) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a CanonicalRow>,
{
    let mut counts: HashMap<String, u64> = HashMap::new();
    for row in rows {
        *counts.entry(row.value(column)).or_insert(0) += 1;
    }
    let mut res: Vec<(String, u64)> = counts.into_iter().collect();
    res.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    res
}

/// The sorted distinct values of a column.
pub fn distinct<'a, I>(rows: I, column: Column) -> Vec<String>
where
    I: IntoIterator<Item = &'a CanonicalRow>,
{
    let values: BTreeSet<String> = rows.into_iter().map(|r| r.value(column)).collect();
    values.into_iter().collect()
}

/// The rows whose department or term could not be recovered.
pub fn unknown_rows<'a, I>(rows: I) -> Vec<&'a CanonicalRow>
where
    I: IntoIterator<Item = &'a CanonicalRow>,
{
    rows.into_iter()
        .filter(|r| r.department == UNKNOWN || r.term == UNKNOWN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(dept: &str, virtue: Virtue, term: &str, ay: &str) -> CanonicalRow {
        CanonicalRow {
            source: Source::Form,
            course_code: format!("{} 100", dept),
            department: dept.to_string(),
            course_number: "100".to_string(),
            course_title: "t".to_string(),
            section: "See Info".to_string(),
            instructor_name: "Prof A".to_string(),
            virtue,
            term: term.to_string(),
            academic_year: ay.to_string(),
            delivery_mode: DeliveryMode::NotMarked,
            semester: term.split(' ').next().unwrap().to_string(),
            hardcoded: false,
        }
    }

    fn sample() -> Vec<CanonicalRow> {
        vec![
            row("MATH", Virtue::Justice, "Fall 2025", "AY 25"),
            row("MATH", Virtue::Prudence, "Fall 2025", "AY 25"),
            row("HIST", Virtue::Justice, "Spring 2026", "AY 25"),
            row("HIST", Virtue::Justice, "Fall 2026", "AY 26"),
            row(UNKNOWN, Virtue::Fortitude, UNKNOWN, UNKNOWN),
        ]
    }

    #[test]
    fn column_names() {
        assert_eq!("Academic Year".parse::<Column>(), Ok(Column::AcademicYear));
        assert_eq!("deliverymode".parse::<Column>(), Ok(Column::DeliveryMode));
        assert_eq!("Virtue".parse::<Column>(), Ok(Column::Virtue));
        assert_eq!(
            "Cardinal virtues addressed".parse::<Column>(),
            Ok(Column::Virtue)
        );
        assert_eq!(
            "Room".parse::<Column>(),
            Err(TableError::UnknownColumn("Room".to_string()))
        );
    }

    #[test]
    fn pivot_is_zero_filled() {
        let rows = sample();
        let p = pivot_count(&rows, Column::Virtue, Column::AcademicYear);
        assert_eq!(p.row_labels, vec!["Fortitude", "Justice", "Prudence"]);
        assert_eq!(p.column_labels, vec!["AY 25", "AY 26", "Unknown"]);
        assert_eq!(p.get("Justice", "AY 25"), 2);
        assert_eq!(p.get("Prudence", "AY 26"), 0);
        assert_eq!(p.get("Temperance", "AY 26"), 0);
        assert_eq!(p.row_total(1), 3);
        assert_eq!(p.total(), 5);
        assert_eq!(p.melt().len(), 9);
    }

    #[test]
    fn selection_is_exact_and_conjunctive() {
        let rows = sample();
        assert_eq!(Selection::new().apply(&rows).len(), 5);

        let s = Selection::new().with(Column::Department, &["MATH", "HIST"]);
        assert_eq!(s.apply(&rows).len(), 4);

        let s = s.with(Column::Virtue, &["Justice"]);
        assert_eq!(s.apply(&rows).len(), 3);

        let s = Selection::new().with(Column::Department, &["math"]);
        assert!(s.apply(&rows).is_empty());
    }

    #[test]
    fn counts_and_audits() {
        let rows = sample();
        assert_eq!(
            value_counts(&rows, Column::Virtue),
            vec![
                ("Justice".to_string(), 3),
                ("Fortitude".to_string(), 1),
                ("Prudence".to_string(), 1),
            ]
        );
        assert_eq!(distinct(&rows, Column::Department), vec!["HIST", "MATH", UNKNOWN]);
        assert_eq!(unknown_rows(&rows).len(), 1);
    }
}
