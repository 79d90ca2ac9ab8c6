use std::path::Path;

use crate::survey::*;

/// The fields of a survey record and the header fragment that identifies their
/// column. A header belongs to the first fragment it contains.
const FIELD_PATTERNS: [(&str, Field); 5] = [
    ("Start", Field::Start),
    ("Instructor", Field::Instructor),
    ("Course department", Field::CourseInfo),
    ("Term", Field::Terms),
    ("virtues", Field::Virtues),
];

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum Field {
    Start,
    Instructor,
    CourseInfo,
    Terms,
    Virtues,
}

/// The position of each field in the rows of the export.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ColumnMapping {
    pub start: Option<usize>,
    pub instructor: Option<usize>,
    pub course_info: Option<usize>,
    pub terms: Option<usize>,
    pub virtues: Option<usize>,
}

impl ColumnMapping {
    fn slot(&mut self, field: Field) -> &mut Option<usize> {
        match field {
            Field::Start => &mut self.start,
            Field::Instructor => &mut self.instructor,
            Field::CourseInfo => &mut self.course_info,
            Field::Terms => &mut self.terms,
            Field::Virtues => &mut self.virtues,
        }
    }

    /// Builds a raw record from the cells of one row. Blank cells are absent values.
    pub fn record(&self, cells: &[Option<String>]) -> RawRecord {
        let get = |idx: Option<usize>| -> Option<String> {
            idx.and_then(|i| cells.get(i))
                .cloned()
                .flatten()
                .filter(|s| !s.trim().is_empty())
        };
        RawRecord {
            start: get(self.start),
            instructor: get(self.instructor),
            course_info: get(self.course_info),
            terms_offered: get(self.terms),
            virtues: get(self.virtues),
        }
    }
}

/// Given the header of a file (names of each of the columns), finds the column
/// of each field.
///
/// The match is a case-sensitive substring search and the first matching
/// column wins. A missing column is not an error: the field stays empty.
pub fn get_col_index_mapping(header: &[Option<String>]) -> ColumnMapping {
    let mut mapping = ColumnMapping::default();
    for (idx, name) in header.iter().enumerate() {
        let name = match name {
            Some(n) => n,
            None => continue,
        };
        if let Some((_, field)) = FIELD_PATTERNS.iter().find(|(p, _)| name.contains(p)) {
            let slot = mapping.slot(*field);
            if slot.is_none() {
                *slot = Some(idx);
            } else {
                debug!(
                    "get_col_index_mapping: ignoring duplicate column {} {:?} for {:?}",
                    idx, name, field
                );
            }
        }
    }
    debug!("get_col_index_mapping: {:?}", mapping);
    for (pattern, field) in FIELD_PATTERNS.iter() {
        if mapping.slot(*field).is_none() {
            warn!(
                "No column containing {:?} in the header, the field will be empty",
                pattern
            );
        }
    }
    mapping
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<Option<String>> {
        names
            .iter()
            .map(|s| {
                if s.is_empty() {
                    None
                } else {
                    Some(s.to_string())
                }
            })
            .collect()
    }

    #[test]
    fn form_header() {
        let h = header(&[
            "ID",
            "Start time",
            "Completion time",
            "Instructor name",
            "Course department, number and title",
            "Term(s) offered",
            "Which cardinal virtues are addressed?",
        ]);
        assert_eq!(
            get_col_index_mapping(&h),
            ColumnMapping {
                start: Some(1),
                instructor: Some(3),
                course_info: Some(4),
                terms: Some(5),
                virtues: Some(6),
            }
        );
    }

    #[test]
    fn first_match_wins() {
        // "Start term" is a Start column; the second "Term" column is ignored.
        let h = header(&["Start term", "", "Term offered", "Term (other)", "virtues"]);
        let m = get_col_index_mapping(&h);
        assert_eq!(m.start, Some(0));
        assert_eq!(m.terms, Some(2));
        assert_eq!(m.virtues, Some(4));
        assert_eq!(m.instructor, None);
    }

    #[test]
    fn case_sensitive() {
        let m = get_col_index_mapping(&header(&["instructor", "Virtues", "TERM"]));
        assert_eq!(m, ColumnMapping::default());
    }

    #[test]
    fn records_from_cells() {
        let m = ColumnMapping {
            start: None,
            instructor: Some(0),
            course_info: Some(1),
            terms: Some(2),
            virtues: Some(7),
        };
        let r = m.record(&[
            Some("Prof A".to_string()),
            Some("  ".to_string()),
            None,
        ]);
        assert_eq!(
            r,
            RawRecord {
                instructor: Some("Prof A".to_string()),
                ..RawRecord::default()
            }
        );
    }

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("/tmp/data/form.xlsx"), "form.xlsx");
        assert_eq!(simplify_file_name("form.csv"), "form.csv");
    }
}
