/*!
Normalization of course-designation survey exports.

A survey record is free text: a course cell such as `"EDUC-210 Intro to Education"`,
a terms cell such as `"Every Fall"` and a virtue cell such as `"Justice; Prudence"`.
This crate turns each record into canonical rows carrying exactly one virtue and
one term, appends the curated [`OverrideTable`] and returns the [`MasterTable`]
that all the pivots and audits are computed from.

```
use course_designation::*;

let record = RawRecord {
    course_info: Some("EDUC 210 Introduction to Education".to_string()),
    terms_offered: Some("Every Fall".to_string()),
    virtues: Some("Justice;Prudence".to_string()),
    ..RawRecord::default()
};
let rules = NormalizationRules::default();
let table = build_master_table(&[record], &OverrideTable::empty(), &rules);
assert_eq!(table.len(), 4);
```

See the [manual] for the input layout and the views.
*/
mod config;
mod course_id;
mod delivery;
mod overrides;
mod terms;
mod virtues;

pub mod builder;
pub mod manual;
pub mod table;

use log::{debug, info};

pub use crate::config::*;
pub use crate::course_id::{extract_course_id, CourseId};
pub use crate::delivery::classify_delivery;
pub use crate::overrides::{OverrideEntry, OverrideTable};
pub use crate::table::Column;
pub use crate::terms::expand_terms;
pub use crate::virtues::normalize_virtues;

/// Explodes one survey record into canonical rows.
///
/// A record without any recognized virtue produces no row at all. A record
/// without any recognized term gets a single "Unknown" term instead. Otherwise
/// the result is every (virtue, term) combination, virtue-major, all sharing the
/// same course, instructor and delivery mode.
pub fn normalize_record(record: &RawRecord, rules: &NormalizationRules) -> Vec<CanonicalRow> {
    let virtues = normalize_virtues(record.virtues.as_deref());
    if virtues.is_empty() {
        debug!(
            "normalize_record: no virtue in {:?}, skipping record",
            record.virtues
        );
        return Vec::new();
    }

    let mut terms = expand_terms(record.terms_offered.as_deref(), &rules.terms);
    if terms.is_empty() {
        debug!(
            "normalize_record: no term in {:?}, using {}",
            record.terms_offered, UNKNOWN
        );
        terms.push(TermSlot::unknown());
    }

    let course_info = record.course_info.clone().unwrap_or_default();
    let course = extract_course_id(&course_info);
    let delivery_mode = classify_delivery(record, &rules.delivery);
    let instructor = record.instructor.clone().unwrap_or_default();

    let mut res: Vec<CanonicalRow> = Vec::with_capacity(virtues.len() * terms.len());
    for virtue in virtues.iter() {
        for slot in terms.iter() {
            res.push(CanonicalRow {
                source: Source::Form,
                course_code: course.code.clone(),
                department: course.department.clone(),
                course_number: course.number.clone(),
                course_title: course_info.clone(),
                section: "See Info".to_string(),
                instructor_name: instructor.clone(),
                virtue: *virtue,
                term: slot.term.clone(),
                academic_year: slot.academic_year.clone(),
                delivery_mode,
                semester: slot.semester().to_string(),
                hardcoded: false,
            });
        }
    }
    res
}

/// The normalized table of one upload. It is never modified once built.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MasterTable {
    rows: Vec<CanonicalRow>,
    stats: BuildStats,
}

impl MasterTable {
    pub fn rows(&self) -> &[CanonicalRow] {
        &self.rows
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn form_rows(&self) -> impl Iterator<Item = &CanonicalRow> {
        self.rows.iter().filter(|r| r.source == Source::Form)
    }

    pub fn hardcoded_rows(&self) -> impl Iterator<Item = &CanonicalRow> {
        self.rows.iter().filter(|r| r.source == Source::Hardcoded)
    }

    /// SHA-256 of the hardcoded rows, all columns in export order.
    ///
    /// It only depends on the override table, so two uploads processed with
    /// the same table report the same fingerprint.
    pub fn hardcoded_fingerprint(&self) -> String {
        let mut data = String::new();
        for row in self.hardcoded_rows() {
            let values: Vec<String> = Column::ALL.iter().map(|c| row.value(*c)).collect();
            data.push_str(&values.join("\t"));
            data.push('\n');
        }
        sha256::digest(data.as_str())
    }
}

/// Builds the master table: the exploded survey records, in input order,
/// followed by the rows of the override table.
///
/// No validation or deduplication happens across rows.
pub fn build_master_table(
    records: &[RawRecord],
    overrides: &OverrideTable,
    rules: &NormalizationRules,
) -> MasterTable {
    info!("build_master_table: processing {} records", records.len());
    let mut rows: Vec<CanonicalRow> = Vec::new();
    let mut skipped = 0;
    for (idx, record) in records.iter().enumerate() {
        let exploded = normalize_record(record, rules);
        debug!("build_master_table: record {}: {} rows", idx, exploded.len());
        if exploded.is_empty() {
            skipped += 1;
        }
        rows.extend(exploded);
    }
    let form_rows = rows.len();

    let hardcoded = overrides.rows();
    let hardcoded_rows = hardcoded.len();
    rows.extend(hardcoded);

    let stats = BuildStats {
        records_read: records.len(),
        records_skipped: skipped,
        form_rows,
        hardcoded_rows,
    };
    info!(
        "build_master_table: {} rows ({} from the survey, {} hardcoded), {} records skipped",
        rows.len(),
        form_rows,
        hardcoded_rows,
        skipped
    );
    MasterTable { rows, stats }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(course: &str, instructor: &str, terms: &str, virtues: &str) -> RawRecord {
        RawRecord {
            start: None,
            instructor: Some(instructor.to_string()),
            course_info: Some(course.to_string()),
            terms_offered: Some(terms.to_string()),
            virtues: Some(virtues.to_string()),
        }
    }

    fn shared(row: &CanonicalRow) -> (String, String, String, String, DeliveryMode) {
        (
            row.department.clone(),
            row.course_number.clone(),
            row.course_code.clone(),
            row.instructor_name.clone(),
            row.delivery_mode,
        )
    }

    #[test]
    fn every_fall_scenario() {
        let _ = env_logger::builder().is_test(true).try_init();
        let rules = NormalizationRules::default();
        let r = record("EDUC 210 Intro", "Muffet Trout", "Every Fall", "Justice;Prudence");
        let rows = normalize_record(&r, &rules);
        let got: Vec<(Virtue, &str, &str)> = rows
            .iter()
            .map(|r| (r.virtue, r.term.as_str(), r.academic_year.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                (Virtue::Justice, "Fall 2025", "AY 25"),
                (Virtue::Justice, "Fall 2026", "AY 26"),
                (Virtue::Prudence, "Fall 2025", "AY 25"),
                (Virtue::Prudence, "Fall 2026", "AY 26"),
            ]
        );
        assert!(rows.iter().all(|x| shared(x) == shared(&rows[0])));
        assert!(rows.iter().all(|x| x.semester == "Fall" && x.source == Source::Form));
        assert_eq!(rows[0].course_title, "EDUC 210 Intro");
        assert_eq!(rows[0].section, "See Info");
    }

    #[test]
    fn explosion_is_virtues_times_terms() {
        let rules = NormalizationRules::default();
        let cases = [
            ("Justice", "Spring 2026", 1),
            ("Justice", "Fall 2025", 2),
            ("Justice, Temperance, Fortitude", "Spring 2026 and J-Term 2027", 6),
            ("All four: Justice Prudence Temperance Fortitude", "every semester", 16),
            ("Prudence", "fall 25, FALL 2025", 2),
        ];
        for (virtues, terms, expected) in cases.iter() {
            let v = normalize_virtues(Some(*virtues)).len();
            let t = expand_terms(Some(*terms), &rules.terms).len();
            let rows = normalize_record(&record("HIST 101", "A", terms, virtues), &rules);
            assert_eq!(rows.len(), v * t);
            assert_eq!(rows.len(), *expected, "{} / {}", virtues, terms);
        }
    }

    #[test]
    fn no_virtue_no_row() {
        let rules = NormalizationRules::default();
        let r = record("EDUC 210", "A", "Every Fall", "Hope and charity");
        assert!(normalize_record(&r, &rules).is_empty());
        assert!(normalize_record(&RawRecord::default(), &rules).is_empty());
    }

    #[test]
    fn unknown_term() {
        let rules = NormalizationRules::default();
        let r = record("Special Topics Seminar", "A", "TBD", "Justice, Prudence");
        let rows = normalize_record(&r, &rules);
        assert_eq!(rows.len(), 2);
        for row in rows.iter() {
            assert_eq!(row.term, UNKNOWN);
            assert_eq!(row.academic_year, UNKNOWN);
            assert_eq!(row.semester, UNKNOWN);
            assert_eq!(row.department, UNKNOWN);
            assert_eq!(row.course_code, "Special Topics Semin...");
        }
    }

    #[test]
    fn missing_fields_degrade() {
        let rules = NormalizationRules::default();
        let r = RawRecord {
            virtues: Some("Fortitude".to_string()),
            ..RawRecord::default()
        };
        let rows = normalize_record(&r, &rules);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].instructor_name, "");
        assert_eq!(rows[0].course_title, "");
        assert_eq!(rows[0].course_code, "...");
        assert_eq!(rows[0].term, UNKNOWN);
    }

    #[test]
    fn fall_and_spring_answer() {
        let rules = NormalizationRules::default();
        let r = record("EDUC 210", "A", "Fall and Spring", "Justice");
        let terms: Vec<String> = normalize_record(&r, &rules)
            .into_iter()
            .map(|row| row.term)
            .collect();
        assert_eq!(
            terms,
            vec!["Fall 2025", "Spring 2026", "Fall 2026", "Spring 2027"]
        );
    }

    #[test]
    fn virtual_record() {
        let rules = NormalizationRules::default();
        let r = record("EDUC 329", "B", "Every semester", "Justice, Virtual delivery");
        let rows = normalize_record(&r, &rules);
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|x| x.delivery_mode == DeliveryMode::Virtual));
    }

    #[test]
    fn master_table_order() {
        let rules = NormalizationRules::default();
        let overrides = OverrideTable::builtin().unwrap();
        let records = vec![
            record("MATH 101", "A", "Fall 2025", "Prudence"),
            record("nothing", "B", "Fall 2025", "none"),
            record("HIST 202", "C", "Spring 2026", "Justice"),
        ];
        let table = build_master_table(&records, &overrides, &rules);
        assert_eq!(
            table.stats(),
            &BuildStats {
                records_read: 3,
                records_skipped: 1,
                form_rows: 3,
                hardcoded_rows: 42,
            }
        );
        assert_eq!(table.len(), 45);
        assert_eq!(table.rows()[0].term, "Fall 2025");
        assert_eq!(table.rows()[1].term, "Fall 2026");
        assert_eq!(table.rows()[1].course_code, "MATH 101");
        assert_eq!(table.rows()[2].course_code, "HIST 202");
        assert_eq!(table.rows()[3..].to_vec(), overrides.rows());
        assert_eq!(table.form_rows().count(), 3);
        assert_eq!(table.hardcoded_rows().count(), 42);
    }

    #[test]
    fn hardcoded_rows_do_not_depend_on_upload() {
        let rules = NormalizationRules::default();
        let overrides = OverrideTable::builtin().unwrap();
        let a = build_master_table(
            &[record("MATH 101", "A", "Fall 2025", "Prudence")],
            &overrides,
            &rules,
        );
        let b = build_master_table(
            &[
                record("EDUC 210", "Muffet Trout", "Every Fall", "Justice"),
                record("PHIL 300", "D", "every semester", "Temperance (virtual)"),
            ],
            &overrides,
            &rules,
        );
        let ha: Vec<&CanonicalRow> = a.hardcoded_rows().collect();
        let hb: Vec<&CanonicalRow> = b.hardcoded_rows().collect();
        assert_eq!(ha, hb);
        assert_eq!(a.hardcoded_fingerprint(), b.hardcoded_fingerprint());
        assert_eq!(a.hardcoded_fingerprint().len(), 64);

        let empty = build_master_table(&[], &OverrideTable::empty(), &rules);
        assert_ne!(empty.hardcoded_fingerprint(), a.hardcoded_fingerprint());
    }
}
