// Text renderings of the master table.
//
// Each view is recomputed from the selected rows; nothing is cached.

use course_designation::table::{pivot_count, unknown_rows, value_counts, PivotTable};

use crate::survey::*;

/// Number of instructors kept by the instructor load view.
const TOP_INSTRUCTORS: usize = 20;

const NO_VIRTUAL: &str = "No courses explicitly marked as 'Virtual' were found.";

/// Columns shown when listing rows outside of the full table.
const LISTING: [Column; 7] = [
    Column::CourseCode,
    Column::CourseTitle,
    Column::InstructorName,
    Column::Virtue,
    Column::Term,
    Column::AcademicYear,
    Column::DeliveryMode,
];

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum View {
    Master,
    Raw,
    Overview,
    VirtueByYear,
    VirtueBySemester,
    InstructorLoad,
    Department,
    VirtualAdoption,
    Virtual,
    Issues,
    Tags,
}

impl View {
    const NAMES: [(&'static str, View); 11] = [
        ("master", View::Master),
        ("raw", View::Raw),
        ("overview", View::Overview),
        ("virtue-by-year", View::VirtueByYear),
        ("virtue-by-semester", View::VirtueBySemester),
        ("instructor-load", View::InstructorLoad),
        ("department", View::Department),
        ("virtual-adoption", View::VirtualAdoption),
        ("virtual", View::Virtual),
        ("issues", View::Issues),
        ("tags", View::Tags),
    ];

    pub fn parse(name: &str) -> SurveyResult<View> {
        let name = name.trim().to_lowercase();
        match View::NAMES.iter().find(|(n, _)| *n == name) {
            Some((_, v)) => Ok(*v),
            None => whatever!(
                "Unknown view {:?}, expected one of: {}",
                name,
                View::NAMES
                    .iter()
                    .map(|(n, _)| *n)
                    .collect::<Vec<&str>>()
                    .join(", ")
            ),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Master => "Master course list",
            View::Raw => "Rows from the survey",
            View::Overview => "Course count by year and semester",
            View::VirtueByYear => "Virtues by academic year",
            View::VirtueBySemester => "Virtues by semester",
            View::InstructorLoad => "Instructor load",
            View::Department => "Department alignment",
            View::VirtualAdoption => "Virtual adoption",
            View::Virtual => "Virtual courses",
            View::Issues => "Issues log",
            View::Tags => "Tag validation",
        }
    }
}

pub fn render_view(view: View, rows: &[&CanonicalRow]) -> String {
    debug!("render_view: {:?} over {} rows", view, rows.len());
    let rows = rows.iter().copied();
    let body = match view {
        View::Master => render_rows(rows, &Column::ALL),
        View::Raw => render_rows(rows.filter(|r| r.source == Source::Form), &LISTING),
        View::Overview => {
            let known = rows.filter(|r| r.academic_year.starts_with("AY"));
            render_pivot(&pivot_count(known, Column::AcademicYear, Column::Semester))
        }
        View::VirtueByYear => render_pivot(&pivot_count(rows, Column::Virtue, Column::AcademicYear)),
        View::VirtueBySemester => render_pivot(&pivot_count(rows, Column::Virtue, Column::Semester)),
        View::InstructorLoad => {
            let top: Vec<String> = value_counts(rows.clone(), Column::InstructorName)
                .into_iter()
                .take(TOP_INSTRUCTORS)
                .map(|(name, _)| name)
                .collect();
            let kept = rows.filter(|r| top.contains(&r.instructor_name));
            let mut p = pivot_count(kept, Column::InstructorName, Column::Virtue);
            sort_by_total(&mut p);
            render_pivot(&p)
        }
        View::Department => render_pivot(&pivot_count(rows, Column::Department, Column::Virtue)),
        View::VirtualAdoption => {
            render_pivot(&pivot_count(rows, Column::AcademicYear, Column::DeliveryMode))
        }
        View::Virtual => {
            let virt: Vec<&CanonicalRow> = rows
                .filter(|r| r.delivery_mode == DeliveryMode::Virtual)
                .collect();
            if virt.is_empty() {
                NO_VIRTUAL.to_string()
            } else {
                render_rows(virt, &LISTING)
            }
        }
        View::Issues => {
            let unknowns = unknown_rows(rows);
            format!(
                "Found {} potential data quality issues.\n{}",
                unknowns.len(),
                render_rows(unknowns.iter().copied(), &LISTING)
            )
        }
        View::Tags => {
            let lines: Vec<Vec<String>> = value_counts(rows, Column::Virtue)
                .into_iter()
                .map(|(name, count)| vec![name, count.to_string()])
                .collect();
            format!(
                "{}\nExpected: Justice, Prudence, Temperance, Fortitude",
                render_grid(&[Column::Virtue.header().to_string(), "Rows".to_string()], &lines)
            )
        }
    };
    format!("{}\n\n{}", view.title(), body)
}

/// Most loaded rows first; ties keep their alphabetical order.
fn sort_by_total(p: &mut PivotTable) {
    let mut order: Vec<usize> = (0..p.row_labels.len()).collect();
    order.sort_by_key(|i| std::cmp::Reverse(p.row_total(*i)));
    p.row_labels = order.iter().map(|i| p.row_labels[*i].clone()).collect();
    p.counts = order.iter().map(|i| p.counts[*i].clone()).collect();
}

fn render_rows<'a, I>(rows: I, columns: &[Column]) -> String
where
    I: IntoIterator<Item = &'a CanonicalRow>,
{
    let header: Vec<String> = columns.iter().map(|c| c.header().to_string()).collect();
    let lines: Vec<Vec<String>> = rows
        .into_iter()
        .map(|r| columns.iter().map(|c| r.value(*c)).collect())
        .collect();
    format!("{}\n({} rows)", render_grid(&header, &lines), lines.len())
}

/// The pivot with a Total column and a Total line.
fn render_pivot(p: &PivotTable) -> String {
    let mut header: Vec<String> = vec![p.index.header().to_string()];
    header.extend(p.column_labels.iter().cloned());
    header.push("Total".to_string());

    let mut lines: Vec<Vec<String>> = Vec::new();
    for (i, label) in p.row_labels.iter().enumerate() {
        let mut line = vec![label.clone()];
        line.extend(p.counts[i].iter().map(|c| c.to_string()));
        line.push(p.row_total(i).to_string());
        lines.push(line);
    }
    let mut totals = vec!["Total".to_string()];
    for j in 0..p.column_labels.len() {
        let s: u64 = p.counts.iter().map(|r| r[j]).sum();
        totals.push(s.to_string());
    }
    totals.push(p.total().to_string());
    lines.push(totals);
    render_grid(&header, &lines)
}

fn render_grid(header: &[String], lines: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for line in lines {
        for (j, cell) in line.iter().enumerate() {
            if let Some(w) = widths.get_mut(j) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }
    let format_line = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect();
        padded.join(" | ").trim_end().to_string()
    };
    let mut res = vec![format_line(header)];
    res.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<String>>()
            .join("-+-"),
    );
    res.extend(lines.iter().map(|l| format_line(l)));
    res.join("\n")
}
