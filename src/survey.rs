use log::{debug, info, warn};

use course_designation::table::{unknown_rows, value_counts, Selection};
use course_designation::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::survey::config_reader::*;
use crate::survey::io_common::simplify_file_name;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_output;
pub mod io_xlsx;
pub mod views;

/// Output location meaning the standard output.
pub const STDOUT: &str = "stdout";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {name} not found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("The workbook {path} has no worksheet"))]
    NoWorksheet { path: String },
    #[snafu(display(
        "The workbook {path} has several worksheets, the worksheet name must be provided"
    ))]
    TooManyWorksheets { path: String },
    #[snafu(display("No header row found in {path}"))]
    EmptyInput { path: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error writing CSV output"))]
    CsvWrite { source: csv::Error },
    #[snafu(display("Error reading file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing JSON output"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error in the override table {path}"))]
    Overrides { source: OverrideError, path: String },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Invalid filter {filter:?}"))]
    FilterColumn { source: TableError, filter: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

fn read_survey(settings: &RunSettings) -> SurveyResult<Vec<RawRecord>> {
    info!(
        "Attempting to read survey file {:?} ({:?})",
        settings.input_path, settings.input_type
    );
    match settings.input_type {
        InputType::Xlsx => io_xlsx::read_xlsx_records(
            &settings.input_path,
            settings.excel_worksheet_name.as_deref(),
        ),
        InputType::Csv => io_csv::read_csv_records(&settings.input_path),
    }
}

fn load_overrides(source: &OverridesSource) -> SurveyResult<OverrideTable> {
    match source {
        OverridesSource::Builtin => OverrideTable::builtin().context(OverridesSnafu {
            path: "<builtin>",
        }),
        OverridesSource::File(path) => {
            info!("Attempting to read override table {:?}", path);
            let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
            OverrideTable::from_json(&contents).context(OverridesSnafu { path })
        }
        OverridesSource::Disabled => Ok(OverrideTable::empty()),
    }
}

/// Parses `Column=value` filters into a selection.
pub fn parse_filters(filters: &[String]) -> SurveyResult<Selection> {
    let mut selection = Selection::new();
    for filter in filters {
        let (name, value) = match filter.split_once('=') {
            Some(p) => p,
            None => whatever!("Filter {:?} must be of the form Column=value", filter),
        };
        let column: Column = name.parse().context(FilterColumnSnafu { filter })?;
        selection.add(column, value.trim());
    }
    Ok(selection)
}

fn build_summary_js(settings: &RunSettings, table: &MasterTable) -> JSValue {
    let stats = table.stats();
    let counts = value_counts(table.rows(), Column::Virtue);
    let mut virtues: JSMap<String, JSValue> = JSMap::new();
    for v in Virtue::ALL.iter() {
        let count = counts
            .iter()
            .find(|(name, _)| name == v.name())
            .map(|(_, c)| *c)
            .unwrap_or(0);
        virtues.insert(v.name().to_string(), json!(count));
    }
    json!({
        "input": simplify_file_name(&settings.input_path),
        "records": stats.records_read,
        "skippedRecords": stats.records_skipped,
        "formRows": stats.form_rows,
        "hardcodedRows": stats.hardcoded_rows,
        "totalRows": table.len(),
        "unknownRows": unknown_rows(table.rows()).len(),
        "virtues": virtues,
        "hardcodedFingerprint": table.hardcoded_fingerprint(),
    })
}

fn check_reference(reference_path: &str, pretty_js_summary: &str) -> SurveyResult<()> {
    let summary_ref = read_summary(reference_path)?;
    info!("summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_summary {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_summary, "\n");
        whatever!("Difference detected between computed summary and reference summary")
    }
    Ok(())
}

/// Runs the whole pass: reads the survey, builds the master table, then writes
/// the requested outputs. Any error aborts the run before an output is written.
pub fn run(args: &Args) -> SurveyResult<()> {
    let settings = RunSettings::resolve(args)?;
    info!("settings: {:?}", settings);

    let records = read_survey(&settings)?;
    let overrides = load_overrides(&settings.overrides)?;
    let selection = parse_filters(&settings.filters)?;

    let rules = NormalizationRules::default();
    let table = build_master_table(&records, &overrides, &rules);

    let selected = selection.apply(table.rows());
    debug!(
        "run: {} rows selected out of {}",
        selected.len(),
        table.len()
    );

    let summary = build_summary_js(&settings, &table);
    let pretty_js_summary =
        serde_json::to_string_pretty(&summary).context(SerializingJsonSnafu {})?;

    if let Some(reference_path) = &settings.reference_path {
        check_reference(reference_path, &pretty_js_summary)?;
    }

    if let Some(out) = &settings.out_path {
        io_output::write_table(&selected, settings.out_format, out)?;
    }
    if let Some(path) = &settings.summary_path {
        io_output::write_text(&pretty_js_summary, path)?;
    }
    if let Some(view) = settings.view {
        println!("{}", views::render_view(view, &selected));
    }
    if settings.out_path.is_none() && settings.summary_path.is_none() && settings.view.is_none() {
        println!("summary:{}", pretty_js_summary);
    }
    Ok(())
}
