// Reading the survey from an Excel export.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::survey::{io_common::get_col_index_mapping, *};

pub fn read_xlsx_records(path: &str, worksheet: Option<&str>) -> SurveyResult<Vec<RawRecord>> {
    let wrange = get_range(path, worksheet)?;
    let rows: Vec<Vec<Option<String>>> = wrange
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    records_from_rows(path, &rows)
}

/// Turns the rows of a sheet into records. The first row is the header.
/// Completely blank rows are ignored.
fn records_from_rows(path: &str, rows: &[Vec<Option<String>>]) -> SurveyResult<Vec<RawRecord>> {
    let mut iter = rows.iter();
    let header = iter.next().context(EmptyInputSnafu { path })?;
    debug!("read_xlsx_records: header: {:?}", header);
    let mapping = get_col_index_mapping(header);

    let mut res: Vec<RawRecord> = Vec::new();
    for (idx, row) in iter.enumerate() {
        if row.iter().all(|c| c.is_none()) {
            debug!("read_xlsx_records: skipping blank row {}", idx + 2);
            continue;
        }
        res.push(mapping.record(row));
    }
    info!("read_xlsx_records: {} records read from {:?}", res.len(), path);
    Ok(res)
}

/// The text of a cell as the form would have shown it. Numbers without a
/// fractional part lose their trailing `.0`.
fn cell_text(cell: &DataType) -> Option<String> {
    match cell {
        DataType::Empty => None,
        DataType::String(s) if s.trim().is_empty() => None,
        DataType::String(s) => Some(s.clone()),
        DataType::Int(i) => Some(i.to_string()),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => {
            Some(format!("{}", *f as i64))
        }
        DataType::Float(f) => Some(f.to_string()),
        DataType::Bool(b) => Some(b.to_string()),
        other => Some(format!("{:?}", other)),
    }
}

fn get_range(path: &str, worksheet: Option<&str>) -> SurveyResult<calamine::Range<DataType>> {
    debug!(
        "read_xlsx_records: path: {:?} worksheet: {:?}",
        path, worksheet
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    if let Some(name) = worksheet {
        let wrange = workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => NoWorksheetSnafu { path }.fail(),
            [(worksheet_name, wrange)] => {
                debug!(
                    "read_xlsx_records: path: {:?} worksheet: {:?}",
                    path, worksheet_name
                );
                Ok(wrange.clone())
            }
            _ => TooManyWorksheetsSnafu { path }.fail(),
        }
    }
}
