// Primitives for reading CSV files.

use std::io::Read;

use csv::ReaderBuilder;

use crate::survey::{io_common::get_col_index_mapping, *};

pub fn read_csv_records(path: &str) -> SurveyResult<Vec<RawRecord>> {
    let rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    read_records(rdr, path)
}

/// The first line is the header. Rows may be shorter than the header; the
/// missing cells are blank. Cells that are not valid UTF-8 (Latin-1 exports)
/// are decoded lossily instead of failing the line.
fn read_records<R: Read>(rdr: csv::Reader<R>, path: &str) -> SurveyResult<Vec<RawRecord>> {
    let mut records = rdr.into_byte_records();
    let header: Vec<Option<String>> = match records.next() {
        Some(line_r) => cells(&line_r.context(CsvLineParseSnafu { lineno: 1_usize })?, 1),
        None => return EmptyInputSnafu { path }.fail(),
    };
    debug!("read_csv_records: header: {:?}", header);
    let mapping = get_col_index_mapping(&header);

    let mut res: Vec<RawRecord> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let row = cells(&line, lineno);
        if row.iter().all(|c| c.is_none()) {
            debug!("read_csv_records: skipping blank line {}", lineno);
            continue;
        }
        res.push(mapping.record(&row));
    }
    info!("read_csv_records: {} records read from {:?}", res.len(), path);
    Ok(res)
}

fn cells(line: &csv::ByteRecord, lineno: usize) -> Vec<Option<String>> {
    line.iter()
        .enumerate()
        .map(|(col, bytes)| {
            let s = String::from_utf8_lossy(bytes);
            if std::str::from_utf8(bytes).is_err() {
                warn!(
                    "read_csv_records: line {} column {}: invalid UTF-8, read as {:?}",
                    lineno,
                    col + 1,
                    s
                );
            }
            if s.trim().is_empty() {
                None
            } else {
                Some(s.into_owned())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_bytes(data: &[u8]) -> SurveyResult<Vec<RawRecord>> {
        let rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data);
        read_records(rdr, "form.csv")
    }

    fn read(data: &str) -> SurveyResult<Vec<RawRecord>> {
        read_bytes(data.as_bytes())
    }

    #[test]
    fn quoted_cells_and_short_rows() {
        let data = "\
Instructor,\"Course department, number\",Terms offered,Which virtues?
Prof A,\"EDUC 210, Intro\",\"Fall 2025, Spring 2026\",\"Justice;Prudence\"
,,,
Prof B,HIST 101
";
        let records = read(data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].course_info.as_deref(), Some("EDUC 210, Intro"));
        assert_eq!(
            records[0].terms_offered.as_deref(),
            Some("Fall 2025, Spring 2026")
        );
        assert_eq!(records[0].start, None);
        assert_eq!(records[1].instructor.as_deref(), Some("Prof B"));
        assert_eq!(records[1].virtues, None);
    }

    #[test]
    fn latin1_cell_does_not_stop_the_file() {
        let mut data: Vec<u8> = Vec::new();
        data.extend_from_slice(b"Instructor,Course department,Term,virtues\n");
        data.extend_from_slice(b"Prof A,EDUC 210,Every Fall,Justice\n");
        data.extend_from_slice(b"Prof \xE9,HIST 101,Spring 2026,Prudence\n");
        let records = read_bytes(&data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].instructor.as_deref(), Some("Prof A"));
        assert_eq!(records[1].instructor.as_deref(), Some("Prof \u{FFFD}"));
        assert_eq!(records[1].virtues.as_deref(), Some("Prudence"));
    }

    #[test]
    fn empty_file() {
        assert!(matches!(read(""), Err(SurveyError::EmptyInput { .. })));
    }
}
