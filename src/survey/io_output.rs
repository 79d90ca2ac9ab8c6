// Writing the master table and the summary.

use std::fs::File;
use std::io::{self, Write};

use crate::survey::*;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub fn parse(name: &str) -> SurveyResult<OutputFormat> {
        match name.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            x => whatever!("Output format {:?} not implemented", x),
        }
    }
}

fn open_output(out: &str) -> SurveyResult<Box<dyn Write>> {
    if out == STDOUT {
        Ok(Box::new(io::stdout()))
    } else {
        let f = File::create(out).context(WritingOutputSnafu { path: out })?;
        Ok(Box::new(f))
    }
}

/// Writes the rows with the export headers, in CSV or as a JSON array.
pub fn write_table(rows: &[&CanonicalRow], format: OutputFormat, out: &str) -> SurveyResult<()> {
    info!("write_table: writing {} rows to {:?} ({:?})", rows.len(), out, format);
    let w = open_output(out)?;
    write_rows(rows, format, w, out)
}

fn write_rows<W: Write>(
    rows: &[&CanonicalRow],
    format: OutputFormat,
    mut w: W,
    path: &str,
) -> SurveyResult<()> {
    match format {
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(&mut w);
            for row in rows {
                wtr.serialize(row).context(CsvWriteSnafu {})?;
            }
            wtr.flush().context(WritingOutputSnafu { path })?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut w, rows).context(SerializingJsonSnafu {})?;
            writeln!(w).context(WritingOutputSnafu { path })?;
        }
    }
    w.flush().context(WritingOutputSnafu { path })
}

pub fn write_text(text: &str, out: &str) -> SurveyResult<()> {
    let mut w = open_output(out)?;
    writeln!(w, "{}", text)
        .and_then(|_| w.flush())
        .context(WritingOutputSnafu { path: out })
}
