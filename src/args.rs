use clap::Parser;

/// This program normalizes the export of the course designation form into a flat table
/// (one virtue and one term per row) and prints pivot views of it.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the run (input, override table, output).
    /// The other flags take precedence over its content.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The export of the survey, as an Excel (xlsx) or CSV file.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (xlsx or csv) The type of the input. By default, it is deduced from the file extension.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file with several worksheets, the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (file path) A JSON table of hardcoded courses to use instead of the builtin one.
    #[clap(long, value_parser)]
    pub overrides: Option<String>,

    /// If passed, no hardcoded course is added to the survey rows.
    #[clap(long, takes_value = false)]
    pub no_overrides: bool,

    /// (file path, 'stdout' or empty) If specified, the normalized table is written to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (default csv) The format of the normalized table: csv or json.
    #[clap(long, value_parser)]
    pub out_format: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the run is written in JSON format to the
    /// given location.
    #[clap(long, value_parser)]
    pub summary: Option<String>,

    /// The view to print: master, raw, overview, virtue-by-year, virtue-by-semester,
    /// instructor-load, department, virtual-adoption, virtual, issues or tags.
    #[clap(long, value_parser)]
    pub view: Option<String>,

    /// (repeatable, 'Column=value') Keeps only the rows with this exact value. Values given for the
    /// same column are alternatives.
    #[clap(long, value_parser)]
    pub filter: Option<Vec<String>>,

    /// (file path) A reference summary in JSON format. If provided, the program checks that the
    /// summary of the run matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard error.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
