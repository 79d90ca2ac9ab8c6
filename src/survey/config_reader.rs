use crate::args::Args;
use crate::survey::io_output::OutputFormat;
use crate::survey::views::View;
use crate::survey::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
    #[serde(rename = "outputFormat")]
    pub output_format: Option<String>,
    #[serde(rename = "summaryPath")]
    pub summary_path: Option<String>,
    pub view: Option<String>,
    pub filters: Option<Vec<String>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    pub input: FileSource,
    #[serde(rename = "overridesPath")]
    pub overrides_path: Option<String>,
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Xlsx,
    Csv,
}

impl InputType {
    fn parse(name: &str) -> SurveyResult<InputType> {
        match name.to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(InputType::Xlsx),
            "csv" => Ok(InputType::Csv),
            x => whatever!("Input type {:?} not implemented", x),
        }
    }

    fn from_path(path: &str) -> InputType {
        if path.to_lowercase().ends_with(".csv") {
            InputType::Csv
        } else {
            InputType::Xlsx
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum OverridesSource {
    Builtin,
    File(String),
    Disabled,
}

/// Everything needed for one run, once the configuration file and the command
/// line have been merged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub input_path: String,
    pub input_type: InputType,
    pub excel_worksheet_name: Option<String>,
    pub overrides: OverridesSource,
    pub out_path: Option<String>,
    pub out_format: OutputFormat,
    pub summary_path: Option<String>,
    pub view: Option<View>,
    pub filters: Vec<String>,
    pub reference_path: Option<String>,
}

impl RunSettings {
    pub fn resolve(args: &Args) -> SurveyResult<RunSettings> {
        let (config, root) = match &args.config {
            Some(config_path) => {
                let config = read_config(config_path)?;
                let root = Path::new(config_path.as_str())
                    .parent()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_default();
                (Some(config), root)
            }
            None => (None, PathBuf::new()),
        };
        let relative = |p: &str| -> String { root.join(p).display().to_string() };
        let output = config
            .as_ref()
            .map(|c| c.output_settings.clone())
            .unwrap_or_default();

        let input_path = match (&args.input, &config) {
            (Some(p), _) => p.clone(),
            (None, Some(c)) => relative(c.input.file_path.as_str()),
            (None, None) => whatever!("No input file: use --input or a configuration file"),
        };
        let input_type = match args
            .input_type
            .clone()
            .or_else(|| config.as_ref().and_then(|c| c.input.provider.clone()))
        {
            Some(name) => InputType::parse(&name)?,
            None => InputType::from_path(&input_path),
        };
        let excel_worksheet_name = args.excel_worksheet_name.clone().or_else(|| {
            config
                .as_ref()
                .and_then(|c| c.input.excel_worksheet_name.clone())
        });

        let overrides = if args.no_overrides {
            OverridesSource::Disabled
        } else if let Some(p) = &args.overrides {
            OverridesSource::File(p.clone())
        } else if let Some(p) = config.as_ref().and_then(|c| c.overrides_path.clone()) {
            OverridesSource::File(relative(p.as_str()))
        } else {
            OverridesSource::Builtin
        };

        let out_path = args
            .out
            .clone()
            .or_else(|| output.output_path.as_ref().map(|p| stdout_or(p, &relative)));
        let out_format = match args.out_format.clone().or(output.output_format) {
            Some(name) => OutputFormat::parse(&name)?,
            None => OutputFormat::Csv,
        };
        let summary_path = args
            .summary
            .clone()
            .or_else(|| output.summary_path.as_ref().map(|p| stdout_or(p, &relative)));
        let view = match args.view.clone().or(output.view) {
            Some(name) => Some(View::parse(&name)?),
            None => None,
        };
        let filters = args
            .filter
            .clone()
            .or(output.filters)
            .unwrap_or_default();

        Ok(RunSettings {
            input_path,
            input_type,
            excel_worksheet_name,
            overrides,
            out_path,
            out_format,
            summary_path,
            view,
            filters,
            reference_path: args.reference.clone(),
        })
    }
}

fn stdout_or(path: &str, relative: &dyn Fn(&str) -> String) -> String {
    if path == STDOUT {
        path.to_string()
    } else {
        relative(path)
    }
}

pub fn read_config(path: &str) -> SurveyResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: SurveyConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> SurveyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: &str) -> Args {
        Args {
            input: Some(input.to_string()),
            ..Args::default()
        }
    }

    #[test]
    fn defaults_from_command_line() {
        let s = RunSettings::resolve(&args("form.xlsx")).unwrap();
        assert_eq!(s.input_type, InputType::Xlsx);
        assert_eq!(s.overrides, OverridesSource::Builtin);
        assert_eq!(s.out_format, OutputFormat::Csv);
        assert_eq!(s.view, None);
        assert!(s.filters.is_empty());

        let s = RunSettings::resolve(&args("Form.CSV")).unwrap();
        assert_eq!(s.input_type, InputType::Csv);
    }

    #[test]
    fn command_line_options() {
        let a = Args {
            input_type: Some("csv".to_string()),
            no_overrides: true,
            overrides: Some("ignored.json".to_string()),
            out_format: Some("JSON".to_string()),
            view: Some("virtue-by-year".to_string()),
            filter: Some(vec!["Department=EDUC".to_string()]),
            ..args("export.txt")
        };
        let s = RunSettings::resolve(&a).unwrap();
        assert_eq!(s.input_type, InputType::Csv);
        assert_eq!(s.overrides, OverridesSource::Disabled);
        assert_eq!(s.out_format, OutputFormat::Json);
        assert_eq!(s.view, Some(View::VirtueByYear));
        assert_eq!(s.filters, vec!["Department=EDUC".to_string()]);
    }

    #[test]
    fn invalid_options() {
        assert!(RunSettings::resolve(&Args::default()).is_err());
        let a = Args {
            input_type: Some("ods".to_string()),
            ..args("form.ods")
        };
        assert!(RunSettings::resolve(&a).is_err());
        let a = Args {
            view: Some("histogram".to_string()),
            ..args("form.xlsx")
        };
        assert!(RunSettings::resolve(&a).is_err());
    }

    #[test]
    fn configuration_file() {
        let dir = std::env::temp_dir().join("virtuepivot_config_test");
        fs::create_dir_all(&dir).unwrap();
        let config_path = dir.join("run.json");
        fs::write(
            &config_path,
            r#"{
                "input": {"provider": "csv", "filePath": "form.csv"},
                "overridesPath": "/data/overrides.json",
                "outputSettings": {"outputPath": "stdout", "view": "tags"}
            }"#,
        )
        .unwrap();

        let a = Args {
            config: Some(config_path.display().to_string()),
            ..Args::default()
        };
        let s = RunSettings::resolve(&a).unwrap();
        assert_eq!(s.input_path, dir.join("form.csv").display().to_string());
        assert_eq!(s.input_type, InputType::Csv);
        assert_eq!(
            s.overrides,
            OverridesSource::File("/data/overrides.json".to_string())
        );
        assert_eq!(s.out_path, Some(STDOUT.to_string()));
        assert_eq!(s.view, Some(View::Tags));

        // The command line wins.
        let a = Args {
            config: Some(config_path.display().to_string()),
            input: Some("other.xlsx".to_string()),
            input_type: Some("xlsx".to_string()),
            view: Some("overview".to_string()),
            ..Args::default()
        };
        let s = RunSettings::resolve(&a).unwrap();
        assert_eq!(s.input_path, "other.xlsx");
        assert_eq!(s.input_type, InputType::Xlsx);
        assert_eq!(s.view, Some(View::Overview));
    }

    #[test]
    fn output_paths_are_relative_unless_stdout() {
        let relative = |p: &str| -> String { format!("/runs/{}", p) };
        assert_eq!(stdout_or(STDOUT, &relative), STDOUT);
        assert_eq!(stdout_or("master.csv", &relative), "/runs/master.csv");
    }
}
