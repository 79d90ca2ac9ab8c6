/*!

This is the long-form manual for `course_designation` and `virtuepivot`.

## Input format

The input is the spreadsheet export of the course designation form, either as
an Excel workbook (`xlsx`) or as a CSV file. The first row holds the questions.
The columns are found by looking for a fragment of the question text, and the
first column that matches wins:

| fragment            | field                                 |
|---------------------|---------------------------------------|
| `Start`             | submission time (read, then ignored)  |
| `Instructor`        | instructor name                       |
| `Course department` | course department, number and title   |
| `Term`              | terms offered                         |
| `virtues`           | cardinal virtues addressed            |

The search is case-sensitive and a header is assigned to the first fragment of
the list that it contains. A missing column is not an error: the corresponding
field is blank for every record, and ends up as `Unknown` or empty in the output.

## Normalization

Every answer goes through the following steps:

- **virtues**: any of `Justice`, `Prudence`, `Temperance` and `Fortitude`
  appearing in the answer, in that order. An answer without any of them is
  dropped entirely.
- **terms**: explicit mentions such as `Fall 2025`, `spring 26` or `J-Term 2027`
  are looked up in the academic year table. Answers containing `every`,
  `each` or `all` anywhere get the default window (Fall 2025 to Spring 2027),
  limited to the fall terms when only `fall` is mentioned and to the spring
  terms when only `spring` is mentioned. Since `fall` contains `all`, an answer
  such as `Fall 2025` also gets Fall 2026, and `Fall and Spring` gets the whole
  window. An answer without any recognized term gets the
  single term `Unknown`.
- **course**: the first code made of 3 or 4 capital letters and 3 digits
  (`EDUC 210`, `EDUC-210`). Without it, the department and the number are
  `Unknown` and the code is the first 20 characters of the answer followed by `...`.
- **delivery**: `Virtual` when the virtue or the terms answer mentions
  `virtual`, `Not marked` otherwise.

A record then becomes one row for each (virtue, term) combination.

```text
virtues: "Justice;Prudence"   terms: "Every Fall"

Justice   Fall 2025  AY 25
Justice   Fall 2026  AY 26
Prudence  Fall 2025  AY 25
Prudence  Fall 2026  AY 26
```

## Hardcoded courses

Some courses are known to be missing from the survey or misreported. They are
listed in an override table, in JSON, which is appended after the survey rows.
The table shipped with the crate is used unless another one is passed with
`--overrides` (or `overridesPath` in the configuration), or `--no-overrides` is set.

```text
{
  "courses": [
    {
      "department": "EDUC",
      "number": "210",
      "title": "Introduction to Education",
      "virtues": "Justice;Prudence",
      "terms": [
        {"term": "Fall 2025", "academicYear": "AY 25"},
        {"term": "Spring 2026", "academicYear": "AY 25"}
      ],
      "instructor": "Muffet Trout",
      "virtual": false
    }
  ]
}
```

The terms are not expanded: they are copied as listed, which allows exceptions
(a course not taught one specific term) and labels outside of the calendar.
`virtual` is optional. Each entry produces one row per term and per virtue.

## Output

The master table has the columns `Source`, `Course Code`, `Department`,
`Course Number`, `Course Title`, `Section`, `Instructor name`,
`Cardinal virtues addressed`, `Term`, `Academic Year`, `DeliveryMode`,
`Semester` and `Hardcoded`. It can be written in CSV or JSON with `--out`.

## Views

The `--view` flag prints one of the following:

* `master`: the full table
* `raw`: the rows coming from the survey
* `overview`: course count by academic year and semester (known years only)
* `virtue-by-year`, `virtue-by-semester`: virtue distributions
* `instructor-load`: virtues of the 20 instructors with the most rows
* `department`: virtues by department
* `virtual-adoption`: delivery mode by academic year
* `virtual`: the rows marked as virtual
* `issues`: the rows with an unknown department or term
* `tags`: number of rows per virtue

`--filter "Column=value"` (repeatable) restricts the rows before the view is
computed. Values given for the same column are alternatives, different columns
must all match.

## Configuration

All the options can also be given in a JSON file passed with `--config`.
Relative paths are resolved from the directory of the configuration file, and
the command line flags take precedence.

```text
{
  "input": {
    "provider": "xlsx",
    "filePath": "designation_form.xlsx",
    "excelWorksheetName": "Form1"
  },
  "overridesPath": "overrides.json",
  "outputSettings": {
    "outputPath": "master.csv",
    "outputFormat": "csv",
    "view": "overview"
  }
}
```

 */
