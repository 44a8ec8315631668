//! Solver output tables
//!
//! The finite difference solver writes one CSV file per run, sampling the
//! solution on a space-time grid:
//!
//! | x | t | f(x,t) |
//! |---:|---:|---:|
//! | -40. | 0. | 0.135 |
//! | -39.8 | 0. | 0.137 |
//! | ... | ... | ... |
//!
//! Legacy solver revisions pad the header cells with spaces and let the
//! delimiter inside the `f(x,t)` field name split it across two columns,
//! leaving the header one cell wider than the data rows.
//! [`DatasetLoader`] normalizes both defects before any value is read.

use std::{
    collections::HashSet,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use itertools::MinMaxResult::{MinMax, NoElements, OneElement};
use itertools::Itertools;

#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error("failed to open the solution file")]
    Io(#[from] std::io::Error),
    #[error("failed to read the CSV file")]
    Csv(#[from] csv::Error),
    #[error("column {0:?} is missing from the header")]
    Schema(String),
    #[error("column {0:?} appears more than once in the header")]
    Duplicate(String),
    #[error("column {0:?} is not numeric")]
    NotNumeric(String),
    #[error("cannot coerce {value:?} into a number (column {column:?}, row {row})")]
    Parse {
        column: String,
        row: usize,
        value: String,
    },
    #[error("row {row} carries {found} cells where the header has {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}
type Result<T> = std::result::Result<T, DatasetError>;

/// Field names that embed the cell delimiter, split across two header
/// cells by legacy solver revisions and mended back by the loader
pub const COMPOSITE_NAMES: [&str; 1] = ["f(x,t)"];
/// Names under which solver revisions have written the solution values
pub const VALUE_FIELDS: [&str; 2] = ["f", "f(x,t)"];

/// A single column, either fully numeric or verbatim text
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Number(Vec<f64>),
    Label(Vec<String>),
}
impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Number(values) => values.len(),
            Column::Label(values) => values.len(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Numeric values, or `None` for a label column
    pub fn as_numbers(&self) -> Option<&[f64]> {
        match self {
            Column::Number(values) => Some(values),
            Column::Label(_) => None,
        }
    }
    /// Verbatim cells, or `None` for a numeric column
    pub fn as_labels(&self) -> Option<&[String]> {
        match self {
            Column::Label(values) => Some(values),
            Column::Number(_) => None,
        }
    }
}

/// In-memory table of one solver output file
///
/// Column names are normalized once at load time; rows are stored
/// column-wise and the table is immutable afterwards.
#[derive(Debug, Default, Clone)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
    rows: usize,
}
impl Dataset {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows
    }
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
    /// Column names in file order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
    /// The column called `name`
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
    }
    /// The first of `names` present in the table
    pub fn find_column<'a>(&self, names: &[&'a str]) -> Option<&'a str> {
        names
            .iter()
            .find(|&&name| self.names.iter().any(|n| n == name))
            .copied()
    }
    /// The numeric values of column `name`
    pub fn numbers(&self, name: &str) -> Result<&[f64]> {
        self.column(name)
            .ok_or_else(|| DatasetError::Schema(name.to_string()))?
            .as_numbers()
            .ok_or_else(|| DatasetError::NotNumeric(name.to_string()))
    }
    /// The range of column `name`, `None` when the table has no rows
    pub fn minmax(&self, name: &str) -> Result<Option<(f64, f64)>> {
        Ok(
            match self.numbers(name)?.iter().minmax_by(|a, b| a.total_cmp(b)) {
                NoElements => None,
                OneElement(&value) => Some((value, value)),
                MinMax(&min, &max) => Some((min, max)),
            },
        )
    }
}

/// [`Dataset`] loader
///
/// Builds a [`Dataset`] from a solver CSV file, with the columns to be
/// coerced declared up front:
///
/// ```no_run
/// use plot_solutions::dataset::DatasetLoader;
///
/// let dataset = DatasetLoader::from_path("Results/LW_SET1_exp_100_10.csv")
///     .numeric_field("x")
///     .numeric_field("t")
///     .numeric_field("f")
///     .load()?;
/// # Ok::<(), plot_solutions::dataset::DatasetError>(())
/// ```
#[derive(Debug, Default, Clone)]
pub struct DatasetLoader {
    path: PathBuf,
    numeric: Vec<Vec<String>>,
    labels: Vec<String>,
}
impl DatasetLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }
    /// Declares a required field coerced to floating point
    pub fn numeric_field<S: Into<String>>(mut self, name: S) -> Self {
        self.numeric.push(vec![name.into()]);
        self
    }
    /// Declares a required numeric field known under several historical
    /// names, the first one present in the header being used
    pub fn numeric_field_any(mut self, names: &[&str]) -> Self {
        self.numeric.push(names.iter().map(|s| s.to_string()).collect());
        self
    }
    /// Declares a required field kept verbatim
    pub fn label_field<S: Into<String>>(mut self, name: S) -> Self {
        self.labels.push(name.into());
        self
    }
    /// Loads the table, checking the declared fields against the
    /// normalized header
    ///
    /// A row wider than the header, beyond the one extra cell of the
    /// legacy split, fails the whole load as [`DatasetError::Ragged`]
    pub fn load(self) -> Result<Dataset> {
        log::info!("loading {:?}", self.path);
        let file = File::open(&self.path)?;
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));
        let raw_names: Vec<String> = rdr.headers()?.iter().map(|name| name.to_string()).collect();
        let (names, mended) = mend_composite(&raw_names);
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(DatasetError::Duplicate(name.clone()));
            }
        }
        let mut numeric = vec![false; names.len()];
        for aliases in &self.numeric {
            let position = names
                .iter()
                .position(|name| aliases.iter().any(|alias| alias == name))
                .ok_or_else(|| DatasetError::Schema(aliases.join("/")))?;
            numeric[position] = true;
        }
        for label in &self.labels {
            if !names.iter().any(|name| name == label) {
                return Err(DatasetError::Schema(label.clone()));
            }
        }
        let mut columns: Vec<Column> = numeric
            .iter()
            .map(|&is_numeric| {
                if is_numeric {
                    Column::Number(vec![])
                } else {
                    Column::Label(vec![])
                }
            })
            .collect();
        let mut rows = 0;
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            if record.len() > names.len() + usize::from(mended.is_some()) {
                return Err(DatasetError::Ragged {
                    row,
                    expected: names.len(),
                    found: record.len(),
                });
            }
            let cells = align_cells(&record, names.len(), mended);
            for ((cell, column), name) in cells.into_iter().zip(&mut columns).zip(&names) {
                match column {
                    Column::Number(values) => {
                        values.push(cell.parse().map_err(|_| DatasetError::Parse {
                            column: name.clone(),
                            row,
                            value: cell,
                        })?)
                    }
                    Column::Label(values) => values.push(cell),
                }
            }
            rows += 1;
        }
        log::info!("{} rows across {} columns", rows, names.len());
        Ok(Dataset {
            names,
            columns,
            rows,
        })
    }
}

/// Rejoins adjacent header cells that the delimiter inside a known
/// composite field name split apart, returning the mended names and the
/// position of the mend
fn mend_composite(raw: &[String]) -> (Vec<String>, Option<usize>) {
    for (position, pair) in raw.windows(2).enumerate() {
        let joined = format!("{},{}", pair[0], pair[1]);
        if COMPOSITE_NAMES.contains(&joined.as_str()) {
            let mut names = raw[..position].to_vec();
            names.push(joined);
            names.extend_from_slice(&raw[position + 2..]);
            return (names, Some(position));
        }
    }
    (raw.to_vec(), None)
}

/// Positions the cells of one record against the mended header
///
/// A record as wide as the raw header carries a split value at the mend;
/// its two halves are rejoined. Short records are padded with empty cells
/// and surface as [`DatasetError::Parse`] on a numeric column.
fn align_cells(record: &csv::StringRecord, width: usize, mended: Option<usize>) -> Vec<String> {
    let mut cells = Vec::with_capacity(width);
    match mended {
        Some(position) if record.len() == width + 1 => {
            cells.extend(record.iter().take(position).map(str::to_string));
            cells.push(format!("{},{}", &record[position], &record[position + 1]));
            cells.extend(record.iter().skip(position + 2).map(str::to_string));
        }
        _ => {
            cells.extend(record.iter().take(width).map(str::to_string));
            while cells.len() < width {
                cells.push(String::new());
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn trims_header_and_coerces_declared_fields() {
        let file = write_csv("x, t, f\n-40.0, 0.0, 0.135\n-39.8, 0.0, 0.137\n");
        let dataset = DatasetLoader::from_path(file.path())
            .numeric_field("x")
            .numeric_field("t")
            .numeric_field("f")
            .load()
            .unwrap();
        assert_eq!(dataset.names().collect::<Vec<_>>(), vec!["x", "t", "f"]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.numbers("x").unwrap(), &[-40.0, -39.8]);
        assert_eq!(dataset.numbers("f").unwrap(), &[0.135, 0.137]);
    }

    #[test]
    fn mends_composite_header() {
        let file = write_csv("x, t, f(x, t)\n-40.0, 0.0, 0.135\n-39.8, 0.5, 0.137\n");
        let dataset = DatasetLoader::from_path(file.path())
            .numeric_field("x")
            .numeric_field("t")
            .numeric_field_any(&VALUE_FIELDS)
            .load()
            .unwrap();
        assert_eq!(
            dataset.names().collect::<Vec<_>>(),
            vec!["x", "t", "f(x,t)"]
        );
        assert_eq!(dataset.find_column(&VALUE_FIELDS), Some("f(x,t)"));
        assert_eq!(dataset.numbers("f(x,t)").unwrap(), &[0.135, 0.137]);
        assert_eq!(dataset.numbers("t").unwrap(), &[0.0, 0.5]);
    }

    #[test]
    fn full_width_legacy_row_rejoins_the_split_value() {
        let file = write_csv("x, t, f(x, t)\n0.0, 0.0, 0.1, 35\n");
        let result = DatasetLoader::from_path(file.path())
            .numeric_field("x")
            .numeric_field("t")
            .numeric_field_any(&VALUE_FIELDS)
            .load();
        assert!(matches!(
            result,
            Err(DatasetError::Parse { column, row: 0, value })
                if column == "f(x,t)" && value == "0.1,35"
        ));
    }

    #[test]
    fn short_row_holes_surface_as_parse_errors() {
        let file = write_csv("x, t, f\n0.0, 0.0\n");
        let result = DatasetLoader::from_path(file.path())
            .numeric_field("x")
            .numeric_field("t")
            .numeric_field("f")
            .load();
        assert!(matches!(
            result,
            Err(DatasetError::Parse { column, row: 0, value })
                if column == "f" && value.is_empty()
        ));
    }

    #[test]
    fn over_wide_row_is_rejected() {
        let file = write_csv("x, t, f\n0.0, 0.0, 0.5, 99\n");
        let result = DatasetLoader::from_path(file.path())
            .numeric_field("x")
            .numeric_field("t")
            .numeric_field("f")
            .load();
        assert!(matches!(
            result,
            Err(DatasetError::Ragged {
                row: 0,
                expected: 3,
                found: 4
            })
        ));
        let legacy = write_csv("x, t, f(x, t)\n0.0, 0.0, 0.1, 35, 99\n");
        let result = DatasetLoader::from_path(legacy.path())
            .numeric_field("x")
            .load();
        assert!(matches!(
            result,
            Err(DatasetError::Ragged {
                row: 0,
                expected: 3,
                found: 5
            })
        ));
    }

    #[test]
    fn missing_declared_field_is_a_schema_error() {
        let file = write_csv("x, t\n0.0, 0.0\n");
        let result = DatasetLoader::from_path(file.path())
            .numeric_field("x")
            .numeric_field("f")
            .load();
        assert!(matches!(result, Err(DatasetError::Schema(name)) if name == "f"));
    }

    #[test]
    fn duplicate_header_name_is_rejected() {
        let file = write_csv("x, x, f\n0.0, 1.0, 2.0\n");
        let result = DatasetLoader::from_path(file.path()).numeric_field("f").load();
        assert!(matches!(result, Err(DatasetError::Duplicate(name)) if name == "x"));
    }

    #[test]
    fn unparsable_cell_is_a_parse_error() {
        let file = write_csv("x, t, f\n0.0, 0.0, 0.1\n0.2, oops, 0.3\n");
        let result = DatasetLoader::from_path(file.path())
            .numeric_field("x")
            .numeric_field("t")
            .numeric_field("f")
            .load();
        assert!(matches!(
            result,
            Err(DatasetError::Parse { column, row: 1, value }) if column == "t" && value == "oops"
        ));
    }

    #[test]
    fn undeclared_columns_are_kept_verbatim() {
        let file = write_csv("x, f, Scheme\n0.0, 0.1, LW\n0.2, 0.3, E_FTBS\n");
        let dataset = DatasetLoader::from_path(file.path())
            .numeric_field("x")
            .numeric_field("f")
            .load()
            .unwrap();
        assert_eq!(
            dataset.column("Scheme").and_then(Column::as_labels),
            Some(&["LW".to_string(), "E_FTBS".to_string()][..])
        );
        assert!(matches!(
            dataset.numbers("Scheme"),
            Err(DatasetError::NotNumeric(_))
        ));
    }

    #[test]
    fn declared_label_fields_are_checked_for_presence() {
        let file = write_csv("x, f, Scheme\n0.0, 0.1, LW\n");
        let dataset = DatasetLoader::from_path(file.path())
            .numeric_field("x")
            .numeric_field("f")
            .label_field("Scheme")
            .load()
            .unwrap();
        assert_eq!(dataset.len(), 1);
        let missing = DatasetLoader::from_path(file.path())
            .label_field("SetType")
            .load();
        assert!(matches!(missing, Err(DatasetError::Schema(name)) if name == "SetType"));
    }

    #[test]
    fn header_only_file_loads_empty() {
        let file = write_csv("x, t, f\n");
        let dataset = DatasetLoader::from_path(file.path())
            .numeric_field("x")
            .numeric_field("t")
            .numeric_field("f")
            .load()
            .unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.minmax("f").unwrap(), None);
    }

    #[test]
    fn single_row_range_collapses() {
        let file = write_csv("x, t, f\n0.0, 0.0, 0.5\n");
        let dataset = DatasetLoader::from_path(file.path())
            .numeric_field("f")
            .load()
            .unwrap();
        assert_eq!(dataset.minmax("f").unwrap(), Some((0.5, 0.5)));
    }
}
