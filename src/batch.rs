//! Batch plotting
//!
//! [`Batch`] sweeps a results directory and runs a per-file plotting
//! pipeline over every CSV file found there, one at a time. A file whose
//! pipeline fails is reported and skipped, the remainder of the batch is
//! unaffected; a missing or empty results directory is reported on the
//! console and ends the run cleanly.

use std::{
    fs,
    path::{Path, PathBuf},
};

use glob::glob;

#[derive(thiserror::Error, Debug)]
pub enum BatchError {
    #[error("failed to create the output directory")]
    Io(#[from] std::io::Error),
    #[error("invalid file search pattern")]
    Pattern(#[from] glob::PatternError),
}
type Result<T> = std::result::Result<T, BatchError>;

/// Outcome tally of one batch run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files whose artifact was written
    pub processed: usize,
    /// Files whose pipeline failed
    pub failed: usize,
}

/// Sequential per-file runner over a results directory
///
/// ```no_run
/// use plot_solutions::{Batch, Selection};
///
/// let summary = Batch::new("Results")
///     .suffix("2D_plot")
///     .run(|input, output| {
///         plot_solutions::plot_slices(
///             input,
///             output,
///             Selection::FirstMidLast,
///             plot_solutions::colormap::Strategy::fade(),
///         )
///     })?;
/// println!("{} plotted, {} failed", summary.processed, summary.failed);
/// # Ok::<(), plot_solutions::batch::BatchError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Batch {
    input_dir: PathBuf,
    output_dir: PathBuf,
    suffix: String,
}
impl Batch {
    /// A batch over `input_dir`, writing its artifacts to the `Images`
    /// subdirectory
    pub fn new<P: AsRef<Path>>(input_dir: P) -> Self {
        let input_dir = input_dir.as_ref().to_path_buf();
        Self {
            output_dir: input_dir.join("Images"),
            input_dir,
            suffix: String::from("plot"),
        }
    }
    /// Redirects the artifacts to `output_dir`
    pub fn output_dir<P: AsRef<Path>>(self, output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            ..self
        }
    }
    /// Artifact name suffix, `<stem>_<suffix>.png`
    pub fn suffix<S: Into<String>>(self, suffix: S) -> Self {
        Self {
            suffix: suffix.into(),
            ..self
        }
    }
    fn artifact(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.output_dir.join(format!("{}_{}.png", stem, self.suffix))
    }
    /// Runs `pipeline` over every CSV file of the input directory in
    /// name order, isolating per-file failures
    pub fn run<F>(&self, mut pipeline: F) -> Result<BatchSummary>
    where
        F: FnMut(&Path, &Path) -> std::result::Result<(), crate::Error>,
    {
        let mut summary = BatchSummary::default();
        if !self.input_dir.exists() {
            println!("The folder '{}' does not exist.", self.input_dir.display());
            return Ok(summary);
        }
        let pattern = self.input_dir.join("*.csv");
        let files: Vec<PathBuf> = glob(&pattern.to_string_lossy())?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(error) => {
                    log::warn!("skipping an unreadable directory entry: {}", error);
                    None
                }
            })
            .collect();
        if files.is_empty() {
            println!(
                "No CSV files found in the folder '{}'.",
                self.input_dir.display()
            );
            return Ok(summary);
        }
        fs::create_dir_all(&self.output_dir)?;
        for file in files {
            println!("Processing file: {}", file.display());
            let artifact = self.artifact(&file);
            match pipeline(&file, &artifact) {
                Ok(()) => {
                    println!("Plot saved: {}", artifact.display());
                    summary.processed += 1;
                }
                Err(error) => {
                    log::error!("{}: {}", file.display(), error);
                    summary.failed += 1;
                }
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn seed(dir: &Path, name: &str) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        writeln!(file, "x, t, f").unwrap();
        writeln!(file, "0.0, 0.0, 0.5").unwrap();
    }

    #[test]
    fn missing_directory_ends_the_run_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let summary = Batch::new(dir.path().join("missing"))
            .run(|_, _| Ok(()))
            .unwrap();
        assert_eq!(summary, BatchSummary::default());
    }

    #[test]
    fn directory_without_csv_files_ends_the_run_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "not a table").unwrap();
        let summary = Batch::new(dir.path()).run(|_, _| Ok(())).unwrap();
        assert_eq!(summary, BatchSummary::default());
        assert!(!dir.path().join("Images").exists());
    }

    #[test]
    fn a_failing_file_does_not_end_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "bad.csv");
        seed(dir.path(), "good.csv");
        let summary = Batch::new(dir.path())
            .run(|input, _| {
                if input.file_name().is_some_and(|name| name == "bad.csv") {
                    Err(crate::series::SeriesError::EmptySeries.into())
                } else {
                    Ok(())
                }
            })
            .unwrap();
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn artifacts_land_in_the_output_directory_with_the_suffix() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "LW_SET1_exp_100_10.csv");
        let out = dir.path().join("figures");
        let mut artifacts = vec![];
        Batch::new(dir.path())
            .output_dir(&out)
            .suffix("2D_plot")
            .run(|_, output| {
                artifacts.push(output.to_path_buf());
                Ok(())
            })
            .unwrap();
        assert_eq!(
            artifacts,
            vec![out.join("LW_SET1_exp_100_10_2D_plot.png")]
        );
        assert!(out.exists());
    }

    #[test]
    fn files_are_visited_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "b.csv");
        seed(dir.path(), "a.csv");
        seed(dir.path(), "c.csv");
        let mut visited = vec![];
        Batch::new(dir.path())
            .run(|input, _| {
                visited.push(input.file_name().unwrap().to_string_lossy().into_owned());
                Ok(())
            })
            .unwrap();
        assert_eq!(visited, vec!["a.csv", "b.csv", "c.csv"]);
    }
}
