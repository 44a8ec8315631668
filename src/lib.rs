//! Batch visualization of 1D wave equation solutions
//!
//! The companion finite difference solver samples each run of the
//! transport equation `df/dt + a df/dx = 0` on a space-time grid and
//! writes one `x, t, f` CSV file per run, plus a consolidated error
//! norms table. This crate turns a directory of those files into PNG
//! charts:
//!
//!  - [`plot_slices`] draws selected time slices of one run as 2D
//!    curves, [`Selection`] choosing the slices and
//!    [`colormap::Strategy`] their colors,
//!  - [`plot_surface`] draws the whole space-time scatter of one run,
//!  - [`plot_refinement`] overlays the final slices of runs of the same
//!    case at different grid resolutions,
//!  - [`Norms`] renders the error norms dashboards,
//!  - [`Batch`] runs a per-file pipeline over a whole results directory.

use std::path::{Path, PathBuf};

use itertools::izip;
use plotters::style::{Color, RGBColor};

pub mod batch;
pub mod case;
pub mod chart;
pub mod colormap;
pub mod dataset;
mod error;
pub mod norms;
pub mod series;

pub use batch::{Batch, BatchSummary};
pub use case::{chart_title, RunCase, Scheme};
pub use chart::{ChartSpec, SeriesStyle, SurfaceSpec};
pub use colormap::ColorScale;
pub use dataset::{Dataset, DatasetLoader};
pub use error::Error;
pub use norms::Norms;
pub use series::{Grouping, Selection};

use colormap::{Strategy, INITIAL_COLOR};
use dataset::DatasetError;
use series::SeriesError;

fn solution(input: &Path) -> Result<Dataset, DatasetError> {
    DatasetLoader::from_path(input)
        .numeric_field("x")
        .numeric_field("t")
        .numeric_field_any(&dataset::VALUE_FIELDS)
        .load()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Style of the slice at `pick`: the initial slice solid in the anchor
/// color, every later slice dashed in the scale color of its time.
/// Endpoint slices carry legend labels; in-between slices are labeled
/// under the sparse selections only
fn slice_style(
    t: f64,
    pick: usize,
    last: usize,
    selection: Selection,
    scale: &ColorScale,
) -> SeriesStyle {
    if pick == 0 {
        return SeriesStyle::solid(INITIAL_COLOR.mix(1.))
            .label(format!("T0: t={:.2} (initial)", t));
    }
    let style = SeriesStyle::dashed(scale.color(t));
    if pick == last {
        style.label(format!("TN: t={:.2} (final)", t))
    } else if selection == Selection::All {
        style
    } else {
        style.label(format!("t={:.2}", t))
    }
}

/// Renders the 2D time slice chart of one solution file
///
/// The initial slice is drawn solid in the anchor color, later slices
/// dashed in the colors of `strategy`; the chart title is decoded from
/// the file name, degrading to a placeholder for unconventional names.
pub fn plot_slices(
    input: &Path,
    output: &Path,
    selection: Selection,
    strategy: Strategy,
) -> Result<(), Error> {
    let dataset = solution(input)?;
    let value = dataset
        .find_column(&dataset::VALUE_FIELDS)
        .ok_or_else(|| DatasetError::Schema("f".to_string()))?;
    let groups = dataset.group_by("t")?;
    let times = groups.key_values().unwrap_or_default();
    let picks = selection.pick(&times)?;
    let x = dataset.numbers("x")?;
    let f = dataset.numbers(value)?;
    let (f_min, f_max) = dataset.minmax(value)?.ok_or(SeriesError::EmptySeries)?;
    let scale = ColorScale::new(times[0], times[times.len() - 1], strategy);
    let last = picks[picks.len() - 1];
    let mut spec =
        ChartSpec::new(chart_title(&file_name(input))).y_bounds(chart::fit_bounds(f_min, f_max));
    for &pick in &picks {
        let t = times[pick];
        let points: Vec<(f64, f64)> = groups
            .rows(pick)
            .iter()
            .map(|&row| (x[row], f[row]))
            .collect();
        spec = spec.with_series(points, slice_style(t, pick, last, selection, &scale));
    }
    spec.save(output)?;
    Ok(())
}

/// Renders the 3D space-time scatter chart of one solution file
pub fn plot_surface(input: &Path, output: &Path, strategy: Strategy) -> Result<(), Error> {
    let dataset = solution(input)?;
    let value = dataset
        .find_column(&dataset::VALUE_FIELDS)
        .ok_or_else(|| DatasetError::Schema("f".to_string()))?;
    let (f_min, f_max) = dataset.minmax(value)?.ok_or(SeriesError::EmptySeries)?;
    let points: Vec<(f64, f64, f64)> = izip!(
        dataset.numbers("x")?.iter(),
        dataset.numbers("t")?.iter(),
        dataset.numbers(value)?.iter()
    )
    .map(|(&x, &t, &f)| (x, t, f))
    .collect();
    SurfaceSpec::new(
        format!("3D Visualization - {}", file_name(input)),
        points,
        ColorScale::new(f_min, f_max, strategy),
    )
    .save(output)?;
    Ok(())
}

/// Overlays the final time slices of several runs of the same case at
/// different grid resolutions, the initial slice coming from the first
/// file
pub fn plot_refinement(inputs: &[PathBuf], output: &Path) -> Result<(), Error> {
    if inputs.is_empty() {
        return Err(SeriesError::EmptySeries.into());
    }
    let mut spec = ChartSpec::new("")
        .x_desc("x (Spatial Coordinate)")
        .y_desc("f (Function Value)");
    let mut colors = colorous::TABLEAU10.iter().cycle();
    let (mut f_min, mut f_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for (position, input) in inputs.iter().enumerate() {
        let dataset = solution(input)?;
        let value = dataset
            .find_column(&dataset::VALUE_FIELDS)
            .ok_or_else(|| DatasetError::Schema("f".to_string()))?;
        let groups = dataset.group_by("t")?;
        let times = groups.key_values().unwrap_or_default();
        let picks = Selection::FirstLast.pick(&times)?;
        let x = dataset.numbers("x")?;
        let f = dataset.numbers(value)?;
        let (min, max) = dataset.minmax(value)?.ok_or(SeriesError::EmptySeries)?;
        f_min = f_min.min(min);
        f_max = f_max.max(max);
        if position == 0 {
            let points: Vec<(f64, f64)> = groups
                .rows(0)
                .iter()
                .map(|&row| (x[row], f[row]))
                .collect();
            spec = spec.with_series(
                points,
                SeriesStyle::solid(INITIAL_COLOR.mix(1.))
                    .label(format!("T0: t={:.2} (initial)", times[0])),
            );
        }
        let last = picks[picks.len() - 1];
        let points: Vec<(f64, f64)> = groups
            .rows(last)
            .iter()
            .map(|&row| (x[row], f[row]))
            .collect();
        let color = colors.next().unwrap().as_tuple();
        let rgb = RGBColor(color.0, color.1, color.2);
        spec = spec.with_series(
            points,
            SeriesStyle::dashed(rgb.mix(1.))
                .label(format!("{} at T={}", file_name(input), times[last])),
        );
    }
    spec.y_bounds(chart::fit_bounds(f_min, f_max)).save(output)?;
    Ok(())
}
