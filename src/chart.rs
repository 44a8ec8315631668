//! Chart composition
//!
//! [`ChartSpec`] accumulates styled curves and renders the 2D solution
//! charts, [`SurfaceSpec`] renders the space-time scatter of a whole run.
//! Both own their output geometry and are consumed by `save`, one
//! artifact per specification.

use std::path::Path;

use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::colormap::ColorScale;

#[derive(thiserror::Error, Debug)]
pub enum ChartError {
    #[error("failed to render the chart: {0}")]
    Backend(String),
}
type Result<T> = std::result::Result<T, ChartError>;

pub(crate) fn render_error<E: std::error::Error>(error: E) -> ChartError {
    ChartError::Backend(error.to_string())
}

/// 2D chart canvas [px]
pub const SIZE_2D: (u32, u32) = (1200, 600);
/// 3D chart canvas [px]
pub const SIZE_3D: (u32, u32) = (1024, 1024);
/// Width of the color bar strip of a 3D chart [px]
pub const COLOR_BAR_WIDTH: u32 = 160;
/// Margin added on each side of the y range, as a fraction of the data span
pub const MARGIN_FACTOR: f64 = 0.2;
/// Smallest y-axis span a 2D chart may end up with
pub const MIN_HEIGHT: f64 = 0.2;

/// Widens `[min, max]` on both sides by `factor` of the span
pub fn with_margin(min: f64, max: f64, factor: f64) -> (f64, f64) {
    let margin = (max - min) * factor;
    (min - margin, max + margin)
}

/// Grows `bounds` symmetrically about its midpoint up to a span of
/// `height`; bounds already that tall come back unchanged
pub fn with_min_height(bounds: (f64, f64), height: f64) -> (f64, f64) {
    let (lo, hi) = bounds;
    if hi - lo < height {
        let mid = (lo + hi) / 2.;
        (mid - height / 2., mid + height / 2.)
    } else {
        bounds
    }
}

/// Y-axis bounds of a solution chart: margined by [`MARGIN_FACTOR`], then
/// held to at least [`MIN_HEIGHT`] so near-constant solutions do not
/// degenerate into a sliver
pub fn fit_bounds(min: f64, max: f64) -> (f64, f64) {
    with_min_height(with_margin(min, max, MARGIN_FACTOR), MIN_HEIGHT)
}

/// Pads a data range, the axis span staying nonzero
fn axis_range(min: f64, max: f64) -> std::ops::Range<f64> {
    if max > min {
        let pad = (max - min) * 1e-2;
        min - pad..max + pad
    } else {
        min - 0.5..max + 0.5
    }
}

/// Rendering style of one curve
#[derive(Debug, Clone)]
pub struct SeriesStyle {
    pub color: RGBAColor,
    pub stroke: u32,
    pub dashed: bool,
    pub label: Option<String>,
}
impl SeriesStyle {
    pub fn solid(color: RGBAColor) -> Self {
        Self {
            color,
            stroke: 2,
            dashed: false,
            label: None,
        }
    }
    pub fn dashed(color: RGBAColor) -> Self {
        Self {
            color,
            stroke: 2,
            dashed: true,
            label: None,
        }
    }
    pub fn label<S: Into<String>>(self, label: S) -> Self {
        Self {
            label: Some(label.into()),
            ..self
        }
    }
}

/// One curve, ordered `(x, f)` samples and their style
#[derive(Debug, Clone)]
struct Series {
    points: Vec<(f64, f64)>,
    style: SeriesStyle,
}

/// A 2D chart under construction
///
/// Curves accumulate in draw order; [`ChartSpec::save`] consumes the
/// specification and writes the PNG artifact:
///
/// ```no_run
/// use plot_solutions::chart::{self, ChartSpec, SeriesStyle};
/// use plotters::style::{Color, BLUE};
///
/// ChartSpec::new("Lax Wendroff, SET n°1, n=100, T=10")
///     .y_bounds(chart::fit_bounds(0., 1.))
///     .with_series(
///         vec![(0., 0.), (0.5, 1.), (1., 0.)],
///         SeriesStyle::solid(BLUE.mix(1.)).label("t=0.00"),
///     )
///     .save("Results/Images/LW_SET1_exp_100_10_2D_plot.png")?;
/// # Ok::<(), plot_solutions::chart::ChartError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ChartSpec {
    title: String,
    x_desc: String,
    y_desc: String,
    y_bounds: (f64, f64),
    series: Vec<Series>,
}
impl ChartSpec {
    pub fn new<S: Into<String>>(title: S) -> Self {
        Self {
            title: title.into(),
            x_desc: String::from("x"),
            y_desc: String::from("f(x,t)"),
            y_bounds: (0., 1.),
            series: vec![],
        }
    }
    pub fn x_desc<S: Into<String>>(self, desc: S) -> Self {
        Self {
            x_desc: desc.into(),
            ..self
        }
    }
    pub fn y_desc<S: Into<String>>(self, desc: S) -> Self {
        Self {
            y_desc: desc.into(),
            ..self
        }
    }
    /// Sets the y-axis bounds, usually from [`fit_bounds`]
    pub fn y_bounds(self, bounds: (f64, f64)) -> Self {
        Self {
            y_bounds: bounds,
            ..self
        }
    }
    /// Appends one curve
    pub fn with_series(mut self, points: Vec<(f64, f64)>, style: SeriesStyle) -> Self {
        self.series.push(Series { points, style });
        self
    }
    fn x_range(&self) -> std::ops::Range<f64> {
        let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
        for series in &self.series {
            for &(x, _) in &series.points {
                min = min.min(x);
                max = max.max(x);
            }
        }
        if min > max {
            axis_range(0., 1.)
        } else {
            axis_range(min, max)
        }
    }
    /// Renders the chart to `path`
    pub fn save<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let root = BitMapBackend::new(path.as_ref(), SIZE_2D).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;
        let x_range = self.x_range();
        let (y_lo, y_hi) = self.y_bounds;
        let mut builder = ChartBuilder::on(&root);
        builder
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .margin(10);
        if !self.title.is_empty() {
            builder.caption(&self.title, ("sans-serif", 24));
        }
        let mut chart = builder
            .build_cartesian_2d(x_range, y_lo..y_hi)
            .map_err(render_error)?;
        chart
            .configure_mesh()
            .x_desc(&self.x_desc)
            .y_desc(&self.y_desc)
            .draw()
            .map_err(render_error)?;
        let mut with_legend = false;
        for Series { points, style } in self.series {
            let shape = style.color.stroke_width(style.stroke);
            let anno = if style.dashed {
                chart
                    .draw_series(DashedLineSeries::new(points, 6, 4, shape))
                    .map_err(render_error)?
            } else {
                chart
                    .draw_series(LineSeries::new(points, shape))
                    .map_err(render_error)?
            };
            if let Some(label) = style.label {
                let color = style.color;
                anno.label(label).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
                with_legend = true;
            }
        }
        if with_legend {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .position(SeriesLabelPosition::UpperRight)
                .draw()
                .map_err(render_error)?;
        }
        root.present().map_err(render_error)?;
        log::info!("chart written to {:?}", path.as_ref());
        Ok(())
    }
}

/// A 3D space-time scatter chart
///
/// Every `(x, t, f)` sample of a run is drawn as a point colored by its
/// value, with the color scale reproduced as a bar on the right edge
pub struct SurfaceSpec {
    title: String,
    points: Vec<(f64, f64, f64)>,
    scale: ColorScale,
}
impl SurfaceSpec {
    pub fn new<S: Into<String>>(title: S, points: Vec<(f64, f64, f64)>, scale: ColorScale) -> Self {
        Self {
            title: title.into(),
            points,
            scale,
        }
    }
    /// Renders the scatter to `path`
    pub fn save<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let root = BitMapBackend::new(path.as_ref(), SIZE_3D).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;
        let (main, bar) = root.split_horizontally((SIZE_3D.0 - COLOR_BAR_WIDTH) as i32);
        let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut t_min, mut t_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for &(x, t, _) in &self.points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            t_min = t_min.min(t);
            t_max = t_max.max(t);
        }
        let (f_min, f_max) = self.scale.bounds();
        let mut chart = ChartBuilder::on(&main)
            .caption(&self.title, ("sans-serif", 28))
            .margin(20)
            .build_cartesian_3d(
                axis_range(x_min, x_max),
                axis_range(f_min, f_max),
                axis_range(t_min, t_max),
            )
            .map_err(render_error)?;
        chart.with_projection(|mut pb| {
            pb.yaw = 0.5;
            pb.pitch = 0.3;
            pb.scale = 0.8;
            pb.into_matrix()
        });
        chart
            .configure_axes()
            .light_grid_style(BLACK.mix(0.15))
            .max_light_lines(3)
            .draw()
            .map_err(render_error)?;
        let scale = &self.scale;
        chart
            .draw_series(
                self.points
                    .iter()
                    .map(|&(x, t, f)| Circle::new((x, f, t), 2, scale.color(f).filled())),
            )
            .map_err(render_error)?;
        color_bar(&bar, scale, "f Values")?;
        root.present().map_err(render_error)?;
        log::info!("chart written to {:?}", path.as_ref());
        Ok(())
    }
}

/// Draws the vertical color bar legend of `scale` on `area`
fn color_bar(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    scale: &ColorScale,
    desc: &str,
) -> Result<()> {
    let (lo, hi) = scale.bounds();
    let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };
    let mut bar = ChartBuilder::on(area)
        .margin(20)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, lo..hi)
        .map_err(render_error)?;
    bar.configure_mesh()
        .disable_x_axis()
        .disable_x_mesh()
        .disable_y_mesh()
        .y_desc(desc)
        .draw()
        .map_err(render_error)?;
    let steps = 64;
    let span = hi - lo;
    bar.draw_series((0..steps).map(|step| {
        let y0 = lo + span * step as f64 / steps as f64;
        let y1 = lo + span * (step + 1) as f64 / steps as f64;
        Rectangle::new(
            [(0., y0), (1., y1)],
            scale.color((y0 + y1) / 2.).filled(),
        )
    }))
    .map_err(render_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::Strategy;

    #[test]
    fn margin_widens_both_sides() {
        let (lo, hi) = with_margin(0., 1., 0.2);
        assert!((lo + 0.2).abs() < 1e-12);
        assert!((hi - 1.2).abs() < 1e-12);
    }

    #[test]
    fn short_bounds_recenter_to_the_minimum_height() {
        // margin of 0.05 * 0.2 on each side, then re-centered about 1.025
        let (lo, hi) = fit_bounds(1.0, 1.05);
        assert!((lo - 0.925).abs() < 1e-12);
        assert!((hi - 1.125).abs() < 1e-12);
        assert!((hi - lo - MIN_HEIGHT).abs() < 1e-12);
    }

    #[test]
    fn tall_bounds_come_back_unchanged() {
        assert_eq!(with_min_height((0., 5.), 0.2), (0., 5.));
        let first = fit_bounds(0., 5.);
        assert_eq!(with_min_height(first, MIN_HEIGHT), first);
    }

    #[test]
    fn flat_solution_still_spans_the_minimum_height() {
        let (lo, hi) = fit_bounds(0.5, 0.5);
        assert!((hi - lo - MIN_HEIGHT).abs() < 1e-12);
        assert!((lo - 0.4).abs() < 1e-12);
    }

    #[test]
    fn chart_specification_writes_the_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        ChartSpec::new("Lax Wendroff, SET n°1, n=100, T=10")
            .y_bounds(fit_bounds(0., 1.))
            .with_series(
                vec![(0., 0.), (0.5, 1.), (1., 0.)],
                SeriesStyle::solid(crate::colormap::INITIAL_COLOR.mix(1.))
                    .label("T0: t=0.00 (initial)"),
            )
            .with_series(
                vec![(0., 0.), (0.5, 0.5), (1., 0.)],
                SeriesStyle::dashed(crate::colormap::FADE_COLOR.mix(1.)).label("t=10.00"),
            )
            .save(&path)
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn surface_specification_writes_the_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("surface.png");
        let points: Vec<(f64, f64, f64)> = (0..100)
            .map(|i| {
                let x = i as f64 / 10.;
                let t = (i % 10) as f64;
                (x, t, (x - t).sin())
            })
            .collect();
        SurfaceSpec::new(
            "3D Visualization - LW_SET1_exp_100_10.csv",
            points,
            ColorScale::new(-1., 1., Strategy::viridis()),
        )
        .save(&path)
        .unwrap();
        assert!(path.exists());
    }
}
