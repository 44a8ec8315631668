//! Consolidated error norms
//!
//! The solver's norms production pass sweeps every run and consolidates
//! the discretization error norms into a single `Norms.csv` table, one
//! row per run:
//!
//! ```text
//! FileName,Scheme,SetType,Samples,Tmax,L1,L2,LInf,Lp(p=2.5)
//! E_FTBS_SET1_exp_100_10.csv,E_FTBS,SET1,100,10,4.0223e-05,...
//! ```
//!
//! [`Norms`] loads that table and renders, per scheme, a 2x2 dashboard
//! of the four norms against the spatial sample count, one curve per
//! time horizon.

use std::{fs::File, io::BufReader, path::Path};

use itertools::{
    Itertools,
    MinMaxResult::{MinMax, NoElements, OneElement},
};
use plotters::prelude::*;
use serde::Deserialize;

use crate::{
    chart::{render_error, with_margin, ChartError},
    series::{Grouping, Key},
};

#[derive(thiserror::Error, Debug)]
pub enum NormsError {
    #[error("failed to open the norms file")]
    Io(#[from] std::io::Error),
    #[error("failed to read the norms CSV file")]
    Csv(#[from] csv::Error),
    #[error("failed to render the norms dashboard")]
    Chart(#[from] ChartError),
}
type Result<T> = std::result::Result<T, NormsError>;

/// Norms dashboard canvas [px]
pub const SIZE_NORMS: (u32, u32) = (1200, 1000);

#[derive(Deserialize, Debug)]
struct Record {
    #[serde(rename = "FileName")]
    file_name: String,
    #[serde(rename = "Scheme")]
    scheme: String,
    #[serde(rename = "SetType")]
    set_type: String,
    #[serde(rename = "Samples")]
    samples: f64,
    #[serde(rename = "Tmax")]
    tmax: f64,
    #[serde(rename = "L1")]
    l1: f64,
    #[serde(rename = "L2")]
    l2: f64,
    #[serde(rename = "LInf")]
    l_inf: f64,
    #[serde(rename = "Lp(p=2.5)")]
    lp: f64,
}

/// The consolidated norms table
#[derive(Debug, Default)]
pub struct Norms {
    pub file_name: Vec<String>,
    pub scheme: Vec<String>,
    pub set_type: Vec<String>,
    pub samples: Vec<f64>,
    pub tmax: Vec<f64>,
    pub l1: Vec<f64>,
    pub l2: Vec<f64>,
    pub l_inf: Vec<f64>,
    pub lp: Vec<f64>,
}
impl Norms {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        log::info!("loading {:?}", path.as_ref());
        let file = File::open(path.as_ref())?;
        let mut rdr = csv::Reader::from_reader(BufReader::new(file));
        let mut norms = Norms::default();
        for record in rdr.deserialize() {
            let record: Record = record?;
            norms.file_name.push(record.file_name);
            norms.scheme.push(record.scheme);
            norms.set_type.push(record.set_type);
            norms.samples.push(record.samples);
            norms.tmax.push(record.tmax);
            norms.l1.push(record.l1);
            norms.l2.push(record.l2);
            norms.l_inf.push(record.l_inf);
            norms.lp.push(record.lp);
        }
        log::info!("{} norms records", norms.len());
        Ok(norms)
    }
    /// Number of records
    pub fn len(&self) -> usize {
        self.scheme.len()
    }
    pub fn is_empty(&self) -> bool {
        self.scheme.is_empty()
    }
    /// The distinct scheme labels, in first-appearance order
    pub fn schemes(&self) -> Vec<String> {
        Grouping::by_labels(&self.scheme)
            .keys()
            .iter()
            .map(|key| key.to_string())
            .collect()
    }
    /// Renders the 2x2 norms dashboard of `scheme` to `path`
    ///
    /// A scheme with no record in the table is reported on the console
    /// and produces no artifact; the call still succeeds
    pub fn dashboard<P: AsRef<Path>>(&self, scheme: &str, path: P) -> Result<bool> {
        let rows: Vec<usize> = (0..self.len())
            .filter(|&row| self.scheme[row] == scheme)
            .collect();
        if rows.is_empty() {
            println!("No data found for Scheme: {}", scheme);
            return Ok(false);
        }
        let horizons: Vec<f64> = rows.iter().map(|&row| self.tmax[row]).collect();
        let groups = Grouping::by_values(&horizons);
        let root = BitMapBackend::new(path.as_ref(), SIZE_NORMS).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;
        let root = root
            .titled(
                &format!("Norms for Scheme: {}", scheme),
                ("sans-serif", 30),
            )
            .map_err(render_error)?;
        let panels = [
            ("L1 Norm", &self.l1),
            ("L2 Norm", &self.l2),
            ("LInf Norm", &self.l_inf),
            ("Lp(p=2.5) Norm", &self.lp),
        ];
        for (area, (caption, values)) in root.split_evenly((2, 2)).iter().zip(panels) {
            self.panel(area, caption, values, &rows, &groups)?;
        }
        root.present().map_err(render_error)?;
        log::info!("dashboard written to {:?}", path.as_ref());
        Ok(true)
    }
    /// Draws one norm against the sample count, one curve per time horizon
    fn panel(
        &self,
        area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
        caption: &str,
        values: &[f64],
        rows: &[usize],
        groups: &Grouping,
    ) -> Result<()> {
        let x_bounds = range_of(rows.iter().map(|&row| self.samples[row]));
        let y_bounds = range_of(rows.iter().map(|&row| values[row]));
        let mut chart = ChartBuilder::on(area)
            .caption(caption, ("sans-serif", 20))
            .set_label_area_size(LabelAreaPosition::Left, 70)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .margin(10)
            .build_cartesian_2d(x_bounds.0..x_bounds.1, y_bounds.0..y_bounds.1)
            .map_err(render_error)?;
        chart
            .configure_mesh()
            .x_desc("Samples")
            .y_desc(caption)
            .draw()
            .map_err(render_error)?;
        let mut colors = colorous::TABLEAU10.iter().cycle();
        for (key, positions) in groups.iter() {
            let color = colors.next().unwrap().as_tuple();
            let rgb = RGBColor(color.0, color.1, color.2);
            let points: Vec<(f64, f64)> = positions
                .iter()
                .map(|&position| rows[position])
                .map(|row| (self.samples[row], values[row]))
                .collect();
            let label = match key {
                Key::Number(horizon) => format!("Tmax={}", horizon),
                Key::Label(label) => label.clone(),
            };
            chart
                .draw_series(
                    LineSeries::new(points, rgb.stroke_width(2)).point_size(3),
                )
                .map_err(render_error)?
                .label(label)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], rgb.stroke_width(2))
                });
        }
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(render_error)?;
        Ok(())
    }
}

/// Margined range of an iterator of values, nonzero span guaranteed
fn range_of<I: Iterator<Item = f64>>(values: I) -> (f64, f64) {
    let (min, max) = match values.minmax_by(|a, b| a.total_cmp(b)) {
        NoElements => (0., 1.),
        OneElement(value) => (value, value),
        MinMax(min, max) => (min, max),
    };
    if max > min {
        with_margin(min, max, 0.05)
    } else {
        (min - 0.5, max + 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TABLE: &str = "\
FileName,Scheme,SetType,Samples,Tmax,L1,L2,LInf,Lp(p=2.5)
E_FTBS_SET1_exp_100_10.csv,E_FTBS,SET1,100,10,0.042,0.021,0.092,0.025
E_FTBS_SET1_exp_200_10.csv,E_FTBS,SET1,200,10,0.021,0.011,0.047,0.013
E_FTBS_SET1_exp_100_20.csv,E_FTBS,SET1,100,20,0.084,0.042,0.184,0.05
E_FTBS_SET1_exp_200_20.csv,E_FTBS,SET1,200,20,0.042,0.022,0.094,0.026
LW_SET1_exp_100_10.csv,LW,SET1,100,10,0.004,0.002,0.009,0.002
";

    fn write_table() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(TABLE.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_the_consolidated_table() {
        let file = write_table();
        let norms = Norms::from_path(file.path()).unwrap();
        assert_eq!(norms.len(), 5);
        assert_eq!(norms.scheme[4], "LW");
        assert_eq!(norms.samples[1], 200.);
        assert_eq!(norms.lp[0], 0.025);
        assert_eq!(norms.l_inf[2], 0.184);
    }

    #[test]
    fn schemes_come_out_in_first_appearance_order() {
        let file = write_table();
        let norms = Norms::from_path(file.path()).unwrap();
        assert_eq!(norms.schemes(), vec!["E_FTBS", "LW"]);
    }

    #[test]
    fn absent_scheme_produces_no_artifact() {
        let file = write_table();
        let norms = Norms::from_path(file.path()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Richtmyer_norms.png");
        assert!(!norms.dashboard("Richtmyer", &path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn dashboard_writes_the_artifact() {
        let file = write_table();
        let norms = Norms::from_path(file.path()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("E_FTBS_norms.png");
        assert!(norms.dashboard("E_FTBS", &path).unwrap());
        assert!(path.exists());
    }
}
