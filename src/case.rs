//! Solver run identification
//!
//! Each output file name encodes the run that produced it. Two naming
//! grammars coexist in the archives, differing in where the `SET` token
//! sits:
//!
//!  - `LW_SET1_exp_100_10.csv`, the scheme code alone ahead of the set,
//!  - `E_FTBS_SET2_exp_100_10.csv`, a scheme family token in between.
//!
//! Both decode to a [`RunCase`]; a name matching neither grammar is not
//! an error, the chart simply falls back to a placeholder title.

use std::fmt;

use regex::Regex;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

#[derive(Debug, thiserror::Error)]
pub enum CaseError {
    #[error("scheme code {0:?} is not recognized, expected E, I, LW or Richtmyer")]
    Scheme(String),
    #[error("invalid run name regular expression")]
    Regex(#[from] regex::Error),
    #[error("{0:?} does not match a known run naming grammar")]
    Pattern(String),
    #[error("run name parsing error")]
    Parser(#[from] std::num::ParseIntError),
}
type Result<T> = std::result::Result<T, CaseError>;

/// Finite difference scheme identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Scheme {
    ExplicitFtbs,
    ImplicitFtbs,
    LaxWendroff,
    Richtmyer,
}
impl Scheme {
    /// The code token leading the file name
    fn code(&self) -> &'static str {
        match self {
            Scheme::ExplicitFtbs => "E",
            Scheme::ImplicitFtbs => "I",
            Scheme::LaxWendroff => "LW",
            Scheme::Richtmyer => "Richtmyer",
        }
    }
    /// Scheme from its file name code: `E`, `I`, `LW` or `Richtmyer`
    pub fn new(code: &str) -> Result<Self> {
        Scheme::iter()
            .find(|scheme| scheme.code() == code)
            .ok_or_else(|| CaseError::Scheme(code.to_string()))
    }
    pub fn to_pretty_string(&self) -> String {
        match self {
            Scheme::ExplicitFtbs => "Explicit FTBS",
            Scheme::ImplicitFtbs => "Implicit FTBS",
            Scheme::LaxWendroff => "Lax Wendroff",
            Scheme::Richtmyer => "Richtmyer",
        }
        .to_string()
    }
}
impl fmt::Display for Scheme {
    /// The scheme label as the solver writes it, `Norms.csv` included
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Scheme::ExplicitFtbs => "E_FTBS",
                Scheme::ImplicitFtbs => "I_FTBS",
                Scheme::LaxWendroff => "LW",
                Scheme::Richtmyer => "Richtmyer",
            }
        )
    }
}

/// One solver run decoded from its output file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCase {
    pub scheme: Scheme,
    /// Parameter set number
    pub set: u32,
    /// Initial condition tag, `exp` or `sign`
    pub mode: String,
    /// Number of spatial samples
    pub samples: u32,
    /// Simulated time horizon
    pub time_horizon: u32,
}
impl RunCase {
    pub fn new<S: Into<String>>(
        scheme: Scheme,
        set: u32,
        mode: S,
        samples: u32,
        time_horizon: u32,
    ) -> Self {
        Self {
            scheme,
            set,
            mode: mode.into(),
            samples,
            time_horizon,
        }
    }
    pub fn to_pretty_string(&self) -> String {
        format!(
            "{}, SET n°{}, n={}, T={}",
            self.scheme.to_pretty_string(),
            self.set,
            self.samples,
            self.time_horizon
        )
    }
}
impl fmt::Display for RunCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_SET{}_{}_{}_{}",
            self.scheme, self.set, self.mode, self.samples, self.time_horizon
        )
    }
}
impl TryFrom<&str> for RunCase {
    type Error = CaseError;

    /// Decodes a file stem against the two naming grammars, trying first
    /// the one with the `SET` token right after the scheme code
    fn try_from(stem: &str) -> Result<Self> {
        let plain = Regex::new(r"^([A-Za-z0-9]+)_SET(\d+)_([A-Za-z0-9]+)_(\d+)_(\d+)$")?;
        let family =
            Regex::new(r"^([A-Za-z0-9]+)_[A-Za-z0-9]+_SET(\d+)_([A-Za-z0-9]+)_(\d+)_(\d+)$")?;
        let captures = plain
            .captures(stem)
            .or_else(|| family.captures(stem))
            .ok_or_else(|| CaseError::Pattern(stem.to_string()))?;
        Ok(Self {
            scheme: Scheme::new(&captures[1])?,
            set: captures[2].parse()?,
            mode: captures[3].to_string(),
            samples: captures[4].parse()?,
            time_horizon: captures[5].parse()?,
        })
    }
}

/// Chart title decoded from a solution file name
///
/// A name following neither naming grammar yields a fixed placeholder
/// title, leaving the chart itself to be rendered regardless
pub fn chart_title(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .file_stem()
        .and_then(std::ffi::OsStr::to_str)
        .map(RunCase::try_from)
        .and_then(|case| case.ok())
        .map(|case| case.to_pretty_string())
        .unwrap_or_else(|| String::from("Invalid file name structure"))
}
