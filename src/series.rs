//! Row grouping and time slice selection
//!
//! A solver output file interleaves every time step; plotting needs the
//! rows regrouped by the distinct values of the time column, each group
//! holding one curve. [`Grouping`] builds that partition and [`Selection`]
//! picks the slices to draw from it.

use std::fmt;

use crate::dataset::{Column, Dataset, DatasetError};

#[derive(thiserror::Error, Debug)]
pub enum SeriesError {
    #[error("cannot select time slices from an empty series")]
    EmptySeries,
}
type Result<T> = std::result::Result<T, SeriesError>;

/// A group key, numeric or verbatim
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    Number(f64),
    Label(String),
}
impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Number(value) => value.fmt(f),
            Key::Label(label) => label.fmt(f),
        }
    }
}

/// Partition of table rows by the distinct values of one field
///
/// Numeric keys are held in ascending value order, label keys in
/// first-appearance order; within a group, rows keep their file order.
#[derive(Debug, Default, Clone)]
pub struct Grouping {
    keys: Vec<Key>,
    groups: Vec<Vec<usize>>,
}
impl Grouping {
    /// Partitions by numeric value, keys ascending
    pub fn by_values(values: &[f64]) -> Self {
        let mut keys: Vec<f64> = vec![];
        let mut groups: Vec<Vec<usize>> = vec![];
        for (row, value) in values.iter().enumerate() {
            match keys.binary_search_by(|key| key.total_cmp(value)) {
                Ok(position) => groups[position].push(row),
                Err(position) => {
                    keys.insert(position, *value);
                    groups.insert(position, vec![row]);
                }
            }
        }
        Self {
            keys: keys.into_iter().map(Key::Number).collect(),
            groups,
        }
    }
    /// Partitions by label, keys in first-appearance order
    pub fn by_labels<S: AsRef<str>>(values: &[S]) -> Self {
        let mut keys: Vec<String> = vec![];
        let mut groups: Vec<Vec<usize>> = vec![];
        for (row, value) in values.iter().enumerate() {
            match keys.iter().position(|key| key == value.as_ref()) {
                Some(position) => groups[position].push(row),
                None => {
                    keys.push(value.as_ref().to_string());
                    groups.push(vec![row]);
                }
            }
        }
        Self {
            keys: keys.into_iter().map(Key::Label).collect(),
            groups,
        }
    }
    /// Number of groups
    pub fn len(&self) -> usize {
        self.keys.len()
    }
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }
    /// Row indices of the group at `position`
    pub fn rows(&self, position: usize) -> &[usize] {
        &self.groups[position]
    }
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &[usize])> {
        self.keys
            .iter()
            .zip(self.groups.iter().map(Vec::as_slice))
    }
    /// The keys as numbers, `None` for a label grouping
    pub fn key_values(&self) -> Option<Vec<f64>> {
        self.keys
            .iter()
            .map(|key| match key {
                Key::Number(value) => Some(*value),
                Key::Label(_) => None,
            })
            .collect()
    }
}

impl Dataset {
    /// Partitions the rows by the distinct values of `field`, ascending
    /// by value for a numeric field and in first-appearance order for a
    /// label field
    pub fn group_by(&self, field: &str) -> std::result::Result<Grouping, DatasetError> {
        let column = self
            .column(field)
            .ok_or_else(|| DatasetError::Schema(field.to_string()))?;
        Ok(match column {
            Column::Number(values) => Grouping::by_values(values),
            Column::Label(values) => Grouping::by_labels(values),
        })
    }
}

/// Time slice selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Every slice
    All,
    /// Initial and final slices
    FirstLast,
    /// Initial, halfway and final slices
    FirstMidLast,
}
impl Selection {
    /// Positions of the selected keys, `keys` ascending by value
    ///
    /// The halfway slice is the key closest to half the largest key, ties
    /// going to the smaller key; positions are deduplicated when a
    /// midpoint falls on an endpoint and come out in ascending order.
    pub fn pick(&self, keys: &[f64]) -> Result<Vec<usize>> {
        if keys.is_empty() {
            return Err(SeriesError::EmptySeries);
        }
        let last = keys.len() - 1;
        Ok(match self {
            Selection::All => (0..keys.len()).collect(),
            Selection::FirstLast => {
                if last == 0 {
                    vec![0]
                } else {
                    vec![0, last]
                }
            }
            Selection::FirstMidLast => {
                let target = keys[last] / 2.;
                let mut mid = 0;
                for (position, key) in keys.iter().enumerate() {
                    if (key - target).abs() < (keys[mid] - target).abs() {
                        mid = position;
                    }
                }
                let mut picks = vec![0];
                if mid != 0 && mid != last {
                    picks.push(mid);
                }
                if last != 0 {
                    picks.push(last);
                }
                picks
            }
        })
    }
}
