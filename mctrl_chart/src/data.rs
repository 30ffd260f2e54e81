// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data sets and the notification target that feeds virtual ones.

use peniko::Color;

use crate::color::color_seq;
use crate::error::ChartError;

/// Values supplied when inserting or replacing a data set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataSetSource<'a> {
    /// Values copied into a buffer owned by the chart.
    Values(&'a [i32]),
    /// A virtual data set of the given length; values are fetched through
    /// [`ChartNotify::fetch_values`] whenever the chart needs them.
    Virtual(usize),
}

impl DataSetSource<'_> {
    /// Number of values described by the source.
    pub fn count(&self) -> usize {
        match self {
            Self::Values(values) => values.len(),
            Self::Virtual(count) => *count,
        }
    }

    /// Copies the values into a freshly allocated buffer.
    ///
    /// Returns `Ok(None)` for virtual sources.
    pub(crate) fn to_owned_values(self) -> Result<Option<Vec<i32>>, ChartError> {
        match self {
            Self::Values(values) => {
                let mut buf = Vec::new();
                buf.try_reserve_exact(values.len())
                    .map_err(|_| ChartError::OutOfMemory)?;
                buf.extend_from_slice(values);
                Ok(Some(buf))
            }
            Self::Virtual(_) => Ok(None),
        }
    }
}

/// One data set owned by a chart.
#[derive(Clone, Debug, PartialEq)]
pub struct DataSet {
    pub(crate) name: Option<String>,
    pub(crate) color: Option<Color>,
    pub(crate) count: usize,
    pub(crate) values: Option<Vec<i32>>,
}

impl DataSet {
    pub(crate) fn new(count: usize, values: Option<Vec<i32>>) -> Self {
        Self {
            name: None,
            color: None,
            count,
            values,
        }
    }

    /// Declared number of values.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Stored values, or `None` for a virtual data set.
    pub fn values(&self) -> Option<&[i32]> {
        self.values.as_deref()
    }

    /// Returns `true` if values are fetched on demand.
    pub fn is_virtual(&self) -> bool {
        self.values.is_none()
    }

    /// Legend label, if one was set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Explicit color, or `None` when the color is taken from the sequence.
    pub fn color(&self) -> Option<Color> {
        self.color
    }
}

/// Color a data set is painted with.
pub(crate) fn data_color(data: &[DataSet], set: usize) -> Color {
    data.get(set)
        .and_then(|d| d.color)
        .unwrap_or_else(|| color_seq(set))
}

/// Legend label of a data set: its name or a `data-set-N` placeholder.
pub(crate) fn data_label(data: &[DataSet], set: usize) -> String {
    match data.get(set).and_then(|d| d.name.as_deref()) {
        Some(name) => name.to_owned(),
        None => format!("data-set-{set}"),
    }
}

/// Receiver of chart notifications.
///
/// This is the chart's link to its owner: it supplies values of virtual data
/// sets and learns about resource exhaustion.
pub trait ChartNotify {
    /// Fills `values` with the values `first..=last` of data set `set`.
    ///
    /// `values.len() == last - first + 1`. Returning `false` leaves the
    /// buffer as it was (zero-filled); the chart then simply displays zeros.
    fn fetch_values(&mut self, set: usize, first: usize, last: usize, values: &mut [i32]) -> bool;

    /// Called when the chart fails to allocate memory for an operation.
    fn out_of_memory(&mut self) {}
}
