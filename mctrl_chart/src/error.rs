// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for the chart API and the rendering backend.

use thiserror::Error;

/// Errors reported by the chart's public operations.
///
/// Whenever an operation returns an error the chart state is left exactly as
/// it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    /// A data-set index does not refer to an existing data set.
    #[error("invalid data set index {index} (chart has {count} data sets)")]
    InvalidDataSetIndex {
        /// The rejected index.
        index: isize,
        /// Number of data sets at the time of the call.
        count: usize,
    },

    /// Data sets must hold at least one value.
    #[error("data set cannot be empty")]
    EmptyDataSet,

    /// The axis selector is not valid for this operation.
    #[error("invalid axis selector {0}")]
    InvalidAxis(i32),

    /// Factor exponents are limited to `-9..=9`.
    #[error("invalid factor exponent {0} (expected -9..=9)")]
    InvalidFactorExponent(i32),

    /// The raw chart type number does not name a chart type.
    #[error("invalid chart type {0}")]
    InvalidChartKind(u32),

    /// A value buffer or string could not be allocated.
    #[error("out of memory")]
    OutOfMemory,
}

impl ChartError {
    /// Returns `true` for the errors a Win32 control reports as
    /// `ERROR_INVALID_PARAMETER`.
    pub fn is_invalid_parameter(&self) -> bool {
        !matches!(self, Self::OutOfMemory)
    }
}

/// Errors raised by a [`RenderTarget`](crate::RenderTarget) or
/// [`Surface`](crate::Surface).
///
/// A failing draw call is logged and skipped by the chart; only
/// [`RenderError::SurfaceLost`] has lifecycle consequences (the cached
/// surface is dropped and re-created on the next paint).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A path or other geometry object could not be created.
    #[error("geometry creation failed")]
    Geometry,

    /// A brush could not be created.
    #[error("brush creation failed")]
    Brush,

    /// A text layout could not be created.
    #[error("text layout creation failed")]
    TextLayout,

    /// The device backing the surface went away; the surface must be recreated.
    #[error("drawing surface lost")]
    SurfaceLost,

    /// Any other backend failure.
    #[error("render backend error: {0}")]
    Backend(String),
}

/// Logs a failed draw call and swallows the error.
///
/// Painting never aborts on a single failed element: a partially rendered
/// chart is preferred over no chart at all.
pub(crate) fn skip_failed(result: Result<(), RenderError>, what: &str) {
    if let Err(err) = result {
        tracing::warn!(%err, "skipping {what}");
    }
}
