// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout, rendering and hit-testing engine of the mCtrl chart control.
//!
//! A [`Chart`] holds integer data sets and two axes and turns them into an
//! auto-scaling 2-D chart of one of ten [`ChartKind`]s:
//! - **Axes** carry a decimal factor exponent, an offset and a name; values
//!   are formatted as fixed-point numbers ([`format_value`]).
//! - **Grid layout** picks ranges and gridline steps from a table of nice
//!   numbers ([`round_value`]) so labels never collide.
//! - **Rendering** goes through [`RenderTarget`], a small vector drawing
//!   interface; the on-screen path keeps a [`Surface`] between paints and
//!   releases it after an idle period.
//! - **Hit-testing** maps the pointer to a [`HotItem`], which drives the
//!   highlight and the [`Tooltip`].
//!
//! Text shaping is delegated to a [`mctrl_text::TextMeasurer`].

mod axis;
mod cache;
mod chart;
mod color;
mod config;
mod data;
mod error;
mod grid;
mod kind;
mod layout;
mod legend;
mod render;
mod request;
mod scale;
#[cfg(test)]
mod testing;
mod tooltip;

pub use axis::{Axis, AxisSelector, format_value, round_value};
pub use cache::ValueCache;
pub use chart::Chart;
pub use color::{color_hint, color_seq};
pub use config::{ChartConfig, ChartStyle};
pub use data::{ChartNotify, DataSet, DataSetSource};
pub use error::{ChartError, RenderError};
pub use grid::{AxisKind, GridAxis, GridLabel, GridLayout, Orientation};
pub use kind::{ChartKind, HotItem};
pub use layout::ChartLayout;
pub use render::{
    RenderTarget, Surface, SurfaceFactory, SurfaceService, TextAnchor, TextBaseline, TextRun,
};
pub use request::{
    ChartRequest, ChartResponse, INVALID_FACTOR_EXPONENT, TooltipHandle, raw_hot_item,
};
pub use scale::ScaleLinear;
pub use tooltip::{TOOLTIP_GAP, Tooltip, TooltipSource, TrackingTooltip};
