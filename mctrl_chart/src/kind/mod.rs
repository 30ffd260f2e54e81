// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart types: painting, hit-testing and tooltip text per type.

mod column;
mod line;
mod pie;
mod scatter;

use kurbo::{Point, Size};
use mctrl_text::{TextMeasurer, TextStyle};
use peniko::Color;

use crate::axis::{Axis, AxisSelector, format_wide};
use crate::cache::ValueCache;
use crate::color::color_hint;
use crate::config::ChartConfig;
use crate::data::{DataSet, data_color, data_label};
use crate::error::ChartError;
use crate::layout::ChartLayout;
use crate::render::RenderTarget;

/// The chart type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Pie chart; only the first value of each data set is used.
    #[default]
    Pie,
    /// Scatter chart; values are consumed as `(x, y)` pairs.
    Scatter,
    /// Line chart.
    Line,
    /// Line chart with data sets stacked on each other.
    StackedLine,
    /// Area chart.
    Area,
    /// Area chart with data sets stacked on each other.
    StackedArea,
    /// Vertical columns.
    Column,
    /// Vertical columns with data sets stacked on each other.
    StackedColumn,
    /// Horizontal bars.
    Bar,
    /// Horizontal bars with data sets stacked on each other.
    StackedBar,
}

impl ChartKind {
    /// All chart kinds, in style-number order.
    pub const ALL: [Self; 10] = [
        Self::Pie,
        Self::Scatter,
        Self::Line,
        Self::StackedLine,
        Self::Area,
        Self::StackedArea,
        Self::Column,
        Self::StackedColumn,
        Self::Bar,
        Self::StackedBar,
    ];

    /// Returns `true` for the stacked variants.
    pub fn is_stacked(self) -> bool {
        matches!(
            self,
            Self::StackedLine | Self::StackedArea | Self::StackedColumn | Self::StackedBar
        )
    }

    /// Returns `true` for the types that draw the primary axis vertically.
    pub fn is_swapped(self) -> bool {
        matches!(self, Self::Bar | Self::StackedBar)
    }

    /// Returns `true` for the types painted over a grid.
    pub fn has_grid(self) -> bool {
        self != Self::Pie
    }

    /// Short lowercase name, e.g. `"stacked-area"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pie => "pie",
            Self::Scatter => "scatter",
            Self::Line => "line",
            Self::StackedLine => "stacked-line",
            Self::Area => "area",
            Self::StackedArea => "stacked-area",
            Self::Column => "column",
            Self::StackedColumn => "stacked-column",
            Self::Bar => "bar",
            Self::StackedBar => "stacked-bar",
        }
    }

    pub(crate) fn strategy(self) -> &'static dyn ChartTypeStrategy {
        match self {
            Self::Pie => &pie::PieChart,
            Self::Scatter => &scatter::ScatterChart,
            Self::Line => &line::LINE,
            Self::StackedLine => &line::STACKED_LINE,
            Self::Area => &line::AREA,
            Self::StackedArea => &line::STACKED_AREA,
            Self::Column => &column::COLUMN,
            Self::StackedColumn => &column::STACKED_COLUMN,
            Self::Bar => &column::BAR,
            Self::StackedBar => &column::STACKED_BAR,
        }
    }
}

impl From<ChartKind> for u32 {
    fn from(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Pie => 0,
            ChartKind::Scatter => 1,
            ChartKind::Line => 2,
            ChartKind::StackedLine => 3,
            ChartKind::Area => 4,
            ChartKind::StackedArea => 5,
            ChartKind::Column => 6,
            ChartKind::StackedColumn => 7,
            ChartKind::Bar => 8,
            ChartKind::StackedBar => 9,
        }
    }
}

impl TryFrom<u32> for ChartKind {
    type Error = ChartError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        usize::try_from(raw)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(ChartError::InvalidChartKind(raw))
    }
}

/// The item under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HotItem {
    /// Data set index.
    pub set: usize,
    /// Value index within the data set, or `None` when the whole data set is
    /// highlighted (the pointer hovers its legend row).
    pub index: Option<usize>,
}

impl HotItem {
    /// A single value of a data set.
    pub fn value(set: usize, index: usize) -> Self {
        Self {
            set,
            index: Some(index),
        }
    }

    /// A whole data set.
    pub fn set(set: usize) -> Self {
        Self { set, index: None }
    }

    /// Returns `true` if the hot item covers value `index` of data set `set`.
    pub(crate) fn covers(self, set: usize, index: usize) -> bool {
        self.set == set && self.index.is_none_or(|i| i == index)
    }
}

/// Everything a chart type needs to paint or hit-test.
pub(crate) struct ChartView<'a, 'c> {
    pub(crate) data: &'a [DataSet],
    pub(crate) cache: &'a ValueCache<'c>,
    pub(crate) primary: &'a Axis,
    pub(crate) secondary: &'a Axis,
    pub(crate) hot: Option<HotItem>,
    pub(crate) layout: ChartLayout,
    pub(crate) measurer: &'a dyn TextMeasurer,
    pub(crate) config: &'a ChartConfig,
}

impl ChartView<'_, '_> {
    pub(crate) fn axis(&self, selector: AxisSelector) -> &Axis {
        match selector {
            AxisSelector::Secondary => self.secondary,
            AxisSelector::Primary | AxisSelector::Both => self.primary,
        }
    }

    pub(crate) fn format(&self, selector: AxisSelector, raw: i64) -> String {
        format_wide(self.axis(selector), raw, self.config.decimal_separator)
    }

    pub(crate) fn text_style(&self) -> &TextStyle {
        &self.config.text_style
    }

    pub(crate) fn text_width(&self, text: &str) -> f64 {
        self.measurer.measure(text, self.text_style()).advance_width
    }

    pub(crate) fn color(&self, set: usize) -> Color {
        data_color(self.data, set)
    }

    pub(crate) fn hint(&self, set: usize) -> Color {
        color_hint(self.color(set))
    }

    pub(crate) fn label(&self, set: usize) -> String {
        data_label(self.data, set)
    }

    /// The hot data set, if any.
    pub(crate) fn hot_set(&self) -> Option<usize> {
        self.hot.map(|h| h.set)
    }
}

/// Behavior that differs between chart types.
pub(crate) trait ChartTypeStrategy: Sync {
    /// Paints the chart body (grid and data, not the legend).
    fn paint(&self, view: &ChartView<'_, '_>, target: &mut dyn RenderTarget);

    /// Finds the item under `pt` in the chart body.
    fn hit_test(&self, view: &ChartView<'_, '_>, pt: Point) -> Option<HotItem>;

    /// Tooltip text for the hot value.
    fn tooltip_text(&self, view: &ChartView<'_, '_>, hot: HotItem) -> Option<String>;
}

/// Opacity of area and column fills that are not hot.
pub(crate) const FILL_ALPHA: f32 = 0.4;

/// Finds the vertex nearest to `pt` within the slop rectangle.
///
/// Only vertices whose horizontal position lies inside the slop window are
/// considered; among those the nearest one by squared distance below
/// `slop.width * slop.height` wins.
pub(crate) fn nearest_vertex(
    pt: Point,
    slop: Size,
    vertices: impl IntoIterator<Item = (HotItem, Point)>,
) -> Option<HotItem> {
    let mut best = None;
    let mut best_dist2 = slop.width * slop.height;
    for (item, vertex) in vertices {
        if (vertex.x - pt.x).abs() > slop.width {
            continue;
        }
        let dist2 = (vertex - pt).hypot2();
        if dist2 < best_dist2 {
            best = Some(item);
            best_dist2 = dist2;
        }
    }
    best
}

/// Secondary-axis text of a single value; shared by the line and column types.
pub(crate) fn value_tooltip(view: &ChartView<'_, '_>, hot: HotItem) -> Option<String> {
    let index = hot.index?;
    let value = view.cache.value(hot.set, index);
    Some(view.format(AxisSelector::Secondary, i64::from(value)))
}
