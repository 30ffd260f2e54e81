// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chart control.
//!
//! [`Chart`] owns the data sets and both axes, tracks the item under the
//! pointer, drives the tooltip and keeps a drawing surface between paints.
//! Every mutating operation validates its arguments first and leaves the
//! chart untouched when they are rejected; on success it recomputes the hot
//! item, refreshes the tooltip and marks the view dirty.

use core::fmt;
use std::time::Instant;

use kurbo::{Point, Rect, Size};
use mctrl_text::{FontMetrics, HeuristicTextMeasurer, MeasureCache, TextMeasurer, TextStyle};
use peniko::Color;

use crate::axis::{Axis, AxisSelector};
use crate::cache::ValueCache;
use crate::config::{ChartConfig, ChartStyle};
use crate::data::{ChartNotify, DataSet, DataSetSource};
use crate::error::{ChartError, RenderError, skip_failed};
use crate::grid::GridLayout;
use crate::kind::{ChartKind, ChartView, HotItem};
use crate::layout::ChartLayout;
use crate::legend;
use crate::render::{RenderTarget, Surface, SurfaceService, TextAnchor, TextRun};
use crate::tooltip::{Tooltip, TooltipSource, TrackingTooltip, bubble_origin};

const MEASURE_CACHE_CAPACITY: usize = 256;

/// Padding around the text of the built-in tooltip bubble.
const TOOLTIP_PADDING: f64 = 4.0;

enum TooltipSlot {
    None,
    Tracking(TrackingTooltip),
    External(Box<dyn Tooltip>),
}

impl TooltipSlot {
    fn get(&self) -> Option<&dyn Tooltip> {
        let tooltip: &dyn Tooltip = match self {
            Self::None => return None,
            Self::Tracking(t) => t,
            Self::External(t) => &**t,
        };
        Some(tooltip)
    }

    fn get_mut(&mut self) -> Option<&mut (dyn Tooltip + 'static)> {
        let tooltip: &mut (dyn Tooltip + 'static) = match self {
            Self::None => return None,
            Self::Tracking(t) => t,
            Self::External(t) => &mut **t,
        };
        Some(tooltip)
    }
}

/// A chart control.
pub struct Chart {
    data: Vec<DataSet>,
    primary: Axis,
    secondary: Axis,
    style: ChartStyle,
    config: ChartConfig,
    title: String,
    size: Size,
    enabled: bool,
    redraw: bool,

    hot: Option<HotItem>,
    pointer: Option<Point>,
    tooltip: TooltipSlot,
    tooltip_active: bool,

    notify: Option<Box<dyn ChartNotify>>,
    measurer: Box<dyn TextMeasurer>,

    service: SurfaceService,
    surface: Option<Box<dyn Surface>>,
    dirty: Option<Rect>,
    evict_at: Option<Instant>,
}

impl fmt::Debug for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chart")
            .field("data", &self.data)
            .field("primary", &self.primary)
            .field("secondary", &self.secondary)
            .field("style", &self.style)
            .field("title", &self.title)
            .field("size", &self.size)
            .field("hot", &self.hot)
            .field("has_surface", &self.surface.is_some())
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

fn notify_target(notify: &mut Option<Box<dyn ChartNotify>>) -> Option<&mut dyn ChartNotify> {
    match notify {
        Some(n) => Some(&mut **n),
        None => None,
    }
}

pub(crate) fn rejected(op: &'static str, err: ChartError) -> ChartError {
    tracing::warn!(%err, "{op}: rejected");
    err
}

fn try_string(text: &str) -> Result<String, ChartError> {
    let mut s = String::new();
    s.try_reserve_exact(text.len())
        .map_err(|_| ChartError::OutOfMemory)?;
    s.push_str(text);
    Ok(s)
}

/// Paints everything but the background.
fn paint_view(view: &ChartView<'_, '_>, kind: ChartKind, title: &str, target: &mut dyn RenderTarget) {
    legend::paint(view, target);

    if let Some(rect) = view.layout.title {
        let pos = Point::new(rect.center().x, rect.y0);
        let run = TextRun::new(title, pos, view.text_style(), view.config.text_color)
            .with_anchor(TextAnchor::Middle);
        skip_failed(target.draw_text(&run), "title");
    }

    kind.strategy().paint(view, target);
}

impl Chart {
    /// Creates an empty chart drawing through `service`.
    pub fn new(service: SurfaceService, style: ChartStyle) -> Self {
        Self::with_config(service, style, ChartConfig::default())
    }

    /// Creates an empty chart with explicit configuration.
    pub fn with_config(service: SurfaceService, style: ChartStyle, config: ChartConfig) -> Self {
        Self {
            data: Vec::new(),
            primary: Axis::default(),
            secondary: Axis::default(),
            style,
            config,
            title: String::new(),
            size: Size::ZERO,
            enabled: true,
            redraw: true,
            hot: None,
            pointer: None,
            tooltip: if style.tooltips {
                TooltipSlot::Tracking(TrackingTooltip::default())
            } else {
                TooltipSlot::None
            },
            tooltip_active: false,
            notify: None,
            measurer: Box::new(MeasureCache::new(
                HeuristicTextMeasurer,
                MEASURE_CACHE_CAPACITY,
            )),
            service,
            surface: None,
            dirty: None,
            evict_at: None,
        }
    }

    // --- data sets ---

    /// Number of data sets.
    pub fn data_set_count(&self) -> usize {
        self.data.len()
    }

    /// All data sets in order.
    pub fn data_sets(&self) -> &[DataSet] {
        &self.data
    }

    /// Removes every data set.
    pub fn delete_all_data_sets(&mut self) {
        self.data.clear();
        self.changed();
    }

    /// Inserts a data set before `index` and returns where it landed.
    ///
    /// An `index` past the end appends.
    pub fn insert_data_set(
        &mut self,
        index: usize,
        source: DataSetSource<'_>,
    ) -> Result<usize, ChartError> {
        const OP: &str = "insert_data_set";
        let count = source.count();
        if count == 0 {
            return Err(rejected(OP, ChartError::EmptyDataSet));
        }
        let index = index.min(self.data.len());

        let values = source
            .to_owned_values()
            .map_err(|_| self.out_of_memory(OP))?;
        if self.data.try_reserve(1).is_err() {
            return Err(self.out_of_memory(OP));
        }
        self.data.insert(index, DataSet::new(count, values));

        self.changed();
        Ok(index)
    }

    /// Removes the data set at `index`.
    pub fn delete_data_set(&mut self, index: usize) -> Result<(), ChartError> {
        self.check_index("delete_data_set", index)?;
        self.data.remove(index);
        self.changed();
        Ok(())
    }

    /// The data set at `index`.
    pub fn data_set(&self, index: usize) -> Result<&DataSet, ChartError> {
        self.check_index("data_set", index)?;
        Ok(&self.data[index])
    }

    /// Replaces the values of the data set at `index`.
    ///
    /// A direct data set receiving the same number of values is updated in
    /// place; otherwise a new buffer is allocated before the old one is
    /// released.
    pub fn set_data_set(
        &mut self,
        index: usize,
        source: DataSetSource<'_>,
    ) -> Result<(), ChartError> {
        const OP: &str = "set_data_set";
        self.check_index(OP, index)?;
        if source.count() == 0 {
            return Err(rejected(OP, ChartError::EmptyDataSet));
        }

        if let (DataSetSource::Values(new), Some(old)) =
            (source, self.data[index].values.as_mut())
        {
            if old.len() == new.len() {
                old.copy_from_slice(new);
                self.changed();
                return Ok(());
            }
        }

        let values = source
            .to_owned_values()
            .map_err(|_| self.out_of_memory(OP))?;
        let data = &mut self.data[index];
        data.count = source.count();
        data.values = values;

        self.changed();
        Ok(())
    }

    /// Explicit color of the data set at `index`; `None` means automatic.
    pub fn data_set_color(&self, index: usize) -> Result<Option<Color>, ChartError> {
        Ok(self.data_set(index)?.color)
    }

    /// Sets the color of the data set at `index`; `None` restores the
    /// automatic color.
    pub fn set_data_set_color(
        &mut self,
        index: usize,
        color: Option<Color>,
    ) -> Result<(), ChartError> {
        self.check_index("set_data_set_color", index)?;
        self.data[index].color = color;
        self.invalidate();
        Ok(())
    }

    /// Legend text of the data set at `index`.
    pub fn data_set_legend(&self, index: usize) -> Result<Option<&str>, ChartError> {
        Ok(self.data_set(index)?.name())
    }

    /// Sets the legend text of the data set at `index`.
    pub fn set_data_set_legend(
        &mut self,
        index: usize,
        text: Option<&str>,
    ) -> Result<(), ChartError> {
        const OP: &str = "set_data_set_legend";
        self.check_index(OP, index)?;
        let name = text
            .map(try_string)
            .transpose()
            .map_err(|_| self.out_of_memory(OP))?;
        self.data[index].name = name;
        self.changed();
        Ok(())
    }

    /// Installs the receiver of chart notifications and returns the previous
    /// one.
    pub fn set_notify(
        &mut self,
        notify: Option<Box<dyn ChartNotify>>,
    ) -> Option<Box<dyn ChartNotify>> {
        let old = core::mem::replace(&mut self.notify, notify);
        self.changed();
        old
    }

    // --- axes ---

    /// Factor exponent of one axis.
    pub fn factor_exponent(&self, axis: AxisSelector) -> Result<i8, ChartError> {
        Ok(self.axis("factor_exponent", axis)?.factor_exp)
    }

    /// Sets the factor exponent of one or both axes.
    pub fn set_factor_exponent(&mut self, axis: AxisSelector, exp: i32) -> Result<(), ChartError> {
        let exp = Axis::check_factor_exp(exp).map_err(|err| rejected("set_factor_exponent", err))?;
        match axis {
            AxisSelector::Both => {
                self.primary.factor_exp = exp;
                self.secondary.factor_exp = exp;
            }
            AxisSelector::Primary => self.primary.factor_exp = exp,
            AxisSelector::Secondary => self.secondary.factor_exp = exp,
        }
        self.changed();
        Ok(())
    }

    /// Offset of one axis.
    pub fn axis_offset(&self, axis: AxisSelector) -> Result<i32, ChartError> {
        Ok(self.axis("axis_offset", axis)?.offset)
    }

    /// Sets the offset added to values of one axis before they are shown.
    pub fn set_axis_offset(&mut self, axis: AxisSelector, offset: i32) -> Result<(), ChartError> {
        self.axis_mut("set_axis_offset", axis)?.offset = offset;
        self.changed();
        Ok(())
    }

    /// Name of one axis.
    pub fn axis_legend(&self, axis: AxisSelector) -> Result<Option<&str>, ChartError> {
        Ok(self.axis("axis_legend", axis)?.name.as_deref())
    }

    /// Sets the name of one axis.
    pub fn set_axis_legend(
        &mut self,
        axis: AxisSelector,
        text: Option<&str>,
    ) -> Result<(), ChartError> {
        const OP: &str = "set_axis_legend";
        self.axis(OP, axis)?;
        let name = text
            .map(try_string)
            .transpose()
            .map_err(|_| self.out_of_memory(OP))?;
        self.axis_mut(OP, axis)?.name = name;
        self.changed();
        Ok(())
    }

    // --- appearance ---

    /// Current style.
    pub fn style(&self) -> ChartStyle {
        self.style
    }

    /// Switches the chart type and creates or destroys the built-in tooltip.
    pub fn set_style(&mut self, style: ChartStyle) {
        self.style = style;
        match (&self.tooltip, style.tooltips) {
            (TooltipSlot::None, true) => {
                self.tooltip = TooltipSlot::Tracking(TrackingTooltip::default());
            }
            (TooltipSlot::Tracking(_), false) => {
                self.tooltip = TooltipSlot::None;
                self.tooltip_active = false;
            }
            _ => {}
        }
        self.changed();
    }

    /// Chart configuration.
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Replaces the chart configuration.
    pub fn set_config(&mut self, config: ChartConfig) {
        self.config = config;
        self.changed();
    }

    /// Title text; empty when the chart has no title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Sets the title. A non-empty title reserves a strip above the body.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.changed();
    }

    /// Font of all chart text.
    pub fn text_style(&self) -> &TextStyle {
        &self.config.text_style
    }

    /// Sets the font of all chart text.
    pub fn set_text_style(&mut self, style: TextStyle) {
        self.config.text_style = style;
        self.changed();
    }

    /// Replaces the text measurer.
    pub fn set_measurer(&mut self, measurer: Box<dyn TextMeasurer>) {
        self.measurer = measurer;
        self.changed();
    }

    /// Returns `true` unless the chart is disabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables the chart. A disabled chart has no hot item.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.changed();
    }

    /// Returns `true` unless redrawing is suppressed.
    pub fn redraw_enabled(&self) -> bool {
        self.redraw
    }

    /// Suppresses or resumes redrawing. Resuming invalidates the whole view.
    pub fn set_redraw(&mut self, redraw: bool) {
        self.redraw = redraw;
        self.invalidate();
    }

    // --- tooltip ---

    /// The current tooltip, built-in or external.
    pub fn tooltip(&self) -> Option<&dyn Tooltip> {
        self.tooltip.get()
    }

    /// Which tooltip the chart currently drives.
    pub fn tooltip_source(&self) -> Option<TooltipSource> {
        match self.tooltip {
            TooltipSlot::None => None,
            TooltipSlot::Tracking(_) => Some(TooltipSource::Tracking),
            TooltipSlot::External(_) => Some(TooltipSource::External),
        }
    }

    /// The built-in tooltip, if the chart uses it.
    pub fn tracking_tooltip(&self) -> Option<&TrackingTooltip> {
        match &self.tooltip {
            TooltipSlot::Tracking(t) => Some(t),
            _ => None,
        }
    }

    /// Replaces the tooltip and returns the previous external one.
    ///
    /// Passing `None` falls back to the built-in tooltip when the style asks
    /// for one.
    pub fn set_tooltip(&mut self, tooltip: Option<Box<dyn Tooltip>>) -> Option<Box<dyn Tooltip>> {
        if self.tooltip_active {
            if let Some(t) = self.tooltip.get_mut() {
                t.activate(false);
            }
            self.tooltip_active = false;
        }
        let next = match tooltip {
            Some(t) => TooltipSlot::External(t),
            None if self.style.tooltips => TooltipSlot::Tracking(TrackingTooltip::default()),
            None => TooltipSlot::None,
        };
        let previous = match core::mem::replace(&mut self.tooltip, next) {
            TooltipSlot::External(t) => Some(t),
            _ => None,
        };
        self.update_tooltip();
        previous
    }

    // --- pointer ---

    /// The item under the pointer.
    pub fn hot_item(&self) -> Option<HotItem> {
        self.hot
    }

    /// Finds the item at `pt`: a whole data set over the legend, a single
    /// value over the body.
    pub fn hit_test(&mut self, pt: Point) -> Option<HotItem> {
        let kind = self.style.kind;
        self.with_view(|view| {
            if view.layout.legend.contains(pt) {
                legend::hit_test(view, pt)
            } else if view.layout.body.contains(pt) {
                kind.strategy().hit_test(view, pt)
            } else {
                None
            }
        })
    }

    /// Tracks the pointer.
    pub fn pointer_move(&mut self, pt: Point) {
        self.pointer = Some(pt);
        if !self.enabled {
            return;
        }

        let hot = self.hit_test(pt);
        if hot != self.hot {
            tracing::trace!(?hot, "hot item changed");
            self.hot = hot;
            self.update_tooltip();
            self.invalidate();
        }
        if self.tooltip_active {
            self.move_tooltip(pt);
        }
    }

    /// The pointer left the view.
    pub fn pointer_leave(&mut self) {
        self.pointer = None;
        if !self.enabled {
            return;
        }
        if self.hot.is_some() {
            tracing::trace!("hot item cleared");
            self.hot = None;
            self.update_tooltip();
            self.invalidate();
        }
    }

    // --- painting ---

    /// View size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Resizes the view. The cached surface is recreated on the next paint.
    pub fn resize(&mut self, size: Size) {
        if size == self.size {
            return;
        }
        self.size = size;
        self.drop_surface("resize");
        self.changed();
    }

    /// Drops the cached surface after a display mode change.
    pub fn display_changed(&mut self) {
        self.drop_surface("display change");
        self.invalidate();
    }

    /// Area that needs repainting, if any.
    pub fn dirty_rect(&self) -> Option<Rect> {
        self.dirty
    }

    /// Marks `rect` as needing a repaint.
    pub fn invalidate_rect(&mut self, rect: Rect) {
        if !self.redraw {
            return;
        }
        self.dirty = Some(self.dirty.map_or(rect, |d| d.union(rect)));
    }

    /// The grid the current chart type is painted over; `None` for pie
    /// charts.
    pub fn grid_layout(&mut self) -> Option<GridLayout> {
        let kind = self.style.kind;
        if !kind.has_grid() {
            return None;
        }
        Some(self.with_view(|view| GridLayout::compute(view, kind)))
    }

    /// Returns `true` while a drawing surface is cached.
    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// When [`Chart::on_timer`] should be called next.
    pub fn next_timer_deadline(&self) -> Option<Instant> {
        self.evict_at
    }

    /// Releases the cached surface once it has been idle long enough.
    ///
    /// Returns `true` if a surface was released.
    pub fn on_timer(&mut self, now: Instant) -> bool {
        match self.evict_at {
            Some(deadline) if now >= deadline => {
                self.evict_at = None;
                let evicted = self.surface.take().is_some();
                if evicted {
                    tracing::debug!("idle drawing surface released");
                }
                evicted
            }
            _ => false,
        }
    }

    /// Paints the view onto the cached surface, creating it if needed.
    ///
    /// Draw failures are logged and skipped. While redrawing is suppressed
    /// this only clears the dirty area.
    pub fn paint(&mut self, now: Instant) {
        if !self.redraw {
            self.dirty = None;
            return;
        }

        let mut surface = match self.surface.take() {
            Some(surface) => surface,
            None => match self.service.create_surface(self.size) {
                Ok(surface) => {
                    tracing::debug!(size = ?self.size, "drawing surface created");
                    surface
                }
                Err(err) => {
                    tracing::warn!(%err, "cannot create drawing surface");
                    return;
                }
            },
        };

        let kind = self.style.kind;
        let title = self.title.clone();
        let view_rect = self.view_rect();

        surface.begin_draw();
        skip_failed(surface.clear(view_rect, self.config.background), "background");
        self.with_view(|view| {
            let target: &mut dyn RenderTarget = surface.as_mut();
            paint_view(view, kind, &title, target);
        });

        match surface.end_draw() {
            Err(RenderError::SurfaceLost) => {
                tracing::debug!("drawing surface lost");
                self.evict_at = None;
                self.dirty = Some(view_rect);
            }
            result => {
                skip_failed(result, "present");
                self.surface = Some(surface);
                self.evict_at = Some(now + self.config.idle_timeout);
                self.dirty = None;
            }
        }
    }

    /// Paints the whole view into `target`, bypassing the cached surface.
    pub fn print(&mut self, target: &mut dyn RenderTarget) {
        let kind = self.style.kind;
        let title = self.title.clone();
        skip_failed(
            target.fill_rect(self.view_rect(), self.config.background),
            "background",
        );
        self.with_view(|view| paint_view(view, kind, &title, target));
    }

    // --- internals ---

    fn view_rect(&self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.size)
    }

    /// Title, body and legend rectangles for the current size and font.
    pub fn layout(&self) -> ChartLayout {
        let font = FontMetrics::measure(&*self.measurer, &self.config.text_style);
        ChartLayout::arrange(self.size, font, !self.title.is_empty())
    }

    /// Materializes the values and runs `f` on a view of the chart.
    fn with_view<R>(&mut self, f: impl FnOnce(&ChartView<'_, '_>) -> R) -> R {
        let layout = self.layout();
        let cache = ValueCache::materialize(&self.data, notify_target(&mut self.notify));
        let view = ChartView {
            data: &self.data,
            cache: &cache,
            primary: &self.primary,
            secondary: &self.secondary,
            hot: self.hot,
            layout,
            measurer: &*self.measurer,
            config: &self.config,
        };
        f(&view)
    }

    fn check_index(&self, op: &'static str, index: usize) -> Result<(), ChartError> {
        if index < self.data.len() {
            return Ok(());
        }
        Err(rejected(
            op,
            ChartError::InvalidDataSetIndex {
                index: isize::try_from(index).unwrap_or(isize::MAX),
                count: self.data.len(),
            },
        ))
    }

    fn axis(&self, op: &'static str, axis: AxisSelector) -> Result<&Axis, ChartError> {
        match axis {
            AxisSelector::Primary => Ok(&self.primary),
            AxisSelector::Secondary => Ok(&self.secondary),
            AxisSelector::Both => Err(rejected(op, ChartError::InvalidAxis(axis.into()))),
        }
    }

    fn axis_mut(&mut self, op: &'static str, axis: AxisSelector) -> Result<&mut Axis, ChartError> {
        match axis {
            AxisSelector::Primary => Ok(&mut self.primary),
            AxisSelector::Secondary => Ok(&mut self.secondary),
            AxisSelector::Both => Err(rejected(op, ChartError::InvalidAxis(axis.into()))),
        }
    }

    fn out_of_memory(&mut self, op: &'static str) -> ChartError {
        tracing::warn!("{op}: out of memory");
        if let Some(notify) = self.notify.as_mut() {
            notify.out_of_memory();
        }
        ChartError::OutOfMemory
    }

    fn drop_surface(&mut self, why: &'static str) {
        self.evict_at = None;
        if self.surface.take().is_some() {
            tracing::debug!("drawing surface dropped on {why}");
        }
    }

    fn invalidate(&mut self) {
        self.invalidate_rect(self.view_rect());
    }

    /// Common tail of every successful mutation.
    fn changed(&mut self) {
        self.setup_hot();
        self.invalidate();
    }

    fn setup_hot(&mut self) {
        self.hot = match self.pointer {
            Some(pt) if self.enabled => self.hit_test(pt),
            _ => None,
        };
        self.update_tooltip();
    }

    fn update_tooltip(&mut self) {
        if matches!(self.tooltip, TooltipSlot::None) {
            return;
        }

        let kind = self.style.kind;
        let text = match self.hot {
            Some(hot) => self.with_view(|view| {
                let text = kind.strategy().tooltip_text(view, hot)?;
                let m = view.measurer.measure(&text, view.text_style());
                let bubble = Size::new(
                    m.advance_width + 2.0 * TOOLTIP_PADDING,
                    m.line_height() + 2.0 * TOOLTIP_PADDING,
                );
                Some((text, bubble))
            }),
            None => None,
        };

        match text.filter(|(text, _)| !text.is_empty()) {
            Some((text, bubble)) => {
                if let TooltipSlot::Tracking(t) = &mut self.tooltip {
                    t.set_bubble(bubble);
                }
                if let Some(t) = self.tooltip.get_mut() {
                    t.set_text(&text);
                    if !self.tooltip_active {
                        t.activate(true);
                    }
                }
                self.tooltip_active = true;
                if let Some(pt) = self.pointer {
                    self.move_tooltip(pt);
                }
            }
            None => {
                if self.tooltip_active {
                    if let Some(t) = self.tooltip.get_mut() {
                        t.activate(false);
                    }
                }
                self.tooltip_active = false;
            }
        }
    }

    fn move_tooltip(&mut self, pt: Point) {
        if let Some(t) = self.tooltip.get_mut() {
            let pos = bubble_origin(pt, t.bubble_size());
            t.set_position(pos);
        }
    }
}
