// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid layout for the types painted over a value grid.
//!
//! The layout pass classifies both axes, scans the data for their ranges,
//! rounds continuous ranges to nice numbers, reserves room for labels and
//! axis names, and chooses a gridline step so labels do not collide. The
//! resulting core rectangle is finally adjusted so that one gridline step is
//! a whole number of pixels, which keeps gridlines crisp.

use kurbo::{Point, Rect};

use crate::axis::{AxisSelector, round_value_i64};
use crate::cache::ValueCache;
use crate::error::skip_failed;
use crate::kind::{ChartKind, ChartView};
use crate::render::{RenderTarget, TextAnchor, TextBaseline, TextRun};
use crate::scale::ScaleLinear;

/// How an axis maps its values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisKind {
    /// Values are data values; the range always includes zero.
    Continuous,
    /// Values are indices `0..=n-1`, placed on gridlines.
    Discrete,
    /// Values are indices, each owning a slot `[i, i + 1)`.
    Category,
}

/// Direction an axis runs on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Left to right.
    Horizontal,
    /// Vertical; upwards for value axes, top-down for the bar index axis.
    Vertical,
}

/// One laid-out grid axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridAxis {
    /// Which chart axis supplies the formatting.
    pub selector: AxisSelector,
    /// Value classification.
    pub kind: AxisKind,
    /// Screen direction.
    pub orientation: Orientation,
    /// Lower bound in raw values.
    pub min: i64,
    /// Upper bound in raw values.
    pub max: i64,
    /// First gridline candidate: the largest multiple of `grid_delta` not
    /// above `min`, in displayed (offset-adjusted) space, converted back.
    pub grid_base: i64,
    /// Distance between gridlines.
    pub grid_delta: i64,
    /// Raw value to pixel mapping.
    pub scale: ScaleLinear,
}

impl GridAxis {
    /// Maps a raw value to a pixel coordinate.
    pub fn map(&self, value: f64) -> f64 {
        self.scale.map(value)
    }

    /// Maps a pixel coordinate back to a raw value.
    pub fn unmap(&self, px: f64) -> f64 {
        self.scale.invert(px)
    }

    /// Values with a gridline (and a label).
    pub fn ticks(&self) -> impl Iterator<Item = i64> + '_ {
        let first = if self.grid_base < self.min {
            self.grid_base + self.grid_delta
        } else {
            self.grid_base
        };
        let end = match self.kind {
            AxisKind::Category => self.max - 1,
            AxisKind::Continuous | AxisKind::Discrete => self.max,
        };
        (0..)
            .map(move |k| first + k * self.grid_delta)
            .take_while(move |&v| v <= end)
    }

    /// Where the label of tick `value` is centered along the axis.
    pub fn label_position(&self, value: i64) -> f64 {
        match self.kind {
            AxisKind::Category => self.map(value as f64 + 0.5),
            AxisKind::Continuous | AxisKind::Discrete => self.map(value as f64),
        }
    }

    /// Value range covered by the axis.
    pub fn span(&self) -> f64 {
        (self.max - self.min) as f64
    }
}

/// A label placed by the layout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLabel {
    /// Formatted text.
    pub text: String,
    /// Anchor point.
    pub pos: Point,
    /// Horizontal alignment.
    pub anchor: TextAnchor,
    /// Vertical alignment.
    pub baseline: TextBaseline,
    /// Rotation in degrees.
    pub angle: f64,
}

/// Result of the grid layout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLayout {
    /// The horizontal axis.
    pub horizontal: GridAxis,
    /// The vertical axis.
    pub vertical: GridAxis,
    /// The data area, snapped to whole-pixel gridline steps.
    pub core: Rect,
    /// `true` when the primary axis is vertical (bar charts).
    pub swapped: bool,
    /// Tick labels of both axes.
    pub labels: Vec<GridLabel>,
    /// Axis names.
    pub names: Vec<GridLabel>,
}

#[derive(Clone, Copy, Debug)]
struct Range {
    kind: AxisKind,
    min: i64,
    max: i64,
}

impl Range {
    fn span(&self) -> f64 {
        (self.max - self.min) as f64
    }
}

impl GridLayout {
    /// Lays out the grid of `kind` over the chart body.
    pub(crate) fn compute(view: &ChartView<'_, '_>, kind: ChartKind) -> Self {
        let font = view.layout.font;
        let (cx, cy) = (font.char_width, font.line_height);
        let swapped = kind.is_swapped();

        let (primary, secondary) = resolve_ranges(view, kind);
        let (h_sel, h, v_sel, v) = if swapped {
            (AxisSelector::Secondary, secondary, AxisSelector::Primary, primary)
        } else {
            (AxisSelector::Primary, primary, AxisSelector::Secondary, secondary)
        };

        let label_extent = |sel: AxisSelector, r: Range, min_chars: f64| {
            let last = if r.kind == AxisKind::Category {
                (r.max - 1).max(r.min)
            } else {
                r.max
            };
            [r.min, last]
                .into_iter()
                .map(|value| view.text_width(&view.format(sel, value)) + cx)
                .fold(min_chars * cx, f64::max)
        };
        let label_h_w = label_extent(h_sel, h, 3.0);
        let label_h_h = ((3.0 * cy + 1.0) / 2.0).floor();
        let label_v_w = label_extent(v_sel, v, 6.0) + ((cx + 1.0) / 2.0).floor();
        let label_v_h = cy;

        let has_name = |sel: AxisSelector| {
            view.axis(sel)
                .name
                .as_deref()
                .is_some_and(|n| !n.is_empty())
        };
        let h_name = if has_name(h_sel) { cy } else { 0.0 };
        let v_name = if has_name(v_sel) { cy } else { 0.0 };

        let body = view.layout.body;
        let mut core = Rect::new(
            body.x0 + v_name + label_v_w,
            body.y0 + ((label_v_h + 1.0) / 2.0).floor(),
            body.x1 - (label_h_w / 2.0).floor(),
            body.y1 - label_h_h - h_name,
        );
        core.x1 = core.x1.max(core.x0 + 1.0);
        core.y1 = core.y1.max(core.y0 + 1.0);

        let h_span = h.span();
        let v_span = v.span();
        let h_delta = grid_delta(h_span, label_h_w, core.width());
        let v_delta = grid_delta(v_span, 1.5 * label_v_h, core.height());

        snap_horizontal(&mut core, h_span, h_delta);
        snap_vertical(&mut core, v_span, v_delta);

        let horizontal = GridAxis {
            selector: h_sel,
            kind: h.kind,
            orientation: Orientation::Horizontal,
            min: h.min,
            max: h.max,
            grid_base: grid_base(view, h_sel, h.min, h_delta),
            grid_delta: h_delta,
            scale: ScaleLinear::new((h.min as f64, h.max as f64), (core.x0, core.x1)),
        };
        // The bar index axis runs top-down so that index 0 is the top row.
        let v_range = if swapped {
            (core.y0, core.y1)
        } else {
            (core.y1, core.y0)
        };
        let vertical = GridAxis {
            selector: v_sel,
            kind: v.kind,
            orientation: Orientation::Vertical,
            min: v.min,
            max: v.max,
            grid_base: grid_base(view, v_sel, v.min, v_delta),
            grid_delta: v_delta,
            scale: ScaleLinear::new((v.min as f64, v.max as f64), v_range),
        };

        let mut labels = Vec::new();
        for value in horizontal.ticks() {
            labels.push(GridLabel {
                text: view.format(h_sel, value),
                pos: Point::new(
                    horizontal.label_position(value),
                    core.y1 + ((cy + 1.0) / 2.0).floor(),
                ),
                anchor: TextAnchor::Middle,
                baseline: TextBaseline::Hanging,
                angle: 0.0,
            });
        }
        for value in vertical.ticks() {
            labels.push(GridLabel {
                text: view.format(v_sel, value),
                pos: Point::new(
                    core.x0 - ((cx + 1.0) / 2.0).floor(),
                    vertical.label_position(value),
                ),
                anchor: TextAnchor::End,
                baseline: TextBaseline::Middle,
                angle: 0.0,
            });
        }

        let mut names = Vec::new();
        if let Some(name) = view.axis(h_sel).name.as_deref().filter(|n| !n.is_empty()) {
            names.push(GridLabel {
                text: name.to_owned(),
                pos: Point::new(core.center().x, body.y1 - cy),
                anchor: TextAnchor::Middle,
                baseline: TextBaseline::Hanging,
                angle: 0.0,
            });
        }
        if let Some(name) = view.axis(v_sel).name.as_deref().filter(|n| !n.is_empty()) {
            names.push(GridLabel {
                text: name.to_owned(),
                pos: Point::new(body.x0, core.center().y),
                anchor: TextAnchor::Middle,
                baseline: TextBaseline::Hanging,
                angle: -90.0,
            });
        }

        Self {
            horizontal,
            vertical,
            core,
            swapped,
            labels,
            names,
        }
    }

    /// The axis displaying primary-axis values.
    pub fn primary(&self) -> &GridAxis {
        if self.swapped {
            &self.vertical
        } else {
            &self.horizontal
        }
    }

    /// The axis displaying secondary-axis values.
    pub fn secondary(&self) -> &GridAxis {
        if self.swapped {
            &self.horizontal
        } else {
            &self.vertical
        }
    }

    /// Maps a `(primary, secondary)` value pair to a pixel position.
    pub fn point(&self, primary: f64, secondary: f64) -> Point {
        if self.swapped {
            Point::new(self.horizontal.map(secondary), self.vertical.map(primary))
        } else {
            Point::new(self.horizontal.map(primary), self.vertical.map(secondary))
        }
    }

    /// Maps a pixel position back to its primary-axis value.
    pub fn unmap_primary(&self, pt: Point) -> f64 {
        if self.swapped {
            self.vertical.unmap(pt.y)
        } else {
            self.horizontal.unmap(pt.x)
        }
    }

    /// Maps a pixel position back to its secondary-axis value.
    pub fn unmap_secondary(&self, pt: Point) -> f64 {
        if self.swapped {
            self.horizontal.unmap(pt.x)
        } else {
            self.vertical.unmap(pt.y)
        }
    }

    /// Paints gridlines, zero lines, labels and axis names.
    pub(crate) fn paint(&self, view: &ChartView<'_, '_>, target: &mut dyn RenderTarget) {
        let config = view.config;
        let core = self.core;

        for value in self.horizontal.ticks() {
            if value == 0 || self.horizontal.kind == AxisKind::Category {
                continue;
            }
            let x = self.horizontal.map(value as f64);
            skip_failed(
                target.draw_line(
                    Point::new(x, core.y0),
                    Point::new(x, core.y1),
                    1.0,
                    config.gridline_color,
                ),
                "gridline",
            );
        }
        for value in self.vertical.ticks() {
            if value == 0 || self.vertical.kind == AxisKind::Category {
                continue;
            }
            let y = self.vertical.map(value as f64);
            skip_failed(
                target.draw_line(
                    Point::new(core.x0, y),
                    Point::new(core.x1, y),
                    1.0,
                    config.gridline_color,
                ),
                "gridline",
            );
        }

        let x = self.horizontal.map(0.0);
        skip_failed(
            target.draw_line(
                Point::new(x, core.y0),
                Point::new(x, core.y1),
                1.0,
                config.axis_color,
            ),
            "axis line",
        );
        let y = self.vertical.map(0.0);
        skip_failed(
            target.draw_line(
                Point::new(core.x0, y),
                Point::new(core.x1, y),
                1.0,
                config.axis_color,
            ),
            "axis line",
        );

        let style = view.text_style();
        for label in self.labels.iter().chain(&self.names) {
            let run = TextRun::new(&label.text, label.pos, style, config.text_color)
                .with_anchor(label.anchor)
                .with_baseline(label.baseline)
                .with_angle(label.angle);
            skip_failed(target.draw_text(&run), "axis label");
        }
    }
}

/// Primary and secondary ranges, nice-rounded where continuous.
fn resolve_ranges(view: &ChartView<'_, '_>, kind: ChartKind) -> (Range, Range) {
    let cache = view.cache;
    let count = i64::try_from(cache.max_count()).unwrap_or(i64::MAX);

    if kind == ChartKind::Scatter {
        let (xs, ys) = scan_pairs(cache);
        return (
            continuous(view, AxisSelector::Primary, xs),
            continuous(view, AxisSelector::Secondary, ys),
        );
    }

    let index = match kind {
        ChartKind::Column | ChartKind::StackedColumn | ChartKind::Bar | ChartKind::StackedBar => {
            Range {
                kind: AxisKind::Category,
                min: 0,
                max: count.max(1),
            }
        }
        _ => Range {
            kind: AxisKind::Discrete,
            min: 0,
            max: (count - 1).max(1),
        },
    };
    let values = scan_values(cache, kind.is_stacked());
    (index, continuous(view, AxisSelector::Secondary, values))
}

/// Extremes of the `(x, y)` pairs; a trailing odd value is ignored.
fn scan_pairs(cache: &ValueCache<'_>) -> (Option<(i64, i64)>, Option<(i64, i64)>) {
    let mut xs = None;
    let mut ys = None;
    for set in 0..cache.len() {
        for i in (0..cache.count(set) / 2).map(|p| 2 * p) {
            extend(&mut xs, i64::from(cache.value(set, i)));
            extend(&mut ys, i64::from(cache.value(set, i + 1)));
        }
    }
    (xs, ys)
}

fn scan_values(cache: &ValueCache<'_>, stacked: bool) -> Option<(i64, i64)> {
    let mut range = None;
    for set in 0..cache.len() {
        if stacked {
            for i in 0..cache.max_count() {
                extend(&mut range, cache.stacked(set, i));
            }
        } else {
            for i in 0..cache.count(set) {
                extend(&mut range, i64::from(cache.value(set, i)));
            }
        }
    }
    range
}

fn extend(range: &mut Option<(i64, i64)>, v: i64) {
    *range = Some(match *range {
        Some((lo, hi)) => (lo.min(v), hi.max(v)),
        None => (v, v),
    });
}

/// Widens to include zero, avoids a degenerate range and rounds the displayed
/// bounds to nice numbers.
fn continuous(view: &ChartView<'_, '_>, selector: AxisSelector, scanned: Option<(i64, i64)>) -> Range {
    let (lo, hi) = scanned.unwrap_or((0, 0));
    let (lo, mut hi) = (lo.min(0), hi.max(0));
    if lo == hi {
        hi += 1;
    }

    let axis = view.axis(selector);
    let offset = i64::from(axis.offset);
    let min = round_value_i64(axis.displayed(lo), false) - offset;
    let mut max = round_value_i64(axis.displayed(hi), true) - offset;
    if max <= min {
        max = min + 1;
    }
    Range {
        kind: AxisKind::Continuous,
        min,
        max,
    }
}

/// Nice gridline step so that labels of `label_extent` pixels fit.
fn grid_delta(span: f64, label_extent: f64, px_extent: f64) -> i64 {
    let px_extent = px_extent.max(1.0);
    #[allow(clippy::cast_possible_truncation, reason = "saturating float to int cast")]
    let raw = (span * label_extent / px_extent).ceil() as i64;
    round_value_i64(raw, true).max(1)
}

/// Largest multiple of `delta` not above `min`, in displayed space.
fn grid_base(view: &ChartView<'_, '_>, selector: AxisSelector, min: i64, delta: i64) -> i64 {
    let axis = view.axis(selector);
    let displayed = axis.displayed(min);
    displayed.div_euclid(delta) * delta - i64::from(axis.offset)
}

/// Pixels per step, floored; `None` when a step is narrower than a pixel.
fn snapped_extent(extent: f64, span: f64, delta: i64) -> Option<f64> {
    let pps_old = extent * delta as f64 / span;
    let pps_new = pps_old.floor();
    (pps_new >= 1.0).then(|| extent / pps_old * pps_new)
}

fn snap_horizontal(core: &mut Rect, span: f64, delta: i64) {
    if let Some(width) = snapped_extent(core.width(), span, delta) {
        let x0 = (core.x0 + (core.width() - width) / 2.0).round();
        core.x0 = x0;
        core.x1 = x0 + width;
    }
}

fn snap_vertical(core: &mut Rect, span: f64, delta: i64) {
    if let Some(height) = snapped_extent(core.height(), span, delta) {
        let y1 = (core.y0 + (core.height() - height) / 2.0 + height).round();
        core.y0 = y1 - height;
        core.y1 = y1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    #[test]
    fn scatter_ranges_include_zero_and_are_nice() {
        let fx = Fixture::new(&[&[3, 7, 11, 42, 5, 9]]);
        fx.with_view(None, |view| {
            let grid = GridLayout::compute(view, ChartKind::Scatter);
            assert_eq!((grid.horizontal.min, grid.horizontal.max), (0, 12));
            assert_eq!((grid.vertical.min, grid.vertical.max), (0, 50));
            assert_eq!(grid.horizontal.kind, AxisKind::Continuous);
        });
    }

    #[test]
    fn negative_values_extend_below_zero() {
        let fx = Fixture::new(&[&[-13, 4, 20]]);
        fx.with_view(None, |view| {
            let grid = GridLayout::compute(view, ChartKind::Line);
            assert_eq!((grid.vertical.min, grid.vertical.max), (-15, 20));
            assert_eq!(grid.horizontal.kind, AxisKind::Discrete);
            assert_eq!((grid.horizontal.min, grid.horizontal.max), (0, 2));
        });
    }

    #[test]
    fn stacked_types_scan_sums() {
        let fx = Fixture::new(&[&[10, 20], &[30, 70]]);
        fx.with_view(None, |view| {
            let grid = GridLayout::compute(view, ChartKind::StackedColumn);
            assert_eq!(grid.vertical.max, 100);
            assert_eq!(grid.horizontal.kind, AxisKind::Category);
            assert_eq!((grid.horizontal.min, grid.horizontal.max), (0, 2));
        });
    }

    #[test]
    fn map_unmap_round_trip() {
        let fx = Fixture::new(&[&[-40, 130, 7, 55], &[12, -3, 99, 0]]);
        for kind in [ChartKind::Scatter, ChartKind::Area, ChartKind::Bar] {
            fx.with_view(None, |view| {
                let grid = GridLayout::compute(view, kind);
                for p in [-40.0, -3.5, 0.0, 1.0, 2.0, 99.0, 130.0] {
                    for s in [-40.0, 0.0, 12.25, 130.0] {
                        let pt = grid.point(p, s);
                        assert!((grid.unmap_primary(pt) - p).abs() < 1e-6, "{kind:?} primary {p}");
                        assert!(
                            (grid.unmap_secondary(pt) - s).abs() < 1e-6,
                            "{kind:?} secondary {s}"
                        );
                    }
                }
            });
        }
    }

    #[test]
    fn gridline_steps_are_whole_pixels() {
        let fx = Fixture::new(&[&[1, 17, 33, 250, 8]]);
        for kind in [ChartKind::Scatter, ChartKind::Line, ChartKind::StackedBar] {
            fx.with_view(None, |view| {
                let grid = GridLayout::compute(view, kind);
                for axis in [&grid.horizontal, &grid.vertical] {
                    let step = axis.scale.extent_of(axis.grid_delta as f64);
                    assert!((step - step.round()).abs() < 1e-6, "{kind:?}: step {step}");
                    assert!(axis.grid_delta >= 1, "{kind:?}: delta");
                }
                assert_eq!(grid.core.y1, grid.core.y1.round(), "{kind:?}: bottom edge");
                assert_eq!(grid.core.x0, grid.core.x0.round(), "{kind:?}: left edge");
            });
        }
    }

    #[test]
    fn value_axis_grows_upwards_and_bar_index_runs_down() {
        let fx = Fixture::new(&[&[5, 10, 15]]);
        fx.with_view(None, |view| {
            let grid = GridLayout::compute(view, ChartKind::Column);
            assert!(grid.point(0.0, 10.0).y < grid.point(0.0, 0.0).y);
        });
        fx.with_view(None, |view| {
            let grid = GridLayout::compute(view, ChartKind::Bar);
            assert!(grid.point(0.0, 0.0).y < grid.point(2.0, 0.0).y);
            assert!(grid.point(0.0, 10.0).x > grid.point(0.0, 0.0).x);
        });
    }

    #[test]
    fn base_is_a_multiple_in_displayed_space() {
        let mut fx = Fixture::new(&[&[-7, 12]]);
        fx.secondary.offset = 3;
        fx.with_view(None, |view| {
            let grid = GridLayout::compute(view, ChartKind::Line);
            let axis = &grid.vertical;
            let displayed_base = axis.grid_base + 3;
            assert_eq!(displayed_base % axis.grid_delta, 0);
            assert!(axis.grid_base <= axis.min);
            assert!(axis.grid_base + axis.grid_delta > axis.min);
            for tick in axis.ticks() {
                assert!((axis.min..=axis.max).contains(&tick));
            }
        });
    }

    #[test]
    fn empty_chart_has_unit_ranges() {
        let fx = Fixture::new(&[]);
        fx.with_view(None, |view| {
            let grid = GridLayout::compute(view, ChartKind::Scatter);
            assert_eq!((grid.horizontal.min, grid.horizontal.max), (0, 1));
            assert_eq!((grid.vertical.min, grid.vertical.max), (0, 1));
        });
    }

    #[test]
    fn axis_names_get_strips() {
        let mut fx = Fixture::new(&[&[1, 2, 3]]);
        let compute =
            |fx: &Fixture| fx.with_view(None, |view| GridLayout::compute(view, ChartKind::Line));
        let plain = compute(&fx);
        fx.primary.name = Some("Month".into());
        fx.secondary.name = Some("Sales".into());
        let named = compute(&fx);
        assert_eq!(named.names.len(), 2);
        assert_eq!(named.names[1].angle, -90.0);
        assert!(named.core.x0 > plain.core.x0);
        assert!(named.core.y1 < plain.core.y1);
    }
}
