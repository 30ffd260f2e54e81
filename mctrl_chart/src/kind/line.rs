// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line and area charts, plain or stacked.

use kurbo::{BezPath, Point, Stroke};
use peniko::Fill;

use crate::cache::ValueCache;
use crate::error::skip_failed;
use crate::grid::GridLayout;
use crate::kind::{
    ChartKind, ChartTypeStrategy, ChartView, FILL_ALPHA, HotItem, nearest_vertex, value_tooltip,
};
use crate::render::RenderTarget;

const LINE_WIDTH: f64 = 2.0;
const AURA_WIDTH: f64 = 5.0;
const DOT_RADIUS: f64 = 2.0;
const AURA_RADIUS: f64 = 4.0;

pub(crate) struct LineChart {
    kind: ChartKind,
    area: bool,
}

pub(crate) const LINE: LineChart = LineChart {
    kind: ChartKind::Line,
    area: false,
};
pub(crate) const STACKED_LINE: LineChart = LineChart {
    kind: ChartKind::StackedLine,
    area: false,
};
pub(crate) const AREA: LineChart = LineChart {
    kind: ChartKind::Area,
    area: true,
};
pub(crate) const STACKED_AREA: LineChart = LineChart {
    kind: ChartKind::StackedArea,
    area: true,
};

impl LineChart {
    /// Height of the polyline of `set` at index `i`.
    fn level(&self, cache: &ValueCache<'_>, set: usize, i: usize) -> i64 {
        if self.kind.is_stacked() {
            cache.stacked(set, i)
        } else {
            i64::from(cache.value(set, i))
        }
    }

    /// Where the area of `set` ends at index `i`.
    fn floor(&self, cache: &ValueCache<'_>, set: usize, i: usize) -> i64 {
        if self.kind.is_stacked() {
            cache.stacked_below(set, i)
        } else {
            0
        }
    }

    fn vertex(&self, grid: &GridLayout, cache: &ValueCache<'_>, set: usize, i: usize) -> Point {
        grid.point(i as f64, self.level(cache, set, i) as f64)
    }

    fn polyline(&self, grid: &GridLayout, cache: &ValueCache<'_>, set: usize) -> BezPath {
        let mut path = BezPath::new();
        for i in 0..cache.count(set) {
            let p = self.vertex(grid, cache, set, i);
            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        path
    }

    fn area_path(&self, grid: &GridLayout, cache: &ValueCache<'_>, set: usize) -> BezPath {
        let mut path = self.polyline(grid, cache, set);
        for i in (0..cache.count(set)).rev() {
            path.line_to(grid.point(i as f64, self.floor(cache, set, i) as f64));
        }
        path.close_path();
        path
    }
}

impl ChartTypeStrategy for LineChart {
    fn paint(&self, view: &ChartView<'_, '_>, target: &mut dyn RenderTarget) {
        let grid = GridLayout::compute(view, self.kind);
        grid.paint(view, target);
        let cache = view.cache;
        let sets = move || (0..cache.len()).filter(move |&set| cache.count(set) > 0);

        if self.area {
            for set in sets() {
                let path = self.area_path(&grid, cache, set);
                let color = view.color(set).with_alpha(FILL_ALPHA);
                skip_failed(target.fill_path(&path, Fill::NonZero, color), "area fill");
            }
        }

        if let Some(hot) = view.hot.filter(|h| cache.count(h.set) > 1) {
            let path = self.polyline(&grid, cache, hot.set);
            skip_failed(
                target.stroke_path(&path, &Stroke::new(AURA_WIDTH), view.hint(hot.set)),
                "line aura",
            );
        }

        for set in sets().filter(|&set| cache.count(set) > 1) {
            let path = self.polyline(&grid, cache, set);
            skip_failed(
                target.stroke_path(&path, &Stroke::new(LINE_WIDTH), view.color(set)),
                "line",
            );
        }

        if let Some(HotItem {
            set,
            index: Some(i),
        }) = view.hot
        {
            let center = self.vertex(&grid, cache, set, i);
            skip_failed(
                target.fill_circle(center, AURA_RADIUS, view.hint(set)),
                "vertex aura",
            );
        }

        for set in sets() {
            let color = view.color(set);
            for i in 0..cache.count(set) {
                let center = self.vertex(&grid, cache, set, i);
                skip_failed(target.fill_circle(center, DOT_RADIUS, color), "vertex");
            }
        }
    }

    fn hit_test(&self, view: &ChartView<'_, '_>, pt: Point) -> Option<HotItem> {
        let grid = GridLayout::compute(view, self.kind);
        let cache = view.cache;
        let slop = view.config.hit_slop;

        // Only indices within the horizontal slop window can be hit.
        let a = grid.unmap_primary(Point::new(pt.x - slop.width, pt.y));
        let b = grid.unmap_primary(Point::new(pt.x + slop.width, pt.y));
        let lo = index_at_or_after(a.min(b));
        let hi = index_at_or_after(a.max(b).floor() + 1.0);

        let grid = &grid;
        let vertices = (0..cache.len()).flat_map(|set| {
            (lo..hi.min(cache.count(set)))
                .map(move |i| (HotItem::value(set, i), self.vertex(grid, cache, set, i)))
        });
        nearest_vertex(pt, slop, vertices)
    }

    fn tooltip_text(&self, view: &ChartView<'_, '_>, hot: HotItem) -> Option<String> {
        value_tooltip(view, hot)
    }
}

/// Smallest index not below `x`.
fn index_at_or_after(x: f64) -> usize {
    #[allow(clippy::cast_possible_truncation, reason = "saturating float to int cast")]
    let i = x.ceil().max(0.0) as usize;
    i
}

#[cfg(test)]
mod tests {
    use kurbo::Vec2;

    use super::*;
    use crate::testing::{DrawCall, Fixture, RecordingTarget};

    fn paint(fx: &Fixture, chart: &LineChart, hot: Option<HotItem>) -> Vec<DrawCall> {
        fx.with_view(hot, |view| {
            let mut target = RecordingTarget::default();
            chart.paint(view, &mut target);
            target.calls
        })
    }

    #[test]
    fn stacked_vertices_sit_on_running_sums() {
        let fx = Fixture::new(&[&[10, 20, 30], &[5, 5, 5]]);
        fx.with_view(None, |view| {
            let grid = GridLayout::compute(view, ChartKind::StackedLine);
            let v = STACKED_LINE.vertex(&grid, view.cache, 1, 2);
            assert_eq!(v, grid.point(2.0, 35.0));
            let v = LINE.vertex(&grid, view.cache, 1, 2);
            assert_eq!(v, grid.point(2.0, 5.0));
        });
    }

    #[test]
    fn areas_fill_once_per_set() {
        let fx = Fixture::new(&[&[10, 20, 30], &[5, 5, 5]]);
        let translucent = |calls: &[DrawCall]| {
            calls
                .iter()
                .filter(|c| matches!(c, DrawCall::Fill { color, .. } if color.components[3] < 1.0))
                .count()
        };
        assert_eq!(translucent(&paint(&fx, &AREA, None)), 2);
        assert_eq!(translucent(&paint(&fx, &STACKED_AREA, None)), 2);
        assert_eq!(translucent(&paint(&fx, &LINE, None)), 0);
    }

    #[test]
    fn hot_set_gets_a_wide_aura() {
        let fx = Fixture::new(&[&[10, 20, 30]]);
        let widest = |calls: Vec<DrawCall>| {
            calls
                .iter()
                .filter_map(|c| match c {
                    DrawCall::Stroke { width, .. } => Some(*width),
                    _ => None,
                })
                .fold(0.0, f64::max)
        };
        assert_eq!(widest(paint(&fx, &LINE, None)), LINE_WIDTH);
        assert_eq!(widest(paint(&fx, &LINE, Some(HotItem::set(0)))), AURA_WIDTH);
    }

    #[test]
    fn hit_test_finds_vertices() {
        let fx = Fixture::new(&[&[10, 20, 30], &[5, 5, 5]]);
        fx.with_view(None, |view| {
            let grid = GridLayout::compute(view, ChartKind::StackedLine);
            let pt = STACKED_LINE.vertex(&grid, view.cache, 1, 1) + Vec2::new(1.0, -1.0);
            assert_eq!(STACKED_LINE.hit_test(view, pt), Some(HotItem::value(1, 1)));
            let between = grid.point(0.5, 10.0);
            assert_eq!(STACKED_LINE.hit_test(view, between), None);
        });
    }

    #[test]
    fn tooltip_shows_the_raw_value() {
        let fx = Fixture::new(&[&[10, 20, 30], &[5, 6, 7]]);
        fx.with_view(None, |view| {
            assert_eq!(
                STACKED_AREA.tooltip_text(view, HotItem::value(1, 2)),
                Some("7".to_owned())
            );
        });
    }
}
