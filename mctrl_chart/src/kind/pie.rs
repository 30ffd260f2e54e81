// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pie chart.
//!
//! Each data set contributes one slice sized by the absolute value of its
//! first value. Slices start at the top (-90°) and run clockwise.

use kurbo::{Circle, Point, Rect, Shape, Vec2};
use peniko::Fill;

use crate::axis::AxisSelector;
use crate::error::skip_failed;
use crate::kind::{ChartTypeStrategy, ChartView, HotItem};
use crate::render::{RenderTarget, TOLERANCE, TextAnchor, TextBaseline, TextRun};

pub(crate) struct PieChart;

/// One pie slice; angles in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PieSlice {
    pub(crate) set: usize,
    pub(crate) start: f64,
    pub(crate) sweep: f64,
}

impl PieSlice {
    fn contains_angle_of(&self, center: Point, pt: Point) -> bool {
        let d = pt - center;
        let angle = d.y.atan2(d.x).to_degrees();
        (angle - self.start).rem_euclid(360.0) < self.sweep
    }

    fn bisector(&self) -> f64 {
        (self.start + self.sweep / 2.0).to_radians()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PieGeometry {
    pub(crate) center: Point,
    pub(crate) radius: f64,
    pub(crate) slices: Vec<PieSlice>,
}

impl PieGeometry {
    pub(crate) fn compute(view: &ChartView<'_, '_>) -> Self {
        let body = view.layout.body;
        let center = body.center();
        let radius = (body.width().min(body.height()) / 2.0 - 10.0).max(0.0);

        let values: Vec<i64> = (0..view.cache.len())
            .map(|set| i64::from(view.cache.value(set, 0)).abs())
            .collect();
        let sum: i64 = values.iter().sum();

        let mut slices = Vec::new();
        if sum > 0 {
            let mut start = -90.0;
            for (set, &value) in values.iter().enumerate() {
                let sweep = 360.0 * value as f64 / sum as f64;
                slices.push(PieSlice { set, start, sweep });
                start += sweep;
            }
        }

        Self {
            center,
            radius,
            slices,
        }
    }

    fn slice_at(&self, pt: Point) -> Option<&PieSlice> {
        if (pt - self.center).hypot2() > self.radius * self.radius {
            return None;
        }
        self.slices
            .iter()
            .find(|s| s.sweep > 0.0 && s.contains_angle_of(self.center, pt))
    }
}

impl ChartTypeStrategy for PieChart {
    fn paint(&self, view: &ChartView<'_, '_>, target: &mut dyn RenderTarget) {
        let geom = PieGeometry::compute(view);
        let (center, r) = (geom.center, geom.radius);
        let config = view.config;

        for slice in geom.slices.iter().filter(|s| s.sweep > 0.0) {
            let (start, sweep) = (slice.start.to_radians(), slice.sweep.to_radians());
            let path = Circle::new(center, r)
                .segment(0.0, start, sweep)
                .to_path(TOLERANCE);
            skip_failed(
                target.fill_path(&path, Fill::NonZero, view.color(slice.set)),
                "pie slice",
            );

            if view.hot_set() == Some(slice.set) {
                let aura = Circle::new(center, r + 10.0)
                    .segment(r + 1.5, start, sweep)
                    .to_path(TOLERANCE);
                skip_failed(
                    target.fill_path(&aura, Fill::NonZero, view.hint(slice.set)),
                    "pie aura",
                );
            }
        }

        if geom.slices.iter().filter(|s| s.sweep > 0.0).count() > 1 {
            for slice in &geom.slices {
                let dir = Vec2::from_angle(slice.start.to_radians());
                skip_failed(
                    target.draw_line(center, center + dir * (r + 12.0), 1.0, config.background),
                    "pie separator",
                );
            }
        }

        let style = view.text_style();
        let line_height = view.layout.font.line_height;
        for slice in geom.slices.iter().filter(|s| s.sweep > 0.0) {
            let magnitude = i64::from(view.cache.value(slice.set, 0)).abs();
            let text = view.format(AxisSelector::Primary, magnitude);
            let pos = center + Vec2::from_angle(slice.bisector()) * (0.75 * r);
            let half = Vec2::new(view.text_width(&text) / 2.0, line_height / 2.0);
            let bounds = Rect::from_points(pos - half, pos + half);
            let corners = [
                Point::new(bounds.x0, bounds.y0),
                Point::new(bounds.x1, bounds.y0),
                Point::new(bounds.x0, bounds.y1),
                Point::new(bounds.x1, bounds.y1),
            ];
            if !corners.iter().all(|&c| slice.contains_angle_of(center, c)) {
                continue;
            }
            let run = TextRun::new(&text, pos, style, config.background)
                .with_anchor(TextAnchor::Middle)
                .with_baseline(TextBaseline::Middle);
            skip_failed(target.draw_text(&run), "pie label");
        }
    }

    fn hit_test(&self, view: &ChartView<'_, '_>, pt: Point) -> Option<HotItem> {
        let geom = PieGeometry::compute(view);
        geom.slice_at(pt).map(|s| HotItem::value(s.set, 0))
    }

    fn tooltip_text(&self, view: &ChartView<'_, '_>, hot: HotItem) -> Option<String> {
        let index = hot.index?;
        let value = view.cache.value(hot.set, index);
        Some(view.format(AxisSelector::Primary, i64::from(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DrawCall, Fixture, RecordingTarget};

    #[test]
    fn sweeps_are_proportional() {
        let fx = Fixture::new(&[&[10], &[20], &[-30], &[40]]);
        fx.with_view(None, |view| {
            let geom = PieGeometry::compute(view);
            let sweeps: Vec<f64> = geom.slices.iter().map(|s| s.sweep).collect();
            let starts: Vec<f64> = geom.slices.iter().map(|s| s.start).collect();
            for (got, want) in sweeps.iter().zip([36.0, 72.0, 108.0, 144.0]) {
                assert!((got - want).abs() < 1e-9, "sweep {got} != {want}");
            }
            for (got, want) in starts.iter().zip([-90.0, -54.0, 18.0, 126.0]) {
                assert!((got - want).abs() < 1e-9, "start {got} != {want}");
            }
        });
    }

    #[test]
    fn hit_test_follows_angles() {
        let fx = Fixture::new(&[&[10], &[20], &[30], &[40]]);
        fx.with_view(None, |view| {
            let geom = PieGeometry::compute(view);
            let c = geom.center;
            let r = geom.radius / 2.0;
            let hit = |pt| PieChart.hit_test(view, pt);
            // Straight up is the first slice, east the second, south the third.
            assert_eq!(hit(c + Vec2::new(1.0, -r)), Some(HotItem::value(0, 0)));
            assert_eq!(hit(c + Vec2::new(r, 0.0)), Some(HotItem::value(1, 0)));
            assert_eq!(hit(c + Vec2::new(0.0, r)), Some(HotItem::value(2, 0)));
            assert_eq!(hit(c + Vec2::new(-r, 0.0)), Some(HotItem::value(3, 0)));
            assert_eq!(hit(c + Vec2::new(geom.radius + 1.0, 0.0)), None);
        });
    }

    #[test]
    fn zero_sum_pie_is_empty() {
        let fx = Fixture::new(&[&[0], &[0]]);
        fx.with_view(None, |view| {
            let geom = PieGeometry::compute(view);
            assert!(geom.slices.is_empty());
            assert_eq!(PieChart.hit_test(view, geom.center), None);
            let mut target = RecordingTarget::default();
            PieChart.paint(view, &mut target);
            assert!(target.calls.is_empty());
        });
    }

    #[test]
    fn hot_slice_gets_an_aura() {
        let fx = Fixture::new(&[&[1], &[1]]);
        let fills = |hot| {
            fx.with_view(hot, |view| {
                let mut target = RecordingTarget::default();
                PieChart.paint(view, &mut target);
                target
                    .calls
                    .iter()
                    .filter(|c| matches!(c, DrawCall::Fill { .. }))
                    .count()
            })
        };
        assert_eq!(fills(None) + 1, fills(Some(HotItem::value(1, 0))));
    }

    #[test]
    fn labels_show_slice_magnitude() {
        let fx = Fixture::new(&[&[10], &[-30]]);
        fx.with_view(None, |view| {
            let mut target = RecordingTarget::default();
            PieChart.paint(view, &mut target);
            let texts = target.texts();
            assert!(texts.contains(&"30"), "labels: {texts:?}");
            assert!(!texts.iter().any(|t| t.starts_with('-')), "labels: {texts:?}");
        });
    }

    #[test]
    fn tooltip_uses_primary_axis() {
        let mut fx = Fixture::new(&[&[1234]]);
        fx.primary.factor_exp = -2;
        fx.with_view(None, |view| {
            assert_eq!(
                PieChart.tooltip_text(view, HotItem::value(0, 0)),
                Some("12.34".to_owned())
            );
            assert_eq!(PieChart.tooltip_text(view, HotItem::set(0)), None);
        });
    }
}
