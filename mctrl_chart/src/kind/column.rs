// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column and bar charts, plain or stacked.
//!
//! Both draw one rectangle per `(set, index)`; bars are columns with the
//! primary axis running vertically.

use kurbo::{BezPath, Point, Rect, Stroke};

use crate::error::skip_failed;
use crate::grid::GridLayout;
use crate::kind::{ChartKind, ChartTypeStrategy, ChartView, FILL_ALPHA, HotItem, value_tooltip};
use crate::render::RenderTarget;

/// Share of a category slot left empty on each side of its group.
const GROUP_PADDING: f64 = 0.15;

pub(crate) struct ColumnChart {
    kind: ChartKind,
}

pub(crate) const COLUMN: ColumnChart = ColumnChart {
    kind: ChartKind::Column,
};
pub(crate) const STACKED_COLUMN: ColumnChart = ColumnChart {
    kind: ChartKind::StackedColumn,
};
pub(crate) const BAR: ColumnChart = ColumnChart {
    kind: ChartKind::Bar,
};
pub(crate) const STACKED_BAR: ColumnChart = ColumnChart {
    kind: ChartKind::StackedBar,
};

/// One painted column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ColumnBox {
    pub(crate) set: usize,
    pub(crate) index: usize,
    pub(crate) rect: Rect,
    /// Corners in border order; the segment from the last back to the first
    /// corner lies on the baseline and is not stroked.
    pub(crate) border: [Point; 4],
}

/// All columns of a chart, in paint order.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ColumnGeometry {
    pub(crate) grid: GridLayout,
    pub(crate) boxes: Vec<ColumnBox>,
}

impl ColumnGeometry {
    pub(crate) fn compute(view: &ChartView<'_, '_>, kind: ChartKind) -> Self {
        let grid = GridLayout::compute(view, kind);
        let cache = view.cache;
        let sets = cache.len();
        let width = 1.0 - 2.0 * GROUP_PADDING;

        let mut boxes = Vec::new();
        for index in 0..cache.max_count() {
            let group = index as f64 + GROUP_PADDING;
            for set in (0..sets).filter(|&set| index < cache.count(set)) {
                let (p0, p1, base, top) = if kind.is_stacked() {
                    (
                        group,
                        group + width,
                        cache.stacked_below(set, index),
                        cache.stacked(set, index),
                    )
                } else {
                    let w = width / sets as f64;
                    (
                        group + set as f64 * w,
                        group + (set + 1) as f64 * w,
                        0,
                        i64::from(cache.value(set, index)),
                    )
                };
                let (base, top) = (base as f64, top as f64);
                let border = [
                    grid.point(p0, base),
                    grid.point(p0, top),
                    grid.point(p1, top),
                    grid.point(p1, base),
                ];
                boxes.push(ColumnBox {
                    set,
                    index,
                    rect: Rect::from_points(border[0], border[2]),
                    border,
                });
            }
        }

        Self { grid, boxes }
    }
}

impl ChartTypeStrategy for ColumnChart {
    fn paint(&self, view: &ChartView<'_, '_>, target: &mut dyn RenderTarget) {
        let geom = ColumnGeometry::compute(view, self.kind);
        geom.grid.paint(view, target);

        for b in &geom.boxes {
            let color = view.color(b.set);
            let hot = view.hot.is_some_and(|h| h.covers(b.set, b.index));
            let fill = if hot { color } else { color.with_alpha(FILL_ALPHA) };
            skip_failed(target.fill_rect(b.rect, fill), "column");

            let mut border = BezPath::new();
            border.move_to(b.border[0]);
            for &corner in &b.border[1..] {
                border.line_to(corner);
            }
            skip_failed(
                target.stroke_path(&border, &Stroke::new(1.0), color),
                "column border",
            );
        }
    }

    fn hit_test(&self, view: &ChartView<'_, '_>, pt: Point) -> Option<HotItem> {
        let geom = ColumnGeometry::compute(view, self.kind);
        geom.boxes
            .iter()
            .rev()
            .find(|b| b.rect.contains(pt))
            .map(|b| HotItem::value(b.set, b.index))
    }

    fn tooltip_text(&self, view: &ChartView<'_, '_>, hot: HotItem) -> Option<String> {
        value_tooltip(view, hot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DrawCall, Fixture, RecordingTarget};

    #[test]
    fn unstacked_columns_sit_side_by_side() {
        let fx = Fixture::new(&[&[10, 20], &[30, 40]]);
        fx.with_view(None, |view| {
            let geom = ColumnGeometry::compute(view, ChartKind::Column);
            assert_eq!(geom.boxes.len(), 4);
            let (a, b) = (geom.boxes[0].rect, geom.boxes[1].rect);
            assert!((a.x1 - b.x0).abs() < 1e-9, "columns abut horizontally");
            assert!(a.height() < b.height());
            assert!((a.y1 - b.y1).abs() < 1e-9, "shared baseline");
        });
    }

    #[test]
    fn stacked_columns_abut_vertically() {
        let fx = Fixture::new(&[&[10, 20], &[30, 40]]);
        fx.with_view(None, |view| {
            let geom = ColumnGeometry::compute(view, ChartKind::StackedColumn);
            let (a, b) = (geom.boxes[0].rect, geom.boxes[1].rect);
            assert!((a.y0 - b.y1).abs() < 1e-9, "set 1 starts where set 0 ends");
            assert_eq!((a.x0, a.x1), (b.x0, b.x1));
        });
    }

    #[test]
    fn bars_run_horizontally_from_the_top() {
        let fx = Fixture::new(&[&[10, 20, 30]]);
        fx.with_view(None, |view| {
            let geom = ColumnGeometry::compute(view, ChartKind::Bar);
            let rects: Vec<Rect> = geom.boxes.iter().map(|b| b.rect).collect();
            assert!(rects[0].y0 < rects[1].y0 && rects[1].y0 < rects[2].y0);
            assert!(rects[0].width() < rects[2].width());
            assert!((rects[0].x0 - rects[2].x0).abs() < 1e-9, "shared baseline");
        });
    }

    #[test]
    fn border_skips_the_baseline() {
        let fx = Fixture::new(&[&[10], &[-10]]);
        fx.with_view(None, |view| {
            let geom = ColumnGeometry::compute(view, ChartKind::Column);
            let zero = geom.grid.vertical.map(0.0);
            for b in &geom.boxes {
                assert_eq!(b.border[0].y, zero);
                assert_eq!(b.border[3].y, zero);
                assert_ne!(b.border[1].y, zero);
            }
        });
    }

    #[test]
    fn hit_test_uses_the_painted_rectangles() {
        let fx = Fixture::new(&[&[10, 20], &[30, 40]]);
        for kind in [ChartKind::Column, ChartKind::StackedBar] {
            fx.with_view(None, |view| {
                let geom = ColumnGeometry::compute(view, kind);
                let chart = kind.strategy();
                for b in &geom.boxes {
                    assert_eq!(
                        chart.hit_test(view, b.rect.center()),
                        Some(HotItem::value(b.set, b.index)),
                        "{kind:?}"
                    );
                }
                assert_eq!(chart.hit_test(view, geom.grid.core.origin()), None);
            });
        }
    }

    #[test]
    fn hot_column_is_opaque() {
        let fx = Fixture::new(&[&[10, 20]]);
        let opaque = |hot| {
            fx.with_view(hot, |view| {
                let mut target = RecordingTarget::default();
                COLUMN.paint(view, &mut target);
                target
                    .calls
                    .iter()
                    .filter(|c| {
                        matches!(c, DrawCall::Fill { color, .. } if color.components[3] == 1.0)
                    })
                    .count()
            })
        };
        assert_eq!(opaque(None), 0);
        assert_eq!(opaque(Some(HotItem::value(0, 1))), 1);
        assert_eq!(opaque(Some(HotItem::set(0))), 2);
    }
}
