// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scatter chart: every data set is a list of `(x, y)` pairs.

use kurbo::Point;

use crate::axis::AxisSelector;
use crate::cache::ValueCache;
use crate::error::skip_failed;
use crate::grid::GridLayout;
use crate::kind::{ChartKind, ChartTypeStrategy, ChartView, HotItem, nearest_vertex};
use crate::render::RenderTarget;

pub(crate) struct ScatterChart;

const DOT_RADIUS: f64 = 2.0;
const AURA_RADIUS: f64 = 4.0;

/// Value indices of the x components of all complete pairs.
fn pairs(cache: &ValueCache<'_>, set: usize) -> impl Iterator<Item = usize> {
    (0..cache.count(set) / 2).map(|p| 2 * p)
}

fn pair_point(grid: &GridLayout, cache: &ValueCache<'_>, set: usize, i: usize) -> Point {
    grid.point(
        f64::from(cache.value(set, i)),
        f64::from(cache.value(set, i + 1)),
    )
}

impl ChartTypeStrategy for ScatterChart {
    fn paint(&self, view: &ChartView<'_, '_>, target: &mut dyn RenderTarget) {
        let grid = GridLayout::compute(view, ChartKind::Scatter);
        grid.paint(view, target);
        let cache = view.cache;

        if let Some(hot) = view.hot {
            let hint = view.hint(hot.set);
            for i in pairs(cache, hot.set).filter(|&i| hot.covers(hot.set, i)) {
                let center = pair_point(&grid, cache, hot.set, i);
                skip_failed(target.fill_circle(center, AURA_RADIUS, hint), "scatter aura");
            }
        }

        for set in 0..cache.len() {
            let color = view.color(set);
            for i in pairs(cache, set) {
                let center = pair_point(&grid, cache, set, i);
                skip_failed(target.fill_circle(center, DOT_RADIUS, color), "scatter dot");
            }
        }
    }

    fn hit_test(&self, view: &ChartView<'_, '_>, pt: Point) -> Option<HotItem> {
        let grid = GridLayout::compute(view, ChartKind::Scatter);
        let cache = view.cache;
        let slop = view.config.hit_slop;

        let a = grid.unmap_primary(Point::new(pt.x - slop.width, pt.y));
        let b = grid.unmap_primary(Point::new(pt.x + slop.width, pt.y));
        let (lo, hi) = (a.min(b), a.max(b));

        let grid = &grid;
        let vertices = (0..cache.len()).flat_map(|set| {
            pairs(cache, set)
                .filter(move |&i| (lo..=hi).contains(&f64::from(cache.value(set, i))))
                .map(move |i| (HotItem::value(set, i), pair_point(grid, cache, set, i)))
        });
        nearest_vertex(pt, slop, vertices)
    }

    fn tooltip_text(&self, view: &ChartView<'_, '_>, hot: HotItem) -> Option<String> {
        let i = hot.index?;
        let x = view.cache.value(hot.set, i);
        let y = view.cache.value(hot.set, i + 1);
        Some(format!(
            "{} / {}",
            view.format(AxisSelector::Primary, i64::from(x)),
            view.format(AxisSelector::Secondary, i64::from(y)),
        ))
    }
}
