// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend: one row per data set with a color swatch and the set's label.

use kurbo::{Point, Rect, Shape};
use peniko::Fill;

use crate::error::skip_failed;
use crate::kind::{ChartView, HotItem};
use crate::render::{RenderTarget, TOLERANCE, TextRun};

/// Geometry of one legend row.
#[derive(Clone, Copy, Debug, PartialEq)]
struct LegendRow {
    swatch: Rect,
    /// Top-left corner of the label; also the top of the row.
    text_origin: Point,
}

fn row(view: &ChartView<'_, '_>, set: usize) -> LegendRow {
    let legend = view.layout.legend;
    let font = view.layout.font;
    let lh = font.line_height;
    let y = legend.y0 + set as f64 * lh;

    let size = 0.7 * font.ascent;
    let x = legend.x0 + lh - 0.9 * font.ascent + 4.0;
    let swatch_y = y + font.ascent - size;

    LegendRow {
        swatch: Rect::new(x, swatch_y, x + size, swatch_y + size),
        text_origin: Point::new(legend.x0 + lh + 6.0, y),
    }
}

pub(crate) fn paint(view: &ChartView<'_, '_>, target: &mut dyn RenderTarget) {
    let style = view.text_style();
    let bottom = view.layout.legend.y1;
    for set in 0..view.data.len() {
        let row = row(view, set);
        // Rows that do not fit the legend are left out.
        if row.text_origin.y + view.layout.font.line_height > bottom {
            break;
        }

        if view.hot_set() == Some(set) {
            let mut ring = row.swatch.inflate(3.5, 3.5).to_path(TOLERANCE);
            ring.extend(row.swatch.inflate(1.5, 1.5).path_elements(TOLERANCE));
            skip_failed(
                target.fill_path(&ring, Fill::EvenOdd, view.hint(set)),
                "legend aura",
            );
        }

        skip_failed(target.fill_rect(row.swatch, view.color(set)), "legend swatch");

        let label = view.label(set);
        let run = TextRun::new(&label, row.text_origin, style, view.config.text_color);
        skip_failed(target.draw_text(&run), "legend label");
    }
}

/// Finds the legend row under `pt`.
///
/// Within a row, the swatch area before the label always counts; over the
/// label the text measurer decides whether `pt` is on the text.
pub(crate) fn hit_test(view: &ChartView<'_, '_>, pt: Point) -> Option<HotItem> {
    let legend = view.layout.legend;
    let lh = view.layout.font.line_height;
    if !legend.contains(pt) || lh <= 0.0 {
        return None;
    }

    #[allow(clippy::cast_possible_truncation, reason = "non-negative row number")]
    let set = ((pt.y - legend.y0) / lh).floor() as usize;
    if set >= view.data.len() {
        return None;
    }

    let row = row(view, set);
    if pt.x < row.text_origin.x {
        return Some(HotItem::set(set));
    }
    let label = view.label(set);
    let hit = view
        .measurer
        .hit_test(&label, view.text_style(), pt.x - row.text_origin.x);
    hit.is_inside.then(|| HotItem::set(set))
}

#[cfg(test)]
mod tests {
    use kurbo::Vec2;

    use super::*;
    use crate::testing::{DrawCall, Fixture, RecordingTarget};

    #[test]
    fn rows_are_one_line_apart() {
        let fx = Fixture::new(&[&[1], &[2], &[3]]);
        fx.with_view(None, |view| {
            let r0 = row(view, 0);
            let r2 = row(view, 2);
            let lh = view.layout.font.line_height;
            assert!((r2.text_origin.y - r0.text_origin.y - 2.0 * lh).abs() < 1e-9);
            assert!((r0.swatch.width() - 0.7 * view.layout.font.ascent).abs() < 1e-9);
        });
    }

    #[test]
    fn hit_test_by_row() {
        let fx = Fixture::new(&[&[1], &[2], &[3]]);
        fx.with_view(None, |view| {
            let r1 = row(view, 1);
            // On the swatch.
            assert_eq!(hit_test(view, r1.swatch.center()), Some(HotItem::set(1)));
            // On the first character of "data-set-1".
            let on_text = r1.text_origin + Vec2::new(2.0, 3.0);
            assert_eq!(hit_test(view, on_text), Some(HotItem::set(1)));
            // Right of the label text.
            let past_text = Point::new(view.layout.legend.x1 - 1.0, r1.text_origin.y + 3.0);
            assert_eq!(hit_test(view, past_text), None);
            // Below the last row.
            let below = Point::new(r1.swatch.center().x, row(view, 3).text_origin.y + 1.0);
            assert_eq!(hit_test(view, below), None);
        });
    }

    #[test]
    fn hot_row_gets_an_even_odd_ring() {
        let fx = Fixture::new(&[&[1], &[2]]);
        fx.with_view(Some(HotItem::value(1, 0)), |view| {
            let mut target = RecordingTarget::default();
            paint(view, &mut target);
            let rings = target
                .calls
                .iter()
                .filter(|c| matches!(c, DrawCall::Fill { fill: Fill::EvenOdd, .. }))
                .count();
            assert_eq!(rings, 1);
            let texts: Vec<&str> = target
                .calls
                .iter()
                .filter_map(|c| match c {
                    DrawCall::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect();
            assert_eq!(texts, ["data-set-0", "data-set-1"]);
        });
    }

    #[test]
    fn rows_stay_inside_the_legend() {
        let values: Vec<[i32; 1]> = (0..60).map(|i| [i]).collect();
        let sets: Vec<&[i32]> = values.iter().map(|v| v.as_slice()).collect();
        let fx = Fixture::new(&sets);
        fx.with_view(None, |view| {
            let legend = view.layout.legend;
            let lh = view.layout.font.line_height;
            let mut target = RecordingTarget::default();
            paint(view, &mut target);

            let rows: Vec<f64> = target
                .calls
                .iter()
                .filter_map(|c| match c {
                    DrawCall::Text { pos, .. } => Some(pos.y),
                    _ => None,
                })
                .collect();
            assert!(!rows.is_empty(), "at least one row fits");
            assert!(rows.len() < 60, "{} rows painted", rows.len());
            assert!(rows.iter().all(|y| y + lh <= legend.y1), "rows: {rows:?}");
            assert!(
                target.calls.iter().all(|c| match c {
                    DrawCall::Fill { bounds, .. } => bounds.y1 <= legend.y1,
                    _ => true,
                }),
                "swatches stay inside the legend"
            );
        });
    }
}
