// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overall chart layout: title strip, chart body and legend column.

use kurbo::{Rect, Size};
use mctrl_text::FontMetrics;

/// Output of the layout pass.
///
/// All rectangles are in view coordinates, with the origin at the top-left
/// corner of the chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartLayout {
    /// Outer chart bounds.
    pub view: Rect,
    /// Title strip, if the chart has a non-empty title.
    pub title: Option<Rect>,
    /// Area available to the chart body (grid and data).
    pub body: Rect,
    /// Legend column on the right side.
    pub legend: Rect,
    /// Average character cell of the chart font.
    pub font: FontMetrics,
}

impl ChartLayout {
    /// Legend column width in average character widths.
    pub const LEGEND_CHARS: f64 = 15.0;

    /// Computes a layout for a view of `size`.
    ///
    /// A margin of half a line height separates the title, body and legend
    /// from each other and from the view edges.
    pub fn arrange(size: Size, font: FontMetrics, has_title: bool) -> Self {
        let view = Rect::from_origin_size((0.0, 0.0), size);
        let margin = ((font.line_height + 1.0) / 2.0).floor();

        let title = has_title.then(|| {
            Rect::new(
                view.x0 + margin,
                view.y0 + margin,
                view.x1 - margin,
                view.y0 + margin + font.line_height,
            )
        });
        let top = title.map_or(view.y0, |t| t.y1) + margin;

        let legend_x0 = view.x1 - margin - Self::LEGEND_CHARS * font.char_width;
        let legend = Rect::new(legend_x0, top, view.x1 - margin, view.y1 - margin);
        let body = Rect::new(view.x0 + margin, top, legend_x0 - margin, view.y1 - margin);

        Self {
            view,
            title,
            body: non_negative(body),
            legend: non_negative(legend),
            font,
        }
    }
}

/// Collapses rectangles that went inside out on tiny views.
fn non_negative(r: Rect) -> Rect {
    Rect::new(r.x0, r.y0, r.x1.max(r.x0), r.y1.max(r.y0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FONT: FontMetrics = FontMetrics {
        char_width: 6.0,
        line_height: 15.0,
        ascent: 12.0,
    };

    #[test]
    fn title_reserves_a_strip() {
        let layout = ChartLayout::arrange(Size::new(400.0, 300.0), FONT, true);
        let title = layout.title.expect("title strip");
        assert_eq!(title, Rect::new(8.0, 8.0, 392.0, 23.0));
        assert_eq!(layout.body.y0, 31.0);
        assert_eq!(layout.legend.y0, 31.0);
    }

    #[test]
    fn legend_sits_right_of_the_body() {
        let layout = ChartLayout::arrange(Size::new(400.0, 300.0), FONT, false);
        assert!(layout.title.is_none());
        assert_eq!(layout.legend, Rect::new(302.0, 8.0, 392.0, 292.0));
        assert_eq!(layout.body, Rect::new(8.0, 8.0, 294.0, 292.0));
    }

    #[test]
    fn tiny_views_do_not_invert() {
        let layout = ChartLayout::arrange(Size::new(20.0, 10.0), FONT, true);
        assert!(layout.body.width() >= 0.0);
        assert!(layout.body.height() >= 0.0);
        assert!(layout.legend.height() >= 0.0);
    }
}
