// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip interface and the chart's built-in tooltip.

use kurbo::{Point, Size};

/// Gap between the pointer and the bottom edge of the tooltip bubble.
pub const TOOLTIP_GAP: f64 = 5.0;

/// A tooltip the chart shows for the hot value.
///
/// The host owns the actual popup; the chart only tells it what to show and
/// where.
pub trait Tooltip {
    /// Replaces the tooltip text.
    fn set_text(&mut self, text: &str);

    /// Shows or hides the tooltip.
    fn activate(&mut self, show: bool);

    /// Moves the top-left corner of the bubble to `pos` (view coordinates).
    fn set_position(&mut self, pos: Point);

    /// Current bubble size, used to center the bubble above the pointer.
    fn bubble_size(&self) -> Size {
        Size::ZERO
    }
}

/// Which tooltip a chart drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TooltipSource {
    /// The chart's own [`TrackingTooltip`].
    Tracking,
    /// A tooltip installed with [`Chart::set_tooltip`](crate::Chart::set_tooltip).
    External,
}

/// Top-left corner of a bubble of `size` centered above `pointer`.
pub(crate) fn bubble_origin(pointer: Point, size: Size) -> Point {
    Point::new(
        pointer.x - size.width / 2.0,
        pointer.y - size.height - TOOLTIP_GAP,
    )
}

/// The tooltip a chart creates for itself when its style asks for one.
///
/// It only records its state; hosts read it back through
/// [`Chart::tracking_tooltip`](crate::Chart::tracking_tooltip) and draw the
/// bubble however they like.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackingTooltip {
    text: String,
    active: bool,
    position: Point,
    bubble: Size,
}

impl TrackingTooltip {
    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` while the tooltip is shown.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Top-left corner of the bubble.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Bubble size as last measured by the chart.
    pub(crate) fn set_bubble(&mut self, bubble: Size) {
        self.bubble = bubble;
    }
}

impl Tooltip for TrackingTooltip {
    fn set_text(&mut self, text: &str) {
        text.clone_into(&mut self.text);
    }

    fn activate(&mut self, show: bool) {
        self.active = show;
    }

    fn set_position(&mut self, pos: Point) {
        self.position = pos;
    }

    fn bubble_size(&self) -> Size {
        self.bubble
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bubble_sits_centered_above_the_pointer() {
        let origin = bubble_origin(Point::new(100.0, 80.0), Size::new(40.0, 20.0));
        assert_eq!(origin, Point::new(80.0, 55.0));
    }

    #[test]
    fn tracking_tooltip_records_state() {
        let mut tip = TrackingTooltip::default();
        assert!(!tip.is_active());
        tip.set_text("42");
        tip.activate(true);
        tip.set_position(Point::new(3.0, 4.0));
        assert_eq!(tip.text(), "42");
        assert!(tip.is_active());
        assert_eq!(tip.position(), Point::new(3.0, 4.0));
    }
}
