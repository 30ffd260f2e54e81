// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart configuration and style.

use core::time::Duration;

use kurbo::Size;
use mctrl_text::TextStyle;
use peniko::Color;

use crate::kind::ChartKind;

/// Environment-dependent settings of a chart.
///
/// These stand in for what a desktop control reads from the system: the
/// decimal separator of the locale, the double-click rectangle, the window
/// colors and the font.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartConfig {
    /// How long an unused drawing surface is kept before it is released.
    pub idle_timeout: Duration,
    /// Pointer tolerance used by the scatter and line hit-testers.
    pub hit_slop: Size,
    /// Decimal separator used when formatting fixed-point values.
    pub decimal_separator: char,
    /// Font of all chart text.
    pub text_style: TextStyle,
    /// Background color (also used for pie slice separators).
    pub background: Color,
    /// Color of secondary gridlines.
    pub gridline_color: Color,
    /// Color of the zero lines.
    pub axis_color: Color,
    /// Color of labels, legend and title text.
    pub text_color: Color,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(30),
            hit_slop: Size::new(4.0, 4.0),
            decimal_separator: '.',
            text_style: TextStyle::default(),
            background: Color::WHITE,
            gridline_color: Color::from_rgb8(191, 191, 191),
            axis_color: Color::BLACK,
            text_color: Color::BLACK,
        }
    }
}

impl ChartConfig {
    /// Sets the idle eviction timeout.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Sets the hit-test slop rectangle.
    pub fn with_hit_slop(mut self, hit_slop: Size) -> Self {
        self.hit_slop = hit_slop;
        self
    }

    /// Sets the decimal separator.
    pub fn with_decimal_separator(mut self, decimal_separator: char) -> Self {
        self.decimal_separator = decimal_separator;
        self
    }

    /// Sets the text style.
    pub fn with_text_style(mut self, text_style: TextStyle) -> Self {
        self.text_style = text_style;
        self
    }

    /// Sets the background color.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Sets the gridline color.
    pub fn with_gridline_color(mut self, color: Color) -> Self {
        self.gridline_color = color;
        self
    }

    /// Sets the zero-line color.
    pub fn with_axis_color(mut self, color: Color) -> Self {
        self.axis_color = color;
        self
    }

    /// Sets the text color.
    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }
}

/// Style bits of a chart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChartStyle {
    /// Chart type.
    pub kind: ChartKind,
    /// Whether the chart creates and drives its own tooltip.
    pub tooltips: bool,
}

impl ChartStyle {
    /// Creates a style for `kind` without a tooltip.
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            tooltips: false,
        }
    }

    /// Enables or disables the chart's own tooltip.
    pub fn with_tooltips(mut self, tooltips: bool) -> Self {
        self.tooltips = tooltips;
        self
    }
}
