// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering backend abstraction.
//!
//! The chart paints through a small vector drawing interface: filled and
//! stroked paths in solid colors, plus single-line text. Backends implement
//! [`RenderTarget`] (anything that can be drawn on) and, for the cached
//! on-screen path, [`Surface`] and [`SurfaceFactory`].

use std::fmt;
use std::sync::Arc;

use kurbo::{BezPath, Ellipse, Line, Point, Rect, Shape, Size, Stroke};
use mctrl_text::TextStyle;
use parking_lot::Mutex;
use peniko::{Color, Fill};

use crate::error::RenderError;

/// Curve flattening tolerance used when converting shapes to paths.
pub(crate) const TOLERANCE: f64 = 0.1;

/// Horizontal text anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    /// `pos.x` is the start of the text.
    Start,
    /// `pos.x` is the horizontal center of the text.
    Middle,
    /// `pos.x` is the end of the text.
    End,
}

/// Vertical text baseline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextBaseline {
    /// `pos.y` is the top of the text line.
    Hanging,
    /// `pos.y` is the vertical center of the text line.
    Middle,
    /// `pos.y` is the alphabetic baseline.
    Alphabetic,
}

/// A single line of text to draw.
#[derive(Clone, Copy, Debug)]
pub struct TextRun<'a> {
    /// The text.
    pub text: &'a str,
    /// Anchor point.
    pub pos: Point,
    /// Horizontal alignment relative to `pos`.
    pub anchor: TextAnchor,
    /// Vertical alignment relative to `pos`.
    pub baseline: TextBaseline,
    /// Rotation around `pos` in degrees (clockwise, as in SVG).
    pub angle: f64,
    /// Font.
    pub style: &'a TextStyle,
    /// Text color.
    pub color: Color,
}

impl<'a> TextRun<'a> {
    /// Creates an unrotated, start-anchored, top-aligned text run.
    pub fn new(text: &'a str, pos: Point, style: &'a TextStyle, color: Color) -> Self {
        Self {
            text,
            pos,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Hanging,
            angle: 0.0,
            style,
            color,
        }
    }

    /// Sets the horizontal anchor.
    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Sets the vertical baseline.
    pub fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Sets the rotation angle in degrees.
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }
}

/// Something the chart can paint on.
pub trait RenderTarget {
    /// Fills `path` with a solid color.
    fn fill_path(&mut self, path: &BezPath, fill: Fill, color: Color) -> Result<(), RenderError>;

    /// Strokes `path` with a solid color.
    fn stroke_path(
        &mut self,
        path: &BezPath,
        stroke: &Stroke,
        color: Color,
    ) -> Result<(), RenderError>;

    /// Draws a single line of text.
    fn draw_text(&mut self, run: &TextRun<'_>) -> Result<(), RenderError>;

    /// Fills an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), RenderError> {
        self.fill_path(&rect.to_path(TOLERANCE), Fill::NonZero, color)
    }

    /// Draws a straight line segment.
    fn draw_line(
        &mut self,
        p0: Point,
        p1: Point,
        width: f64,
        color: Color,
    ) -> Result<(), RenderError> {
        let path = Line::new(p0, p1).to_path(TOLERANCE);
        self.stroke_path(&path, &Stroke::new(width), color)
    }

    /// Fills a circle of `radius` around `center`.
    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) -> Result<(), RenderError> {
        let path = Ellipse::new(center, (radius, radius), 0.0).to_path(TOLERANCE);
        self.fill_path(&path, Fill::NonZero, color)
    }
}

impl<T: RenderTarget + ?Sized> RenderTarget for &mut T {
    fn fill_path(&mut self, path: &BezPath, fill: Fill, color: Color) -> Result<(), RenderError> {
        (**self).fill_path(path, fill, color)
    }

    fn stroke_path(
        &mut self,
        path: &BezPath,
        stroke: &Stroke,
        color: Color,
    ) -> Result<(), RenderError> {
        (**self).stroke_path(path, stroke, color)
    }

    fn draw_text(&mut self, run: &TextRun<'_>) -> Result<(), RenderError> {
        (**self).draw_text(run)
    }
}

/// A cached, device-backed drawing surface.
///
/// The chart keeps one surface between paints. Drawing happens between
/// [`Surface::begin_draw`] and [`Surface::end_draw`].
pub trait Surface: RenderTarget {
    /// Starts a drawing pass.
    fn begin_draw(&mut self);

    /// Fills `rect` with `color`, replacing whatever was there.
    fn clear(&mut self, rect: Rect, color: Color) -> Result<(), RenderError>;

    /// Finishes a drawing pass and presents it.
    ///
    /// [`RenderError::SurfaceLost`] tells the chart to drop the surface and
    /// create a new one on the next paint.
    fn end_draw(&mut self) -> Result<(), RenderError>;
}

/// Creates [`Surface`]s.
pub trait SurfaceFactory: Send {
    /// Creates a surface of `size`.
    fn create_surface(&mut self, size: Size) -> Result<Box<dyn Surface>, RenderError>;
}

/// Process-wide surface factory shared by all charts.
///
/// The lock is held only while a surface is being created.
#[derive(Clone)]
pub struct SurfaceService {
    factory: Arc<Mutex<Box<dyn SurfaceFactory>>>,
}

impl SurfaceService {
    /// Wraps `factory` for sharing between charts.
    pub fn new(factory: impl SurfaceFactory + 'static) -> Self {
        Self {
            factory: Arc::new(Mutex::new(Box::new(factory))),
        }
    }

    /// Creates a surface through the shared factory.
    pub fn create_surface(&self, size: Size) -> Result<Box<dyn Surface>, RenderError> {
        self.factory.lock().create_surface(size)
    }
}

impl fmt::Debug for SurfaceService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceService")
            .field("charts", &Arc::strong_count(&self.factory))
            .finish_non_exhaustive()
    }
}
