// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG render target and surface for `mctrl_chart_demo`.

use std::sync::Arc;

use kurbo::{BezPath, Rect, Size, Stroke};
use mctrl_chart::{
    RenderError, RenderTarget, Surface, SurfaceFactory, SurfaceService, TextAnchor, TextBaseline,
    TextRun,
};
use parking_lot::Mutex;
use peniko::{Color, Fill};

/// Receives the SVG text of every presented frame.
pub(crate) type FrameSlot = Arc<Mutex<Option<String>>>;

/// SVG elements drawn so far, plus the canvas size.
#[derive(Debug)]
pub(crate) struct SvgDocument {
    size: Size,
    body: String,
}

impl SvgDocument {
    pub(crate) fn new(size: Size) -> Self {
        Self {
            size,
            body: String::new(),
        }
    }

    pub(crate) fn to_svg_string(&self) -> String {
        let mut out = String::new();
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        out.push_str(&format!(
            r#"viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
            w = self.size.width,
            h = self.size.height,
        ));
        out.push('\n');
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }
}

impl RenderTarget for SvgDocument {
    fn fill_path(&mut self, path: &BezPath, fill: Fill, color: Color) -> Result<(), RenderError> {
        self.body.push_str(&format!(r#"<path d="{}""#, path.to_svg()));
        write_paint_attr(&mut self.body, "fill", color);
        if fill == Fill::EvenOdd {
            self.body.push_str(r#" fill-rule="evenodd""#);
        }
        self.body.push_str("/>\n");
        Ok(())
    }

    fn stroke_path(
        &mut self,
        path: &BezPath,
        stroke: &Stroke,
        color: Color,
    ) -> Result<(), RenderError> {
        self.body
            .push_str(&format!(r#"<path d="{}" fill="none""#, path.to_svg()));
        write_paint_attr(&mut self.body, "stroke", color);
        self.body
            .push_str(&format!(r#" stroke-width="{}"/>"#, stroke.width));
        self.body.push('\n');
        Ok(())
    }

    fn draw_text(&mut self, run: &TextRun<'_>) -> Result<(), RenderError> {
        let baseline = match run.baseline {
            TextBaseline::Hanging => "hanging",
            TextBaseline::Middle => "middle",
            TextBaseline::Alphabetic => "alphabetic",
        };
        self.body.push_str(&format!(
            r#"<text x="{}" y="{}" font-size="{}" font-family="{}" dominant-baseline="{}""#,
            run.pos.x,
            run.pos.y,
            run.style.font_size,
            escape_xml(run.style.font_family.as_css_family()),
            baseline,
        ));
        if run.angle != 0.0 {
            self.body.push_str(&format!(
                r#" transform="rotate({} {} {})""#,
                run.angle, run.pos.x, run.pos.y
            ));
        }
        self.body.push_str(match run.anchor {
            TextAnchor::Start => r#" text-anchor="start""#,
            TextAnchor::Middle => r#" text-anchor="middle""#,
            TextAnchor::End => r#" text-anchor="end""#,
        });
        write_paint_attr(&mut self.body, "fill", run.color);
        self.body.push('>');
        self.body.push_str(&escape_xml(run.text));
        self.body.push_str("</text>\n");
        Ok(())
    }
}

/// An [`SvgDocument`] that hands each finished frame to a [`FrameSlot`].
#[derive(Debug)]
struct SvgSurface {
    doc: SvgDocument,
    slot: FrameSlot,
}

impl RenderTarget for SvgSurface {
    fn fill_path(&mut self, path: &BezPath, fill: Fill, color: Color) -> Result<(), RenderError> {
        self.doc.fill_path(path, fill, color)
    }

    fn stroke_path(
        &mut self,
        path: &BezPath,
        stroke: &Stroke,
        color: Color,
    ) -> Result<(), RenderError> {
        self.doc.stroke_path(path, stroke, color)
    }

    fn draw_text(&mut self, run: &TextRun<'_>) -> Result<(), RenderError> {
        self.doc.draw_text(run)
    }
}

impl Surface for SvgSurface {
    fn begin_draw(&mut self) {
        self.doc.body.clear();
    }

    fn clear(&mut self, rect: Rect, color: Color) -> Result<(), RenderError> {
        self.doc.body.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}""#,
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height(),
        ));
        write_paint_attr(&mut self.doc.body, "fill", color);
        self.doc.body.push_str("/>\n");
        Ok(())
    }

    fn end_draw(&mut self) -> Result<(), RenderError> {
        *self.slot.lock() = Some(self.doc.to_svg_string());
        Ok(())
    }
}

#[derive(Debug)]
struct SvgFactory {
    slot: FrameSlot,
}

impl SurfaceFactory for SvgFactory {
    fn create_surface(&mut self, size: Size) -> Result<Box<dyn Surface>, RenderError> {
        tracing::debug!(?size, "creating svg surface");
        Ok(Box::new(SvgSurface {
            doc: SvgDocument::new(size),
            slot: Arc::clone(&self.slot),
        }))
    }
}

/// A surface service drawing SVG; presented frames land in the returned slot.
pub(crate) fn service() -> (SurfaceService, FrameSlot) {
    let slot = FrameSlot::default();
    let factory = SvgFactory {
        slot: Arc::clone(&slot),
    };
    (SurfaceService::new(factory), slot)
}

fn svg_paint(color: Color) -> (String, Option<f64>) {
    let rgba = color.to_rgba8();
    let value = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
    let opacity = if rgba.a == 255 {
        None
    } else {
        Some(f64::from(rgba.a) / 255.0)
    };
    (value, opacity)
}

fn write_paint_attr(out: &mut String, name: &str, color: Color) {
    let (value, opacity) = svg_paint(color);
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
