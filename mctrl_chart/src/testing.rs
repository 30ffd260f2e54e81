// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test fixtures: a ready-made chart view and render targets that record
//! what gets drawn.

use std::sync::Arc;

use kurbo::{BezPath, Point, Rect, Shape, Size, Stroke};
use mctrl_text::{FontMetrics, HeuristicTextMeasurer};
use parking_lot::Mutex;
use peniko::{Color, Fill};

use crate::axis::Axis;
use crate::cache::ValueCache;
use crate::config::ChartConfig;
use crate::data::DataSet;
use crate::error::RenderError;
use crate::kind::{ChartView, HotItem};
use crate::layout::ChartLayout;
use crate::render::{RenderTarget, Surface, SurfaceFactory, SurfaceService, TextRun};

/// Direct data sets plus everything else a [`ChartView`] borrows.
pub(crate) struct Fixture {
    pub(crate) data: Vec<DataSet>,
    pub(crate) primary: Axis,
    pub(crate) secondary: Axis,
    pub(crate) config: ChartConfig,
    pub(crate) size: Size,
}

impl Fixture {
    pub(crate) fn new(sets: &[&[i32]]) -> Self {
        Self {
            data: sets
                .iter()
                .map(|values| DataSet::new(values.len(), Some(values.to_vec())))
                .collect(),
            primary: Axis::default(),
            secondary: Axis::default(),
            config: ChartConfig::default(),
            size: Size::new(400.0, 300.0),
        }
    }

    /// Runs `f` on an untitled view measured with the heuristic measurer.
    pub(crate) fn with_view<R>(
        &self,
        hot: Option<HotItem>,
        f: impl FnOnce(&ChartView<'_, '_>) -> R,
    ) -> R {
        let cache = ValueCache::materialize(&self.data, None);
        let font = FontMetrics::measure(&HeuristicTextMeasurer, &self.config.text_style);
        let view = ChartView {
            data: &self.data,
            cache: &cache,
            primary: &self.primary,
            secondary: &self.secondary,
            hot,
            layout: ChartLayout::arrange(self.size, font, false),
            measurer: &HeuristicTextMeasurer,
            config: &self.config,
        };
        f(&view)
    }
}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DrawCall {
    Fill {
        fill: Fill,
        color: Color,
        bounds: Rect,
    },
    Stroke {
        width: f64,
        color: Color,
        bounds: Rect,
    },
    Text {
        text: String,
        pos: Point,
        angle: f64,
    },
}

#[derive(Debug, Default)]
pub(crate) struct RecordingTarget {
    pub(crate) calls: Vec<DrawCall>,
    /// Makes every fill fail with [`RenderError::Brush`].
    pub(crate) fail_fills: bool,
}

impl RecordingTarget {
    pub(crate) fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl RenderTarget for RecordingTarget {
    fn fill_path(&mut self, path: &BezPath, fill: Fill, color: Color) -> Result<(), RenderError> {
        if self.fail_fills {
            return Err(RenderError::Brush);
        }
        self.calls.push(DrawCall::Fill {
            fill,
            color,
            bounds: path.bounding_box(),
        });
        Ok(())
    }

    fn stroke_path(
        &mut self,
        path: &BezPath,
        stroke: &Stroke,
        color: Color,
    ) -> Result<(), RenderError> {
        self.calls.push(DrawCall::Stroke {
            width: stroke.width,
            color,
            bounds: path.bounding_box(),
        });
        Ok(())
    }

    fn draw_text(&mut self, run: &TextRun<'_>) -> Result<(), RenderError> {
        self.calls.push(DrawCall::Text {
            text: run.text.to_owned(),
            pos: run.pos,
            angle: run.angle,
        });
        Ok(())
    }
}

/// What the recording surfaces of one factory went through.
#[derive(Debug, Default)]
pub(crate) struct SurfaceLog {
    pub(crate) created: Vec<Size>,
    pub(crate) presented: usize,
    /// Calls of the last presented frame.
    pub(crate) frame: Vec<DrawCall>,
    /// The next `end_draw` reports a lost surface.
    pub(crate) lose_next: bool,
    /// Surface creation fails while set.
    pub(crate) fail_create: bool,
}

pub(crate) type SharedLog = Arc<Mutex<SurfaceLog>>;

struct RecordingFactory {
    log: SharedLog,
}

impl SurfaceFactory for RecordingFactory {
    fn create_surface(&mut self, size: Size) -> Result<Box<dyn Surface>, RenderError> {
        let mut log = self.log.lock();
        if log.fail_create {
            return Err(RenderError::Backend("no device".into()));
        }
        log.created.push(size);
        Ok(Box::new(RecordingSurface {
            log: Arc::clone(&self.log),
            target: RecordingTarget::default(),
        }))
    }
}

struct RecordingSurface {
    log: SharedLog,
    target: RecordingTarget,
}

impl RenderTarget for RecordingSurface {
    fn fill_path(&mut self, path: &BezPath, fill: Fill, color: Color) -> Result<(), RenderError> {
        self.target.fill_path(path, fill, color)
    }

    fn stroke_path(
        &mut self,
        path: &BezPath,
        stroke: &Stroke,
        color: Color,
    ) -> Result<(), RenderError> {
        self.target.stroke_path(path, stroke, color)
    }

    fn draw_text(&mut self, run: &TextRun<'_>) -> Result<(), RenderError> {
        self.target.draw_text(run)
    }
}

impl Surface for RecordingSurface {
    fn begin_draw(&mut self) {
        self.target.calls.clear();
    }

    fn clear(&mut self, _rect: Rect, _color: Color) -> Result<(), RenderError> {
        Ok(())
    }

    fn end_draw(&mut self) -> Result<(), RenderError> {
        let mut log = self.log.lock();
        if log.lose_next {
            log.lose_next = false;
            return Err(RenderError::SurfaceLost);
        }
        log.presented += 1;
        log.frame = core::mem::take(&mut self.target.calls);
        Ok(())
    }
}

/// A surface service whose surfaces report into the returned log.
pub(crate) fn recording_service() -> (SurfaceService, SharedLog) {
    let log = SharedLog::default();
    let factory = RecordingFactory {
        log: Arc::clone(&log),
    };
    (SurfaceService::new(factory), log)
}
