// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for chart layout.
//!
//! The chart engine needs to measure text to perform **layout** (axis label
//! margins, legend rows, pie labels) and to **hit-test** legend labels. Glyph
//! shaping and rasterization stay in the rendering backend, so chart code
//! depends on a tiny text measurement interface.
//!
//! This crate is intentionally:
//! - small and dependency-light,
//! - `no_std`-friendly (it uses `alloc` for owned font family names), and
//! - renderer-agnostic (a shaping engine or a platform text API can both
//!   implement the same trait).

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use core::cell::RefCell;

use hashbrown::HashMap;

/// A minimal text measurement interface used by chart layout.
pub trait TextMeasurer {
    /// Measure a single line of text.
    ///
    /// `text` is treated as a single line; callers should split on `\n` if they
    /// want multi-line layout.
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;

    /// Hit-test a horizontal offset against a single line of text.
    ///
    /// `x` is relative to the start of the line. The default implementation
    /// measures growing prefixes; backends with a real layout object should
    /// override it.
    fn hit_test(&self, text: &str, style: &TextStyle, x: f64) -> TextHit {
        let mut prev = 0.0;
        for (index, (offset, ch)) in text.char_indices().enumerate() {
            let end = offset + ch.len_utf8();
            let w = self.measure(&text[..end], style).advance_width;
            if x >= prev && x < w {
                return TextHit {
                    index,
                    is_inside: true,
                };
            }
            prev = w;
        }
        TextHit {
            index: text.chars().count(),
            is_inside: false,
        }
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        (**self).measure(text, style)
    }

    fn hit_test(&self, text: &str, style: &TextStyle, x: f64) -> TextHit {
        (**self).hit_test(text, style, x)
    }
}

/// Result of [`TextMeasurer::hit_test`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextHit {
    /// Index of the character under the offset (or the character count when
    /// the offset lies past the end of the text).
    pub index: usize,
    /// Whether the offset lies within the text's horizontal extent.
    pub is_inside: bool,
}

/// Text styling inputs relevant to measurement.
///
/// This is intentionally minimal: it’s just enough to make chart layout
/// consistent.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in the chart’s coordinate system (typically pixels).
    pub font_size: f64,
    /// The preferred font family.
    pub font_family: FontFamily,
    /// Font weight (e.g. `400` for normal, `700` for bold).
    pub font_weight: FontWeight,
    /// Font style (normal/italic/oblique).
    pub font_style: FontStyle,
}

impl TextStyle {
    /// Creates a default `TextStyle` with the given `font_size`.
    #[must_use]
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            font_family: FontFamily::SansSerif,
            font_weight: FontWeight::NORMAL,
            font_style: FontStyle::Normal,
        }
    }

    /// Sets the font family.
    #[must_use]
    pub fn with_family(mut self, family: FontFamily) -> Self {
        self.font_family = family;
        self
    }

    /// Sets the font weight.
    #[must_use]
    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = weight;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(12.0)
    }
}

/// Font family selection for measurement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// A generic serif family (CSS `serif`).
    Serif,
    /// A generic sans-serif family (CSS `sans-serif`).
    SansSerif,
    /// A generic monospace family (CSS `monospace`).
    Monospace,
    /// A named family (e.g. `"Segoe UI"`, `"Tahoma"`).
    Named(Arc<str>),
}

impl FontFamily {
    /// Returns the font family string for CSS-style font declarations.
    #[must_use]
    pub fn as_css_family(&self) -> &str {
        match self {
            Self::Serif => "serif",
            Self::SansSerif => "sans-serif",
            Self::Monospace => "monospace",
            Self::Named(name) => name,
        }
    }
}

/// CSS-style font weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Normal weight (`400`).
    pub const NORMAL: Self = Self(400);
    /// Bold weight (`700`).
    pub const BOLD: Self = Self(700);
}

/// CSS-style font styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Normal style.
    Normal,
    /// Italic style.
    Italic,
    /// Oblique style.
    Oblique,
}

/// Measured metrics for a single line of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// The advance width (useful for horizontal layout).
    pub advance_width: f64,
    /// Distance from baseline to the top of typical glyphs.
    pub ascent: f64,
    /// Distance from baseline to the bottom of typical glyphs.
    pub descent: f64,
    /// Additional line spacing beyond ascent+descent.
    pub leading: f64,
}

impl TextMetrics {
    /// Returns `ascent + descent + leading`.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent + self.leading
    }
}

/// Average character cell of a font: the unit chart layout measures margins in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontMetrics {
    /// Average character width.
    pub char_width: f64,
    /// Line height.
    pub line_height: f64,
    /// Ascent of the font (baseline to the top of typical glyphs).
    pub ascent: f64,
}

impl FontMetrics {
    const SAMPLE: &'static str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

    /// Measures the average character cell of `style`.
    pub fn measure(measurer: &dyn TextMeasurer, style: &TextStyle) -> Self {
        let metrics = measurer.measure(Self::SAMPLE, style);
        let n = Self::SAMPLE.len() as f64;
        Self {
            char_width: ((metrics.advance_width / n) * 2.0).round() / 2.0,
            line_height: metrics.line_height(),
            ascent: metrics.ascent,
        }
    }
}

/// A tiny heuristic text measurer suitable for demos, tests and early layout.
///
/// It assumes an average glyph width of ~0.6em and a baseline at ~0.8em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let advance_width = 0.6 * style.font_size * text.chars().count() as f64;
        let ascent = 0.8 * style.font_size;
        let descent = 0.2 * style.font_size;
        TextMetrics {
            advance_width,
            ascent,
            descent,
            leading: 0.0,
        }
    }

    fn hit_test(&self, text: &str, style: &TextStyle, x: f64) -> TextHit {
        let count = text.chars().count();
        let glyph = 0.6 * style.font_size;
        if x < 0.0 || glyph <= 0.0 {
            return TextHit {
                index: 0,
                is_inside: false,
            };
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "non-negative and clamped to the character count"
        )]
        let index = ((x / glyph).floor() as usize).min(count);
        TextHit {
            index,
            is_inside: index < count,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    size_bits: u64,
    family: FontFamily,
    weight: FontWeight,
    style: FontStyle,
}

impl CacheKey {
    fn new(text: &str, style: &TextStyle) -> Self {
        Self {
            text: String::from(text),
            size_bits: style.font_size.to_bits(),
            family: style.font_family.clone(),
            weight: style.font_weight,
            style: style.font_style,
        }
    }
}

/// A memoizing wrapper around another [`TextMeasurer`].
///
/// Axis labels and legend rows are measured on every repaint and every
/// pointer move; most of those strings repeat, so caching them avoids
/// repeated shaping in the wrapped backend. Hit-testing is forwarded
/// uncached.
pub struct MeasureCache<M> {
    inner: M,
    entries: RefCell<HashMap<CacheKey, TextMetrics>>,
    capacity: usize,
}

impl<M> core::fmt::Debug for MeasureCache<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MeasureCache")
            .field("entries", &self.entries.borrow().len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<M: TextMeasurer> MeasureCache<M> {
    /// Wraps `inner`, keeping at most `capacity` entries.
    ///
    /// When the cache is full it is cleared wholesale; chart label sets are
    /// small and stable, so a smarter eviction policy buys nothing.
    pub fn new(inner: M, capacity: usize) -> Self {
        Self {
            inner,
            entries: RefCell::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Returns the wrapped measurer.
    pub fn inner(&self) -> &M {
        &self.inner
    }

    /// Number of cached measurements.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drops all cached measurements (e.g. after a font change).
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl<M: TextMeasurer> TextMeasurer for MeasureCache<M> {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let key = CacheKey::new(text, style);
        if let Some(metrics) = self.entries.borrow().get(&key) {
            return *metrics;
        }
        let metrics = self.inner.measure(text, style);
        let mut entries = self.entries.borrow_mut();
        if entries.len() >= self.capacity {
            entries.clear();
        }
        entries.insert(key, metrics);
        metrics
    }

    fn hit_test(&self, text: &str, style: &TextStyle, x: f64) -> TextHit {
        self.inner.hit_test(text, style, x)
    }
}
