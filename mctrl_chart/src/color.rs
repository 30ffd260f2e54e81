// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Automatic data-set colors and hover hints.

use peniko::Color;
use peniko::color::{AlphaColor, Hsl, Srgb};

/// Returns the `index`-th color of the automatic color sequence.
///
/// Hues are generated by "pie cutting": the first round cuts the hue circle
/// three times (red, green, blue); round `N` cuts `3 * 2^N` times exactly
/// between the cuts of all previous rounds, cycling over the three 120°
/// segments so neighbouring indices stay far apart.
pub fn color_seq(index: usize) -> Color {
    let h = if index < 3 {
        120.0 * index as f64
    } else {
        let n = (index / 3).ilog2();
        let base = 3usize << n;
        let i = index - base;
        180.0 / base as f64 + (i / 3) as f64 * (360.0 / base as f64) + (i % 3) as f64 * 120.0
    };
    let s = 80.0 + 20.0 * ((index / 4) as f64).cos();
    let l = 50.0 + 30.0 * ((index / 3) as f64).sin();

    #[allow(clippy::cast_possible_truncation, reason = "color components are f32")]
    let hsl = AlphaColor::<Hsl>::new([(h % 360.0) as f32, s as f32, l as f32, 1.0]);
    hsl.convert::<Srgb>()
}

/// Returns a lighter, less saturated variant of `color` used for hover auras.
pub fn color_hint(color: Color) -> Color {
    let hsl = color.convert::<Hsl>();
    let [h, s, l, a] = hsl.components;
    let h = if h.is_finite() { h } else { 0.0 };
    AlphaColor::<Hsl>::new([h, s / 2.0, (l + 100.0) / 2.0, a]).convert::<Srgb>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_colors_are_distinct_primaries() {
        let c0 = color_seq(0).to_rgba8();
        let c1 = color_seq(1).to_rgba8();
        let c2 = color_seq(2).to_rgba8();
        assert!(c0.r > c0.g && c0.r > c0.b, "index 0 is reddish: {c0:?}");
        assert!(c1.g > c1.r && c1.g > c1.b, "index 1 is greenish: {c1:?}");
        assert!(c2.b > c2.r && c2.b > c2.g, "index 2 is bluish: {c2:?}");
    }

    #[test]
    fn sequence_is_deterministic() {
        for i in 0..32 {
            assert_eq!(color_seq(i).to_rgba8(), color_seq(i).to_rgba8());
        }
    }

    #[test]
    fn hint_is_lighter() {
        let base = Color::from_rgb8(0x20, 0x40, 0xa0);
        let hint = color_hint(base).to_rgba8();
        let base = base.to_rgba8();
        let sum = |c: peniko::color::Rgba8| u32::from(c.r) + u32::from(c.g) + u32::from(c.b);
        assert!(sum(hint) > sum(base), "{hint:?} should be lighter than {base:?}");
    }
}
