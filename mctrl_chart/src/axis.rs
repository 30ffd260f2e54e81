// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis configuration, "nice number" rounding and value formatting.

use std::fmt::Write as _;

use crate::error::ChartError;

/// Display configuration of one chart axis.
///
/// Nothing here touches stored data: the factor exponent and the offset only
/// change how values are *displayed* (labels, tooltips) and where the
/// displayed bounds of the axis are rounded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Axis {
    /// Power-of-ten display scale, `-9..=9`.
    pub factor_exp: i8,
    /// Added to a raw value before it is formatted.
    pub offset: i32,
    /// Optional axis name drawn next to the axis.
    pub name: Option<String>,
}

impl Axis {
    /// Smallest accepted factor exponent.
    pub const MIN_FACTOR_EXP: i32 = -9;
    /// Largest accepted factor exponent.
    pub const MAX_FACTOR_EXP: i32 = 9;

    /// Validates a factor exponent.
    pub fn check_factor_exp(exp: i32) -> Result<i8, ChartError> {
        if !(Self::MIN_FACTOR_EXP..=Self::MAX_FACTOR_EXP).contains(&exp) {
            return Err(ChartError::InvalidFactorExponent(exp));
        }
        i8::try_from(exp).map_err(|_| ChartError::InvalidFactorExponent(exp))
    }

    /// Formats `raw` for display; see [`format_value`].
    pub fn format(&self, raw: i32, decimal_separator: char) -> String {
        format_value(self, raw, decimal_separator)
    }

    /// Converts a raw value into displayed (offset-adjusted) space.
    pub(crate) fn displayed(&self, raw: i64) -> i64 {
        raw.saturating_add(i64::from(self.offset))
    }
}

/// Selects an axis in the request vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisSelector {
    /// Both axes (only meaningful for setters that accept it).
    Both,
    /// The primary (X-like) axis.
    Primary,
    /// The secondary (Y-like) axis.
    Secondary,
}

impl TryFrom<i32> for AxisSelector {
    type Error = ChartError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Both),
            1 => Ok(Self::Primary),
            2 => Ok(Self::Secondary),
            _ => Err(ChartError::InvalidAxis(raw)),
        }
    }
}

impl From<AxisSelector> for i32 {
    fn from(sel: AxisSelector) -> Self {
        match sel {
            AxisSelector::Both => 0,
            AxisSelector::Primary => 1,
            AxisSelector::Secondary => 2,
        }
    }
}

const NICE_NUMBERS: [i32; 71] = [
    1,
    2,
    5,
    10,
    12,
    15,
    20,
    30,
    50,
    60,
    80,
    100,
    120,
    150,
    200,
    300,
    500,
    600,
    800,
    1_000,
    1_200,
    1_500,
    2_000,
    3_000,
    5_000,
    6_000,
    8_000,
    10_000,
    12_000,
    15_000,
    20_000,
    30_000,
    50_000,
    60_000,
    80_000,
    100_000,
    120_000,
    150_000,
    200_000,
    300_000,
    500_000,
    600_000,
    800_000,
    1_000_000,
    1_200_000,
    1_500_000,
    2_000_000,
    3_000_000,
    5_000_000,
    6_000_000,
    8_000_000,
    10_000_000,
    12_000_000,
    15_000_000,
    20_000_000,
    30_000_000,
    50_000_000,
    60_000_000,
    80_000_000,
    100_000_000,
    120_000_000,
    150_000_000,
    200_000_000,
    300_000_000,
    500_000_000,
    600_000_000,
    800_000_000,
    1_000_000_000,
    1_200_000_000,
    1_500_000_000,
    2_000_000_000,
];

const NICE_MAX: i32 = NICE_NUMBERS[NICE_NUMBERS.len() - 1];

/// Rounds `value` to a "nice" number.
///
/// The result is the nearest member of the nice table (`1, 2, 5`, then
/// `10, 12, 15, 20, 30, 50, 60, 80` times powers of ten up to
/// `2_000_000_000`) in the requested direction. Zero maps to zero; negative
/// values round their magnitude the other way. Values past the end of the
/// table saturate to the table maximum or to the `i32` limits.
pub fn round_value(value: i32, up: bool) -> i32 {
    if value == 0 {
        return 0;
    }

    if value < 0 {
        if value < -NICE_MAX {
            return if up { -NICE_MAX } else { i32::MIN };
        }
        return -round_value(-value, !up);
    }

    if value > NICE_MAX {
        return if up { i32::MAX } else { NICE_MAX };
    }

    // Most charts have small values, so a linear scan from the bottom beats a
    // binary search in practice. `value <= NICE_MAX` keeps the scan inside
    // the table.
    let mut i = 0;
    while value > NICE_NUMBERS[i] {
        i += 1;
    }

    if value == NICE_NUMBERS[i] || up {
        NICE_NUMBERS[i]
    } else {
        // `value > 1` here, so `i > 0`.
        NICE_NUMBERS[i - 1]
    }
}

/// [`round_value`] for the wider intermediate integers used by layout.
pub(crate) fn round_value_i64(value: i64, up: bool) -> i64 {
    let clamped = value.clamp(i64::from(i32::MIN), i64::from(i32::MAX));
    i32::try_from(clamped).map_or(clamped, |v| i64::from(round_value(v, up)))
}

/// Formats `raw` for display on `axis`.
///
/// The axis offset is added first. A zero factor exponent prints a plain
/// integer; a positive one appends that many zeros; a negative one treats the
/// value as fixed point with `-factor_exp` fractional digits, separated by
/// `decimal_separator`.
pub fn format_value(axis: &Axis, raw: i32, decimal_separator: char) -> String {
    format_wide(axis, i64::from(raw), decimal_separator)
}

/// [`format_value`] for stacked sums and grid positions, which may leave the
/// `i32` range.
pub(crate) fn format_wide(axis: &Axis, raw: i64, decimal_separator: char) -> String {
    let value = axis.displayed(raw);
    let exp = i32::from(axis.factor_exp);
    let mut out = String::new();

    if exp >= 0 {
        let _ = write!(out, "{value}");
        for _ in 0..exp {
            out.push('0');
        }
        return out;
    }

    let digits = exp.unsigned_abs() as usize;
    let factor = 10_u64.pow(exp.unsigned_abs());
    let magnitude = value.unsigned_abs();
    let whole = magnitude / factor;
    let frac = magnitude % factor;
    if value < 0 {
        out.push('-');
    }
    let _ = write!(out, "{whole}{decimal_separator}{frac:0digits$}");
    out
}
