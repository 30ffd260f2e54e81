// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear value <-> pixel mapping.

/// A linear mapping from a continuous domain to a continuous range.
///
/// The range may be inverted (`r0 > r1`); vertical value axes use that to
/// grow upwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Maps a value from range space back into domain space.
    pub fn invert(&self, y: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return d0;
        }
        let t = (y - r0) / denom;
        d0 + t * (d1 - d0)
    }

    /// Pixel distance covered by `delta` domain units (always non-negative).
    pub fn extent_of(&self, delta: f64) -> f64 {
        (self.map(delta) - self.map(0.0)).abs()
    }

    /// The domain as `(min, max)`.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// The range as `(start, end)`.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_and_invert_round_trip() {
        let s = ScaleLinear::new((-20.0, 80.0), (300.0, 100.0));
        assert_eq!(s.map(-20.0), 300.0);
        assert_eq!(s.map(80.0), 100.0);
        for v in [-20.0, -3.5, 0.0, 17.0, 80.0] {
            assert!((s.invert(s.map(v)) - v).abs() < 1e-9);
        }
        assert_eq!(s.extent_of(10.0), 20.0);
    }

    #[test]
    fn degenerate_domain_maps_to_start() {
        let s = ScaleLinear::new((5.0, 5.0), (10.0, 20.0));
        assert_eq!(s.map(7.0), 10.0);
        let s = ScaleLinear::new((0.0, 1.0), (10.0, 10.0));
        assert_eq!(s.invert(10.0), 0.0);
    }
}
