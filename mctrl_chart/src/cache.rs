// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform value access over direct and virtual data sets.

use core::ops::Range;

use smallvec::SmallVec;

use crate::data::{ChartNotify, DataSet};

#[derive(Clone, Debug)]
enum Slot<'a> {
    Direct(&'a [i32]),
    Scratch(Range<usize>),
    Missing,
}

/// Values of all data sets, materialized once per paint or hit-test pass.
///
/// Direct data sets are borrowed as they are; every virtual data set is
/// fetched with one batched request into a scratch buffer.
#[derive(Clone, Debug)]
pub struct ValueCache<'a> {
    data: &'a [DataSet],
    slots: SmallVec<[Slot<'a>; 8]>,
    scratch: Vec<i32>,
}

impl<'a> ValueCache<'a> {
    /// Materializes the values of `data`, asking `notify` for virtual sets.
    pub fn materialize(data: &'a [DataSet], mut notify: Option<&mut dyn ChartNotify>) -> Self {
        let scratch_len: usize = data
            .iter()
            .filter(|d| d.values.is_none())
            .map(|d| d.count)
            .sum();

        let mut scratch = Vec::new();
        let have_scratch = scratch.try_reserve_exact(scratch_len).is_ok();
        if have_scratch {
            scratch.resize(scratch_len, 0);
        } else {
            tracing::warn!(scratch_len, "cannot allocate value cache; virtual data reads as zero");
        }

        let mut slots = SmallVec::with_capacity(data.len());
        let mut next = 0;
        for (set, d) in data.iter().enumerate() {
            if let Some(values) = &d.values {
                slots.push(Slot::Direct(values));
                continue;
            }
            if !have_scratch || d.count == 0 {
                slots.push(Slot::Missing);
                continue;
            }

            let range = next..next + d.count;
            next += d.count;
            let fetched = match notify.as_deref_mut() {
                Some(n) => n.fetch_values(set, 0, d.count - 1, &mut scratch[range.clone()]),
                None => false,
            };
            if !fetched {
                tracing::debug!(set, "virtual data set not supplied by the notify target");
            }
            slots.push(Slot::Scratch(range));
        }

        Self {
            data,
            slots,
            scratch,
        }
    }

    /// Number of data sets.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the chart has no data sets.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Declared value count of data set `set` (0 for unknown sets).
    pub fn count(&self, set: usize) -> usize {
        self.data.get(set).map_or(0, |d| d.count)
    }

    /// Largest value count over all data sets.
    pub fn max_count(&self) -> usize {
        self.data.iter().map(|d| d.count).max().unwrap_or(0)
    }

    /// Value `i` of data set `set`.
    ///
    /// Indices beyond the data set's count read as 0, which lets data sets of
    /// unequal length stack and align sensibly.
    pub fn value(&self, set: usize, i: usize) -> i32 {
        let values = match self.slots.get(set) {
            Some(Slot::Direct(values)) => *values,
            Some(Slot::Scratch(range)) => &self.scratch[range.clone()],
            Some(Slot::Missing) | None => return 0,
        };
        values.get(i).copied().unwrap_or(0)
    }

    /// Sum of value `i` over data sets `0..=set`.
    pub fn stacked(&self, set: usize, i: usize) -> i64 {
        (0..=set).map(|k| i64::from(self.value(k, i))).sum()
    }

    /// Sum of value `i` over data sets `0..set` (the level `set` stacks onto).
    pub fn stacked_below(&self, set: usize, i: usize) -> i64 {
        (0..set).map(|k| i64::from(self.value(k, i))).sum()
    }
}
