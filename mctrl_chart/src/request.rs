// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Message-style access to a [`Chart`].
//!
//! Hosts that forward control messages (for example a Win32 window procedure
//! or a scripting bridge) describe each call as a [`ChartRequest`] with raw
//! integer parameters and turn the reply into a single integer with
//! [`ChartResponse::raw`] or [`ChartRequest::failure_value`].

use core::fmt;

use peniko::Color;

use crate::axis::AxisSelector;
use crate::chart::{Chart, rejected};
use crate::data::DataSetSource;
use crate::error::ChartError;
use crate::kind::HotItem;
use crate::tooltip::{Tooltip, TooltipSource};

/// Returned by the factor exponent query when it fails.
pub const INVALID_FACTOR_EXPONENT: i64 = -666;

/// An owned tooltip passed through [`ChartRequest::SetTooltip`] and its
/// reply.
///
/// Two handles compare equal only when they own the same tooltip.
pub struct TooltipHandle(Box<dyn Tooltip>);

impl TooltipHandle {
    /// Wraps a tooltip.
    pub fn new(tooltip: impl Tooltip + 'static) -> Self {
        Self(Box::new(tooltip))
    }

    /// Takes the tooltip out of the handle.
    pub fn into_inner(self) -> Box<dyn Tooltip> {
        self.0
    }
}

impl From<Box<dyn Tooltip>> for TooltipHandle {
    fn from(tooltip: Box<dyn Tooltip>) -> Self {
        Self(tooltip)
    }
}

impl fmt::Debug for TooltipHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TooltipHandle(..)")
    }
}

impl PartialEq for TooltipHandle {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::addr_eq(&*self.0, &*other.0)
    }
}

/// One request in the message vocabulary.
///
/// Data-set indices are signed so that negative values can be rejected the
/// way the numeric interface does; axis selectors are `0` (both), `1`
/// (primary) and `2` (secondary).
#[derive(Debug)]
pub enum ChartRequest<'a> {
    /// Number of data sets.
    GetDataSetCount,
    /// Removes all data sets.
    DeleteAllDataSets,
    /// Inserts a data set; an index past the end appends.
    InsertDataSet {
        /// Position of the new data set.
        index: isize,
        /// Values or a virtual count.
        source: DataSetSource<'a>,
    },
    /// Removes a data set.
    DeleteDataSet {
        /// Data set index.
        index: isize,
    },
    /// Reads the value count of a data set and copies values into `buffer`.
    GetDataSet {
        /// Data set index.
        index: isize,
        /// Receives up to `buffer.len()` values; nothing is copied for
        /// virtual data sets.
        buffer: Option<&'a mut [i32]>,
    },
    /// Replaces the values of a data set.
    SetDataSet {
        /// Data set index.
        index: isize,
        /// Values or a virtual count.
        source: DataSetSource<'a>,
    },
    /// Reads the explicit color of a data set.
    GetDataSetColor {
        /// Data set index.
        index: isize,
    },
    /// Sets or clears the explicit color of a data set.
    SetDataSetColor {
        /// Data set index.
        index: isize,
        /// `None` restores the automatic color.
        color: Option<Color>,
    },
    /// Reads the legend text of a data set.
    GetDataSetLegend {
        /// Data set index.
        index: isize,
    },
    /// Sets or clears the legend text of a data set.
    SetDataSetLegend {
        /// Data set index.
        index: isize,
        /// New legend text.
        text: Option<&'a str>,
    },
    /// Reads the factor exponent of an axis.
    GetFactorExponent {
        /// Raw axis selector.
        axis: i32,
    },
    /// Sets the factor exponent of one or both axes.
    SetFactorExponent {
        /// Raw axis selector; `0` sets both axes.
        axis: i32,
        /// Exponent in `-9..=9`.
        exponent: i32,
    },
    /// Reads the offset of an axis.
    GetAxisOffset {
        /// Raw axis selector.
        axis: i32,
    },
    /// Sets the offset of an axis.
    SetAxisOffset {
        /// Raw axis selector.
        axis: i32,
        /// New offset.
        offset: i32,
    },
    /// Reads the name of an axis.
    GetAxisLegend {
        /// Raw axis selector.
        axis: i32,
    },
    /// Sets the name of an axis.
    SetAxisLegend {
        /// Raw axis selector.
        axis: i32,
        /// New name.
        text: Option<&'a str>,
    },
    /// Reports which tooltip the chart drives.
    GetTooltip,
    /// Installs an external tooltip, or falls back to the built-in one for
    /// `None`. Replies with the previous external tooltip.
    SetTooltip {
        /// New tooltip.
        tooltip: Option<TooltipHandle>,
    },
}

/// Successful reply to a [`ChartRequest`].
#[derive(Debug, PartialEq)]
pub enum ChartResponse {
    /// The request has no payload beyond success.
    Done,
    /// A count or an index.
    Count(usize),
    /// Value count of a data set and how many values were copied.
    DataSet {
        /// Declared value count.
        count: usize,
        /// Values written to the buffer.
        copied: usize,
    },
    /// A data set color; `None` means automatic.
    Color(Option<Color>),
    /// A legend or axis name.
    Text(Option<String>),
    /// A factor exponent or axis offset.
    Number(i32),
    /// Which tooltip the chart drives, if any.
    TooltipSource(Option<TooltipSource>),
    /// The external tooltip a [`ChartRequest::SetTooltip`] replaced.
    Tooltip(Option<TooltipHandle>),
}

impl ChartResponse {
    /// The reply as a single integer.
    ///
    /// Colors are packed as `0x00BBGGRR` with `-1` for the automatic color;
    /// texts report their length in bytes or `0` when unset. Tooltip
    /// replies are `0` without a tooltip, otherwise `1` for the built-in
    /// tooltip and `2` for an external one.
    pub fn raw(&self) -> i64 {
        match self {
            Self::Done => 1,
            Self::Count(n) | Self::DataSet { count: n, .. } => {
                i64::try_from(*n).unwrap_or(i64::MAX)
            }
            Self::Color(None) => -1,
            Self::Color(Some(color)) => {
                let [r, g, b, _] = color.to_rgba8().to_u8_array();
                i64::from(u32::from_le_bytes([r, g, b, 0]))
            }
            Self::Text(text) => text
                .as_ref()
                .map_or(0, |t| i64::try_from(t.len()).unwrap_or(i64::MAX)),
            Self::Number(n) => i64::from(*n),
            Self::TooltipSource(None) | Self::Tooltip(None) => 0,
            Self::TooltipSource(Some(TooltipSource::Tracking)) => 1,
            Self::TooltipSource(Some(TooltipSource::External)) | Self::Tooltip(Some(_)) => 2,
        }
    }
}

impl ChartRequest<'_> {
    /// The integer a numeric interface returns when this request fails.
    pub fn failure_value(&self) -> i64 {
        match self {
            Self::GetFactorExponent { .. } => INVALID_FACTOR_EXPONENT,
            Self::InsertDataSet { .. } | Self::GetDataSet { .. } | Self::GetDataSetColor { .. } => {
                -1
            }
            _ => 0,
        }
    }
}

/// The hot item as a `(set, index)` pair with `-1` for "none".
pub fn raw_hot_item(hot: Option<HotItem>) -> (isize, isize) {
    let raw = |i: usize| isize::try_from(i).unwrap_or(isize::MAX);
    match hot {
        None => (-1, -1),
        Some(HotItem { set, index }) => (raw(set), index.map_or(-1, raw)),
    }
}

impl Chart {
    /// Executes a message-style request.
    pub fn dispatch(&mut self, request: ChartRequest<'_>) -> Result<ChartResponse, ChartError> {
        match request {
            ChartRequest::GetDataSetCount => Ok(ChartResponse::Count(self.data_set_count())),
            ChartRequest::DeleteAllDataSets => {
                self.delete_all_data_sets();
                Ok(ChartResponse::Done)
            }
            ChartRequest::InsertDataSet { index, source } => {
                // Negative positions are rejected; large ones append.
                let index = self.raw_index(index)?;
                self.insert_data_set(index, source).map(ChartResponse::Count)
            }
            ChartRequest::DeleteDataSet { index } => {
                let index = self.raw_index(index)?;
                self.delete_data_set(index).map(|()| ChartResponse::Done)
            }
            ChartRequest::GetDataSet { index, buffer } => {
                let set = self.data_set(self.raw_index(index)?)?;
                let copied = match (buffer, set.values()) {
                    (Some(buffer), Some(values)) => {
                        let n = buffer.len().min(values.len());
                        buffer[..n].copy_from_slice(&values[..n]);
                        n
                    }
                    _ => 0,
                };
                Ok(ChartResponse::DataSet {
                    count: set.count(),
                    copied,
                })
            }
            ChartRequest::SetDataSet { index, source } => {
                let index = self.raw_index(index)?;
                self.set_data_set(index, source).map(|()| ChartResponse::Done)
            }
            ChartRequest::GetDataSetColor { index } => {
                let index = self.raw_index(index)?;
                self.data_set_color(index).map(ChartResponse::Color)
            }
            ChartRequest::SetDataSetColor { index, color } => {
                let index = self.raw_index(index)?;
                self.set_data_set_color(index, color)
                    .map(|()| ChartResponse::Done)
            }
            ChartRequest::GetDataSetLegend { index } => {
                let index = self.raw_index(index)?;
                let text = self.data_set_legend(index)?;
                Ok(ChartResponse::Text(text.map(str::to_owned)))
            }
            ChartRequest::SetDataSetLegend { index, text } => {
                let index = self.raw_index(index)?;
                self.set_data_set_legend(index, text)
                    .map(|()| ChartResponse::Done)
            }
            ChartRequest::GetFactorExponent { axis } => {
                let exp = self.factor_exponent(AxisSelector::try_from(axis)?)?;
                Ok(ChartResponse::Number(exp.into()))
            }
            ChartRequest::SetFactorExponent { axis, exponent } => {
                let axis = AxisSelector::try_from(axis)?;
                self.set_factor_exponent(axis, exponent)
                    .map(|()| ChartResponse::Done)
            }
            ChartRequest::GetAxisOffset { axis } => self
                .axis_offset(AxisSelector::try_from(axis)?)
                .map(ChartResponse::Number),
            ChartRequest::SetAxisOffset { axis, offset } => {
                let axis = AxisSelector::try_from(axis)?;
                self.set_axis_offset(axis, offset)
                    .map(|()| ChartResponse::Done)
            }
            ChartRequest::GetAxisLegend { axis } => {
                let text = self.axis_legend(AxisSelector::try_from(axis)?)?;
                Ok(ChartResponse::Text(text.map(str::to_owned)))
            }
            ChartRequest::SetAxisLegend { axis, text } => {
                let axis = AxisSelector::try_from(axis)?;
                self.set_axis_legend(axis, text)
                    .map(|()| ChartResponse::Done)
            }
            ChartRequest::GetTooltip => Ok(ChartResponse::TooltipSource(self.tooltip_source())),
            ChartRequest::SetTooltip { tooltip } => {
                let previous = self.set_tooltip(tooltip.map(TooltipHandle::into_inner));
                Ok(ChartResponse::Tooltip(previous.map(TooltipHandle)))
            }
        }
    }

    fn raw_index(&self, index: isize) -> Result<usize, ChartError> {
        usize::try_from(index).map_err(|_| {
            let err = ChartError::InvalidDataSetIndex {
                index,
                count: self.data_set_count(),
            };
            rejected("dispatch", err)
        })
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Size;

    use kurbo::Point;

    use super::*;
    use crate::config::ChartStyle;
    use crate::kind::ChartKind;
    use crate::testing::recording_service;

    fn chart() -> Chart {
        chart_with(ChartStyle::new(ChartKind::Line))
    }

    fn chart_with(style: ChartStyle) -> Chart {
        let (service, _) = recording_service();
        let mut chart = Chart::new(service, style);
        chart.resize(Size::new(400.0, 300.0));
        chart
    }

    struct NamedTooltip {
        name: &'static str,
    }

    impl Tooltip for NamedTooltip {
        fn set_text(&mut self, _text: &str) {}

        fn activate(&mut self, _show: bool) {}

        fn set_position(&mut self, _pos: Point) {}

        fn bubble_size(&self) -> Size {
            Size::new(self.name.len() as f64, 1.0)
        }
    }

    #[test]
    fn insert_get_delete_round_trip() {
        let mut chart = chart();
        let insert = ChartRequest::InsertDataSet {
            index: 0,
            source: DataSetSource::Values(&[1, 2, 3, 4, 5]),
        };
        assert_eq!(chart.dispatch(insert), Ok(ChartResponse::Count(0)));
        assert_eq!(
            chart.dispatch(ChartRequest::GetDataSetCount).map(|r| r.raw()),
            Ok(1)
        );

        let mut buffer = [0; 3];
        let got = chart.dispatch(ChartRequest::GetDataSet {
            index: 0,
            buffer: Some(&mut buffer),
        });
        assert_eq!(got, Ok(ChartResponse::DataSet { count: 5, copied: 3 }));
        assert_eq!(buffer, [1, 2, 3]);

        assert_eq!(
            chart.dispatch(ChartRequest::DeleteDataSet { index: 0 }),
            Ok(ChartResponse::Done)
        );
        assert_eq!(chart.data_set_count(), 0);
    }

    #[test]
    fn virtual_data_set_copies_nothing() {
        let mut chart = chart();
        chart
            .dispatch(ChartRequest::InsertDataSet {
                index: 0,
                source: DataSetSource::Virtual(4),
            })
            .unwrap();
        let mut buffer = [9; 4];
        let got = chart.dispatch(ChartRequest::GetDataSet {
            index: 0,
            buffer: Some(&mut buffer),
        });
        assert_eq!(got, Ok(ChartResponse::DataSet { count: 4, copied: 0 }));
        assert_eq!(buffer, [9; 4]);
    }

    #[test]
    fn negative_and_out_of_range_indices_fail() {
        let mut chart = chart();
        let insert = ChartRequest::InsertDataSet {
            index: -1,
            source: DataSetSource::Values(&[1]),
        };
        assert_eq!(insert.failure_value(), -1);
        assert_eq!(
            chart.dispatch(insert),
            Err(ChartError::InvalidDataSetIndex { index: -1, count: 0 })
        );
        assert!(chart.dispatch(ChartRequest::DeleteDataSet { index: 0 }).is_err());
        assert!(chart
            .dispatch(ChartRequest::GetDataSetColor { index: -3 })
            .unwrap_err()
            .is_invalid_parameter());
    }

    #[test]
    fn raw_axis_selectors() {
        let mut chart = chart();
        assert_eq!(
            chart.dispatch(ChartRequest::SetFactorExponent { axis: 0, exponent: -2 }),
            Ok(ChartResponse::Done)
        );
        assert_eq!(
            chart.dispatch(ChartRequest::GetFactorExponent { axis: 2 }),
            Ok(ChartResponse::Number(-2))
        );

        let get_both = ChartRequest::GetFactorExponent { axis: 0 };
        assert_eq!(get_both.failure_value(), INVALID_FACTOR_EXPONENT);
        assert_eq!(chart.dispatch(get_both), Err(ChartError::InvalidAxis(0)));
        assert_eq!(
            chart.dispatch(ChartRequest::SetAxisOffset { axis: 3, offset: 1 }),
            Err(ChartError::InvalidAxis(3))
        );
        assert_eq!(
            chart.dispatch(ChartRequest::SetFactorExponent { axis: 1, exponent: 10 }),
            Err(ChartError::InvalidFactorExponent(10))
        );

        chart
            .dispatch(ChartRequest::SetAxisLegend {
                axis: 1,
                text: Some("Year"),
            })
            .unwrap();
        let legend = chart.dispatch(ChartRequest::GetAxisLegend { axis: 1 }).unwrap();
        assert_eq!(legend, ChartResponse::Text(Some("Year".to_owned())));
        assert_eq!(legend.raw(), 4);
    }

    #[test]
    fn raw_colors() {
        assert_eq!(ChartResponse::Color(None).raw(), -1);
        let color = Color::from_rgb8(0x12, 0x34, 0x56);
        assert_eq!(ChartResponse::Color(Some(color)).raw(), 0x0056_3412);
    }

    #[test]
    fn hot_item_sentinels() {
        assert_eq!(raw_hot_item(None), (-1, -1));
        assert_eq!(raw_hot_item(Some(HotItem::set(2))), (2, -1));
        assert_eq!(raw_hot_item(Some(HotItem::value(1, 4))), (1, 4));
    }

    #[test]
    fn tooltip_is_set_read_back_and_replaced() {
        let mut chart = chart_with(ChartStyle::new(ChartKind::Pie).with_tooltips(true));
        let get = chart.dispatch(ChartRequest::GetTooltip).unwrap();
        assert_eq!(get, ChartResponse::TooltipSource(Some(TooltipSource::Tracking)));
        assert_eq!(get.raw(), 1);

        let first = TooltipHandle::new(NamedTooltip { name: "first" });
        let set = chart
            .dispatch(ChartRequest::SetTooltip { tooltip: Some(first) })
            .unwrap();
        assert_eq!(set, ChartResponse::Tooltip(None));
        assert_eq!(set.raw(), 0);
        assert_eq!(
            chart.dispatch(ChartRequest::GetTooltip),
            Ok(ChartResponse::TooltipSource(Some(TooltipSource::External)))
        );
        assert_eq!(chart.tooltip().map(|t| t.bubble_size().width), Some(5.0));

        let second = TooltipHandle::new(NamedTooltip { name: "second" });
        let replaced = chart
            .dispatch(ChartRequest::SetTooltip { tooltip: Some(second) })
            .unwrap();
        assert_eq!(replaced.raw(), 2);
        let ChartResponse::Tooltip(Some(previous)) = replaced else {
            panic!("expected the previous tooltip, got {replaced:?}");
        };
        assert_eq!(previous.into_inner().bubble_size().width, 5.0);
        assert_eq!(chart.tooltip().map(|t| t.bubble_size().width), Some(6.0));

        let cleared = chart
            .dispatch(ChartRequest::SetTooltip { tooltip: None })
            .unwrap();
        assert!(matches!(cleared, ChartResponse::Tooltip(Some(_))));
        assert_eq!(
            chart.dispatch(ChartRequest::GetTooltip),
            Ok(ChartResponse::TooltipSource(Some(TooltipSource::Tracking)))
        );
    }

    #[test]
    fn chart_without_tooltips_reports_none() {
        let mut chart = chart();
        let get = chart.dispatch(ChartRequest::GetTooltip).unwrap();
        assert_eq!(get, ChartResponse::TooltipSource(None));
        assert_eq!(get.raw(), 0);
        assert_eq!(ChartRequest::GetTooltip.failure_value(), 0);
    }
}
