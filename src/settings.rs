//! User-configurable dashboard settings.
//!
//! Settings travel alongside the persisted layout but outside it: the layout
//! wire document carries geometry only, while these knobs (chart interval,
//! style, widget toggles, per-tier default chart sizes) are serialized as a
//! separate record.

use serde::{Deserialize, Serialize};

use crate::breakpoint::BreakpointKey;
use crate::geometry::Size;

/// Candle interval shown on every chart widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "15")]
    Min15,
    #[default]
    #[serde(rename = "30")]
    Min30,
    #[serde(rename = "60")]
    Hour1,
    #[serde(rename = "240")]
    Hour4,
    #[serde(rename = "D")]
    Day,
    #[serde(rename = "W")]
    Week,
}

/// Chart rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    #[default]
    Candles,
    Line,
    Bars,
}

/// Default chart size per responsive tier, used when auto-placing new charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub struct DefaultSizes {
    pub lg: Size,
    pub md: Size,
    pub sm: Size,
    pub xs: Size,
    pub xxs: Size,
}

impl DefaultSizes {
    pub fn get(&self, key: BreakpointKey) -> Size {
        match key {
            BreakpointKey::Lg => self.lg,
            BreakpointKey::Md => self.md,
            BreakpointKey::Sm => self.sm,
            BreakpointKey::Xs => self.xs,
            BreakpointKey::Xxs => self.xxs,
        }
    }

    pub fn set(&mut self, key: BreakpointKey, size: Size) {
        match key {
            BreakpointKey::Lg => self.lg = size,
            BreakpointKey::Md => self.md = size,
            BreakpointKey::Sm => self.sm = size,
            BreakpointKey::Xs => self.xs = size,
            BreakpointKey::Xxs => self.xxs = size,
        }
    }
}

impl Default for DefaultSizes {
    fn default() -> Self {
        Self {
            lg: Size::new(24, 18),
            md: Size::new(20, 18),
            sm: Size::new(12, 18),
            xs: Size::new(12, 18),
            xxs: Size::new(12, 18),
        }
    }
}

/// Full settings record for one dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub interval: Interval,
    pub chart_style: ChartStyle,
    pub hide_top_toolbar: bool,
    pub hide_side_toolbar: bool,
    pub hide_legend: bool,
    pub hide_volume: bool,
    pub with_date_ranges: bool,
    /// When false, pointer gestures move the grid tile instead of driving
    /// the embedded chart.
    pub enable_chart_operation: bool,
    pub default_sizes: DefaultSizes,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            interval: Interval::default(),
            chart_style: ChartStyle::default(),
            hide_top_toolbar: true,
            hide_side_toolbar: true,
            hide_legend: false,
            hide_volume: false,
            with_date_ranges: false,
            enable_chart_operation: false,
            default_sizes: DefaultSizes::default(),
        }
    }
}
