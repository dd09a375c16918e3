//! # onair-layout
//!
//! Label placement for onair timeline rows.
//!
//! This crate provides:
//! - Text width measurement behind the `TextMeasure` trait
//! - The inside-or-outside decision for team and digest labels
//! - Greedy lane packing of outside labels above and below each row
//! - Row and chart vertical extents
//!
//! All horizontal quantities are seconds on the fixed axis; vertical
//! quantities are row units with y growing upward, rows `row_pitch` apart.
//!
//! ## Example
//!
//! ```rust
//! use onair_core::SheetTimeline;
//! use onair_layout::{EstimatedMetrics, LayoutConfig, TimelineLayout};
//!
//! let sheets = vec![SheetTimeline::new("2019", vec![], false)];
//! let layout = TimelineLayout::compute(&sheets, &LayoutConfig::default(), &EstimatedMetrics::default());
//! assert_eq!(layout.rows.len(), 1);
//! ```

pub mod labels;
pub mod lanes;
pub mod measure;

pub use labels::{
    digest_label, InsideLabel, LabelPlacement, LabelPlanner, OutsideLabelRequest, RowLabels,
};
pub use lanes::{Band, BandPolicy, LaneAssigner, LeaderLine, PlacedLabel, RowExtent};
pub use measure::{EstimatedMetrics, FontStyle, TextMeasure};

use onair_core::SheetTimeline;
use tracing::debug;

/// Geometry and scale of the chart
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Left end of the time axis in seconds
    pub axis_start: f64,
    /// Right end of the time axis in seconds
    pub axis_end: f64,
    /// Pixel width the axis is mapped onto
    pub plot_width_px: f64,
    /// Layout resolution used to convert points to pixels
    pub dpi: f64,
    /// Label font size in points
    pub font_size_pt: f64,
    /// Seconds added to every measured label width
    pub label_padding: f64,
    /// Distance from a span's right edge to its outside label
    pub preferred_offset: f64,
    /// Distance between row centers in row units
    pub row_pitch: f64,
    /// Half the bar height in row units
    pub bar_half_height: f64,
    /// Distance from the bar edge to the first lane
    pub lane_gap: f64,
    /// Distance between consecutive lanes
    pub lane_spacing: f64,
    /// Minimum horizontal gap between labels of one lane, in seconds
    pub min_label_gap: f64,
    pub left_margin: f64,
    pub right_margin: f64,
    /// Padding above and below the outermost labels
    pub vertical_padding: f64,
    pub band_policy: BandPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            axis_start: 0.0,
            axis_end: 7200.0,
            plot_width_px: 2700.0,
            dpi: 150.0,
            font_size_pt: 8.0,
            label_padding: 6.0,
            preferred_offset: 6.0,
            row_pitch: 1.6,
            bar_half_height: 0.35,
            lane_gap: 0.12,
            lane_spacing: 0.22,
            min_label_gap: 10.0,
            left_margin: 8.0,
            right_margin: 12.0,
            vertical_padding: 0.25,
            band_policy: BandPolicy::Alternate,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the pixel width of the plot area
    pub fn plot_width_px(mut self, width: f64) -> Self {
        self.plot_width_px = width;
        self
    }

    /// Configure the label font size in points
    pub fn font_size_pt(mut self, size: f64) -> Self {
        self.font_size_pt = size;
        self
    }

    pub fn label_padding(mut self, seconds: f64) -> Self {
        self.label_padding = seconds;
        self
    }

    pub fn band_policy(mut self, policy: BandPolicy) -> Self {
        self.band_policy = policy;
        self
    }

    pub fn axis_length(&self) -> f64 {
        self.axis_end - self.axis_start
    }

    pub fn seconds_per_px(&self) -> f64 {
        self.axis_length() / self.plot_width_px
    }

    /// Label font size in layout pixels
    pub fn font_px(&self) -> f64 {
        self.font_size_pt * self.dpi / 72.0
    }

    /// Center of row `index`
    pub fn row_center(&self, index: usize) -> f64 {
        index as f64 * self.row_pitch
    }
}

/// Labels and extent of one row
#[derive(Clone, Debug, PartialEq)]
pub struct RowLayout {
    /// Row center in row units
    pub y_base: f64,
    pub inside: Vec<InsideLabel>,
    pub outside: Vec<PlacedLabel>,
    pub extent: RowExtent,
}

impl RowLayout {
    /// Plan and place the labels of `sheet` on the row centered at `y_base`
    pub fn compute<M: TextMeasure + ?Sized>(
        sheet: &SheetTimeline,
        y_base: f64,
        config: &LayoutConfig,
        measure: &M,
    ) -> Self {
        let labels = LabelPlanner::new(config, measure).plan_sheet(sheet);
        let (outside, extent) = LaneAssigner::new(config).place_row(labels.outside, y_base);

        debug!(
            sheet = %sheet.name,
            inside = labels.inside.len(),
            outside = outside.len(),
            top = extent.top,
            bottom = extent.bottom,
            "row laid out"
        );

        Self {
            y_base,
            inside: labels.inside,
            outside,
            extent,
        }
    }
}

/// Layout of every row of the chart
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineLayout {
    /// One entry per sheet, first sheet at y = 0
    pub rows: Vec<RowLayout>,
    /// Union of all row extents
    pub extent: RowExtent,
    pub vertical_padding: f64,
}

impl TimelineLayout {
    pub fn compute<M: TextMeasure + ?Sized>(
        sheets: &[SheetTimeline],
        config: &LayoutConfig,
        measure: &M,
    ) -> Self {
        let rows: Vec<RowLayout> = sheets
            .iter()
            .enumerate()
            .map(|(i, sheet)| RowLayout::compute(sheet, config.row_center(i), config, measure))
            .collect();

        let extent = rows
            .iter()
            .map(|r| r.extent)
            .reduce(RowExtent::union)
            .unwrap_or_else(|| RowExtent::bar(0.0, config.bar_half_height));

        Self {
            rows,
            extent,
            vertical_padding: config.vertical_padding,
        }
    }

    /// Visible vertical range `(bottom, top)` in row units
    pub fn y_bounds(&self) -> (f64, f64) {
        (
            self.extent.bottom - self.vertical_padding,
            self.extent.top + self.vertical_padding,
        )
    }

    /// Total number of outside labels across all rows
    pub fn outside_label_count(&self) -> usize {
        self.rows.iter().map(|r| r.outside.len()).sum()
    }
}
