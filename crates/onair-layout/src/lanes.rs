//! Lane assignment for outside labels
//!
//! Requests are sorted by anchor, split into a band above and a band below
//! the bar, and packed greedily: each band keeps a list of lanes stacked
//! outward from the bar edge, and a label takes the first lane whose
//! rightmost occupied x leaves room for it before the right margin. When
//! no lane has room a new one is opened, so every request is placed.

use tracing::trace;

use crate::{FontStyle, LayoutConfig, OutsideLabelRequest};

/// Region above or below a row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Band {
    Top,
    Bottom,
}

impl Band {
    /// +1 for the top band, -1 for the bottom band (y grows upward)
    pub const fn direction(self) -> f64 {
        match self {
            Band::Top => 1.0,
            Band::Bottom => -1.0,
        }
    }
}

/// How sorted requests are distributed between the two bands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BandPolicy {
    /// Even positions above, odd positions below
    #[default]
    Alternate,
    /// Everything above the bar
    TopOnly,
}

impl BandPolicy {
    pub fn band_for(self, position: usize) -> Band {
        match self {
            BandPolicy::Alternate if position % 2 == 1 => Band::Bottom,
            _ => Band::Top,
        }
    }
}

/// Connector from a placed label back to its bar
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeaderLine {
    /// Label anchor point `(x, y)`
    pub from: (f64, f64),
    /// Bar edge point `(anchor_x, edge_y)`
    pub to: (f64, f64),
}

/// An outside label with its final position
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLabel {
    pub text: String,
    /// Left edge in seconds
    pub x: f64,
    /// Lane offset in row units
    pub y: f64,
    /// Width in seconds
    pub width: f64,
    pub anchor_x: f64,
    pub band: Band,
    pub lane: usize,
    pub style: FontStyle,
    pub leader: LeaderLine,
}

impl PlacedLabel {
    pub fn right_edge(&self) -> f64 {
        self.x + self.width
    }
}

/// Vertical extent of a row in row units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowExtent {
    /// Highest y used above the row
    pub top: f64,
    /// Lowest y used below the row
    pub bottom: f64,
}

impl RowExtent {
    /// Extent of the bare bar centered at `y_base`
    pub fn bar(y_base: f64, bar_half_height: f64) -> Self {
        Self {
            top: y_base + bar_half_height,
            bottom: y_base - bar_half_height,
        }
    }

    pub fn include(&mut self, y: f64) {
        self.top = self.top.max(y);
        self.bottom = self.bottom.min(y);
    }

    pub fn union(self, other: RowExtent) -> RowExtent {
        RowExtent {
            top: self.top.max(other.top),
            bottom: self.bottom.min(other.bottom),
        }
    }
}

/// Greedy lane packer for one row at a time
pub struct LaneAssigner<'a> {
    config: &'a LayoutConfig,
}

impl<'a> LaneAssigner<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Place every request of the row centered at `y_base`
    pub fn place_row(
        &self,
        mut requests: Vec<OutsideLabelRequest>,
        y_base: f64,
    ) -> (Vec<PlacedLabel>, RowExtent) {
        let mut extent = RowExtent::bar(y_base, self.config.bar_half_height);
        if requests.is_empty() {
            return (Vec::new(), extent);
        }

        requests.sort_by(|a, b| a.anchor_x.total_cmp(&b.anchor_x));

        let mut top = Vec::new();
        let mut bottom = Vec::new();
        for (position, request) in requests.into_iter().enumerate() {
            match self.config.band_policy.band_for(position) {
                Band::Top => top.push(request),
                Band::Bottom => bottom.push(request),
            }
        }

        let mut placed = Vec::with_capacity(top.len() + bottom.len());
        self.place_band(top, Band::Top, y_base, &mut placed, &mut extent);
        self.place_band(bottom, Band::Bottom, y_base, &mut placed, &mut extent);

        (placed, extent)
    }

    fn place_band(
        &self,
        requests: Vec<OutsideLabelRequest>,
        band: Band,
        y_base: f64,
        placed: &mut Vec<PlacedLabel>,
        extent: &mut RowExtent,
    ) {
        let c = self.config;
        let direction = band.direction();
        let bar_edge = y_base + direction * c.bar_half_height;
        let first_lane_y = y_base + direction * (c.bar_half_height + c.lane_gap);
        let left_limit = c.axis_start + c.left_margin;
        let right_limit = c.axis_end - c.right_margin;

        // Rightmost occupied x per lane
        let mut lane_end: Vec<f64> = Vec::new();

        for request in requests {
            let width = request.width;
            let candidate = request.preferred_x.min(right_limit - width).max(left_limit);

            let free_lane = lane_end
                .iter()
                .position(|&end| end + c.min_label_gap <= right_limit - width);
            let (lane, x) = match free_lane {
                Some(lane) => (lane, candidate.max(lane_end[lane] + c.min_label_gap)),
                None => {
                    lane_end.push(candidate);
                    (lane_end.len() - 1, candidate)
                }
            };
            lane_end[lane] = x + width;

            let y = first_lane_y + direction * lane as f64 * c.lane_spacing;
            extent.include(y);

            placed.push(PlacedLabel {
                leader: LeaderLine {
                    from: (x, y),
                    to: (request.anchor_x, bar_edge),
                },
                text: request.text,
                x,
                y,
                width,
                anchor_x: request.anchor_x,
                band,
                lane,
                style: request.style,
            });
        }

        trace!(?band, lanes = lane_end.len(), "band packed");
    }
}
