//! Segment fill colors

use crate::Markers;

/// Fill color of a segment bar
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentColor {
    /// Human-powered aircraft, pre-recorded footage
    HumanPoweredVtr,
    HumanPowered,
    /// Glider, pre-recorded footage
    GliderVtr,
    Glider,
    Neutral,
    Commercial,
}

impl SegmentColor {
    /// Classify by department and remark, commercials overriding everything
    pub fn classify(department: &str, remark: &str, is_commercial: bool, markers: &Markers) -> Self {
        if is_commercial {
            return SegmentColor::Commercial;
        }
        let vtr = remark.contains(markers.vtr.as_str());
        if department.contains(markers.human_powered.as_str()) {
            if vtr {
                SegmentColor::HumanPoweredVtr
            } else {
                SegmentColor::HumanPowered
            }
        } else if department.contains(markers.glider.as_str()) {
            if vtr {
                SegmentColor::GliderVtr
            } else {
                SegmentColor::Glider
            }
        } else {
            SegmentColor::Neutral
        }
    }

    pub const fn hex(self) -> &'static str {
        match self {
            SegmentColor::HumanPoweredVtr => "#2fa0fc",
            SegmentColor::HumanPowered => "#b3e9f8",
            SegmentColor::GliderVtr => "#00d65b",
            SegmentColor::Glider => "#cbf266",
            SegmentColor::Neutral => "#c8c8cb",
            SegmentColor::Commercial => "#9a9a9a",
        }
    }
}
