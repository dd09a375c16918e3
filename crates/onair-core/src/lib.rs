//! # onair-core
//!
//! Core data model for the onair timeline generator.
//!
//! This crate provides:
//! - Raw worksheet types: `RawTable`, `Cell`
//! - Domain types: `Segment`, `SheetTimeline`, `TeamSpan`, `DigestSpan`
//! - The row builder that turns a worksheet into timed segments
//! - Team and digest merging
//! - Segment color classification
//! - The `Renderer` trait and error types
//!
//! ## Example
//!
//! ```rust
//! use onair_core::{BuildOptions, Cell, RawTable, RowBuilder};
//!
//! let mut table = RawTable::new(["尺", "チーム", "部門", "備考"]);
//! table.push_row(vec![Cell::Number(600.0), Cell::text("A"), Cell::Empty, Cell::Empty]);
//! table.push_row(vec![Cell::Number(300.0), Cell::text("A"), Cell::Empty, Cell::Empty]);
//!
//! let builder = RowBuilder::new(BuildOptions::default());
//! let sheet = builder.build_sheet("2023", &table);
//! assert_eq!(sheet.total_length(), 900.0);
//! assert_eq!(sheet.team_spans().len(), 1);
//! ```

pub mod builder;
pub mod color;
pub mod merge;
pub mod table;

pub use builder::{BuildOptions, RowBuilder};
pub use color::SegmentColor;
pub use merge::{merge_digests, merge_teams, DigestSpan, TeamSpan};
pub use table::{Cell, RawTable};

use thiserror::Error;

// ============================================================================
// Configuration
// ============================================================================

/// Names of the worksheet columns the builder reads
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnNames {
    /// Segment length in seconds
    pub duration: String,
    /// Team label
    pub team: String,
    /// Department label
    pub department: String,
    /// Free-form remark
    pub remark: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            duration: "尺".into(),
            team: "チーム".into(),
            department: "部門".into(),
            remark: "備考".into(),
        }
    }
}

impl ColumnNames {
    /// All four column names, duration first
    pub fn all(&self) -> [&str; 4] {
        [
            self.duration.as_str(),
            self.team.as_str(),
            self.department.as_str(),
            self.remark.as_str(),
        ]
    }
}

/// Substrings that classify a segment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Markers {
    /// Commercial break marker, searched in team, department and remark
    pub commercial: String,
    /// Digest marker, searched in the remark
    pub digest: String,
    /// Human-powered aircraft department marker
    pub human_powered: String,
    /// Glider department marker
    pub glider: String,
    /// Pre-recorded footage marker, searched in the remark
    pub vtr: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            commercial: "CM".into(),
            digest: "ダイジェスト".into(),
            human_powered: "人力".into(),
            glider: "滑空".into(),
            vtr: "VTR".into(),
        }
    }
}

// ============================================================================
// Domain Types
// ============================================================================

/// One cleaned worksheet row with its position on the timeline
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// Length in seconds, always positive
    pub duration: f64,
    pub team: String,
    pub department: String,
    pub remark: String,
    /// Offset from the start of the sheet in seconds
    pub start: f64,
    /// `start + duration`
    pub end: f64,
    pub is_commercial: bool,
    pub is_digest: bool,
    pub color: SegmentColor,
}

impl Segment {
    /// Horizontal center of the segment in seconds
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// Segments of one worksheet, ready for merging and rendering
#[derive(Clone, Debug, PartialEq)]
pub struct SheetTimeline {
    /// Worksheet name, drawn as the row label
    pub name: String,
    pub segments: Vec<Segment>,
    /// Whether commercial segments were kept when the offsets were computed
    pub include_commercials: bool,
}

impl SheetTimeline {
    pub fn new(name: impl Into<String>, segments: Vec<Segment>, include_commercials: bool) -> Self {
        Self {
            name: name.into(),
            segments,
            include_commercials,
        }
    }

    /// End offset of the last segment, 0 for an empty sheet
    pub fn total_length(&self) -> f64 {
        self.segments.last().map_or(0.0, |s| s.end)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Team runs, including blank-team runs
    pub fn team_spans(&self) -> Vec<TeamSpan> {
        merge_teams(&self.segments)
    }

    /// Groups of consecutive digest segments
    pub fn digest_spans(&self) -> Vec<DigestSpan> {
        merge_digests(&self.segments)
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render one row per sheet into the output format
    fn render(&self, sheets: &[SheetTimeline]) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Rasterization failed: {0}")]
    Raster(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: f64, duration: f64) -> Segment {
        Segment {
            duration,
            team: String::new(),
            department: String::new(),
            remark: String::new(),
            start,
            end: start + duration,
            is_commercial: false,
            is_digest: false,
            color: SegmentColor::Neutral,
        }
    }

    #[test]
    fn segment_midpoint() {
        assert_eq!(segment(100.0, 50.0).midpoint(), 125.0);
    }

    #[test]
    fn empty_sheet_has_zero_length() {
        let sheet = SheetTimeline::new("empty", vec![], false);
        assert!(sheet.is_empty());
        assert_eq!(sheet.total_length(), 0.0);
        assert!(sheet.team_spans().is_empty());
        assert!(sheet.digest_spans().is_empty());
    }

    #[test]
    fn total_length_is_last_end() {
        let sheet = SheetTimeline::new("s", vec![segment(0.0, 10.0), segment(10.0, 5.0)], true);
        assert_eq!(sheet.total_length(), 15.0);
    }

    #[test]
    fn default_column_names_order() {
        let names = ColumnNames::default();
        assert_eq!(names.all(), ["尺", "チーム", "部門", "備考"]);
    }

    #[test]
    fn render_error_messages() {
        let err = RenderError::Raster("pixmap 0x0".into());
        assert_eq!(err.to_string(), "Rasterization failed: pixmap 0x0");
    }
}
