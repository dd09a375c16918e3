//! Row builder: worksheet rows to timed segments
//!
//! Cleaning policy:
//! - missing columns read as empty strings
//! - rows whose duration is not a positive finite number are dropped
//! - commercial rows are dropped before offsets are computed unless
//!   `include_commercials` is set
//!
//! Offsets are an exclusive running sum, so `start[0] == 0` and
//! `start[i] == end[i - 1]` hold exactly.

use tracing::debug;

use crate::{Cell, ColumnNames, Markers, RawTable, Segment, SegmentColor, SheetTimeline};

/// Options for turning a worksheet into segments
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Keep commercial rows and count their time
    pub include_commercials: bool,
    pub columns: ColumnNames,
    pub markers: Markers,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_commercials(mut self, include: bool) -> Self {
        self.include_commercials = include;
        self
    }

    pub fn columns(mut self, columns: ColumnNames) -> Self {
        self.columns = columns;
        self
    }

    pub fn markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }
}

/// Builds segment sequences from raw tables
#[derive(Clone, Debug, Default)]
pub struct RowBuilder {
    pub options: BuildOptions,
}

impl RowBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Build the timeline row for one named sheet
    pub fn build_sheet(&self, name: &str, table: &RawTable) -> SheetTimeline {
        SheetTimeline::new(name, self.build(table), self.options.include_commercials)
    }

    /// Clean, classify and time every row of `table`
    pub fn build(&self, table: &RawTable) -> Vec<Segment> {
        let columns = &self.options.columns;
        let markers = &self.options.markers;

        let [duration_col, team_col, department_col, remark_col] =
            columns.all().map(|name| {
                let index = table.column_index(name);
                if index.is_none() {
                    debug!(column = name, "column missing, treating as empty");
                }
                index
            });

        let text_at = |row: usize, col: Option<usize>| -> String {
            col.map(|c| table.cell(row, c).to_text()).unwrap_or_default()
        };

        let mut segments = Vec::with_capacity(table.len());
        let mut cursor = 0.0;
        let mut dropped = 0usize;
        let mut commercials_excluded = 0usize;

        for row in 0..table.len() {
            let duration = match duration_col.map(|c| table.cell(row, c)).and_then(Cell::as_number) {
                Some(d) if d.is_finite() && d > 0.0 => d,
                _ => {
                    dropped += 1;
                    continue;
                }
            };

            let team = text_at(row, team_col);
            let department = text_at(row, department_col);
            let remark = text_at(row, remark_col);

            let commercial = markers.commercial.as_str();
            let is_commercial = team.contains(commercial)
                || remark.contains(commercial)
                || department.contains(commercial);
            if is_commercial && !self.options.include_commercials {
                commercials_excluded += 1;
                continue;
            }
            let is_digest = remark.contains(markers.digest.as_str());
            let color = SegmentColor::classify(&department, &remark, is_commercial, markers);

            let start = cursor;
            let end = start + duration;
            cursor = end;

            segments.push(Segment {
                duration,
                team,
                department,
                remark,
                start,
                end,
                is_commercial,
                is_digest,
                color,
            });
        }

        debug!(
            kept = segments.len(),
            dropped,
            commercials_excluded,
            total_seconds = cursor,
            "built segments"
        );

        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(duration: Cell, team: &str, department: &str, remark: &str) -> Vec<Cell> {
        vec![duration, Cell::text(team), Cell::text(department), Cell::text(remark)]
    }

    fn table(rows: Vec<Vec<Cell>>) -> RawTable {
        let mut t = RawTable::new(["尺", "チーム", "部門", "備考"]);
        for r in rows {
            t.push_row(r);
        }
        t
    }

    fn starts_ends(segments: &[Segment]) -> Vec<(f64, f64)> {
        segments.iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn offsets_are_exclusive_running_sum() {
        let t = table(vec![
            row(Cell::Number(600.0), "A", "", ""),
            row(Cell::Number(300.0), "A", "", ""),
            row(Cell::Number(120.0), "B", "", ""),
        ]);
        let segments = RowBuilder::default().build(&t);
        assert_eq!(
            starts_ends(&segments),
            vec![(0.0, 600.0), (600.0, 900.0), (900.0, 1020.0)]
        );
    }

    #[test]
    fn malformed_and_non_positive_durations_are_dropped() {
        let t = table(vec![
            row(Cell::text("abc"), "X", "", ""),
            row(Cell::Number(0.0), "X", "", ""),
            row(Cell::Number(-5.0), "X", "", ""),
            row(Cell::Empty, "X", "", ""),
            row(Cell::Number(f64::NAN), "X", "", ""),
            row(Cell::text("45"), "Y", "", ""),
        ]);
        let segments = RowBuilder::default().build(&t);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].team, "Y");
        assert_eq!(starts_ends(&segments), vec![(0.0, 45.0)]);
    }

    #[test]
    fn commercials_excluded_from_timing_by_default() {
        let t = table(vec![
            row(Cell::Number(600.0), "A", "", ""),
            row(Cell::Number(100.0), "B", "", "CM"),
            row(Cell::Number(300.0), "A", "", ""),
        ]);
        let segments = RowBuilder::default().build(&t);
        assert_eq!(starts_ends(&segments), vec![(0.0, 600.0), (600.0, 900.0)]);
        assert!(segments.iter().all(|s| !s.is_commercial));
    }

    #[test]
    fn commercials_kept_when_included() {
        let t = table(vec![
            row(Cell::Number(600.0), "A", "", ""),
            row(Cell::Number(100.0), "CM", "", ""),
            row(Cell::Number(300.0), "A", "", ""),
        ]);
        let builder = RowBuilder::new(BuildOptions::new().include_commercials(true));
        let segments = builder.build(&t);
        assert_eq!(
            starts_ends(&segments),
            vec![(0.0, 600.0), (600.0, 700.0), (700.0, 1000.0)]
        );
        assert!(segments[1].is_commercial);
        assert_eq!(segments[1].color, SegmentColor::Commercial);
    }

    #[test]
    fn commercial_marker_found_in_any_text_column() {
        let builder = RowBuilder::new(BuildOptions::new().include_commercials(true));
        let t = table(vec![
            row(Cell::Number(10.0), "CM1", "", ""),
            row(Cell::Number(10.0), "", "CM枠", ""),
            row(Cell::Number(10.0), "", "", "提供CM"),
            row(Cell::Number(10.0), "チーム", "人力", ""),
        ]);
        let flags: Vec<bool> = builder.build(&t).iter().map(|s| s.is_commercial).collect();
        assert_eq!(flags, vec![true, true, true, false]);
    }

    #[test]
    fn digest_flag_from_remark_only() {
        let t = table(vec![
            row(Cell::Number(50.0), "ダイジェスト", "", ""),
            row(Cell::Number(50.0), "A", "", "ダイジェスト"),
        ]);
        let flags: Vec<bool> = RowBuilder::default().build(&t).iter().map(|s| s.is_digest).collect();
        assert_eq!(flags, vec![false, true]);
    }

    #[test]
    fn missing_columns_read_as_empty() {
        let mut t = RawTable::new(["尺"]);
        t.push_row(vec![Cell::Number(30.0)]);
        t.push_row(vec![Cell::Number(20.0)]);
        let segments = RowBuilder::default().build(&t);
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| s.team.is_empty() && s.remark.is_empty()));
        assert_eq!(segments[1].start, 30.0);
    }

    #[test]
    fn missing_duration_column_yields_empty_sheet() {
        let t = RawTable::new(["チーム"]).row(vec![Cell::text("A")]);
        let sheet = RowBuilder::default().build_sheet("2019", &t);
        assert!(sheet.is_empty());
        assert_eq!(sheet.name, "2019");
    }

    #[test]
    fn colors_assigned_per_row() {
        let t = table(vec![
            row(Cell::Number(10.0), "A", "人力", "VTR"),
            row(Cell::Number(10.0), "B", "滑空", ""),
        ]);
        let colors: Vec<SegmentColor> = RowBuilder::default().build(&t).iter().map(|s| s.color).collect();
        assert_eq!(colors, vec![SegmentColor::HumanPoweredVtr, SegmentColor::Glider]);
    }

    #[test]
    fn numeric_team_labels_become_text() {
        let t = table(vec![vec![
            Cell::Number(10.0),
            Cell::Number(3.0),
            Cell::Empty,
            Cell::Empty,
        ]]);
        let segments = RowBuilder::default().build(&t);
        assert_eq!(segments[0].team, "3");
    }

    #[test]
    fn custom_column_names() {
        let columns = ColumnNames {
            duration: "duration".into(),
            team: "team".into(),
            department: "department".into(),
            remark: "remark".into(),
        };
        let t = RawTable::new(["duration", "team", "department", "remark"])
            .row(vec![Cell::Number(5.0), Cell::text("A"), Cell::Empty, Cell::Empty]);
        let segments = RowBuilder::new(BuildOptions::new().columns(columns)).build(&t);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].team, "A");
    }
}
