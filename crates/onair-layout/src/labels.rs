//! Inside-or-outside decision for span labels

use onair_core::SheetTimeline;

use crate::{FontStyle, LayoutConfig, TextMeasure};

/// A label drawn centered inside its bar
#[derive(Clone, Debug, PartialEq)]
pub struct InsideLabel {
    pub text: String,
    /// Horizontal center in seconds
    pub x: f64,
    pub style: FontStyle,
}

/// A label that does not fit inside its bar
#[derive(Clone, Debug, PartialEq)]
pub struct OutsideLabelRequest {
    pub text: String,
    /// Span midpoint, where the leader line meets the bar
    pub anchor_x: f64,
    /// Span right edge plus a small offset
    pub preferred_x: f64,
    /// Estimated label width in seconds, padding included
    pub width: f64,
    pub style: FontStyle,
}

/// Where a single span's label goes
#[derive(Clone, Debug, PartialEq)]
pub enum LabelPlacement {
    Inside(InsideLabel),
    Outside(OutsideLabelRequest),
}

/// All labels of one row before lane assignment
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowLabels {
    pub inside: Vec<InsideLabel>,
    pub outside: Vec<OutsideLabelRequest>,
}

impl RowLabels {
    fn push(&mut self, placement: LabelPlacement) {
        match placement {
            LabelPlacement::Inside(label) => self.inside.push(label),
            LabelPlacement::Outside(request) => self.outside.push(request),
        }
    }
}

/// Text of a digest group label
pub fn digest_label(count: usize) -> String {
    format!("ダイジェスト: 計{count}チーム")
}

/// Decides, per span, whether its label fits inside the bar
pub struct LabelPlanner<'a, M: TextMeasure + ?Sized> {
    config: &'a LayoutConfig,
    measure: &'a M,
}

impl<'a, M: TextMeasure + ?Sized> LabelPlanner<'a, M> {
    pub fn new(config: &'a LayoutConfig, measure: &'a M) -> Self {
        Self { config, measure }
    }

    /// Label width converted to seconds on the fixed axis, padding included
    pub fn label_seconds(&self, text: &str, style: FontStyle) -> f64 {
        let px = self.measure.text_width(text, self.config.font_px(), style);
        px * self.config.seconds_per_px() + self.config.label_padding
    }

    pub fn fits_inside(&self, span_length: f64, text: &str, style: FontStyle) -> bool {
        span_length > self.label_seconds(text, style)
    }

    /// Place the label of the span `[start, end]`
    pub fn place(&self, text: &str, start: f64, end: f64, style: FontStyle) -> LabelPlacement {
        let anchor_x = (start + end) / 2.0;
        let width = self.label_seconds(text, style);
        if end - start > width {
            LabelPlacement::Inside(InsideLabel {
                text: text.to_string(),
                x: anchor_x,
                style,
            })
        } else {
            LabelPlacement::Outside(OutsideLabelRequest {
                text: text.to_string(),
                anchor_x,
                preferred_x: end + self.config.preferred_offset,
                width,
                style,
            })
        }
    }

    /// Labels for every non-blank team span and every digest group of a sheet
    pub fn plan_sheet(&self, sheet: &SheetTimeline) -> RowLabels {
        let mut labels = RowLabels::default();

        for span in sheet.team_spans().iter().filter(|s| !s.is_blank()) {
            labels.push(self.place(&span.team, span.start, span.end, FontStyle::Normal));
        }
        for group in sheet.digest_spans() {
            labels.push(self.place(
                &digest_label(group.count),
                group.start,
                group.end,
                FontStyle::Italic,
            ));
        }

        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EstimatedMetrics;
    use onair_core::{BuildOptions, Cell, RawTable, RowBuilder};
    use pretty_assertions::assert_eq;

    /// Fixed width per character, to keep the arithmetic readable
    struct PerChar(f64);

    impl TextMeasure for PerChar {
        fn text_width(&self, text: &str, _font_px: f64, _style: FontStyle) -> f64 {
            text.chars().count() as f64 * self.0
        }
    }

    fn sheet(rows: &[(f64, &str, &str)]) -> SheetTimeline {
        let mut table = RawTable::new(["尺", "チーム", "部門", "備考"]);
        for (duration, team, remark) in rows {
            table.push_row(vec![
                Cell::Number(*duration),
                Cell::text(*team),
                Cell::Empty,
                Cell::text(*remark),
            ]);
        }
        RowBuilder::new(BuildOptions::default()).build_sheet("test", &table)
    }

    #[test]
    fn label_seconds_uses_fixed_axis_scale() {
        let config = LayoutConfig::default();
        let measure = PerChar(27.0);
        let planner = LabelPlanner::new(&config, &measure);
        // 2 chars * 27 px * (7200 / 2700) s/px + 6 s padding
        assert!((planner.label_seconds("AB", FontStyle::Normal) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn short_span_with_long_label_goes_outside() {
        let config = LayoutConfig::default();
        let measure = EstimatedMetrics::default();
        let planner = LabelPlanner::new(&config, &measure);
        let label = "Twenty chars label!!";
        assert_eq!(label.chars().count(), 20);
        assert!(!planner.fits_inside(5.0, label, FontStyle::Normal));
        match planner.place(label, 100.0, 105.0, FontStyle::Normal) {
            LabelPlacement::Outside(request) => {
                assert_eq!(request.anchor_x, 102.5);
                assert_eq!(request.preferred_x, 111.0);
                assert!(request.width > 5.0);
            }
            LabelPlacement::Inside(_) => panic!("5 second span cannot hold a 20 character label"),
        }
    }

    #[test]
    fn wide_span_keeps_label_inside() {
        let config = LayoutConfig::default();
        let measure = EstimatedMetrics::default();
        let planner = LabelPlanner::new(&config, &measure);
        assert_eq!(
            planner.place("A", 0.0, 900.0, FontStyle::Normal),
            LabelPlacement::Inside(InsideLabel {
                text: "A".into(),
                x: 450.0,
                style: FontStyle::Normal
            })
        );
    }

    #[test]
    fn exact_fit_goes_outside() {
        let config = LayoutConfig::default().plot_width_px(7200.0).label_padding(0.0);
        let measure = PerChar(10.0);
        let planner = LabelPlanner::new(&config, &measure);
        // 1 char = 10 s; the span must be strictly wider
        assert!(!planner.fits_inside(10.0, "A", FontStyle::Normal));
        assert!(planner.fits_inside(10.5, "A", FontStyle::Normal));
    }

    #[test]
    fn plan_skips_blank_teams_and_labels_digests() {
        let s = sheet(&[
            (600.0, "鳥人間チームA", ""),
            (300.0, "", ""),
            (20.0, "X", "ダイジェスト"),
            (20.0, "Y", "ダイジェスト"),
            (10.0, "B", ""),
        ]);
        let config = LayoutConfig::default();
        let measure = EstimatedMetrics::default();
        let labels = LabelPlanner::new(&config, &measure).plan_sheet(&s);

        assert_eq!(labels.inside.len(), 1);
        assert_eq!(labels.inside[0].text, "鳥人間チームA");

        let outside: Vec<(&str, FontStyle)> = labels
            .outside
            .iter()
            .map(|r| (r.text.as_str(), r.style))
            .collect();
        assert_eq!(
            outside,
            vec![
                ("B", FontStyle::Normal),
                ("ダイジェスト: 計2チーム", FontStyle::Italic)
            ]
        );
    }

    #[test]
    fn empty_sheet_plans_nothing() {
        let config = LayoutConfig::default();
        let measure = EstimatedMetrics::default();
        let labels = LabelPlanner::new(&config, &measure).plan_sheet(&SheetTimeline::new("e", vec![], false));
        assert_eq!(labels, RowLabels::default());
    }
}
