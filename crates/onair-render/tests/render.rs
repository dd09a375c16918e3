//! End-to-end rendering of built timelines

use onair_core::{BuildOptions, Cell, RawTable, Renderer, RowBuilder, SheetTimeline};
use onair_render::TimelineRenderer;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn table(rows: &[(f64, &str, &str, &str)]) -> RawTable {
    let mut table = RawTable::new(["尺", "チーム", "部門", "備考"]);
    for (duration, team, department, remark) in rows {
        table.push_row(vec![
            Cell::Number(*duration),
            Cell::text(*team),
            Cell::text(*department),
            Cell::text(*remark),
        ]);
    }
    table
}

fn sheets(include_commercials: bool) -> Vec<SheetTimeline> {
    let builder = RowBuilder::new(BuildOptions::new().include_commercials(include_commercials));
    let first = table(&[
        (600.0, "鳥人間チームA", "人力", "VTR"),
        (300.0, "鳥人間チームA", "人力", ""),
        (100.0, "", "", "CM"),
        (20.0, "とても長い名前の滑空機チーム", "滑空", ""),
        (50.0, "B", "滑空", "ダイジェスト"),
    ]);
    let second = table(&[(1200.0, "C", "滑空", "VTR")]);
    vec![
        builder.build_sheet("2023", &first),
        builder.build_sheet("2019", &second),
    ]
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn svg_contains_labels_names_and_colors() {
    let renderer = TimelineRenderer::new();
    let sheets = sheets(false);
    let svg = renderer.render(&sheets).unwrap();

    assert!(svg.contains("放送時間と尺のまとめ"));
    assert!(svg.contains("2023"));
    assert!(svg.contains("2019"));
    assert!(svg.contains("鳥人間チームA"));
    assert!(svg.contains("とても長い名前の滑空機チーム"));
    assert!(svg.contains("ダイジェスト: 計1チーム"));
    assert!(svg.contains("#2fa0fc"));
    assert!(svg.contains("#cbf266"));
    assert!(svg.contains("#00d65b"));
    assert!(!svg.contains("#9a9a9a"));
    assert!(!svg.contains("commercial-mark"));
}

#[test]
fn one_leader_per_outside_label() {
    let renderer = TimelineRenderer::new();
    let sheets = sheets(false);
    let svg = renderer.render_svg(&sheets).unwrap();
    let layout = renderer.compute_layout(&sheets);

    assert_eq!(layout.outside_label_count(), 2);
    assert_eq!(count(&svg, "class=\"leader\""), 2);
    assert_eq!(count(&svg, "class=\"outside-label\""), 2);
    assert_eq!(count(&svg, "class=\"sheet-name\""), 2);
}

#[test]
fn commercials_are_drawn_with_overlay_when_included() {
    let svg = TimelineRenderer::new().render_svg(&sheets(true)).unwrap();
    assert!(svg.contains("#9a9a9a"));
    assert_eq!(count(&svg, "class=\"commercial-mark\""), 2);
}

#[test]
fn bars_follow_segments() {
    let sheets = sheets(false);
    let svg = TimelineRenderer::new().render_svg(&sheets).unwrap();
    let segments: usize = sheets.iter().map(|s| s.segments.len()).sum();
    assert_eq!(count(&svg, "class=\"bar\""), segments);
}

#[test]
fn png_is_written_at_output_resolution() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("timeline.png");

    TimelineRenderer::new().save_png(&sheets(false), &path).unwrap();

    let png = std::fs::read(&path).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
    // 220 + 2700 + 60 layout pixels at 200 / 150
    assert_eq!(width, 3974);
}

#[test]
fn custom_title_and_dpi() {
    let renderer = TimelineRenderer::new().title("Broadcast 2023").dpi(150.0);
    let sheets = sheets(false);
    assert!(renderer.render_svg(&sheets).unwrap().contains("Broadcast 2023"));

    let png = renderer.render_png(&sheets).unwrap();
    let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
    assert_eq!(width, 2980);
}

#[test]
fn sheet_longer_than_axis_keeps_bars_inside_clip() {
    let builder = RowBuilder::new(BuildOptions::new());
    let long = builder.build_sheet("long", &table(&[(7000.0, "", "", ""), (1000.0, "", "", "")]));
    let svg = TimelineRenderer::new().render_svg(&[long]).unwrap();

    assert_eq!(count(&svg, "<clipPath id=\"plot-area\""), 1);
    assert_eq!(count(&svg, "clip-path=\"url(#plot-area)\""), 1);
    assert_eq!(count(&svg, "class=\"bar\""), 2);
}
