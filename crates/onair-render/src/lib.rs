//! # onair-render
//!
//! Rendering backends for onair timeline charts.
//!
//! This crate provides:
//! - SVG composition of the timeline figure
//! - PNG rasterization through resvg
//! - Font discovery and glyph-based text measurement
//!
//! ## Example
//!
//! ```rust,ignore
//! use onair_core::Renderer;
//! use onair_render::{FontSetup, TimelineRenderer};
//!
//! let fonts = FontSetup::discover();
//! let renderer = TimelineRenderer::new().with_fonts(&fonts);
//!
//! let svg = renderer.render(&sheets)?;
//! renderer.save_png(&sheets, "timeline.png")?;
//! ```

pub mod fonts;
pub mod raster;

pub use fonts::{FontMetrics, FontSetup, FontSource};

use std::path::Path;
use std::sync::Arc;

use onair_core::{RenderError, Renderer, Segment, SheetTimeline};
use onair_layout::{
    Band, EstimatedMetrics, InsideLabel, LayoutConfig, PlacedLabel, RowLayout, TextMeasure,
    TimelineLayout,
};
use resvg::usvg::fontdb::Database;
use svg::node::element::{ClipPath, Definitions, Group, Line, Path as SvgPath, Rectangle, Text};
use svg::Document;
use tracing::info;

/// Timeline chart renderer configuration
#[derive(Clone, Debug)]
pub struct TimelineRenderer<M = EstimatedMetrics> {
    /// Axis scale, row geometry and label packing
    pub layout: LayoutConfig,
    pub title: String,
    /// Label under the time axis
    pub axis_label: String,
    /// Seconds between ticks and gridlines
    pub tick_interval: f64,
    /// Pixels per row unit
    pub unit_px: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    /// Distance in seconds from the axis start to the right edge of the sheet name
    pub sheet_label_offset: f64,
    /// Output resolution of the PNG; the layout is drawn at `layout.dpi`
    pub dpi: f64,
    pub font_family: String,
    pub title_size_pt: f64,
    pub tick_size_pt: f64,
    pub sheet_label_size_pt: f64,
    pub background_color: String,
    pub text_color: String,
    pub edge_color: String,
    pub grid_color: String,
    pub leader_color: String,
    measure: M,
    fonts: Arc<Database>,
}

impl Default for TimelineRenderer {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            title: "放送時間と尺のまとめ".into(),
            axis_label: "秒".into(),
            tick_interval: 600.0,
            unit_px: 150.0,
            margin_left: 220.0,
            margin_right: 60.0,
            margin_top: 90.0,
            margin_bottom: 110.0,
            sheet_label_offset: 50.0,
            dpi: 200.0,
            font_family: "sans-serif".into(),
            title_size_pt: 12.0,
            tick_size_pt: 10.0,
            sheet_label_size_pt: 10.0,
            background_color: "#ffffff".into(),
            text_color: "#000000".into(),
            edge_color: "#000000".into(),
            grid_color: "#CCCCCC".into(),
            leader_color: "#666666".into(),
            measure: EstimatedMetrics::default(),
            fonts: Arc::new(Database::new()),
        }
    }
}

impl TimelineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use discovered fonts for measuring, the SVG font family and rasterization
    pub fn with_fonts(self, fonts: &FontSetup) -> TimelineRenderer<FontMetrics> {
        let family = fonts.css_family();
        let mut renderer = self.with_measure(fonts.metrics());
        renderer.font_family = family;
        renderer.fonts = fonts.database();
        renderer
    }
}

impl<M: TextMeasure> TimelineRenderer<M> {
    /// Swap the text measurement used for the inside-or-outside decision
    pub fn with_measure<N: TextMeasure>(self, measure: N) -> TimelineRenderer<N> {
        TimelineRenderer {
            layout: self.layout,
            title: self.title,
            axis_label: self.axis_label,
            tick_interval: self.tick_interval,
            unit_px: self.unit_px,
            margin_left: self.margin_left,
            margin_right: self.margin_right,
            margin_top: self.margin_top,
            margin_bottom: self.margin_bottom,
            sheet_label_offset: self.sheet_label_offset,
            dpi: self.dpi,
            font_family: self.font_family,
            title_size_pt: self.title_size_pt,
            tick_size_pt: self.tick_size_pt,
            sheet_label_size_pt: self.sheet_label_size_pt,
            background_color: self.background_color,
            text_color: self.text_color,
            edge_color: self.edge_color,
            grid_color: self.grid_color,
            leader_color: self.leader_color,
            measure,
            fonts: self.fonts,
        }
    }

    /// Configure the chart title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Configure the PNG output resolution
    pub fn dpi(mut self, dpi: f64) -> Self {
        self.dpi = dpi;
        self
    }

    /// Configure the layout geometry
    pub fn layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Raster scale from layout pixels to output pixels
    pub fn scale(&self) -> f32 {
        (self.dpi / self.layout.dpi) as f32
    }

    /// Label layout for `sheets`, as drawn by this renderer
    pub fn compute_layout(&self, sheets: &[SheetTimeline]) -> TimelineLayout {
        TimelineLayout::compute(sheets, &self.layout, &self.measure)
    }

    /// Compose the SVG document
    pub fn render_svg(&self, sheets: &[SheetTimeline]) -> Result<String, RenderError> {
        if sheets.is_empty() {
            return Err(RenderError::InvalidData("no sheets to render".into()));
        }

        let layout = self.compute_layout(sheets);
        let frame = Frame::new(self, &layout);

        let mut document = Document::new()
            .set("xmlns", "http://www.w3.org/2000/svg")
            .set("width", frame.total_width)
            .set("height", frame.total_height)
            .set("viewBox", (0.0, 0.0, frame.total_width, frame.total_height))
            .set("font-family", self.font_family.as_str());

        document = document
            .add(
                Rectangle::new()
                    .set("width", frame.total_width)
                    .set("height", frame.total_height)
                    .set("fill", self.background_color.as_str()),
            )
            .add(Definitions::new().add(
                ClipPath::new().set("id", PLOT_CLIP_ID).add(
                    Rectangle::new()
                        .set("x", frame.left)
                        .set("y", frame.top)
                        .set("width", frame.width)
                        .set("height", frame.height),
                ),
            ))
            .add(self.render_grid(&frame))
            .add(self.render_axis(&frame))
            .add(self.render_title(&frame));

        for (sheet, row) in sheets.iter().zip(&layout.rows) {
            document = document.add(self.render_row(&frame, sheet, row));
        }

        info!(
            sheets = sheets.len(),
            outside_labels = layout.outside_label_count(),
            width = frame.total_width,
            height = frame.total_height,
            "timeline composed"
        );

        Ok(document.to_string())
    }

    /// Compose and rasterize to PNG bytes
    pub fn render_png(&self, sheets: &[SheetTimeline]) -> Result<Vec<u8>, RenderError> {
        let svg = self.render_svg(sheets)?;
        raster::svg_to_png(&svg, Arc::clone(&self.fonts), self.scale())
    }

    /// Compose, rasterize and write a PNG file
    pub fn save_png(&self, sheets: &[SheetTimeline], path: impl AsRef<Path>) -> Result<(), RenderError> {
        let svg = self.render_svg(sheets)?;
        raster::save_png(&svg, Arc::clone(&self.fonts), self.scale(), path.as_ref())
    }

    fn pt(&self, points: f64) -> f64 {
        points * self.layout.dpi / 72.0
    }

    fn text(&self, content: impl Into<String>, x: f64, y: f64, size_pt: f64) -> Text {
        Text::new(content)
            .set("x", x)
            .set("y", y)
            .set("font-size", self.pt(size_pt))
            .set("fill", self.text_color.as_str())
    }

    /// Dashed vertical gridlines at every tick
    fn render_grid(&self, frame: &Frame) -> Group {
        let mut group = Group::new().set("class", "grid");
        for seconds in ticks(self.layout.axis_start, self.layout.axis_end, self.tick_interval) {
            let x = frame.x(seconds);
            group = group.add(
                Line::new()
                    .set("x1", x)
                    .set("y1", frame.top)
                    .set("x2", x)
                    .set("y2", frame.bottom())
                    .set("stroke", self.grid_color.as_str())
                    .set("stroke-width", self.pt(0.6))
                    .set("stroke-opacity", 0.8)
                    .set("stroke-dasharray", format!("{} {}", self.pt(2.2), self.pt(1.0))),
            );
        }
        group
    }

    /// Plot frame, ticks, tick labels and the axis label
    fn render_axis(&self, frame: &Frame) -> Group {
        let mut group = Group::new().set("class", "axis");

        group = group.add(
            Rectangle::new()
                .set("x", frame.left)
                .set("y", frame.top)
                .set("width", frame.width)
                .set("height", frame.height)
                .set("fill", "none")
                .set("stroke", self.edge_color.as_str())
                .set("stroke-width", self.pt(0.8)),
        );

        let tick_len = self.pt(3.5);
        let label_y = frame.bottom() + tick_len + self.pt(self.tick_size_pt);
        for seconds in ticks(self.layout.axis_start, self.layout.axis_end, self.tick_interval) {
            let x = frame.x(seconds);
            group = group
                .add(
                    Line::new()
                        .set("x1", x)
                        .set("y1", frame.bottom())
                        .set("x2", x)
                        .set("y2", frame.bottom() + tick_len)
                        .set("stroke", self.edge_color.as_str())
                        .set("stroke-width", self.pt(0.8)),
                )
                .add(
                    self.text(format_seconds(seconds), x, label_y, self.tick_size_pt)
                        .set("text-anchor", "middle"),
                );
        }

        group.add(
            self.text(
                self.axis_label.as_str(),
                frame.left + frame.width / 2.0,
                label_y + self.pt(self.tick_size_pt) * 1.5,
                self.tick_size_pt,
            )
            .set("text-anchor", "middle"),
        )
    }

    fn render_title(&self, frame: &Frame) -> Text {
        self.text(
            self.title.as_str(),
            frame.left + frame.width / 2.0,
            frame.top - self.pt(6.0),
            self.title_size_pt,
        )
        .set("text-anchor", "middle")
        .set("class", "title")
    }

    /// Bars, sheet name, inside labels and outside labels of one row
    fn render_row(&self, frame: &Frame, sheet: &SheetTimeline, row: &RowLayout) -> Group {
        let mut group = Group::new().set("class", "row");
        let center_y = frame.y(row.y_base);
        let label_px = self.layout.font_px();

        // Bars past the axis end are cut at the frame
        let mut bars = Group::new()
            .set("class", "bars")
            .set("clip-path", format!("url(#{PLOT_CLIP_ID})"));
        for segment in &sheet.segments {
            bars = bars.add(self.render_bar(frame, segment, row.y_base));
            if sheet.include_commercials && segment.is_commercial {
                let x = frame.x(segment.midpoint());
                bars = bars
                    .add(
                        self.text("C", x, center_y - label_px * 0.15, self.layout.font_size_pt)
                            .set("text-anchor", "middle")
                            .set("class", "commercial-mark"),
                    )
                    .add(
                        self.text("M", x, center_y + label_px * 0.85, self.layout.font_size_pt)
                            .set("text-anchor", "middle")
                            .set("class", "commercial-mark"),
                    );
            }
        }
        group = group.add(bars);

        group = group.add(
            self.text(
                sheet.name.as_str(),
                frame.x(self.layout.axis_start - self.sheet_label_offset),
                center_y + self.pt(self.sheet_label_size_pt) * 0.35,
                self.sheet_label_size_pt,
            )
            .set("text-anchor", "end")
            .set("font-weight", "bold")
            .set("class", "sheet-name"),
        );

        for label in &row.inside {
            group = group.add(self.render_inside_label(frame, label, center_y));
        }
        for label in &row.outside {
            group = group
                .add(self.render_leader(frame, label))
                .add(self.render_outside_label(frame, label));
        }

        group
    }

    fn render_bar(&self, frame: &Frame, segment: &Segment, y_base: f64) -> Rectangle {
        let half = self.layout.bar_half_height;
        let x = frame.x(segment.start);
        Rectangle::new()
            .set("x", x)
            .set("y", frame.y(y_base + half))
            .set("width", frame.x(segment.end) - x)
            .set("height", 2.0 * half * self.unit_px)
            .set("fill", segment.color.hex())
            .set("stroke", self.edge_color.as_str())
            .set("stroke-width", self.pt(0.6))
            .set("class", "bar")
    }

    fn render_inside_label(&self, frame: &Frame, label: &InsideLabel, center_y: f64) -> Text {
        self.text(
            label.text.as_str(),
            frame.x(label.x),
            center_y + self.layout.font_px() * 0.35,
            self.layout.font_size_pt,
        )
        .set("text-anchor", "middle")
        .set("font-style", label.style.css())
        .set("class", "inside-label")
    }

    fn render_outside_label(&self, frame: &Frame, label: &PlacedLabel) -> Text {
        let font_px = self.layout.font_px();
        // Top band labels sit on their lane, bottom band labels hang from it
        let baseline = match label.band {
            Band::Top => frame.y(label.y) - font_px * 0.2,
            Band::Bottom => frame.y(label.y) + font_px * 0.8,
        };
        self.text(label.text.as_str(), frame.x(label.x), baseline, self.layout.font_size_pt)
            .set("font-style", label.style.css())
            .set("class", "outside-label")
    }

    fn render_leader(&self, frame: &Frame, label: &PlacedLabel) -> SvgPath {
        let (from_x, from_y) = (frame.x(label.leader.from.0), frame.y(label.leader.from.1));
        let (to_x, to_y) = (frame.x(label.leader.to.0), frame.y(label.leader.to.1));
        SvgPath::new()
            .set(
                "d",
                format!("M{from_x},{from_y} Q{to_x},{from_y} {to_x},{to_y}"),
            )
            .set("fill", "none")
            .set("stroke", self.leader_color.as_str())
            .set("stroke-width", self.pt(0.6))
            .set("class", "leader")
    }
}

impl<M: TextMeasure> Renderer for TimelineRenderer<M> {
    type Output = String;

    fn render(&self, sheets: &[SheetTimeline]) -> Result<String, RenderError> {
        self.render_svg(sheets)
    }
}

const PLOT_CLIP_ID: &str = "plot-area";

/// Mapping from seconds and row units to SVG pixels
struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    total_width: f64,
    total_height: f64,
    axis_start: f64,
    seconds_per_px: f64,
    /// Row-unit y at the top edge of the plot
    y_top: f64,
    unit_px: f64,
}

impl Frame {
    fn new<M>(renderer: &TimelineRenderer<M>, layout: &TimelineLayout) -> Self {
        let (y_bottom, y_top) = layout.y_bounds();
        let width = renderer.layout.plot_width_px;
        let height = (y_top - y_bottom) * renderer.unit_px;
        Self {
            left: renderer.margin_left,
            top: renderer.margin_top,
            width,
            height,
            total_width: renderer.margin_left + width + renderer.margin_right,
            total_height: renderer.margin_top + height + renderer.margin_bottom,
            axis_start: renderer.layout.axis_start,
            seconds_per_px: renderer.layout.seconds_per_px(),
            y_top,
            unit_px: renderer.unit_px,
        }
    }

    fn x(&self, seconds: f64) -> f64 {
        self.left + (seconds - self.axis_start) / self.seconds_per_px
    }

    fn y(&self, units: f64) -> f64 {
        self.top + (self.y_top - units) * self.unit_px
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Tick positions from `start` to `end` inclusive
fn ticks(start: f64, end: f64, interval: f64) -> Vec<f64> {
    if interval <= 0.0 {
        return vec![start, end];
    }
    let count = ((end - start) / interval).floor() as usize;
    (0..=count).map(|i| start + i as f64 * interval).collect()
}

fn format_seconds(seconds: f64) -> String {
    if seconds.fract() == 0.0 {
        format!("{}", seconds as i64)
    } else {
        format!("{seconds}")
    }
}
