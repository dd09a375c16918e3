//! SVG to PNG rasterization

use std::path::Path;
use std::sync::Arc;

use onair_core::RenderError;
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{fontdb::Database, Options, Tree};
use tracing::debug;

/// Rasterize an SVG document at `scale` onto a white background
pub fn rasterize(svg: &str, fonts: Arc<Database>, scale: f32) -> Result<Pixmap, RenderError> {
    let mut options = Options::default();
    options.fontdb = fonts;

    let tree = Tree::from_str(svg, &options).map_err(|e| RenderError::Format(e.to_string()))?;

    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| RenderError::Raster(format!("cannot allocate {width}x{height} pixmap")))?;
    pixmap.fill(Color::WHITE);

    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    debug!(width, height, scale, "rasterized");

    Ok(pixmap)
}

/// Rasterize and encode as PNG
pub fn svg_to_png(svg: &str, fonts: Arc<Database>, scale: f32) -> Result<Vec<u8>, RenderError> {
    rasterize(svg, fonts, scale)?
        .encode_png()
        .map_err(|e| RenderError::Raster(e.to_string()))
}

/// Rasterize and write a PNG file
pub fn save_png(svg: &str, fonts: Arc<Database>, scale: f32, path: &Path) -> Result<(), RenderError> {
    let png = svg_to_png(svg, fonts, scale)?;
    std::fs::write(path, png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="20"><rect x="0" y="0" width="5" height="5" fill="#ff0000"/></svg>"##;

    #[test]
    fn scale_applies_to_pixmap_size() {
        let pixmap = rasterize(SQUARE, Arc::new(Database::new()), 2.0).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (20, 40));
    }

    #[test]
    fn background_is_white() {
        let pixmap = rasterize(SQUARE, Arc::new(Database::new()), 1.0).unwrap();
        let corner = pixmap.pixel(9, 19).unwrap();
        assert_eq!((corner.red(), corner.green(), corner.blue(), corner.alpha()), (255, 255, 255, 255));
        let red = pixmap.pixel(1, 1).unwrap();
        assert_eq!((red.red(), red.green(), red.blue()), (255, 0, 0));
    }

    #[test]
    fn invalid_svg_is_format_error() {
        let err = rasterize("<not-svg", Arc::new(Database::new()), 1.0).unwrap_err();
        assert!(matches!(err, RenderError::Format(_)));
    }

    #[test]
    fn png_signature() {
        let png = svg_to_png(SQUARE, Arc::new(Database::new()), 1.0).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
