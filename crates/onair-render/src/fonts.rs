//! Font discovery and font-backed text measurement
//!
//! Discovery runs once, before any rendering, and produces an immutable
//! [`FontSetup`]. It tries, in order:
//! 1. known Noto CJK font files
//! 2. installed fonts matching a list of CJK-capable family names
//! 3. the same family names followed by the generic `sans-serif`
//!
//! Failure at any step falls through to the next one; discovery never fails.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use onair_layout::{EstimatedMetrics, FontStyle, TextMeasure};
use resvg::usvg::fontdb::{Database, Family, Query, ID};
use tracing::{debug, info};

/// Font files tried first
pub const CANDIDATE_PATHS: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJKjp-Regular.otf",
    "/usr/share/fonts/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto/NotoSansCJKjp-Regular.otf",
];

/// Installed families tried next, in preference order
pub const CANDIDATE_FAMILIES: &[&str] = &[
    "Noto Sans CJK JP",
    "Noto Sans CJK",
    "Noto Sans JP",
    "Source Han Sans JP",
    "IPAGothic",
    "TakaoGothic",
    "VL Gothic",
];

/// How the label font was found
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontSource {
    /// Registered from a known file
    File(PathBuf),
    /// Found among installed fonts by family name
    Installed,
    /// Nothing found; generic family names only
    Fallback,
}

/// Fonts available to the renderer
#[derive(Clone, Debug)]
pub struct FontSetup {
    database: Arc<Database>,
    family: Option<String>,
    fallback_families: Vec<String>,
    source: FontSource,
}

impl FontSetup {
    /// Discover fonts from the standard candidate lists and system fonts
    pub fn discover() -> Self {
        Self::discover_with(CANDIDATE_PATHS, CANDIDATE_FAMILIES, true)
    }

    /// Discover fonts from explicit candidates
    pub fn discover_with<P: AsRef<Path>>(paths: &[P], families: &[&str], load_system: bool) -> Self {
        let mut database = Database::new();
        if load_system {
            database.load_system_fonts();
            debug!(faces = database.len(), "system fonts loaded");
        }

        let fallback_families: Vec<String> = families.iter().map(|f| (*f).to_string()).collect();

        let mut found: Option<(String, FontSource)> = None;
        for path in paths {
            let path = path.as_ref();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = family_of_file(path) {
                if database.load_font_file(path).is_ok() {
                    found = Some((name, FontSource::File(path.to_path_buf())));
                    break;
                }
            }
        }

        if found.is_none() {
            found = families
                .iter()
                .copied()
                .find(|name| {
                    database
                        .faces()
                        .any(|face| face.families.iter().any(|(family, _)| family.as_str() == *name))
                })
                .map(|name| (name.to_string(), FontSource::Installed));
        }

        match found {
            Some((family, source)) => {
                database.set_sans_serif_family(family.clone());
                info!(%family, ?source, "label font selected");
                Self {
                    database: Arc::new(database),
                    family: Some(family),
                    fallback_families,
                    source,
                }
            }
            None => {
                info!("no CJK font found, falling back to generic sans-serif");
                Self {
                    database: Arc::new(database),
                    family: None,
                    fallback_families,
                    source: FontSource::Fallback,
                }
            }
        }
    }

    /// No fonts at all; text is measured by estimate
    pub fn fallback() -> Self {
        Self::discover_with::<&str>(&[], CANDIDATE_FAMILIES, false)
    }

    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }

    pub fn database(&self) -> Arc<Database> {
        Arc::clone(&self.database)
    }

    /// Value for the SVG `font-family` attribute
    pub fn css_family(&self) -> String {
        let names: Vec<&str> = match &self.family {
            Some(family) => vec![family.as_str()],
            None => self.fallback_families.iter().map(String::as_str).collect(),
        };
        let mut css: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
        css.push("sans-serif".to_string());
        css.join(", ")
    }

    /// Text measurement backed by the selected font
    pub fn metrics(&self) -> FontMetrics {
        let face = self.family.as_deref().and_then(|name| {
            self.database.query(&Query {
                families: &[Family::Name(name)],
                ..Query::default()
            })
        });
        FontMetrics {
            database: self.database(),
            face,
            fallback: EstimatedMetrics::default(),
        }
    }
}

/// First family name of the first face in a font file
fn family_of_file(path: &Path) -> Option<String> {
    let mut probe = Database::new();
    probe.load_font_file(path).ok()?;
    let name = probe
        .faces()
        .next()
        .and_then(|face| face.families.first())
        .map(|(name, _)| name.clone());
    name
}

/// Glyph-advance text measurement
///
/// Characters the face has no glyph for, and every character when no face
/// was found, use the [`EstimatedMetrics`] widths.
#[derive(Clone, Debug)]
pub struct FontMetrics {
    database: Arc<Database>,
    face: Option<ID>,
    fallback: EstimatedMetrics,
}

impl FontMetrics {
    pub fn has_face(&self) -> bool {
        self.face.is_some()
    }
}

impl TextMeasure for FontMetrics {
    fn text_width(&self, text: &str, font_px: f64, style: FontStyle) -> f64 {
        let Some(id) = self.face else {
            return self.fallback.text_width(text, font_px, style);
        };

        self.database
            .with_face_data(id, |data, index| {
                let face = ttf_parser::Face::parse(data, index).ok()?;
                let units_per_em = f64::from(face.units_per_em());
                let ems: f64 = text
                    .chars()
                    .map(|c| {
                        face.glyph_index(c)
                            .and_then(|glyph| face.glyph_hor_advance(glyph))
                            .map_or_else(|| self.fallback.char_em(c), |advance| f64::from(advance) / units_per_em)
                    })
                    .sum();
                Some(ems * font_px)
            })
            .flatten()
            .unwrap_or_else(|| self.fallback.text_width(text, font_px, style))
    }
}
