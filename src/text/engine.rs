//! Text shaping and measurement.
//!
//! Fonts are discovered with the `fontdb` database that ships with `usvg`, and only the faces a
//! family list actually names are registered with Parley. Parley runs without its own system
//! backend, so generic families (`sans-serif`, ...) are mapped explicitly.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use usvg::fontdb;

use crate::foundation::core::Rgba8;
use crate::text::font::{FamilyName, FontConfig, FontProbe, FontSpec, GenericKind};

/// RGBA8 brush color carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Families tried, in order, for the generic `sans-serif` slot.
pub const SANS_SERIF_CANDIDATES: &[&str] = &[
    "Arial",
    "Helvetica",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
    "Roboto",
    "Ubuntu",
    "Open Sans",
    "Segoe UI",
    "Verdana",
];

/// First candidate accepted by `installed`.
pub(crate) fn pick_sans_serif(installed: impl Fn(&str) -> bool) -> Option<&'static str> {
    SANS_SERIF_CANDIDATES
        .iter()
        .copied()
        .find(|name| installed(name))
}

/// Installed fonts, backed by a `fontdb` database.
#[derive(Clone)]
pub struct FontBook {
    db: Arc<fontdb::Database>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.db.len())
            .finish()
    }
}

impl FontBook {
    /// System fonts plus fonts found directly inside `extra_dirs`.
    pub fn system(extra_dirs: &[impl AsRef<Path>]) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        for dir in extra_dirs {
            load_fonts_from_dir(&mut db, dir.as_ref());
        }
        bind_sans_serif(&mut db);
        tracing::debug!(faces = db.len(), "font database loaded");
        Self { db: Arc::new(db) }
    }

    /// A book with no fonts; text is laid out but never drawn.
    pub fn empty() -> Self {
        Self {
            db: Arc::new(fontdb::Database::new()),
        }
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    fn query(&self, family: &FamilyName) -> Option<fontdb::ID> {
        let families = [match family {
            FamilyName::Named(name) => fontdb::Family::Name(name),
            FamilyName::Generic(GenericKind::Serif) => fontdb::Family::Serif,
            FamilyName::Generic(GenericKind::SansSerif) => fontdb::Family::SansSerif,
            FamilyName::Generic(GenericKind::Monospace) => fontdb::Family::Monospace,
            FamilyName::Generic(GenericKind::Cursive) => fontdb::Family::Cursive,
            FamilyName::Generic(GenericKind::Fantasy) => fontdb::Family::Fantasy,
        }];
        self.db.query(&fontdb::Query {
            families: &families,
            weight: fontdb::Weight::NORMAL,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        })
    }

    fn face_bytes(&self, id: fontdb::ID) -> Option<Vec<u8>> {
        self.db.with_face_data(id, |data, _index| data.to_vec())
    }

    fn first_face(&self) -> Option<fontdb::ID> {
        self.db.faces().next().map(|f| f.id)
    }
}

impl FontProbe for FontBook {
    fn has_family(&self, family: &str) -> Option<bool> {
        Some(self.query(&FamilyName::Named(family.to_string())).is_some())
    }

    fn local_families(&self) -> Result<Vec<String>, String> {
        if self.db.is_empty() {
            return Err("no fonts found on this system".to_string());
        }
        Ok(self
            .db
            .faces()
            .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
            .collect())
    }
}

/// fontdb maps `sans-serif` to "Arial" whether or not it is installed.
fn bind_sans_serif(db: &mut fontdb::Database) {
    let installed = |name: &str| {
        db.faces()
            .any(|face| face.families.iter().any(|(family, _)| family == name))
    };
    match pick_sans_serif(installed) {
        Some(name) => {
            tracing::debug!(family = name, "sans-serif bound");
            db.set_sans_serif_family(name);
        }
        None => tracing::debug!("no common sans-serif family installed"),
    }
}

fn load_fonts_from_dir(db: &mut fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(err) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %err, "skipping unreadable font");
        }
    }
}

/// A single shaped line ready to draw.
pub struct ShapedLine {
    pub layout: parley::Layout<TextBrushRgba8>,
    /// Advance width including trailing whitespace.
    pub width: f32,
    /// Distance from the layout top to the first baseline.
    pub baseline: f32,
}

/// Stateful helper that shapes and measures text against a [`FontBook`].
pub struct TextEngine {
    book: FontBook,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    /// Family lists already mapped into the Parley collection.
    prepared: HashSet<String>,
    /// Faces already registered, so one font file is loaded once.
    loaded_faces: HashMap<fontdb::ID, parley::fontique::FamilyId>,
    /// Glyph sources for the rasterizer, keyed by Parley blob id.
    glyph_sources: HashMap<u64, vello_cpu::peniko::Blob<u8>>,
    generic_ids: HashMap<GenericKind, Vec<parley::fontique::FamilyId>>,
    any_font: bool,
}

impl std::fmt::Debug for TextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEngine")
            .field("book", &self.book)
            .field("prepared", &self.prepared.len())
            .field("glyph_sources", &self.glyph_sources.len())
            .finish()
    }
}

impl TextEngine {
    pub fn new(book: FontBook) -> Self {
        Self {
            book,
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            prepared: HashSet::new(),
            loaded_faces: HashMap::new(),
            glyph_sources: HashMap::new(),
            generic_ids: HashMap::new(),
            any_font: false,
        }
    }

    pub fn book(&self) -> &FontBook {
        &self.book
    }

    /// Whether any face backs the layouts; without one nothing is drawn.
    pub fn has_fonts(&self) -> bool {
        self.any_font
    }

    /// Register every face `config` can resolve to.
    pub fn prepare(&mut self, config: &FontConfig) {
        let key = config.family_list();
        if !self.prepared.insert(key.clone()) {
            return;
        }

        let mut resolved = 0usize;
        for family in config.lookup_order() {
            let Some(id) = self.book.query(&family) else {
                tracing::debug!(?family, "family not installed");
                continue;
            };
            if let Some(family_id) = self.register_face(id) {
                resolved += 1;
                if let FamilyName::Generic(kind) = family {
                    self.map_generic(kind, family_id);
                }
            }
        }

        if resolved == 0 {
            // Last resort: any installed face stands in for sans-serif.
            match self.book.first_face().and_then(|id| self.register_face(id)) {
                Some(family_id) => {
                    tracing::warn!(families = %key, "no listed family installed, using first system face");
                    self.map_generic(GenericKind::SansSerif, family_id);
                }
                None => tracing::warn!("no fonts available, text will not be drawn"),
            }
        }
    }

    fn register_face(&mut self, id: fontdb::ID) -> Option<parley::fontique::FamilyId> {
        if let Some(family_id) = self.loaded_faces.get(&id) {
            return Some(*family_id);
        }

        let bytes = self.book.face_bytes(id)?;
        let blob = parley::fontique::Blob::from(bytes);
        let families = self.font_ctx.collection.register_fonts(blob.clone(), None);
        let family_id = families.first().map(|(fid, _)| *fid)?;

        self.glyph_sources.insert(
            blob.id(),
            vello_cpu::peniko::Blob::from(blob.data().to_vec()),
        );
        self.loaded_faces.insert(id, family_id);
        self.any_font = true;
        Some(family_id)
    }

    fn map_generic(&mut self, kind: GenericKind, family_id: parley::fontique::FamilyId) {
        let ids = self.generic_ids.entry(kind).or_default();
        if !ids.contains(&family_id) {
            ids.push(family_id);
        }
        let generic = match kind {
            GenericKind::Serif => parley::style::GenericFamily::Serif,
            GenericKind::SansSerif => parley::style::GenericFamily::SansSerif,
            GenericKind::Monospace => parley::style::GenericFamily::Monospace,
            GenericKind::Cursive => parley::style::GenericFamily::Cursive,
            GenericKind::Fantasy => parley::style::GenericFamily::Fantasy,
        };
        self.font_ctx
            .collection
            .set_generic_families(generic, ids.iter().copied());
    }

    /// Shape `text` on a single unbroken line.
    pub(crate) fn shape(&mut self, spec: &FontSpec, text: &str, brush: TextBrushRgba8) -> ShapedLine {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(spec.family_list.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(spec.size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            spec.weight.as_parley(),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let baseline = layout
            .lines()
            .next()
            .map(|line| line.metrics().baseline)
            .unwrap_or(spec.size_px);
        let width = layout.full_width();
        ShapedLine {
            layout,
            width,
            baseline,
        }
    }

    /// Advance width of `text`, trailing whitespace included.
    pub fn measure(&mut self, spec: &FontSpec, text: &str) -> f32 {
        if !self.any_font {
            return 0.0;
        }
        self.shape(spec, text, TextBrushRgba8::default()).width
    }

    /// Rasterizer font for a Parley run font.
    pub(crate) fn glyph_font(&self, blob_id: u64, index: u32) -> Option<vello_cpu::peniko::FontData> {
        self.glyph_sources
            .get(&blob_id)
            .map(|blob| vello_cpu::peniko::FontData::new(blob.clone(), index))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
