//! Font resolution: family selection, quoting, availability and the font catalog.
//!
//! Every font reference the renderers make goes through [`FontConfig::spec`], which always
//! yields a CSS-style font string ending in the fallback stack, so an unknown or oddly named
//! family can never produce an unusable font description.

use std::collections::BTreeSet;
use std::fmt;

use crate::session::prefs::PreferenceStore;

pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const FALLBACK_FONT_STACK: &str = "Arial, Helvetica, sans-serif";
pub const FONT_PREFERENCE_KEY: &str = "selected-font-family";

/// Common desktop families accepted without probing.
pub const CURATED_SYSTEM_FONTS: &[&str] = &[
    "Arial",
    "Arial Black",
    "Bahnschrift",
    "Calibri",
    "Cambria",
    "Candara",
    "Comic Sans MS",
    "Consolas",
    "Courier New",
    "Georgia",
    "Helvetica",
    "Impact",
    "Lucida Console",
    "Lucida Sans Unicode",
    "Palatino Linotype",
    "Segoe UI",
    "Tahoma",
    "Times New Roman",
    "Trebuchet MS",
    "Verdana",
    "Avenir",
    "Avenir Next",
    "Charter",
    "Futura",
    "Gill Sans",
    "Helvetica Neue",
    "Menlo",
    "Monaco",
    "Optima",
    "San Francisco",
    "SF Pro Display",
    "SF Pro Text",
    "American Typewriter",
    "Andale Mono",
    "Baskerville",
    "Didot",
    "Geneva",
    "Hoefler Text",
    "Marker Felt",
    "Noteworthy",
    "Big Caslon",
    "Copperplate",
    "Apple Color Emoji",
    "Roboto",
    "Noto Sans",
    "Noto Serif",
    "Noto Color Emoji",
    "Ubuntu",
    "Cantarell",
    "DejaVu Sans",
    "DejaVu Serif",
    "DejaVu Sans Mono",
    "Liberation Sans",
    "Liberation Serif",
    "Liberation Mono",
    "Source Sans Pro",
    "Source Serif Pro",
    "Source Code Pro",
    "Droid Sans",
    "Droid Serif",
    "Droid Sans Mono",
    "Inter",
    "PT Sans",
    "PT Serif",
    "Open Sans",
    "Lato",
    "Merriweather",
    "Fira Sans",
    "Fira Mono",
    "JetBrains Mono",
    "Ubuntu Mono",
];

/// Non-fatal conditions surfaced to the user while rendering continues.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// The chosen family is not installed; the fallback stack applies.
    FontUnavailable { family: String },
    /// Local font enumeration failed; only the curated list is offered.
    LocalFontsUnavailable { reason: String },
    /// The headline overflows its frame even at the floor size.
    HeadlineOverflow {
        variant: String,
        size_px: f32,
        text_width: f32,
        max_content_width: f32,
    },
    /// The font preference could not be read or written.
    PreferenceNotSaved { reason: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::FontUnavailable { family } => write!(
                f,
                "Selected font \"{family}\" is unavailable. Falling back to {FALLBACK_FONT_STACK}."
            ),
            Notice::LocalFontsUnavailable { .. } => {
                f.write_str("Local font access unavailable; showing a curated system font list.")
            }
            Notice::HeadlineOverflow {
                variant,
                size_px,
                text_width,
                max_content_width,
            } => write!(
                f,
                "{variant}: headline does not fit even at {size_px}px \
                 (text {text_width:.1}px, frame {max_content_width:.1}px)"
            ),
            Notice::PreferenceNotSaved { reason } => {
                write!(f, "failed to persist font selection: {reason}")
            }
        }
    }
}

/// CSS font weight keyword.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    pub fn as_css(self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }

    pub fn as_parley(self) -> parley::style::FontWeight {
        match self {
            FontWeight::Normal => parley::style::FontWeight::NORMAL,
            FontWeight::Bold => parley::style::FontWeight::BOLD,
        }
    }
}

/// Family choice plus the stack appended after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontConfig {
    pub family: String,
    pub fallback_stack: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_FAMILY)
    }
}

impl FontConfig {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            fallback_stack: FALLBACK_FONT_STACK.to_string(),
        }
    }

    /// Family actually used: trimmed, or the default when blank.
    pub fn effective_family(&self) -> &str {
        let trimmed = self.family.trim();
        if trimmed.is_empty() {
            DEFAULT_FONT_FAMILY
        } else {
            trimmed
        }
    }

    /// `"<family>", <fallback stack>`
    pub fn family_list(&self) -> String {
        format!(
            "{}, {}",
            quote_font_family(self.effective_family()),
            self.fallback_stack
        )
    }

    pub fn spec(&self, size_px: f32, weight: FontWeight) -> FontSpec {
        FontSpec {
            weight,
            size_px,
            family_list: self.family_list(),
        }
    }

    /// Family names in lookup order, unquoted, generic keywords included.
    pub fn lookup_order(&self) -> Vec<FamilyName> {
        let mut out = vec![FamilyName::parse(self.effective_family())];
        out.extend(
            self.fallback_stack
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| FamilyName::parse(s.trim_matches(|c| c == '"' || c == '\''))),
        );
        out.dedup();
        out
    }
}

/// A fully resolved drawing font: `"<weight> <size>px <family list>"`.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub weight: FontWeight,
    pub size_px: f32,
    pub family_list: String,
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}px {}",
            self.weight.as_css(),
            self.size_px,
            self.family_list
        )
    }
}

/// One entry of a family list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FamilyName {
    Named(String),
    Generic(GenericKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenericKind {
    Serif,
    SansSerif,
    Monospace,
    Cursive,
    Fantasy,
}

impl FamilyName {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "serif" => FamilyName::Generic(GenericKind::Serif),
            "sans-serif" => FamilyName::Generic(GenericKind::SansSerif),
            "monospace" => FamilyName::Generic(GenericKind::Monospace),
            "cursive" => FamilyName::Generic(GenericKind::Cursive),
            "fantasy" => FamilyName::Generic(GenericKind::Fantasy),
            _ => FamilyName::Named(s.to_string()),
        }
    }
}

/// Double-quote a family name, backslash-escaping `"` and `\`.
pub fn quote_font_family(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Trim a user-entered family; blank input selects the default family.
pub fn sanitize_font_selection(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        DEFAULT_FONT_FAMILY.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Live view of the fonts installed on the host.
pub trait FontProbe {
    /// `None` when the host cannot answer, which counts as available.
    fn has_family(&self, family: &str) -> Option<bool>;

    /// Enumerate installed family names.
    fn local_families(&self) -> Result<Vec<String>, String>;
}

/// Probe for hosts without font introspection.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProbe;

impl FontProbe for NoProbe {
    fn has_family(&self, _family: &str) -> Option<bool> {
        None
    }

    fn local_families(&self) -> Result<Vec<String>, String> {
        Err("font enumeration not supported".to_string())
    }
}

/// Sorted, de-duplicated set of offered family names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FontCatalog {
    families: BTreeSet<String>,
}

impl FontCatalog {
    pub fn curated() -> Self {
        Self::from_names(CURATED_SYSTEM_FONTS.iter().copied())
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let families = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        Self { families }
    }

    /// Curated list merged with whatever the probe enumerates.
    pub fn discover(probe: &impl FontProbe) -> (Self, Option<Notice>) {
        let mut catalog = Self::curated();
        match probe.local_families() {
            Ok(local) => {
                catalog.extend(local);
                (catalog, None)
            }
            Err(reason) => {
                tracing::warn!(%reason, "local font enumeration unavailable");
                (catalog, Some(Notice::LocalFontsUnavailable { reason }))
            }
        }
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for n in names {
            let n = n.as_ref().trim();
            if !n.is_empty() {
                self.families.insert(n.to_string());
            }
        }
    }

    pub fn contains(&self, family: &str) -> bool {
        self.families.contains(family)
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.families.iter().map(String::as_str)
    }
}

/// The user's current family choice, persisted across sessions.
#[derive(Debug)]
pub struct FontSelection {
    family: String,
    catalog: FontCatalog,
}

impl FontSelection {
    pub fn new(catalog: FontCatalog) -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            catalog,
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn catalog(&self) -> &FontCatalog {
        &self.catalog
    }

    pub fn config(&self) -> FontConfig {
        FontConfig::new(self.family.clone())
    }

    pub fn is_available(&self, family: &str, probe: &impl FontProbe) -> bool {
        self.catalog.contains(family) || probe.has_family(family).unwrap_or(true)
    }

    /// Select `value`, persist it, and report whether it needs the fallback stack.
    pub fn apply(
        &mut self,
        value: &str,
        probe: &impl FontProbe,
        prefs: &mut dyn PreferenceStore,
    ) -> Vec<Notice> {
        self.family = sanitize_font_selection(value);

        let mut notices = Vec::new();
        if let Err(err) = prefs.store(FONT_PREFERENCE_KEY, &self.family) {
            tracing::warn!(error = %err, "failed to persist font selection");
            notices.push(Notice::PreferenceNotSaved {
                reason: err.to_string(),
            });
        }

        if !self.is_available(&self.family, probe) {
            let notice = Notice::FontUnavailable {
                family: self.family.clone(),
            };
            tracing::warn!(family = %self.family, "{notice}");
            notices.push(notice);
        }
        notices
    }

    /// Restore the persisted choice; absent or unavailable values restore the default.
    pub fn restore(&mut self, probe: &impl FontProbe, prefs: &dyn PreferenceStore) -> Vec<Notice> {
        let saved = match prefs.load(FONT_PREFERENCE_KEY) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load saved font selection");
                None
            }
        };

        let mut notices = Vec::new();
        self.family = match saved.map(|s| sanitize_font_selection(&s)) {
            Some(f) if self.is_available(&f, probe) => f,
            Some(f) => {
                notices.push(Notice::FontUnavailable { family: f });
                DEFAULT_FONT_FAMILY.to_string()
            }
            None => DEFAULT_FONT_FAMILY.to_string(),
        };
        tracing::debug!(family = %self.family, "restored font selection");
        notices
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;
