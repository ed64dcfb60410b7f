//! Environment-driven configuration.

use std::path::PathBuf;

use crate::render::pipeline::DEFAULT_JPEG_QUALITY;
use crate::source::oembed::DEFAULT_OEMBED_ENDPOINT;
use crate::source::video_id::DEFAULT_THUMBNAIL_BASE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// oEmbed endpoint queried with `?url=`.
    pub oembed_endpoint: String,
    /// Prefix of `{base}/{id}/maxresdefault.jpg`.
    pub thumbnail_base: String,
    /// JSON file holding the saved font choice; `None` keeps preferences in memory.
    pub prefs_path: Option<PathBuf>,
    /// Extra directories scanned for font files.
    pub font_dirs: Vec<PathBuf>,
    pub jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            oembed_endpoint: DEFAULT_OEMBED_ENDPOINT.to_string(),
            thumbnail_base: DEFAULT_THUMBNAIL_BASE.to_string(),
            prefs_path: None,
            font_dirs: Vec::new(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl Config {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup.
    pub fn from_lookup<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let prefs_path = non_empty("SHARECARD_PREFS_PATH")
            .map(PathBuf::from)
            .or_else(|| {
                non_empty("XDG_CONFIG_HOME")
                    .map(PathBuf::from)
                    .or_else(|| non_empty("HOME").map(|h| PathBuf::from(h).join(".config")))
                    .map(|dir| dir.join("sharecard").join("prefs.json"))
            });

        let font_dirs = non_empty("SHARECARD_FONT_DIRS")
            .map(|v| std::env::split_paths(&v).filter(|p| !p.as_os_str().is_empty()).collect())
            .unwrap_or_default();

        Self {
            oembed_endpoint: non_empty("SHARECARD_OEMBED_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_OEMBED_ENDPOINT.to_string()),
            thumbnail_base: non_empty("SHARECARD_THUMBNAIL_BASE")
                .unwrap_or_else(|| DEFAULT_THUMBNAIL_BASE.to_string()),
            prefs_path,
            font_dirs,
            jpeg_quality: non_empty("SHARECARD_JPEG_QUALITY")
                .and_then(|s| s.trim().parse::<u8>().ok())
                .filter(|q| (1..=100).contains(q))
                .unwrap_or(DEFAULT_JPEG_QUALITY),
        }
    }
}
