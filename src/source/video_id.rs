use std::fmt;

use url::Url;

use crate::foundation::error::{SharecardError, SharecardResult};

pub const SHORT_LINK_HOST: &str = "youtu.be";
pub const CANONICAL_HOST: &str = "youtube.com";
pub const DEFAULT_THUMBNAIL_BASE: &str = "https://i.ytimg.com/vi";

/// Opaque YouTube video identifier.
///
/// Non-empty and limited to `[A-Za-z0-9_-]`, so it is safe as a path segment and a
/// filename component.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(raw: impl Into<String>) -> SharecardResult<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(SharecardError::input("invalid youtube url"));
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(SharecardError::input(format!(
                "invalid youtube video id '{raw}'"
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `{base}/{id}/maxresdefault.jpg`
    pub fn thumbnail_url(&self, base: &str) -> String {
        format!("{}/{}/maxresdefault.jpg", base.trim_end_matches('/'), self.0)
    }

    /// `https://youtu.be/{id}`
    pub fn short_url(&self) -> String {
        format!("https://{SHORT_LINK_HOST}/{}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pull the video identifier out of a short-link or canonical watch URL.
pub fn extract_video_id(input: &str) -> SharecardResult<VideoId> {
    let parsed = Url::parse(input.trim())
        .map_err(|e| SharecardError::input(format!("invalid URL '{}': {e}", input.trim())))?;
    let host = parsed.host_str().unwrap_or_default();

    if host == SHORT_LINK_HOST {
        let segment = parsed
            .path_segments()
            .and_then(|mut segs| segs.next())
            .unwrap_or_default();
        return VideoId::new(segment);
    }
    if host.contains(CANONICAL_HOST) {
        let v = parsed
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();
        return VideoId::new(v);
    }
    Err(SharecardError::input("failed to extract youtube ID from URL"))
}

#[cfg(test)]
#[path = "../../tests/unit/source/video_id.rs"]
mod tests;
