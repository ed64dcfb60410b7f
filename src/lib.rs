//! Sharecard renders shareable promotional images for a YouTube video.
//!
//! One generation cycle turns a video URL into four JPEG variants (basic, large, full,
//! blurred) built from the video's high-resolution thumbnail, title and channel name:
//!
//! - Open a [`Session`] with a [`TextEngine`] and a [`PreferenceStore`]
//! - [`Session::generate`] against a [`VideoSource`] (HTTP via [`HttpVideoSource`])
//! - Save the resulting [`GenerationBatch`] with [`save_individual`], [`save_staggered`] or
//!   [`zip_batch`]
#![forbid(unsafe_code)]

mod assets;
mod foundation;

pub mod config;
pub(crate) mod render;
pub(crate) mod session;
pub(crate) mod source;
pub(crate) mod text;

pub use crate::assets::decode::{SourceBitmap, decode_image};
pub use crate::config::Config;
pub use crate::foundation::core::{Canvas, Point, Rect, Rgba8, Vec2, palette};
pub use crate::foundation::error::{SharecardError, SharecardResult};

pub use crate::render::blur::{ShadowMask, blur_bitmap, rect_shadow};
pub use crate::render::output::{
    GenerationBatch, JPEG_MIME, RenderedImage, decode_data_uri, encode_jpeg,
};
pub use crate::render::pipeline::{
    DEFAULT_JPEG_QUALITY, RenderOptions, render_batch, render_variant,
};
pub use crate::render::surface::Frame;
pub use crate::render::variants::{RenderInput, Variant};

pub use crate::session::context::{
    Completion, FetchedAssets, GenerationRequest, GenerationToken, Session, fetch_assets,
};
pub use crate::session::package::{
    DEFAULT_STAGGER, NO_BATCH_MESSAGE, save_individual, save_staggered, zip_batch,
    zip_batch_bytes, zip_filename,
};
pub use crate::session::prefs::{JsonFilePreferences, MemoryPreferences, PreferenceStore};

pub use crate::source::oembed::{
    DEFAULT_OEMBED_ENDPOINT, HttpVideoSource, RawOEmbed, VideoMetadata, VideoSource,
};
pub use crate::source::video_id::{DEFAULT_THUMBNAIL_BASE, VideoId, extract_video_id};

pub use crate::text::engine::{FontBook, TextEngine};
pub use crate::text::fit::{FitParams, HEADLINE, HeadlineFit, HeadlineSizing, fit_headline};
pub use crate::text::font::{
    CURATED_SYSTEM_FONTS, DEFAULT_FONT_FAMILY, FALLBACK_FONT_STACK, FONT_PREFERENCE_KEY,
    FontCatalog, FontConfig, FontProbe, FontSelection, FontSpec, FontWeight, NoProbe, Notice,
    quote_font_family, sanitize_font_selection,
};
pub use crate::text::wrap::wrap_text;
