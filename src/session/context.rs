//! Explicit generation context: current font, latest request and current batch.

use crate::assets::decode::{SourceBitmap, decode_image};
use crate::foundation::error::{SharecardError, SharecardResult};
use crate::render::output::GenerationBatch;
use crate::render::pipeline::{RenderOptions, render_batch};
use crate::render::variants::RenderInput;
use crate::session::prefs::PreferenceStore;
use crate::source::oembed::{VideoMetadata, VideoSource};
use crate::source::video_id::{VideoId, extract_video_id};
use crate::text::engine::TextEngine;
use crate::text::font::{FontCatalog, FontConfig, FontSelection, Notice};

/// Monotonically increasing tag of one generation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenerationToken(u64);

impl GenerationToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug)]
pub struct GenerationRequest {
    pub token: GenerationToken,
    pub video_id: VideoId,
    pub source_url: String,
}

/// Metadata and decoded thumbnail for one request, ready to render.
#[derive(Clone, Debug)]
pub struct FetchedAssets {
    pub request: GenerationRequest,
    pub metadata: VideoMetadata,
    pub bitmap: SourceBitmap,
}

/// Outcome of handing fetched assets back to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Rendered and now the current batch.
    Published,
    /// A newer request was issued meanwhile; the assets were dropped.
    Stale {
        token: GenerationToken,
        latest: Option<GenerationToken>,
    },
}

/// Fetch metadata, then the thumbnail, then decode it.
///
/// The two network calls run in sequence; rendering starts only after both succeed.
#[tracing::instrument(skip(source, request), fields(token = request.token.get(), video_id = %request.video_id))]
pub async fn fetch_assets(
    source: &impl VideoSource,
    request: GenerationRequest,
) -> SharecardResult<FetchedAssets> {
    let metadata = source.fetch_metadata(&request.source_url).await?;
    let bytes = source.fetch_thumbnail(&request.video_id).await?;
    let bitmap = decode_image(&bytes)?;
    tracing::debug!(
        width = bitmap.width,
        height = bitmap.height,
        "thumbnail decoded"
    );
    Ok(FetchedAssets {
        request,
        metadata,
        bitmap,
    })
}

pub struct Session {
    engine: TextEngine,
    fonts: FontSelection,
    prefs: Box<dyn PreferenceStore>,
    options: RenderOptions,
    next_token: u64,
    latest: Option<GenerationToken>,
    batch: Option<GenerationBatch>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("font", &self.fonts.family())
            .field("options", &self.options)
            .field("latest", &self.latest)
            .field("batch", &self.batch.as_ref().map(|b| b.video_id().clone()))
            .finish()
    }
}

impl Session {
    /// Build the font catalog and restore the saved font choice.
    pub fn open(
        engine: TextEngine,
        prefs: Box<dyn PreferenceStore>,
        options: RenderOptions,
    ) -> (Self, Vec<Notice>) {
        let (catalog, catalog_notice) = FontCatalog::discover(engine.book());
        let mut fonts = FontSelection::new(catalog);
        let mut notices: Vec<Notice> = catalog_notice.into_iter().collect();
        notices.extend(fonts.restore(engine.book(), prefs.as_ref()));

        let session = Self {
            engine,
            fonts,
            prefs,
            options,
            next_token: 0,
            latest: None,
            batch: None,
        };
        (session, notices)
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    pub fn fonts(&self) -> &FontSelection {
        &self.fonts
    }

    pub fn font_config(&self) -> FontConfig {
        self.fonts.config()
    }

    /// Choose a font family for subsequent generations and persist it.
    pub fn select_font(&mut self, family: &str) -> Vec<Notice> {
        self.fonts
            .apply(family, self.engine.book(), self.prefs.as_mut())
    }

    /// The batch of the most recent successful generation.
    pub fn batch(&self) -> Option<&GenerationBatch> {
        self.batch.as_ref()
    }

    pub fn latest_token(&self) -> Option<GenerationToken> {
        self.latest
    }

    /// Validate `url` and issue a new token; the new token supersedes all earlier ones.
    pub fn begin(&mut self, url: &str) -> SharecardResult<GenerationRequest> {
        let video_id = extract_video_id(url)?;
        self.next_token += 1;
        let token = GenerationToken(self.next_token);
        self.latest = Some(token);
        tracing::info!(token = token.get(), %video_id, "generation requested");
        Ok(GenerationRequest {
            token,
            video_id,
            source_url: url.trim().to_string(),
        })
    }

    /// Render fetched assets into a new batch, unless a newer request exists.
    ///
    /// On success the previous batch is replaced. On failure it is kept.
    pub fn complete(&mut self, fetched: FetchedAssets) -> SharecardResult<Completion> {
        let token = fetched.request.token;
        if self.latest != Some(token) {
            tracing::info!(token = token.get(), latest = ?self.latest, "discarding stale generation");
            return Ok(Completion::Stale {
                token,
                latest: self.latest,
            });
        }
        fetched.metadata.validate()?;

        let font = self.fonts.config();
        let input = RenderInput {
            bitmap: &fetched.bitmap,
            metadata: &fetched.metadata,
            video_id: &fetched.request.video_id,
            font: &font,
        };
        let batch = render_batch(&mut self.engine, input, &self.options)?;
        tracing::info!(
            video_id = %batch.video_id(),
            images = batch.len(),
            notices = batch.notices().len(),
            "batch published"
        );
        self.batch = Some(batch);
        Ok(Completion::Published)
    }

    /// `begin`, fetch and `complete` in one step.
    pub async fn generate(
        &mut self,
        source: &impl VideoSource,
        url: &str,
    ) -> SharecardResult<&GenerationBatch> {
        let request = self.begin(url)?;
        let fetched = fetch_assets(source, request).await?;
        self.complete(fetched)?;
        self.batch
            .as_ref()
            .ok_or_else(|| SharecardError::render("generation produced no batch"))
    }

    /// Render from already-available assets, bypassing the network.
    pub fn generate_offline(
        &mut self,
        video_id: VideoId,
        metadata: VideoMetadata,
        bitmap: SourceBitmap,
    ) -> SharecardResult<&GenerationBatch> {
        let request = self.begin(&video_id.short_url())?;
        self.complete(FetchedAssets {
            request,
            metadata,
            bitmap,
        })?;
        self.batch
            .as_ref()
            .ok_or_else(|| SharecardError::render("generation produced no batch"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/context.rs"]
mod tests;
