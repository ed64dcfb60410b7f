//! Headline font-size fitting.

/// The fixed promotional caption drawn inside the ellipse.
pub const HEADLINE: &str = "Full Video on YouTube";

/// How the headline size is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadlineSizing {
    /// Shrink from the start size until the headline fits.
    #[default]
    Dynamic,
    /// Always draw at the start size (legacy layout).
    Fixed,
}

/// Size search parameters, all in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitParams {
    pub start_px: f32,
    pub floor_px: f32,
    pub step_px: f32,
    /// Horizontal padding applied on both sides of the measured text.
    pub padding_px: f32,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            start_px: 110.0,
            floor_px: 50.0,
            step_px: 5.0,
            padding_px: 50.0,
        }
    }
}

/// Result of a headline fit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadlineFit {
    pub size_px: f32,
    /// Measured advance of the headline at `size_px`.
    pub text_width: f32,
    /// `false` when even the floor size overflows; rendering proceeds at the floor.
    pub fits: bool,
}

impl HeadlineFit {
    /// Total framed width: text plus padding on both sides.
    pub fn framed_width(&self, params: &FitParams) -> f32 {
        self.text_width + params.padding_px * 2.0
    }
}

/// Pick the headline size for `max_content_width`.
///
/// `measure` returns the headline advance at a given pixel size. Sizes step down from
/// `start_px` by `step_px` and never go below `floor_px`.
pub fn fit_headline<F>(
    mut measure: F,
    max_content_width: f32,
    params: FitParams,
    sizing: HeadlineSizing,
) -> HeadlineFit
where
    F: FnMut(f32) -> f32,
{
    let overflows = |w: f32| w + params.padding_px * 2.0 > max_content_width;

    let mut size = params.start_px;
    let mut width = measure(size);

    if sizing == HeadlineSizing::Dynamic {
        while overflows(width) && size > params.floor_px {
            size = (size - params.step_px).max(params.floor_px);
            width = measure(size);
        }
    }

    HeadlineFit {
        size_px: size,
        text_width: width,
        fits: !overflows(width),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/fit.rs"]
mod tests;
