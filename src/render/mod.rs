//! Image composition: the four variant renderers and their JPEG output.

pub(crate) mod blur;
pub(crate) mod output;
pub(crate) mod pipeline;
pub(crate) mod surface;
pub(crate) mod variants;
