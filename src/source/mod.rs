//! External collaborators: URL parsing and the metadata/thumbnail provider.

pub(crate) mod oembed;
pub(crate) mod video_id;
