//! Generation session, preference storage and output packaging.

pub(crate) mod context;
pub(crate) mod package;
pub(crate) mod prefs;
