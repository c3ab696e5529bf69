//! Frame assembly and playback: viewport fitting, the progress strip and the transition timeline.

pub(crate) mod labels;
pub(crate) mod timeline;
pub(crate) mod viewport;
