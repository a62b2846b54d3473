//! Turning canonical layers into primitives a flat host understands: CSS gradient strings,
//! generated SVG documents and `data:` URIs.

pub(crate) mod color;
pub(crate) mod flatten;
pub(crate) mod media;
pub(crate) mod svg;
pub(crate) mod thumbnail;
