//! Media bytes and their natural dimensions.

pub(crate) mod decode;
pub(crate) mod fetch;
pub(crate) mod resolver;
