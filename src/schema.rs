//! Canonical background schema and the normalizer that produces it.
//!
//! Every historical or partial background representation funnels through
//! [`normalize`](normalize::normalize) into one [`SlideBackground`](model::SlideBackground).

pub(crate) mod hex;
pub(crate) mod model;
pub(crate) mod normalize;
