//! Keeping a host page's native background and background-media element in step with a
//! [`SlideBackground`](crate::SlideBackground).

pub(crate) mod config;
pub(crate) mod host;
pub(crate) mod memory;
pub(crate) mod synchronizer;
