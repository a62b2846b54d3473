//! slidebg keeps a slide's two-layer background (a solid or gradient color under an optional
//! image) in step with a host page that only knows a flat background string and positioned
//! elements.
//!
//! - [`normalize`] any stored or legacy record into a [`SlideBackground`]
//! - [`render_color`] / [`render_flattened`] to get strings and SVG a flat host can display
//! - [`BackgroundSynchronizer::apply`] to write the color layer and maintain the one
//!   background-media element with fit/fill geometry
#![forbid(unsafe_code)]

mod assets;
mod compose;
mod foundation;
mod layout;
mod schema;
mod sync;

pub use crate::foundation::core::{NaturalSize, PageSize, Rect, Size};
pub use crate::foundation::error::{BackgroundError, BackgroundResult};

pub use crate::schema::hex::HexColor;
pub use crate::schema::model::{
    Anchor, ColorLayer, Direction, Gradient, MediaLayer, Sizing, SlideBackground,
};
pub use crate::schema::normalize::{infer_from_native, normalize, normalize_opt};

pub use crate::compose::color::{RenderedColor, linear_angle_deg, render_color, render_color_svg};
pub use crate::compose::flatten::render_flattened;
pub use crate::compose::media::{preserve_aspect_ratio, render_media};
pub use crate::compose::svg::SvgImage;
pub use crate::compose::thumbnail::render_thumbnail;

pub use crate::assets::decode::decode_natural_size;
pub use crate::assets::fetch::{ImageFetcher, LocalFetcher, decode_data_uri, normalize_rel_path};
pub use crate::assets::resolver::ImageSizeResolver;

pub use crate::layout::geometry::{MediaGeometry, fill_geometry, fit_geometry, resolve_geometry};

pub use crate::sync::config::SyncOpts;
pub use crate::sync::host::{
    ElementId, ElementInit, ElementPatch, ElementState, HostPage, HostResult, Interaction,
};
pub use crate::sync::memory::{HostOp, InMemoryPage};
pub use crate::sync::synchronizer::BackgroundSynchronizer;
