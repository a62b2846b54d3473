use serde::Serialize;

use crate::foundation::core::{NaturalSize, PageSize, Rect};
use crate::schema::model::{Anchor, Sizing};

/// Placement of the background media element: page-space bounds plus a crop window in
/// normalized (0..1) image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub crop_x: f64,
    pub crop_y: f64,
    pub crop_width: f64,
    pub crop_height: f64,
}

impl MediaGeometry {
    /// Full page bounds with no crop.
    pub fn full_page(page: PageSize) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: page.width,
            height: page.height,
            crop_x: 0.0,
            crop_y: 0.0,
            crop_width: 1.0,
            crop_height: 1.0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Crop window in normalized image coordinates.
    pub fn crop(&self) -> Rect {
        Rect::new(
            self.crop_x,
            self.crop_y,
            self.crop_x + self.crop_width,
            self.crop_y + self.crop_height,
        )
    }
}

/// Compute element geometry for `sizing`, falling back to an uncropped full-page element when
/// the natural size is unknown or degenerate.
pub fn resolve_geometry(
    page: PageSize,
    natural: Option<NaturalSize>,
    sizing: Sizing,
    anchor: Anchor,
) -> MediaGeometry {
    let Some(natural) = natural.filter(|n| !n.is_empty()) else {
        return MediaGeometry::full_page(page);
    };
    if !page.is_usable() {
        return MediaGeometry::full_page(page);
    }
    match sizing {
        Sizing::Fit => fit_geometry(page, natural, anchor),
        Sizing::Fill => fill_geometry(page, natural, anchor),
    }
}

/// Contain: largest aspect-preserving box inside the page, slack split by anchor weight.
pub fn fit_geometry(page: PageSize, natural: NaturalSize, anchor: Anchor) -> MediaGeometry {
    let img_aspect = natural.aspect();
    let (width, height) = if img_aspect > page.aspect() {
        (page.width, page.width / img_aspect)
    } else {
        (page.height * img_aspect, page.height)
    };

    let (wx, wy) = anchor.weights();
    MediaGeometry {
        x: align_offset(page.width, width, wx),
        y: align_offset(page.height, height, wy),
        width,
        height,
        ..MediaGeometry::full_page(page)
    }
}

/// Cover: full page bounds, cropping the image's longer axis to the page aspect.
pub fn fill_geometry(page: PageSize, natural: NaturalSize, anchor: Anchor) -> MediaGeometry {
    let img_aspect = natural.aspect();
    let page_aspect = page.aspect();
    let (wx, wy) = anchor.weights();

    let mut out = MediaGeometry::full_page(page);
    if img_aspect > page_aspect {
        out.crop_width = (page_aspect / img_aspect).clamp(0.0, 1.0);
        out.crop_x = align_offset(1.0, out.crop_width, wx);
    } else if img_aspect < page_aspect {
        out.crop_height = (img_aspect / page_aspect).clamp(0.0, 1.0);
        out.crop_y = align_offset(1.0, out.crop_height, wy);
    }
    out
}

fn align_offset(container: f64, content: f64, weight: f64) -> f64 {
    (container - content).max(0.0) * weight
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
