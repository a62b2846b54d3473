use std::path::Path;

use image::RgbaImage;

use crate::compose::flatten::render_flattened;
use crate::foundation::core::PageSize;
use crate::foundation::error::{BackgroundError, BackgroundResult};
use crate::schema::model::SlideBackground;

const MAX_DIM: u32 = 16_384;

/// Rasterize the flattened background into a straight-alpha RGBA image.
///
/// Media is drawn when `usvg` can reach it: `data:` URIs, or files relative to `resources_dir`.
/// Anything else is left out and only the color layer shows.
pub fn render_thumbnail(
    background: &SlideBackground,
    width: u32,
    height: u32,
    resources_dir: Option<&Path>,
) -> BackgroundResult<RgbaImage> {
    if width == 0 || height == 0 || width > MAX_DIM || height > MAX_DIM {
        return Err(BackgroundError::render(format!(
            "thumbnail size {width}x{height} outside 1..={MAX_DIM}"
        )));
    }

    let svg = render_flattened(
        background,
        Some(PageSize::new(f64::from(width), f64::from(height))),
    );
    let opts = usvg::Options {
        resources_dir: resources_dir.map(Path::to_path_buf),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(svg.markup(), &opts)
        .map_err(|e| BackgroundError::render(format!("flattened svg rejected: {e}")))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| BackgroundError::render("failed to allocate thumbnail pixmap"))?;
    let sx = width as f32 / tree.size().width();
    let sy = height as f32 / tree.size().height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    let mut rgba = Vec::with_capacity(pixmap.pixels().len() * 4);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| BackgroundError::render("thumbnail buffer size mismatch"))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/thumbnail.rs"]
mod tests;
