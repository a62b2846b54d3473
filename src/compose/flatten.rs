use crate::compose::color::write_color_fill;
use crate::compose::media::write_media_image;
use crate::compose::svg::{SvgImage, SvgWriter};
use crate::foundation::core::PageSize;
use crate::schema::model::SlideBackground;

/// Both layers in one SVG: the color fill with the media image above it.
///
/// For legacy single-field export and thumbnails, where no separate element can be hosted.
pub fn render_flattened(background: &SlideBackground, page_size: Option<PageSize>) -> SvgImage {
    let mut w = SvgWriter::open(PageSize::or_fallback(page_size, PageSize::FALLBACK));
    write_color_fill(&mut w, &background.color);
    if let Some(media) = &background.media {
        write_media_image(&mut w, media);
    }
    w.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/compose/flatten.rs"]
mod tests;
