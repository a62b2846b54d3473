use std::fmt::Write as _;

use crate::compose::svg::{SvgImage, SvgWriter, escape_attr};
use crate::foundation::core::PageSize;
use crate::schema::model::{MediaLayer, Sizing};

/// Wrap the media URL in an SVG that scales and aligns it like the synchronized element would.
///
/// Only for flattened single-string consumers; live pages get a real background element.
pub fn render_media(media: &MediaLayer, page_size: Option<PageSize>) -> SvgImage {
    let mut w = SvgWriter::open(PageSize::or_fallback(page_size, PageSize::FALLBACK));
    write_media_image(&mut w, media);
    w.finish()
}

/// `preserveAspectRatio` value: anchor alignment plus `slice` (fill) or `meet` (fit).
pub fn preserve_aspect_ratio(media: &MediaLayer) -> String {
    let mode = match media.sizing {
        Sizing::Fill => "slice",
        Sizing::Fit => "meet",
    };
    format!("{} {mode}", media.position.svg_align())
}

pub(crate) fn write_media_image(w: &mut SvgWriter, media: &MediaLayer) {
    let size = w.size();
    let href = escape_attr(media.media_url());
    let par = preserve_aspect_ratio(media);
    let _ = write!(
        w,
        r#"<image x="0" y="0" width="{}" height="{}" preserveAspectRatio="{par}" href="{href}" xlink:href="{href}"/>"#,
        size.width, size.height,
    );
}

#[cfg(test)]
#[path = "../../tests/unit/compose/media.rs"]
mod tests;
