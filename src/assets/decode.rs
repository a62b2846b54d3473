use std::io::Cursor;

use anyhow::Context;

use crate::foundation::core::NaturalSize;
use crate::foundation::error::{BackgroundError, BackgroundResult};

/// Read the pixel dimensions of an encoded image without decoding its pixels.
///
/// Raster formats are probed through `image`; anything it cannot identify is tried as SVG, whose
/// intrinsic size is rounded up to whole pixels.
pub fn decode_natural_size(bytes: &[u8]) -> BackgroundResult<NaturalSize> {
    let raster = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("guess image format")
        .and_then(|r| r.into_dimensions().context("read image dimensions"));

    let size = match raster {
        Ok((width, height)) => NaturalSize::new(width, height),
        Err(raster_err) => svg_natural_size(bytes).map_err(|svg_err| {
            BackgroundError::decode(format!(
                "unrecognized media ({raster_err:#}); not svg either ({svg_err})"
            ))
        })?,
    };

    if size.is_empty() {
        return Err(BackgroundError::decode("media has zero width or height"));
    }
    Ok(size)
}

fn svg_natural_size(bytes: &[u8]) -> Result<NaturalSize, usvg::Error> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())?;
    let size = tree.size();
    Ok(NaturalSize::new(
        size.width().ceil() as u32,
        size.height().ceil() as u32,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
