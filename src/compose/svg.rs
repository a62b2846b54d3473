use std::fmt::Write as _;

use crate::foundation::core::PageSize;

const DATA_URI_PREFIX: &str = "data:image/svg+xml;charset=utf-8,";

/// Generated, self-contained SVG document.
#[derive(Clone, Debug, PartialEq)]
pub struct SvgImage {
    markup: String,
    size: PageSize,
}

impl SvgImage {
    pub(crate) fn new(markup: String, size: PageSize) -> Self {
        Self { markup, size }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Canvas size the document was generated for.
    pub fn size(&self) -> PageSize {
        self.size
    }

    /// `data:image/svg+xml;charset=utf-8,<percent-encoded markup>`, usable wherever a flat image
    /// URL is accepted.
    pub fn to_data_uri(&self) -> String {
        let encoded = urlencoding::encode(&self.markup);
        let mut out = String::with_capacity(DATA_URI_PREFIX.len() + encoded.len());
        out.push_str(DATA_URI_PREFIX);
        out.push_str(&encoded);
        out
    }

    pub fn into_markup(self) -> String {
        self.markup
    }
}

/// Incremental writer for the small documents this crate generates.
pub(crate) struct SvgWriter {
    out: String,
    size: PageSize,
}

impl SvgWriter {
    pub(crate) fn open(size: PageSize) -> Self {
        let mut out = String::with_capacity(512);
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}" preserveAspectRatio="none">"#,
            w = size.width,
            h = size.height,
        );
        Self { out, size }
    }

    pub(crate) fn size(&self) -> PageSize {
        self.size
    }

    pub(crate) fn raw(&mut self, s: &str) -> &mut Self {
        self.out.push_str(s);
        self
    }

    pub(crate) fn finish(mut self) -> SvgImage {
        self.out.push_str("</svg>");
        SvgImage::new(self.out, self.size)
    }
}

impl std::fmt::Write for SvgWriter {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.out.push_str(s);
        Ok(())
    }
}

/// Escape text for use inside a double-quoted XML attribute.
pub(crate) fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/compose/svg.rs"]
mod tests;
