use std::fmt::Write as _;

use crate::compose::svg::{SvgImage, SvgWriter};
use crate::foundation::core::PageSize;
use crate::schema::model::{ColorLayer, Direction, Gradient};

/// Radius of the radial stop ramp, relative to the canvas.
const RADIAL_RADIUS: &str = "70%";

/// Color layer in a form the host can paint directly.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderedColor {
    /// Plain hex or a `linear-gradient(...)` string the host renders natively.
    Css(String),
    /// Generated vector image, for fills CSS strings cannot express on the host.
    Svg(SvgImage),
}

impl RenderedColor {
    /// Value written to the page's flat background field.
    pub fn to_native_background(&self) -> String {
        match self {
            Self::Css(css) => css.clone(),
            Self::Svg(svg) => svg.to_data_uri(),
        }
    }
}

/// Render the color layer, preferring the cheap CSS form.
///
/// Solid colors and the four linear directions become CSS strings; radial gradients become an
/// SVG sized to `page_size` (100×100 when the size is missing or unusable).
pub fn render_color(color: &ColorLayer, page_size: Option<PageSize>) -> RenderedColor {
    match color {
        ColorLayer::Solid { solid } => RenderedColor::Css(solid.to_string()),
        ColorLayer::Gradient { gradient } => match linear_angle_deg(gradient.direction) {
            Some(angle) => RenderedColor::Css(format!(
                "linear-gradient({angle}deg, {} 0%, {} 100%)",
                gradient.from, gradient.to
            )),
            None => RenderedColor::Svg(render_color_svg(color, page_size)),
        },
    }
}

/// Render the color layer as a self-contained SVG regardless of its kind.
pub fn render_color_svg(color: &ColorLayer, page_size: Option<PageSize>) -> SvgImage {
    let mut w = SvgWriter::open(PageSize::or_fallback(page_size, PageSize::FALLBACK));
    write_color_fill(&mut w, color);
    w.finish()
}

/// CSS angle for linear directions; `None` for radial.
pub fn linear_angle_deg(direction: Direction) -> Option<u16> {
    match direction {
        Direction::Top => Some(0),
        Direction::Right => Some(90),
        Direction::Bottom => Some(180),
        Direction::Left => Some(270),
        Direction::Radial => None,
    }
}

/// Paint the full canvas with the color layer.
pub(crate) fn write_color_fill(w: &mut SvgWriter, color: &ColorLayer) {
    match color {
        ColorLayer::Solid { solid } => {
            let _ = write!(w, r#"<rect x="0" y="0" width="100%" height="100%" fill="{solid}"/>"#);
        }
        ColorLayer::Gradient { gradient } => {
            w.raw("<defs>");
            write_gradient_def(w, gradient, "slidebg-color");
            w.raw("</defs>");
            w.raw(r#"<rect x="0" y="0" width="100%" height="100%" fill="url(#slidebg-color)"/>"#);
        }
    }
}

fn write_gradient_def(w: &mut SvgWriter, g: &Gradient, id: &str) {
    let stops = format!(
        r#"<stop offset="0%" stop-color="{}"/><stop offset="100%" stop-color="{}"/>"#,
        g.from, g.to
    );
    match linear_vector(g.direction) {
        Some([x1, y1, x2, y2]) => {
            let _ = write!(
                w,
                r#"<linearGradient id="{id}" x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}">{stops}</linearGradient>"#
            );
        }
        None => {
            let _ = write!(
                w,
                r#"<radialGradient id="{id}" cx="50%" cy="50%" r="{RADIAL_RADIUS}">{stops}</radialGradient>"#
            );
        }
    }
}

/// Start/end points in bounding-box units; the first stop sits at the start point.
fn linear_vector(direction: Direction) -> Option<[u8; 4]> {
    match direction {
        Direction::Top => Some([0, 1, 0, 0]),
        Direction::Bottom => Some([0, 0, 0, 1]),
        Direction::Left => Some([1, 0, 0, 0]),
        Direction::Right => Some([0, 0, 1, 0]),
        Direction::Radial => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/color.rs"]
mod tests;
