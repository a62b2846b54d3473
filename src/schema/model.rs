use serde::{Deserialize, Serialize};

use crate::schema::hex::HexColor;
use crate::schema::normalize::normalize;

/// Canonical two-layer slide background.
///
/// Deserialization never fails: any JSON value is routed through the normalizer, so legacy and
/// partially malformed records load as their closest canonical equivalent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SlideBackground {
    /// Color layer, always present.
    pub color: ColorLayer,
    /// Optional image layer drawn above the color layer.
    pub media: Option<MediaLayer>,
}

impl SlideBackground {
    pub fn solid(hex: HexColor) -> Self {
        Self {
            color: ColorLayer::Solid { solid: hex },
            media: None,
        }
    }

    pub fn with_media(mut self, media: Option<MediaLayer>) -> Self {
        self.media = media;
        self
    }

    /// Canonical JSON form, as stored in page metadata.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl<'de> Deserialize<'de> for SlideBackground {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(normalize(&raw))
    }
}

/// Solid or gradient fill beneath the media layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColorLayer {
    Solid { solid: HexColor },
    Gradient { gradient: Gradient },
}

impl Default for ColorLayer {
    fn default() -> Self {
        Self::Solid {
            solid: HexColor::WHITE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Gradient {
    pub from: HexColor,
    pub to: HexColor,
    pub direction: Direction,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            from: HexColor::WHITE,
            to: HexColor::BLACK,
            direction: Direction::Top,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
    Radial,
}

impl Direction {
    pub const ALL: [Direction; 5] = [
        Direction::Top,
        Direction::Bottom,
        Direction::Left,
        Direction::Right,
        Direction::Radial,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
            Self::Radial => "radial",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

/// How the media layer is scaled into the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sizing {
    /// Contain: the whole image is visible, the color layer may show around it.
    Fit,
    /// Cover: the image fills the page and is cropped along its longer axis.
    #[default]
    Fill,
}

impl Sizing {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fit => "fit",
            Self::Fill => "fill",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fit" | "contain" => Some(Self::Fit),
            "fill" | "cover" => Some(Self::Fill),
            _ => None,
        }
    }
}

/// Placement of the media layer within the page.
///
/// Drives both the fit offset and the fill crop window. Kept local to background geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    #[default]
    BottomCenter,
    BottomRight,
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::TopLeft,
        Anchor::TopCenter,
        Anchor::TopRight,
        Anchor::CenterLeft,
        Anchor::Center,
        Anchor::CenterRight,
        Anchor::BottomLeft,
        Anchor::BottomCenter,
        Anchor::BottomRight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::CenterLeft => "center-left",
            Self::Center => "center",
            Self::CenterRight => "center-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }

    /// Lenient parse: case-insensitive, `_` or space for `-`, edge-only aliases.
    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        let key = match key.as_str() {
            "top" => "top-center",
            "bottom" => "bottom-center",
            "left" => "center-left",
            "right" => "center-right",
            "middle" | "center-center" | "middle-center" => "center",
            other => other,
        };
        Self::ALL.into_iter().find(|a| a.as_str() == key)
    }

    /// Fractional `(x, y)` weights: 0 = start, 0.5 = center, 1 = end.
    pub fn weights(self) -> (f64, f64) {
        match self {
            Self::TopLeft => (0.0, 0.0),
            Self::TopCenter => (0.5, 0.0),
            Self::TopRight => (1.0, 0.0),
            Self::CenterLeft => (0.0, 0.5),
            Self::Center => (0.5, 0.5),
            Self::CenterRight => (1.0, 0.5),
            Self::BottomLeft => (0.0, 1.0),
            Self::BottomCenter => (0.5, 1.0),
            Self::BottomRight => (1.0, 1.0),
        }
    }

    /// SVG `preserveAspectRatio` alignment keyword.
    pub fn svg_align(self) -> &'static str {
        match self {
            Self::TopLeft => "xMinYMin",
            Self::TopCenter => "xMidYMin",
            Self::TopRight => "xMaxYMin",
            Self::CenterLeft => "xMinYMid",
            Self::Center => "xMidYMid",
            Self::CenterRight => "xMaxYMid",
            Self::BottomLeft => "xMinYMax",
            Self::BottomCenter => "xMidYMax",
            Self::BottomRight => "xMaxYMax",
        }
    }
}

/// Image layer; only constructible with a non-empty URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaLayer {
    media_url: String,
    pub sizing: Sizing,
    pub position: Anchor,
}

impl MediaLayer {
    /// Returns `None` for a blank URL: no URL means no media layer.
    pub fn new(media_url: impl Into<String>, sizing: Sizing, position: Anchor) -> Option<Self> {
        let media_url = media_url.into().trim().to_string();
        if media_url.is_empty() {
            return None;
        }
        Some(Self {
            media_url,
            sizing,
            position,
        })
    }

    pub fn media_url(&self) -> &str {
        &self.media_url
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schema/model.rs"]
mod tests;
