use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::schema::hex::HexColor;
use crate::schema::model::{
    Anchor, ColorLayer, Direction, Gradient, MediaLayer, SlideBackground, Sizing,
};

/// Colors inside a CSS gradient: hex (longest form first) or `rgb()/rgba()`.
static GRADIENT_COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)#[0-9a-f]{8}\b|#[0-9a-f]{6}\b|#[0-9a-f]{3}\b|rgba?\([^)]*\)").unwrap()
});

static CSS_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)^url\(\s*['"]?(.*?)['"]?\s*\)$"#).unwrap());

const URL_PREFIXES: [&str; 7] = ["http://", "https://", "data:", "blob:", "file:", "/", "./"];

/// Map any raw background value to its canonical form.
///
/// Recognized shapes, in priority order: the layered `{color, media}` record, the legacy tagged
/// union (`type: gradient | media | solid`), and the bare legacy solid (`{color: "#hex"}`, a hex
/// string, or `null`). Anything else yields the default white background. Malformed sub-fields
/// fall back to their own defaults individually.
pub fn normalize(raw: &Value) -> SlideBackground {
    match raw {
        Value::Object(obj) => normalize_object(obj),
        Value::String(s) => HexColor::parse(s)
            .map(SlideBackground::solid)
            .unwrap_or_default(),
        Value::Null => SlideBackground::default(),
        other => {
            tracing::debug!(kind = json_kind(other), "unrecognized background value");
            SlideBackground::default()
        }
    }
}

/// [`normalize`] for a value that may be absent altogether.
pub fn normalize_opt(raw: Option<&Value>) -> SlideBackground {
    raw.map(normalize).unwrap_or_default()
}

fn normalize_object(obj: &Map<String, Value>) -> SlideBackground {
    if is_layered(obj) {
        return SlideBackground {
            color: color_layer(obj.get("color")),
            media: media_layer(obj.get("media")),
        };
    }

    match str_field(obj, "type").map(str::to_ascii_lowercase).as_deref() {
        Some("gradient") => SlideBackground {
            color: ColorLayer::Gradient {
                gradient: gradient(obj.get("gradient")),
            },
            media: None,
        },
        // The legacy schema could not carry a color beneath media.
        Some("media") => SlideBackground::default().with_media(media_fields(obj)),
        Some("solid") => solid_fields(obj)
            .map(SlideBackground::solid)
            .unwrap_or_default(),
        _ => match obj.get("color") {
            Some(Value::String(s)) => SlideBackground::solid(HexColor::parse_or_white(s)),
            _ => {
                tracing::debug!("background object has no recognizable shape");
                SlideBackground::default()
            }
        },
    }
}

fn is_layered(obj: &Map<String, Value>) -> bool {
    obj.get("color").is_some_and(Value::is_object) || obj.contains_key("media")
}

fn color_layer(v: Option<&Value>) -> ColorLayer {
    match v {
        Some(Value::Object(c)) => {
            let ty = str_field(c, "type").map(str::to_ascii_lowercase);
            let is_gradient = match ty.as_deref() {
                Some("gradient") => true,
                Some(_) => false,
                None => c.get("gradient").is_some_and(Value::is_object),
            };
            if is_gradient {
                ColorLayer::Gradient {
                    gradient: gradient(c.get("gradient")),
                }
            } else {
                ColorLayer::Solid {
                    solid: solid_fields(c).unwrap_or_default(),
                }
            }
        }
        Some(Value::String(s)) => ColorLayer::Solid {
            solid: HexColor::parse_or_white(s),
        },
        _ => ColorLayer::default(),
    }
}

fn solid_fields(obj: &Map<String, Value>) -> Option<HexColor> {
    ["solid", "color", "hex"]
        .into_iter()
        .find_map(|k| str_field(obj, k))
        .and_then(HexColor::parse)
}

fn gradient(v: Option<&Value>) -> Gradient {
    let defaults = Gradient::default();
    let Some(Value::Object(g)) = v else {
        return defaults;
    };
    Gradient {
        from: str_field(g, "from")
            .and_then(HexColor::parse)
            .unwrap_or(defaults.from),
        to: str_field(g, "to")
            .and_then(HexColor::parse)
            .unwrap_or(defaults.to),
        direction: str_field(g, "direction")
            .and_then(Direction::parse)
            .unwrap_or(defaults.direction),
    }
}

fn media_layer(v: Option<&Value>) -> Option<MediaLayer> {
    match v {
        Some(Value::Object(m)) => media_fields(m),
        Some(Value::String(url)) => MediaLayer::new(url.as_str(), Sizing::default(), Anchor::default()),
        _ => None,
    }
}

fn media_fields(obj: &Map<String, Value>) -> Option<MediaLayer> {
    let url = ["mediaUrl", "media_url", "url"]
        .into_iter()
        .find_map(|k| str_field(obj, k))?;
    let sizing = str_field(obj, "sizing")
        .and_then(Sizing::parse)
        .unwrap_or_default();
    let position = str_field(obj, "position")
        .and_then(Anchor::parse)
        .unwrap_or_default();
    MediaLayer::new(url, sizing, position)
}

fn str_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Bootstrap a canonical background from a page's flat background string.
///
/// Best-effort and lossy: a CSS gradient keeps only its first two colors and always maps to a
/// `top` direction; a URL becomes a full-bleed `fill`/`center` media layer over white; anything
/// else is read as a single color.
pub fn infer_from_native(native: &str) -> SlideBackground {
    let s = native.trim();
    if s.is_empty() {
        return SlideBackground::default();
    }

    if s.to_ascii_lowercase().contains("-gradient(") {
        return SlideBackground {
            color: ColorLayer::Gradient {
                gradient: infer_gradient(s),
            },
            media: None,
        };
    }

    if let Some(url) = url_like(s) {
        return SlideBackground::default().with_media(MediaLayer::new(
            url,
            Sizing::Fill,
            Anchor::Center,
        ));
    }

    HexColor::parse(s)
        .map(SlideBackground::solid)
        .unwrap_or_default()
}

fn infer_gradient(css: &str) -> Gradient {
    let mut colors = GRADIENT_COLOR_RE
        .find_iter(css)
        .filter_map(|m| HexColor::parse(m.as_str()));
    let defaults = Gradient::default();
    match (colors.next(), colors.next()) {
        (Some(from), Some(to)) => Gradient {
            from,
            to,
            direction: Direction::Top,
        },
        (Some(only), None) => Gradient {
            from: only,
            to: only,
            direction: Direction::Top,
        },
        _ => defaults,
    }
}

fn url_like(s: &str) -> Option<&str> {
    if let Some(caps) = CSS_URL_RE.captures(s) {
        return caps
            .get(1)
            .map(|m| m.as_str().trim())
            .filter(|u| !u.is_empty());
    }
    let lower = s.to_ascii_lowercase();
    URL_PREFIXES
        .iter()
        .any(|p| lower.starts_with(p))
        .then_some(s)
}

#[cfg(test)]
#[path = "../../tests/unit/schema/normalize.rs"]
mod tests;
