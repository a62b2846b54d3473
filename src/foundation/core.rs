use serde::{Deserialize, Serialize};

pub use kurbo::{Rect, Size};

/// Rendered page size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl PageSize {
    /// Canvas used when a page reports no usable size.
    pub const FALLBACK: PageSize = PageSize {
        width: 100.0,
        height: 100.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Return `true` when both sides are finite and strictly positive.
    pub fn is_usable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Pick `size` when usable, `fallback` otherwise.
    pub fn or_fallback(size: Option<PageSize>, fallback: PageSize) -> PageSize {
        match size {
            Some(s) if s.is_usable() => s,
            _ => fallback,
        }
    }

    pub fn aspect(self) -> f64 {
        self.width / self.height
    }

    /// Full-page bounds anchored at the origin.
    pub fn bounds(self) -> Rect {
        Rect::from_origin_size((0.0, 0.0), Size::new(self.width, self.height))
    }
}

impl From<Size> for PageSize {
    fn from(s: Size) -> Self {
        Self::new(s.width, s.height)
    }
}

/// Intrinsic pixel dimensions of a decoded media resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NaturalSize {
    pub width: u32,
    pub height: u32,
}

impl NaturalSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
