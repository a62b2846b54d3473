use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::core::PageSize;
use crate::foundation::error::BackgroundResult;
use crate::layout::geometry::MediaGeometry;

/// Host operations report failures as [`BackgroundError::Host`](crate::BackgroundError::Host).
pub type HostResult<T> = BackgroundResult<T>;

/// Host-assigned element handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

/// User interaction permissions of an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub selectable: bool,
    pub draggable: bool,
    pub resizable: bool,
    pub removable: bool,
}

impl Interaction {
    /// Fully interactive, the host default for user-created elements.
    pub const OPEN: Interaction = Interaction {
        selectable: true,
        draggable: true,
        resizable: true,
        removable: true,
    };

    /// No user interaction at all.
    pub const LOCKED: Interaction = Interaction {
        selectable: false,
        draggable: false,
        resizable: false,
        removable: false,
    };
}

/// Snapshot of an image element as the host reports it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementState {
    pub id: ElementId,
    pub custom_flags: Vec<String>,
    pub src: String,
    #[serde(flatten)]
    pub geometry: MediaGeometry,
    #[serde(flatten)]
    pub interaction: Interaction,
}

impl ElementState {
    pub fn has_flag(&self, flag: &str) -> bool {
        self.custom_flags.iter().any(|f| f == flag)
    }
}

/// Initial properties of a new image element.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementInit {
    pub custom_flags: Vec<String>,
    pub src: String,
    pub geometry: MediaGeometry,
    pub interaction: Interaction,
}

impl ElementInit {
    /// Full-page, uncropped, locked image element carrying `flag`.
    pub fn background_media(flag: &str, src: &str, page: PageSize) -> Self {
        Self {
            custom_flags: vec![flag.to_string()],
            src: src.to_string(),
            geometry: MediaGeometry::full_page(page),
            interaction: Interaction::LOCKED,
        }
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementPatch {
    pub src: Option<String>,
    pub geometry: Option<MediaGeometry>,
    pub interaction: Option<Interaction>,
}

impl ElementPatch {
    pub fn geometry(geometry: MediaGeometry) -> Self {
        Self {
            geometry: Some(geometry),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_none() && self.geometry.is_none() && self.interaction.is_none()
    }
}

/// The narrow slice of a host page model the synchronizer needs.
///
/// Element order is z-order; "back" is drawn first. Implementations own all validation of their
/// own invariants and report violations through [`HostResult`].
pub trait HostPage {
    /// Current rendered size in pixels, if the host knows it.
    fn size(&self) -> Option<PageSize>;

    fn native_background(&self) -> String;
    fn set_native_background(&mut self, value: &str);

    fn metadata(&self, key: &str) -> Option<serde_json::Value>;
    fn set_metadata(&mut self, key: &str, value: serde_json::Value);

    /// Ids of every element whose custom flags contain `flag`, back to front.
    fn element_ids_with_flag(&self, flag: &str) -> Vec<ElementId>;
    fn element(&self, id: ElementId) -> Option<ElementState>;

    /// Add an element; `skip_select` suppresses the host's auto-select of new elements.
    fn add_element(&mut self, init: ElementInit, skip_select: bool) -> HostResult<ElementId>;
    fn update_element(&mut self, id: ElementId, patch: ElementPatch) -> HostResult<()>;
    fn remove_element(&mut self, id: ElementId) -> HostResult<()>;
    fn move_to_back(&mut self, id: ElementId) -> HostResult<()>;
}
