use serde::Serialize;

use crate::foundation::core::PageSize;
use crate::foundation::error::BackgroundError;
use crate::sync::host::{
    ElementId, ElementInit, ElementPatch, ElementState, HostPage, HostResult,
};

/// Host operations an [`InMemoryPage`] can be told to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostOp {
    Add,
    Update,
    Remove,
    MoveToBack,
}

/// Plain in-memory [`HostPage`].
///
/// Elements are kept back to front. New elements go on top and are auto-selected unless the
/// caller asks otherwise.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InMemoryPage {
    size: Option<PageSize>,
    native_background: String,
    metadata: serde_json::Map<String, serde_json::Value>,
    elements: Vec<ElementState>,
    selected: Option<ElementId>,
    #[serde(skip)]
    next_id: u64,
    #[serde(skip)]
    failing: Vec<HostOp>,
}

impl InMemoryPage {
    pub fn new(size: Option<PageSize>) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn with_size(width: f64, height: f64) -> Self {
        Self::new(Some(PageSize::new(width, height)))
    }

    pub fn set_size(&mut self, size: Option<PageSize>) {
        self.size = size;
    }

    /// Elements back to front.
    pub fn elements(&self) -> &[ElementState] {
        &self.elements
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    /// Make every later call of `op` fail with a host error.
    pub fn fail_on(&mut self, op: HostOp) {
        if !self.failing.contains(&op) {
            self.failing.push(op);
        }
    }

    pub fn clear_failures(&mut self) {
        self.failing.clear();
    }

    fn check(&self, op: HostOp) -> HostResult<()> {
        if self.failing.contains(&op) {
            return Err(BackgroundError::host(format!("{op:?} rejected by page")));
        }
        Ok(())
    }

    fn index_of(&self, id: ElementId) -> HostResult<usize> {
        self.elements
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| BackgroundError::host(format!("no element {id}")))
    }
}

impl HostPage for InMemoryPage {
    fn size(&self) -> Option<PageSize> {
        self.size
    }

    fn native_background(&self) -> String {
        self.native_background.clone()
    }

    fn set_native_background(&mut self, value: &str) {
        self.native_background = value.to_string();
    }

    fn metadata(&self, key: &str) -> Option<serde_json::Value> {
        self.metadata.get(key).cloned()
    }

    fn set_metadata(&mut self, key: &str, value: serde_json::Value) {
        self.metadata.insert(key.to_string(), value);
    }

    fn element_ids_with_flag(&self, flag: &str) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|e| e.has_flag(flag))
            .map(|e| e.id)
            .collect()
    }

    fn element(&self, id: ElementId) -> Option<ElementState> {
        self.elements.iter().find(|e| e.id == id).cloned()
    }

    fn add_element(&mut self, init: ElementInit, skip_select: bool) -> HostResult<ElementId> {
        self.check(HostOp::Add)?;
        self.next_id += 1;
        let id = ElementId(self.next_id);
        self.elements.push(ElementState {
            id,
            custom_flags: init.custom_flags,
            src: init.src,
            geometry: init.geometry,
            interaction: init.interaction,
        });
        if !skip_select {
            self.selected = Some(id);
        }
        Ok(id)
    }

    fn update_element(&mut self, id: ElementId, patch: ElementPatch) -> HostResult<()> {
        self.check(HostOp::Update)?;
        let idx = self.index_of(id)?;
        let el = &mut self.elements[idx];
        if let Some(src) = patch.src {
            el.src = src;
        }
        if let Some(geometry) = patch.geometry {
            el.geometry = geometry;
        }
        if let Some(interaction) = patch.interaction {
            el.interaction = interaction;
        }
        Ok(())
    }

    fn remove_element(&mut self, id: ElementId) -> HostResult<()> {
        self.check(HostOp::Remove)?;
        let idx = self.index_of(id)?;
        self.elements.remove(idx);
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(())
    }

    fn move_to_back(&mut self, id: ElementId) -> HostResult<()> {
        self.check(HostOp::MoveToBack)?;
        let idx = self.index_of(id)?;
        let el = self.elements.remove(idx);
        self.elements.insert(0, el);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/memory.rs"]
mod tests;
