use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::core::PageSize;
use crate::foundation::error::{BackgroundError, BackgroundResult};

/// Synchronizer settings.
///
/// Every field is optional in JSON; missing ones take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncOpts {
    /// Page metadata key holding the canonical background JSON.
    pub metadata_key: String,
    /// Custom flag marking the background-media element.
    pub role_flag: String,
    /// Canvas used when the page reports no usable size.
    pub fallback_size: PageSize,
}

impl Default for SyncOpts {
    fn default() -> Self {
        Self {
            metadata_key: "slideBackground".to_string(),
            role_flag: "slide-background-media".to_string(),
            fallback_size: PageSize::FALLBACK,
        }
    }
}

impl SyncOpts {
    pub fn validate(&self) -> BackgroundResult<()> {
        if self.metadata_key.trim().is_empty() {
            return Err(BackgroundError::config("metadata key must be non-empty"));
        }
        if self.role_flag.trim().is_empty() {
            return Err(BackgroundError::config("role flag must be non-empty"));
        }
        if !self.fallback_size.is_usable() {
            return Err(BackgroundError::config(format!(
                "fallback size must be finite and > 0, got {}x{}",
                self.fallback_size.width, self.fallback_size.height
            )));
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> BackgroundResult<Self> {
        let opts: Self = serde_json::from_str(s)
            .map_err(|e| BackgroundError::config(format!("invalid sync options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> BackgroundResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read sync options '{}'", path.display()))?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/config.rs"]
mod tests;
