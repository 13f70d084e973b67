//! Desktop configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all) is a
//! valid configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_REFRESH_DELAY_MS: u64 = 150;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopConfig {
    /// Upper bound on a single input wait; idle ticks still flush pending repaints.
    pub refresh_delay_ms: u64,
    /// Status line text owned by the root node.
    pub root_tip: String,
    pub bell: bool,
    /// Wrap to the first/last stop of the enclosing boundary instead of alerting.
    pub wrap_tab_order: bool,
    /// Translate pointer drags into Ctrl+arrow keys.
    pub mouse_drag_keys: bool,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            refresh_delay_ms: DEFAULT_REFRESH_DELAY_MS,
            root_tip: format!(
                "desktop v{} | <TAB> switch cursor",
                env!("CARGO_PKG_VERSION")
            ),
            bell: true,
            wrap_tab_order: false,
            mouse_drag_keys: true,
        }
    }
}

impl DesktopConfig {
    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms.max(1))
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
