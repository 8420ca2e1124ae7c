//! Engine configuration.
//!
//! Every field has a default, so an empty document is a valid configuration:
//!
//! ```
//! use canopy_core::{ChildTraversal, InheritedIconsConfig, PropagationPolicy};
//!
//! let config = InheritedIconsConfig::from_toml_str(r#"
//!     overlay_scale = 0.5
//!     child_traversal = "unfolded"
//! "#).unwrap();
//!
//! assert_eq!(config.overlay_scale, 0.5);
//! assert_eq!(config.child_traversal, ChildTraversal::Unfolded);
//! assert_eq!(config.propagation, PropagationPolicy::ToRoot);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::overlay::{DEFAULT_OVERLAY_SCALE, OverlayStyle};
use crate::tree::ChildTraversal;

/// Default name of the overlay slot.
pub const DEFAULT_OVERLAY_SLOT: &str = "inherited_icons";

/// How far a change travels up the ancestor chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropagationPolicy {
    /// Recompute every ancestor up to the root.
    #[default]
    ToRoot,
    /// Stop at the first ancestor above the changed node whose inherited set
    /// did not change.
    StopWhenUnchanged,
}

/// Configuration for [`InheritedIcons`](crate::InheritedIcons).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InheritedIconsConfig {
    /// Name of the overlay slot written on nodes.
    pub overlay_slot: String,
    /// Render scale of overlay icons, in `(0, 1]`.
    pub overlay_scale: f32,
    /// Which children take part in aggregation.
    pub child_traversal: ChildTraversal,
    /// How far changes propagate towards the root.
    pub propagation: PropagationPolicy,
    /// Track visited nodes during traversals so a cyclic host tree cannot
    /// cause unbounded recursion.
    pub guard_cycles: bool,
}

impl Default for InheritedIconsConfig {
    fn default() -> Self {
        Self {
            overlay_slot: DEFAULT_OVERLAY_SLOT.to_string(),
            overlay_scale: DEFAULT_OVERLAY_SCALE,
            child_traversal: ChildTraversal::default(),
            propagation: PropagationPolicy::default(),
            guard_cycles: true,
        }
    }
}

impl InheritedIconsConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(target: "canopy_core::config", path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Serialize the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check field ranges.
    pub fn validate(&self) -> Result<()> {
        if self.overlay_slot.trim().is_empty() {
            return Err(Error::invalid_value("overlay_slot", "must not be empty"));
        }
        if !(self.overlay_scale > 0.0 && self.overlay_scale <= 1.0) {
            return Err(Error::invalid_value(
                "overlay_scale",
                format!("{} is outside (0, 1]", self.overlay_scale),
            ));
        }
        Ok(())
    }

    /// Set the overlay slot name.
    pub fn with_overlay_slot(mut self, slot: impl Into<String>) -> Self {
        self.overlay_slot = slot.into();
        self
    }

    /// Set the overlay icon scale.
    pub fn with_overlay_scale(mut self, scale: f32) -> Self {
        self.overlay_scale = scale;
        self
    }

    /// Set the child traversal policy.
    pub fn with_child_traversal(mut self, traversal: ChildTraversal) -> Self {
        self.child_traversal = traversal;
        self
    }

    /// Set the propagation policy.
    pub fn with_propagation(mut self, propagation: PropagationPolicy) -> Self {
        self.propagation = propagation;
        self
    }

    /// Enable or disable the traversal cycle guard.
    pub fn with_cycle_guard(mut self, guard_cycles: bool) -> Self {
        self.guard_cycles = guard_cycles;
        self
    }

    pub(crate) fn overlay_style(&self) -> OverlayStyle {
        OverlayStyle::new(self.overlay_slot.clone(), self.overlay_scale)
    }
}
