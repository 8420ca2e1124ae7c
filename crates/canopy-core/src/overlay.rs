//! Visual sync: turning an inherited icon set into a node overlay.
//!
//! The overlay is a single composite badge made of the inherited icons, each
//! drawn at a reduced scale. It lives in one named slot on the node so that it
//! can be replaced or removed without touching anything else the host shows.

use crate::icon::{Icon, IconSet};
use crate::tree::IconTreeMut;

/// Default render scale of overlay icons relative to regular icons.
pub const DEFAULT_OVERLAY_SCALE: f32 = 0.75;

/// An icon drawn at a scale other than 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledIcon {
    icon: Icon,
    scale: f32,
}

impl ScaledIcon {
    /// Create a scaled icon.
    pub fn new(icon: Icon, scale: f32) -> Self {
        Self { icon, scale }
    }

    /// The underlying icon.
    pub fn icon(&self) -> &Icon {
        &self.icon
    }

    /// The render scale.
    pub fn scale(&self) -> f32 {
        self.scale
    }
}

/// The composite badge installed on a node.
#[derive(Debug, Clone, PartialEq)]
pub struct IconOverlay {
    icons: Vec<ScaledIcon>,
}

impl IconOverlay {
    /// Build an overlay showing every icon of `set` at `scale`, in set order.
    pub fn from_set(set: &IconSet, scale: f32) -> Self {
        Self {
            icons: set
                .iter()
                .map(|icon| ScaledIcon::new(icon.clone(), scale))
                .collect(),
        }
    }

    /// The icons of the overlay, in display order.
    pub fn icons(&self) -> &[ScaledIcon] {
        &self.icons
    }

    /// Number of icons in the overlay.
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    /// Returns true if the overlay shows nothing.
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Returns true if the overlay shows `icon`.
    pub fn contains(&self, icon: &Icon) -> bool {
        self.icons.iter().any(|scaled| scaled.icon == *icon)
    }

    /// The overlay's icons as a plain set.
    pub fn to_icon_set(&self) -> IconSet {
        self.icons.iter().map(|scaled| scaled.icon.clone()).collect()
    }
}

/// How a sync step treats the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Normal operation: show the inherited set when it is non-empty.
    Live,
    /// The node's subtree is being torn down: never show anything.
    Removing,
}

/// What a sync step did to the node's overlay slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    /// An overlay was installed or replaced.
    Installed,
    /// The overlay slot was removed.
    Cleared,
}

/// Slot name and icon scale used when syncing overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    slot: String,
    scale: f32,
}

impl OverlayStyle {
    /// Create an overlay style.
    pub fn new(slot: impl Into<String>, scale: f32) -> Self {
        Self {
            slot: slot.into(),
            scale,
        }
    }

    /// The overlay slot name.
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// The icon render scale.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Apply `set` to the overlay slot of `node` and request one refresh.
    ///
    /// Callers invoke this only after the cache reported a change, or for
    /// every node of a teardown. In [`SyncMode::Removing`] the slot is always
    /// cleared, whatever `set` holds.
    pub fn sync<H: IconTreeMut + ?Sized>(
        &self,
        host: &mut H,
        node: H::NodeId,
        set: &IconSet,
        mode: SyncMode,
    ) -> OverlayAction {
        let action = match mode {
            SyncMode::Live if !set.is_empty() => {
                host.set_overlay(node, &self.slot, IconOverlay::from_set(set, self.scale));
                OverlayAction::Installed
            }
            _ => {
                host.remove_overlay(node, &self.slot);
                OverlayAction::Cleared
            }
        };
        tracing::trace!(target: "canopy_core::overlay", ?node, ?mode, ?action, icons = set.len(), "overlay synced");
        host.refresh(node);
        action
    }
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_OVERLAY_SLOT, DEFAULT_OVERLAY_SCALE)
    }
}
