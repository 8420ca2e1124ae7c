//! Error types for the mind map model.

use std::path::PathBuf;

/// Result type alias for mind map operations.
pub type MapResult<T> = std::result::Result<T, MapError>;

/// Errors that can occur while editing or loading a mind map.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// The node id is invalid or the node has been removed.
    #[error("Invalid or removed node id")]
    InvalidNodeId,

    /// Attempted to move a node below itself.
    #[error("Cannot move a node into its own subtree")]
    CircularParentage,

    /// The root node cannot be removed or moved.
    #[error("The root node cannot be removed or moved")]
    RootRemoval,

    /// A child index past the end of the child list.
    #[error("Child index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Malformed outline document.
    #[error("Invalid outline document: {0}")]
    Outline(#[from] serde_json::Error),

    /// File I/O error.
    #[error("Failed to read outline '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
