//! Logging and debugging facilities.
//!
//! This module provides:
//! - Tracing targets used by the engine, for log filtering
//! - A performance span guard for full aggregation passes
//! - [`IconTreeDebug`], a text rendering of a subtree with own and inherited
//!   icons
//!
//! # Tracing Integration
//!
//! The engine logs through the `tracing` crate. Install a subscriber to see
//! the output, for example with a filter such as
//! `canopy_core::propagate=trace,canopy_core::lifecycle=debug`:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("canopy_core=debug")
//!     .init();
//! ```

use std::fmt::Write as FmtWrite;

use crate::aggregate::Visited;
use crate::cache::IconCache;
use crate::tree::{ChildTraversal, IconTree};

/// Target names for log filtering.
pub mod targets {
    /// Aggregation and traversal primitives.
    pub const AGGREGATE: &str = "canopy_core::aggregate";
    /// Tree edit events.
    pub const PROPAGATE: &str = "canopy_core::propagate";
    /// Overlay installation and removal.
    pub const OVERLAY: &str = "canopy_core::overlay";
    /// Activation, deactivation and loads.
    pub const LIFECYCLE: &str = "canopy_core::lifecycle";
    /// Configuration loading.
    pub const CONFIG: &str = "canopy_core::config";
    /// Performance spans.
    pub const PERF: &str = "canopy_core::perf";
}

/// A guard that keeps a tracing span entered until dropped.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a performance span for `operation`.
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::debug_span!(target: "canopy_core::perf", "perf", operation);
        Self {
            _span: span.entered(),
        }
    }
}

/// Style options for tree rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Dash-prefixed lines.
    Compact,
}

/// Configuration for [`IconTreeDebug`] output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show node ids.
    pub show_ids: bool,
    /// Whether to show each node's own icons.
    pub show_own_icons: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: false,
            show_own_icons: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Labels and inherited sets only.
    pub fn minimal() -> Self {
        Self {
            show_own_icons: false,
            ..Default::default()
        }
    }
}

/// Renders a subtree with each node's own icons and cached inherited set.
///
/// Nodes without a cache entry are shown with `-`:
///
/// ```text
/// root {} => {fire, water}
/// ├── A {} => {fire}
/// │  └── leaf1 {fire} => {}
/// └── B {} => {water}
///    └── leaf2 {water} => {}
/// ```
#[derive(Debug, Clone, Default)]
pub struct IconTreeDebug {
    options: TreeFormatOptions,
}

impl IconTreeDebug {
    /// Create a formatter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a formatter with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the subtree rooted at `root`.
    pub fn format_subtree<T: IconTree + ?Sized>(
        &self,
        tree: &T,
        cache: &IconCache<T::NodeId>,
        root: T::NodeId,
    ) -> String {
        let mut output = String::new();
        let mut visited = Visited::new(true);
        // Each entry carries the columns drawn for its ancestors.
        let mut stack = vec![(root, 0usize, true, String::new())];
        while let Some((id, depth, is_last, indent)) = stack.pop() {
            if self.options.max_depth.is_some_and(|max| depth > max) || !visited.enter(id) {
                continue;
            }
            output.push_str(&indent);
            if depth > 0 {
                output.push_str(self.connector(is_last));
                output.push(' ');
            }
            self.format_node(tree, cache, id, &mut output);

            let child_indent = if depth == 0 {
                String::new()
            } else {
                format!("{indent}{}", self.continuation(is_last))
            };
            let children = ChildTraversal::Structural.children(tree, id);
            let count = children.len();
            for (i, &child) in children.iter().enumerate().rev() {
                stack.push((child, depth + 1, i + 1 == count, child_indent.clone()));
            }
        }
        output
    }

    fn format_node<T>(
        &self,
        tree: &T,
        cache: &IconCache<T::NodeId>,
        id: T::NodeId,
        output: &mut String,
    ) where
        T: IconTree + ?Sized,
    {
        output.push_str(&tree.node_label(id));

        if self.options.show_ids {
            let _ = write!(output, " [{id:?}]");
        }
        if self.options.show_own_icons {
            let _ = write!(output, " {}", tree.own_icons(id));
        }
        match cache.get(id) {
            Some(set) => {
                let _ = write!(output, " => {set}");
            }
            None => output.push_str(" => -"),
        }
        output.push('\n');
    }

    fn glyphs(&self) -> (&'static str, &'static str, &'static str) {
        match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => (
                "\u{2502}",
                "\u{251c}\u{2500}\u{2500}",
                "\u{2514}\u{2500}\u{2500}",
            ),
            TreeStyle::Compact => ("", "-", "-"),
        }
    }

    fn connector(&self, is_last: bool) -> &'static str {
        let (_, corner, last) = self.glyphs();
        if is_last { last } else { corner }
    }

    /// Columns drawn below a node for its descendants: a vertical branch
    /// while siblings follow, blank after the last child.
    fn continuation(&self, is_last: bool) -> String {
        let (branch, _, _) = self.glyphs();
        let width = branch.chars().count() + self.options.indent_size;
        if is_last {
            " ".repeat(width)
        } else {
            format!("{branch}{}", " ".repeat(self.options.indent_size))
        }
    }
}
