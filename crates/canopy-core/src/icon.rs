//! Icon and icon set types.
//!
//! An [`Icon`] is an immutable, cheaply clonable name such as `"flag-red"` or
//! `"idea"`. Icons are ordered by name, and two icons are the same icon exactly
//! when their names match.
//!
//! An [`IconSet`] is an ordered set of unique icons. It is used both for the
//! icons a user attached directly to a node and for the inherited set this
//! crate maintains for every node.
//!
//! # Example
//!
//! ```
//! use canopy_core::{Icon, IconSet};
//!
//! let mut set: IconSet = ["idea", "flag-red"].into_iter().map(Icon::new).collect();
//! set.insert(Icon::new("idea"));
//! assert_eq!(set.len(), 2);
//!
//! let own: IconSet = [Icon::new("idea")].into_iter().collect();
//! set.remove_all(&own);
//! assert_eq!(set.to_string(), "{flag-red}");
//! ```

use std::collections::BTreeSet;
use std::collections::btree_set;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A single icon, identified by its name.
///
/// Cloning an `Icon` only bumps a reference count.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Icon(Arc<str>);

impl Icon {
    /// Create an icon with the given name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The icon's name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Icon({:?})", self.name())
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for Icon {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Icon {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

/// An ordered set of unique icons.
///
/// Equality is value equality: two sets are equal when they hold the same
/// icons, regardless of how they were built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconSet {
    icons: BTreeSet<Icon>,
}

impl IconSet {
    /// Create an empty icon set.
    pub const fn new() -> Self {
        Self {
            icons: BTreeSet::new(),
        }
    }

    /// Returns true if the set holds no icons.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Number of icons in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    /// Returns true if the set contains `icon`.
    pub fn contains(&self, icon: &Icon) -> bool {
        self.icons.contains(icon)
    }

    /// Add an icon. Returns false if it was already present.
    pub fn insert(&mut self, icon: Icon) -> bool {
        self.icons.insert(icon)
    }

    /// Remove an icon. Returns false if it was not present.
    pub fn remove(&mut self, icon: &Icon) -> bool {
        self.icons.remove(icon)
    }

    /// Add every icon of `other` to this set.
    pub fn union_with(&mut self, other: &IconSet) {
        for icon in &other.icons {
            if !self.icons.contains(icon) {
                self.icons.insert(icon.clone());
            }
        }
    }

    /// Remove every icon of `other` from this set.
    pub fn remove_all(&mut self, other: &IconSet) {
        if self.icons.is_empty() {
            return;
        }
        for icon in &other.icons {
            self.icons.remove(icon);
        }
    }

    /// Iterate over the icons in order.
    pub fn iter(&self) -> btree_set::Iter<'_, Icon> {
        self.icons.iter()
    }
}

impl FromIterator<Icon> for IconSet {
    fn from_iter<I: IntoIterator<Item = Icon>>(iter: I) -> Self {
        Self {
            icons: iter.into_iter().collect(),
        }
    }
}

impl Extend<Icon> for IconSet {
    fn extend<I: IntoIterator<Item = Icon>>(&mut self, iter: I) {
        self.icons.extend(iter);
    }
}

impl IntoIterator for IconSet {
    type Item = Icon;
    type IntoIter = btree_set::IntoIter<Icon>;

    fn into_iter(self) -> Self::IntoIter {
        self.icons.into_iter()
    }
}

impl<'a> IntoIterator for &'a IconSet {
    type Item = &'a Icon;
    type IntoIter = btree_set::Iter<'a, Icon>;

    fn into_iter(self) -> Self::IntoIter {
        self.icons.iter()
    }
}

impl fmt::Display for IconSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, icon) in self.icons.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(icon.name())?;
        }
        f.write_str("}")
    }
}

/// Build an [`IconSet`] from icon names.
///
/// ```
/// let set = canopy_core::icon_set!["idea", "flag-red"];
/// assert_eq!(set.len(), 2);
/// ```
#[macro_export]
macro_rules! icon_set {
    () => {
        $crate::IconSet::new()
    };
    ($($name:expr),+ $(,)?) => {
        [$($crate::Icon::new($name)),+].into_iter().collect::<$crate::IconSet>()
    };
}
