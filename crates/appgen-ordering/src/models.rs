//! Dependency mapping and initialization order types

use std::collections::{btree_map, BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Mapping from component name to the names it depends on
///
/// Keys are unique and kept sorted, so two maps holding the same entries
/// behave identically no matter how they were built. Dependencies naming a
/// component that is not a key are allowed; they are treated as satisfied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyMap {
    components: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyMap {
    /// Creates an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component, replacing any earlier entry with the same name
    pub fn insert<N, I, D>(&mut self, name: N, dependencies: I)
    where
        N: Into<String>,
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        self.components
            .insert(name.into(), dependencies.into_iter().map(Into::into).collect());
    }

    /// Adds a component, builder style
    pub fn with<N, I, D>(mut self, name: N, dependencies: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        self.insert(name, dependencies);
        self
    }

    /// Whether `name` is a component of this map
    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Declared dependencies of `name`, including ones outside the map
    pub fn dependencies(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.components.get(name)
    }

    /// Dependencies of `name` that are themselves components, in sorted order
    pub fn present_dependencies<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.components
            .get(name)
            .into_iter()
            .flatten()
            .filter(|dep| self.components.contains_key(dep.as_str()))
            .map(String::as_str)
    }

    /// Component names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    /// Sorted `(name, dependencies)` pairs
    pub fn iter(&self) -> btree_map::Iter<'_, String, BTreeSet<String>> {
        self.components.iter()
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the map has no components
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<N, I, D> FromIterator<(N, I)> for DependencyMap
where
    N: Into<String>,
    I: IntoIterator<Item = D>,
    D: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (N, I)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (name, dependencies) in iter {
            map.insert(name, dependencies);
        }
        map
    }
}

/// Total order over components in which dependencies come first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InitOrder {
    names: Vec<String>,
}

impl InitOrder {
    pub(crate) fn from_names(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Position of `name` in the order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Whether `first` is initialized strictly before `second`
    ///
    /// False when either name is not part of the order.
    pub fn precedes(&self, first: &str, second: &str) -> bool {
        match (self.position(first), self.position(second)) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }

    /// Names in initialization order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Names in initialization order, as a slice
    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    /// Consumes the order, yielding its names
    pub fn into_vec(self) -> Vec<String> {
        self.names
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the order is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<'a> IntoIterator for &'a InitOrder {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}
