//! Dependency-ordered initialization sequencing
//!
//! Walks components depth-first in sorted-name order, emitting each one only
//! after all of its present dependencies. Cycles are found exactly by tracking
//! the components on the active path, so there is no ceiling on how long a
//! legitimate dependency chain may be.

use std::collections::HashSet;

use tracing::debug;

use crate::{
    error::{OrderingError, Result},
    models::{DependencyMap, InitOrder},
};

/// Resolves the order in which component subsystems are initialized
///
/// Handles:
/// - Emitting every dependency before its dependent
/// - Ignoring dependencies on components outside the working set
/// - Rejecting circular dependencies, naming the cycle
pub struct InitOrderResolver;

impl InitOrderResolver {
    /// Computes the initialization order for every component in `dependencies`
    ///
    /// The result is a permutation of the map's keys. Ties are broken by name,
    /// so equal maps always produce equal orders.
    ///
    /// # Errors
    ///
    /// [`OrderingError::DependencyCycle`] if the dependencies among present
    /// components are circular. No partial order is returned.
    pub fn resolve(dependencies: &DependencyMap) -> Result<InitOrder> {
        let mut traversal = Traversal::new(dependencies);

        for name in dependencies.names() {
            traversal.visit(name)?;
        }

        debug!(
            components = traversal.order.len(),
            order = ?traversal.order,
            "Resolved initialization order"
        );

        Ok(InitOrder::from_names(traversal.order))
    }
}

/// A component on the active path and its dependencies still to visit
type Frame<'a> = (&'a str, std::vec::IntoIter<&'a str>);

/// Depth-first traversal state for one resolution
struct Traversal<'a> {
    map: &'a DependencyMap,
    emitted: HashSet<&'a str>,
    order: Vec<String>,
    path: Vec<&'a str>,
    on_path: HashSet<&'a str>,
}

impl<'a> Traversal<'a> {
    fn new(map: &'a DependencyMap) -> Self {
        Self {
            map,
            emitted: HashSet::with_capacity(map.len()),
            order: Vec::with_capacity(map.len()),
            path: Vec::new(),
            on_path: HashSet::new(),
        }
    }

    /// Emits `root` after everything it depends on
    ///
    /// Iterative, with one frame per component on the active path, so chain
    /// length is bounded by memory rather than by the thread stack.
    fn visit(&mut self, root: &'a str) -> Result<()> {
        if self.emitted.contains(root) {
            return Ok(());
        }

        let mut stack = vec![self.enter(root)];
        while let Some((_, pending)) = stack.last_mut() {
            match pending.next() {
                Some(dep) if self.emitted.contains(dep) => {}
                Some(dep) if self.on_path.contains(dep) => return Err(self.cycle_error(dep)),
                Some(dep) => stack.push(self.enter(dep)),
                None => {
                    if let Some((name, _)) = stack.pop() {
                        self.leave(name);
                    }
                }
            }
        }
        Ok(())
    }

    fn enter(&mut self, name: &'a str) -> Frame<'a> {
        self.path.push(name);
        self.on_path.insert(name);
        let map = self.map;
        let pending: Vec<&'a str> = map.present_dependencies(name).collect();
        (name, pending.into_iter())
    }

    fn leave(&mut self, name: &'a str) {
        self.path.pop();
        self.on_path.remove(name);
        self.emitted.insert(name);
        self.order.push(name.to_string());
    }

    fn cycle_error(&self, name: &str) -> OrderingError {
        let start = self.path.iter().position(|n| *n == name).unwrap_or(0);
        let mut path: Vec<String> = self.path[start..].iter().map(|n| n.to_string()).collect();
        path.push(name.to_string());

        OrderingError::DependencyCycle {
            component: name.to_string(),
            path,
        }
    }
}
