//! The working set of feature sets and what it implies for subsystems
//!
//! Answers the questions the generator asks about a project: which subsystems
//! exist, which soft requirements are missing, how each subsystem is exposed,
//! and in which order subsystems are created.

use std::collections::{btree_map, BTreeMap, BTreeSet};

use appgen_ordering::{DependencyMap, InitOrder, InitOrderResolver};
use tracing::warn;

use crate::{
    error::{GenerationError, Result},
    models::{AccessorKind, FeatureSet, SubsystemAccessor, SubsystemInfo},
};

/// Feature sets present in a project, keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSetCatalog {
    feature_sets: BTreeMap<String, FeatureSet>,
}

impl FeatureSetCatalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog, rejecting invalid or duplicate feature sets
    pub fn from_feature_sets<I>(feature_sets: I) -> Result<Self>
    where
        I: IntoIterator<Item = FeatureSet>,
    {
        let mut catalog = Self::new();
        for fset in feature_sets {
            catalog.insert(fset)?;
        }
        Ok(catalog)
    }

    /// Adds a feature set
    ///
    /// # Errors
    ///
    /// [`GenerationError::InvalidFeatureSet`] if the name (or a name it
    /// refers to) is not an identifier, or the name is already taken.
    pub fn insert(&mut self, fset: FeatureSet) -> Result<()> {
        validate_name(&fset.name, &fset.name)?;
        for referenced in fset
            .subsystem_dependencies
            .iter()
            .chain(fset.soft_requirements.iter())
        {
            validate_name(&fset.name, referenced)?;
        }

        if self.feature_sets.contains_key(&fset.name) {
            return Err(GenerationError::InvalidFeatureSet {
                name: fset.name,
                reason: "defined more than once".to_string(),
            });
        }

        self.feature_sets.insert(fset.name.clone(), fset);
        Ok(())
    }

    /// Feature set called `name`
    pub fn get(&self, name: &str) -> Option<&FeatureSet> {
        self.feature_sets.get(name)
    }

    /// Whether `name` is part of the working set
    pub fn contains(&self, name: &str) -> bool {
        self.feature_sets.contains_key(name)
    }

    /// Feature-set names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.feature_sets.keys().map(String::as_str)
    }

    /// Feature sets in sorted-name order
    pub fn iter(&self) -> btree_map::Values<'_, String, FeatureSet> {
        self.feature_sets.values()
    }

    /// Number of feature sets
    pub fn len(&self) -> usize {
        self.feature_sets.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.feature_sets.is_empty()
    }

    /// Present feature sets that contribute a subsystem, sorted by name
    pub fn subsystems(&self) -> Vec<SubsystemInfo> {
        self.iter()
            .filter(|fset| fset.has_app_subsystem)
            .map(SubsystemInfo::from)
            .collect()
    }

    /// Names soft-required by a present feature set but absent themselves
    pub fn missing_soft_requirements(&self) -> BTreeSet<String> {
        let mut missing = BTreeSet::new();
        for fset in self.iter() {
            for softreq in &fset.soft_requirements {
                if !self.contains(softreq) && missing.insert(softreq.clone()) {
                    warn!(
                        feature_set = %fset.name,
                        soft_requirement = %softreq,
                        "Soft requirement not present; its subsystem will be unavailable"
                    );
                }
            }
        }
        missing
    }

    /// Subsystem dependencies among feature sets that have a subsystem
    pub fn subsystem_dependency_map(&self) -> DependencyMap {
        self.iter()
            .filter(|fset| fset.has_app_subsystem)
            .map(|fset| (fset.name.clone(), fset.subsystem_dependencies.iter().cloned()))
            .collect()
    }

    /// One accessor per subsystem and per missing soft requirement, by name
    ///
    /// Feature sets allowed as soft requirements are always exposed as
    /// optional, whether or not anyone soft-requires them, so code using
    /// them is written the same way in every project.
    pub fn accessors(&self) -> Vec<SubsystemAccessor> {
        let missing = self.missing_soft_requirements();
        let names: BTreeSet<&str> = self
            .names()
            .chain(missing.iter().map(String::as_str))
            .collect();

        names
            .into_iter()
            .filter_map(|name| match self.get(name) {
                None => Some(SubsystemAccessor {
                    name: name.to_string(),
                    kind: AccessorKind::Unavailable,
                    subsystem: None,
                }),
                Some(fset) if fset.has_app_subsystem => Some(SubsystemAccessor {
                    name: name.to_string(),
                    kind: if fset.allow_as_soft_requirement {
                        AccessorKind::Optional
                    } else {
                        AccessorKind::Required
                    },
                    subsystem: Some(SubsystemInfo::from(fset)),
                }),
                Some(_) => None,
            })
            .collect()
    }

    /// Order in which subsystems are created
    ///
    /// # Errors
    ///
    /// [`GenerationError::Ordering`] if subsystem dependencies are circular.
    pub fn init_order(&self) -> Result<InitOrder> {
        Ok(InitOrderResolver::resolve(&self.subsystem_dependency_map())?)
    }
}

fn validate_name(owner: &str, name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(GenerationError::InvalidFeatureSet {
            name: owner.to_string(),
            reason: format!("'{name}' is not a valid feature-set name"),
        })
    }
}
