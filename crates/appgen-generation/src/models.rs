//! Feature-set metadata and the derived subsystem descriptions

use std::collections::BTreeSet;

use heck::ToPascalCase;
use serde::{Deserialize, Serialize};

/// A named unit of functionality that may contribute one app subsystem
///
/// Instances arrive already discovered and validated; this crate never reads
/// project manifests itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Unique identifier, also used as the subsystem accessor name
    pub name: String,
    /// Whether the feature set contributes an app subsystem
    #[serde(default)]
    pub has_app_subsystem: bool,
    /// Feature sets whose subsystems must be created first
    #[serde(default)]
    pub subsystem_dependencies: BTreeSet<String>,
    /// Feature sets used when present but not required
    #[serde(default)]
    pub soft_requirements: BTreeSet<String>,
    /// Whether other feature sets may soft-require this one
    #[serde(default)]
    pub allow_as_soft_requirement: bool,
    /// Package holding the subsystem; defaults to the feature-set name
    #[serde(default)]
    pub package_name: Option<String>,
}

impl FeatureSet {
    /// Creates a feature set with no subsystem and no requirements
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_app_subsystem: false,
            subsystem_dependencies: BTreeSet::new(),
            soft_requirements: BTreeSet::new(),
            allow_as_soft_requirement: false,
            package_name: None,
        }
    }

    /// Marks the feature set as contributing an app subsystem
    pub fn with_app_subsystem(mut self) -> Self {
        self.has_app_subsystem = true;
        self
    }

    /// Adds a subsystem dependency
    pub fn with_subsystem_dependency(mut self, name: impl Into<String>) -> Self {
        self.subsystem_dependencies.insert(name.into());
        self
    }

    /// Adds a soft requirement
    pub fn with_soft_requirement(mut self, name: impl Into<String>) -> Self {
        self.soft_requirements.insert(name.into());
        self
    }

    /// Allows other feature sets to soft-require this one
    pub fn allowing_soft_requirement(mut self) -> Self {
        self.allow_as_soft_requirement = true;
        self
    }

    /// Sets an explicit package name
    pub fn with_package_name(mut self, package: impl Into<String>) -> Self {
        self.package_name = Some(package.into());
        self
    }

    /// Name in PascalCase (`scene_v1` becomes `SceneV1`)
    pub fn name_camel(&self) -> String {
        self.name.to_pascal_case()
    }

    /// Class name of the subsystem (`SceneV1Subsystem`)
    pub fn subsystem_class_name(&self) -> String {
        format!("{}Subsystem", self.name_camel())
    }

    /// Package holding the subsystem
    pub fn package(&self) -> &str {
        self.package_name.as_deref().unwrap_or(&self.name)
    }
}

/// A present feature set that contributes a subsystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubsystemInfo {
    /// Feature-set name
    pub name: String,
    /// Subsystem class name
    pub class_name: String,
    /// Package holding the subsystem
    pub package: String,
    /// Whether the subsystem may be absent at runtime
    pub allow_as_soft_requirement: bool,
}

impl From<&FeatureSet> for SubsystemInfo {
    fn from(fset: &FeatureSet) -> Self {
        Self {
            name: fset.name.clone(),
            class_name: fset.subsystem_class_name(),
            package: fset.package().to_string(),
            allow_as_soft_requirement: fset.allow_as_soft_requirement,
        }
    }
}

/// How the app exposes one subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorKind {
    /// Always available
    Required,
    /// Available if its package imports cleanly; accessed as possibly absent
    Optional,
    /// Soft-required by someone but not part of this project
    Unavailable,
}

/// One subsystem accessor on the app object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubsystemAccessor {
    /// Accessor name (the feature-set name)
    pub name: String,
    /// Availability of the subsystem
    pub kind: AccessorKind,
    /// Subsystem details; `None` for unavailable accessors
    pub subsystem: Option<SubsystemInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_names() {
        let fset = FeatureSet::new("scene_v1");
        assert_eq!(fset.name_camel(), "SceneV1");
        assert_eq!(fset.subsystem_class_name(), "SceneV1Subsystem");
        assert_eq!(fset.package(), "scene_v1");

        let fset = fset.with_package_name("bascenev1");
        assert_eq!(fset.package(), "bascenev1");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let fset: FeatureSet = serde_json::from_str(r#"{"name": "ui_v1"}"#).unwrap();
        assert_eq!(fset, FeatureSet::new("ui_v1"));

        let fset: FeatureSet = serde_json::from_str(
            r#"{
                "name": "classic",
                "has_app_subsystem": true,
                "subsystem_dependencies": ["base", "plus"],
                "soft_requirements": ["plus"],
                "allow_as_soft_requirement": true
            }"#,
        )
        .unwrap();
        assert!(fset.has_app_subsystem);
        assert!(fset.allow_as_soft_requirement);
        assert_eq!(fset.subsystem_dependencies.len(), 2);
        assert!(fset.soft_requirements.contains("plus"));
    }

    #[test]
    fn test_accessor_kind_serializes_snake_case() {
        let json = serde_json::to_string(&AccessorKind::Unavailable).unwrap();
        assert_eq!(json, r#""unavailable""#);
    }
}
