//! Property-based tests for app-module generation
//!
//! Catalogs are generated with acyclic subsystem dependencies and soft
//! requirements that point both inside and outside the catalog.

use std::collections::BTreeSet;

use appgen_generation::{
    AccessorKind, AppModuleGenerator, FeatureSet, FeatureSetCatalog, GeneratorConfig, SectionConfig,
};
use proptest::prelude::*;

const MODULE: &str = "\
# hand-written header
class App:
    # __IMPORTS_BEGIN__
    import stale
    # __IMPORTS_END__

    def on_create(self):
        # __CREATE_BEGIN__
        stale = True
        # __CREATE_END__
        self.ready = True
";

fn generator() -> AppModuleGenerator {
    let config = GeneratorConfig {
        notice: "# generated".to_string(),
        comment_prefix: "#".to_string(),
        sections: vec![
            SectionConfig::new("imports", "    ").with_template(
                "{{#each subsystems}}from {{package}} import {{class_name}}\n{{/each}}",
            ),
            SectionConfig::new("create", "        ")
                .with_template("{{#each init_order}}self.{{this}}\n{{/each}}"),
        ],
    };
    AppModuleGenerator::new(config).unwrap()
}

/// Strategy for catalogs plus the names that were left out of them
///
/// Feature set `i` only depends on feature sets with a smaller index, so the
/// subsystem graph is acyclic. Soft requirements may name anything in the
/// pool, including the left-out names.
fn catalog_strategy() -> impl Strategy<Value = (FeatureSetCatalog, BTreeSet<String>)> {
    prop::collection::btree_set("[a-z][a-z0-9_]{0,6}", 2..10)
        .prop_flat_map(|pool| {
            let pool: Vec<String> = pool.into_iter().collect();
            let len = pool.len();
            (
                Just(pool).prop_shuffle(),
                1..len,
                prop::collection::vec(any::<bool>(), len),
                prop::collection::vec(any::<bool>(), len),
                prop::collection::vec(
                    prop::collection::vec(any::<prop::sample::Index>(), 0..3),
                    len,
                ),
                prop::collection::vec(
                    prop::collection::vec(any::<prop::sample::Index>(), 0..2),
                    len,
                ),
            )
        })
        .prop_map(|(pool, present, subsystem, optional, deps, softs)| {
            let mut catalog = FeatureSetCatalog::new();
            for i in 0..present {
                let mut fset = FeatureSet::new(pool[i].clone());
                if subsystem[i] {
                    fset = fset.with_app_subsystem();
                }
                if optional[i] {
                    fset = fset.allowing_soft_requirement();
                }
                if i > 0 {
                    for pick in &deps[i] {
                        fset = fset.with_subsystem_dependency(pool[pick.index(i)].clone());
                    }
                }
                for pick in &softs[i] {
                    fset = fset.with_soft_requirement(pool[pick.index(pool.len())].clone());
                }
                catalog.insert(fset).unwrap();
            }
            let absent = pool[present..].iter().cloned().collect();
            (catalog, absent)
        })
}

proptest! {
    /// Regenerating already generated output changes nothing
    #[test]
    fn prop_generation_is_idempotent((catalog, _absent) in catalog_strategy()) {
        let generator = generator();
        let once = generator.generate(&catalog, MODULE).unwrap();
        let twice = generator.generate(&catalog, &once).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Text outside the sections survives untouched
    #[test]
    fn prop_hand_written_lines_survive((catalog, _absent) in catalog_strategy()) {
        let out = generator().generate(&catalog, MODULE).unwrap();

        let head = "# hand-written header\nclass App:\n    # __IMPORTS_BEGIN__\n";
        let between =
            "    # __IMPORTS_END__\n\n    def on_create(self):\n        # __CREATE_BEGIN__\n";
        let tail = "        # __CREATE_END__\n        self.ready = True\n";
        prop_assert!(out.starts_with(head));
        prop_assert!(out.contains(between));
        prop_assert!(out.ends_with(tail));
        prop_assert!(!out.contains("stale = True"));
    }

    /// Accessors are sorted and unique; missing soft requirements are the
    /// only unavailable ones and every subsystem has one
    #[test]
    fn prop_accessors_cover_subsystems((catalog, absent) in catalog_strategy()) {
        let accessors = catalog.accessors();
        let missing = catalog.missing_soft_requirements();

        let names: Vec<&str> = accessors.iter().map(|a| a.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(&names, &sorted);

        for accessor in &accessors {
            match accessor.kind {
                AccessorKind::Unavailable => {
                    prop_assert!(missing.contains(&accessor.name));
                    prop_assert!(absent.contains(&accessor.name));
                    prop_assert!(accessor.subsystem.is_none());
                }
                AccessorKind::Optional | AccessorKind::Required => {
                    let fset = catalog.get(&accessor.name).unwrap();
                    prop_assert!(fset.has_app_subsystem);
                    prop_assert_eq!(
                        accessor.kind == AccessorKind::Optional,
                        fset.allow_as_soft_requirement
                    );
                }
            }
        }
        for name in &missing {
            prop_assert!(names.contains(&name.as_str()));
        }
        for info in catalog.subsystems() {
            prop_assert!(names.contains(&info.name.as_str()));
        }
    }

    /// Subsystems are created after the subsystems they depend on
    #[test]
    fn prop_init_order_respects_dependencies((catalog, _absent) in catalog_strategy()) {
        let order = catalog.init_order().unwrap();
        let subsystems: BTreeSet<String> =
            catalog.subsystems().into_iter().map(|s| s.name).collect();
        let ordered: BTreeSet<String> = order.iter().map(str::to_string).collect();
        prop_assert_eq!(&ordered, &subsystems);

        for fset in catalog.iter().filter(|f| f.has_app_subsystem) {
            for dep in &fset.subsystem_dependencies {
                if subsystems.contains(dep) {
                    prop_assert!(order.precedes(dep, &fset.name));
                }
            }
        }
    }
}
