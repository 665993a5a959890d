//! Property-based tests for manifest namespacing.
//!
//! These tests generate random repository sets and verify that the
//! namespacing invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use std::collections::{BTreeMap, BTreeSet, HashSet};
    use std::path::Path;

    use proptest::prelude::*;

    use crate::discovery::Inventory;
    use crate::document::{Document, Mapping};
    use crate::namespace::{url_variable, Namespacer};
    use crate::repository::{RepositoryRef, ServiceRecord};

    const NETWORK: &str = "common_network";

    /// Repository short name -> declared services. Every service name starts
    /// with `<repo>-`, so no bare name is shared between repositories.
    fn repository_sets() -> impl Strategy<Value = BTreeMap<String, BTreeSet<String>>> {
        prop::collection::btree_map(
            "[a-z]{1,6}",
            prop::collection::btree_set("[a-z][a-z0-9-]{0,6}", 1..5),
            1..4,
        )
        .prop_map(|set| {
            set.into_iter()
                .map(|(repo, services)| {
                    let services = services
                        .into_iter()
                        .map(|s| format!("{}-{}", repo, s))
                        .collect();
                    (repo, services)
                })
                .collect()
        })
    }

    /// Each service depends on every service sorted before it.
    fn manifest(services: &BTreeSet<String>) -> Document {
        let mut declared = Mapping::new();
        let mut earlier: Vec<Document> = Vec::new();
        for name in services {
            let mut service = Mapping::new();
            service.insert("image".to_string(), Document::from(name.as_str()));
            if !earlier.is_empty() {
                service.insert("depends_on".to_string(), Document::Sequence(earlier.clone()));
            }
            declared.insert(name.clone(), Document::Mapping(service));
            earlier.push(Document::from(name.as_str()));
        }
        let mut root = Mapping::new();
        root.insert("services".to_string(), Document::Mapping(declared));
        Document::Mapping(root)
    }

    fn build(
        set: &BTreeMap<String, BTreeSet<String>>,
    ) -> (Vec<(RepositoryRef, BTreeSet<String>)>, Inventory) {
        let repos: Vec<_> = set
            .iter()
            .map(|(name, services)| {
                (
                    RepositoryRef::new(format!("org/{}.git", name)).unwrap(),
                    services.clone(),
                )
            })
            .collect();
        let inventory = Inventory::from_records(
            repos
                .iter()
                .flat_map(|(repo, services)| {
                    services
                        .iter()
                        .map(move |s| ServiceRecord::new(repo.clone(), s.clone()))
                })
                .collect(),
        );
        (repos, inventory)
    }

    fn strings(doc: Option<&Document>) -> Vec<String> {
        doc.and_then(Document::as_sequence)
            .map(|seq| seq.iter().filter_map(|d| d.as_str().map(str::to_string)).collect())
            .unwrap_or_default()
    }

    proptest! {
        /// Property: namespaced service keys are unique across every repository
        #[test]
        fn namespaced_keys_are_globally_unique(set in repository_sets()) {
            let (repos, inventory) = build(&set);
            let mut seen = HashSet::new();
            for (repo, services) in &repos {
                let out = Namespacer::new(repo, &inventory, NETWORK)
                    .apply(manifest(services), Path::new("m.yml"))
                    .unwrap();
                for key in out.get("services").and_then(Document::as_mapping).unwrap().keys() {
                    prop_assert!(seen.insert(key.clone()), "duplicate key {}", key);
                }
            }
        }

        /// Property: every rewritten dependency names a service in the same manifest
        #[test]
        fn depends_on_resolves_locally(set in repository_sets()) {
            let (repos, inventory) = build(&set);
            for (repo, services) in &repos {
                let out = Namespacer::new(repo, &inventory, NETWORK)
                    .apply(manifest(services), Path::new("m.yml"))
                    .unwrap();
                let declared = out.get("services").and_then(Document::as_mapping).unwrap();
                for service in declared.values() {
                    for dep in strings(service.get("depends_on")) {
                        prop_assert!(declared.contains_key(&dep), "dangling dependency {}", dep);
                    }
                }
            }
        }

        /// Property: a repository never receives URLs for its own services
        #[test]
        fn environment_excludes_own_services(set in repository_sets()) {
            let (repos, inventory) = build(&set);
            for (repo, services) in &repos {
                let own: HashSet<String> = services.iter().map(|s| url_variable(s)).collect();
                let out = Namespacer::new(repo, &inventory, NETWORK)
                    .apply(manifest(services), Path::new("m.yml"))
                    .unwrap();
                let declared = out.get("services").and_then(Document::as_mapping).unwrap();
                let peers = inventory.excluding(repo).count();
                for service in declared.values() {
                    let env = strings(service.get("environment"));
                    prop_assert_eq!(env.len(), peers);
                    for entry in env {
                        let name = entry.split('=').next().unwrap().to_string();
                        prop_assert!(!own.contains(&name), "self reference {}", entry);
                    }
                }
            }
        }

        /// Property: re-applying never duplicates the network or peer variables
        #[test]
        fn reapplying_adds_no_duplicates(set in repository_sets()) {
            let (repos, inventory) = build(&set);
            for (repo, services) in &repos {
                let namespacer = Namespacer::new(repo, &inventory, NETWORK);
                let once = namespacer.apply(manifest(services), Path::new("m.yml")).unwrap();
                let twice = namespacer.apply(once, Path::new("m.yml")).unwrap();
                let declared = twice.get("services").and_then(Document::as_mapping).unwrap();
                for service in declared.values() {
                    prop_assert_eq!(strings(service.get("networks")), vec![NETWORK.to_string()]);
                    let env = strings(service.get("environment"));
                    let unique: HashSet<_> = env.iter().collect();
                    prop_assert_eq!(unique.len(), env.len());
                }
            }
        }

        /// Property: output is the same bytes for the same input
        #[test]
        fn output_is_deterministic(set in repository_sets()) {
            let (repos, inventory) = build(&set);
            for (repo, services) in &repos {
                let namespacer = Namespacer::new(repo, &inventory, NETWORK);
                let first = namespacer.apply(manifest(services), Path::new("m.yml")).unwrap();
                let second = namespacer.apply(manifest(services), Path::new("m.yml")).unwrap();
                prop_assert_eq!(first.to_yaml_string().unwrap(), second.to_yaml_string().unwrap());
            }
        }
    }
}
