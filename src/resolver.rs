//! C4: the Bundle Resolver, which translates catalog data and subscription
//! requests into SAT installables, hands them to [`crate::sat::solve`], and
//! translates the result back into catalog [`Operator`]s.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::catalog::{Cache, CatalogKey, Operator};
use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::sat::{Constraint, Identifier, Installable};

/// A request for one package, optionally pinned to a specific bundle within
/// a specific catalog (an upgrade/downgrade "starting CSV").
#[derive(Debug, Clone)]
pub struct Subscription {
    pub package: String,
    pub catalog: CatalogKey,
    pub starting_csv: Option<String>,
}

impl Subscription {
    pub fn new(package: impl Into<String>, catalog: CatalogKey) -> Self {
        Subscription {
            package: package.into(),
            catalog,
            starting_csv: None,
        }
    }

    pub fn pinned_to(package: impl Into<String>, catalog: CatalogKey, starting_csv: impl Into<String>) -> Self {
        Subscription {
            package: package.into(),
            catalog,
            starting_csv: Some(starting_csv.into()),
        }
    }
}

/// Resolves a set of [`Subscription`]s against a [`Cache`] into the bundles
/// that must be installed.
pub struct BundleResolver<'a> {
    cache: &'a Cache,
    config: ResolverConfig,
}

impl<'a> BundleResolver<'a> {
    pub fn new(cache: &'a Cache) -> Self {
        BundleResolver {
            cache,
            config: ResolverConfig::default(),
        }
    }

    pub fn with_config(cache: &'a Cache, config: ResolverConfig) -> Self {
        BundleResolver { cache, config }
    }

    /// Resolve every subscription and explicit add-request into the full
    /// set of bundles that must be installed to satisfy all of them
    /// simultaneously, keyed by bundle (csv) name.
    ///
    /// `installed_csvs` names bundles already present in the cluster. It is
    /// accepted and threaded through for parity with the source API but,
    /// as in the source, never turned into a constraint at this layer
    /// (DESIGN.md open question 1) — higher layers decide what to do with
    /// already-installed state.
    ///
    /// Every subscription and add-request is expanded independently; a
    /// failure in one (catalog miss, malformed identifier) does not stop
    /// the others from being attempted (§7 aggregation policy), but the
    /// overall call still fails if any of them failed.
    #[instrument(level = "debug", skip_all, fields(
        installed = installed_csvs.len(),
        subscriptions = subscriptions.len(),
        add_requests = add_requests.len(),
    ))]
    pub fn solve_operators(
        &self,
        installed_csvs: &[String],
        subscriptions: &[Subscription],
        add_requests: &[Subscription],
    ) -> Result<HashMap<String, Operator>, ResolveError> {
        let _ = installed_csvs;

        let mut expansion = Expansion::new(self.cache);
        let mut errors = Vec::new();

        for request in subscriptions.iter().chain(add_requests.iter()) {
            if let Err(err) = expansion.add_subscription(request) {
                errors.push(err);
            }
        }
        ResolveError::aggregate(errors)?;

        debug!(installables = expansion.installables.len(), "expansion complete");

        let selected = crate::sat::solve_with_config(expansion.installables, &self.config)?;

        let mut resolved = HashMap::new();
        for installable in selected {
            if !installable.is_bundle() {
                continue;
            }
            let (catalog, csv_name) = split_bundle_identifier(installable.identifier().as_str())?;
            if let Some(operator) = self.cache.get_csv_name_from_catalog(&catalog, &csv_name) {
                resolved.insert(operator.csv_name.clone(), operator.clone());
            }
        }
        Ok(resolved)
    }
}

/// Split a bundle identifier `namespace/catalog/csv-name` into the catalog
/// key it was published from and its csv name (§4.4 step 5, §6 "exactly two
/// `/` separators").
fn split_bundle_identifier(identifier: &str) -> Result<(CatalogKey, String), ResolveError> {
    let parts: Vec<&str> = identifier.split('/').collect();
    match parts.as_slice() {
        [namespace, catalog, csv_name] => Ok((
            CatalogKey::new(*namespace, *catalog),
            csv_name.to_string(),
        )),
        _ => Err(ResolveError::MalformedIdentifier(identifier.to_string())),
    }
}

/// Accumulates installables and their backing operators while a subscription
/// list is expanded into a SAT problem.
///
/// `visited` prevents both infinite recursion on dependency cycles and
/// duplicate installables when two bundles share a dependency (diamonds).
/// The reference resolver recurses without this guard; adding it is this
/// crate's own correctness fix, not a behavior the source exercises.
struct Expansion<'a> {
    cache: &'a Cache,
    installables: Vec<Installable>,
    visited: HashSet<Identifier>,
}

impl<'a> Expansion<'a> {
    fn new(cache: &'a Cache) -> Self {
        Expansion {
            cache,
            installables: Vec::new(),
            visited: HashSet::new(),
        }
    }

    fn add_subscription(&mut self, subscription: &Subscription) -> Result<(), ResolveError> {
        let candidates: Vec<&Operator> = match &subscription.starting_csv {
            Some(csv) => self
                .cache
                .get_csv_name_from_catalog(&subscription.catalog, csv)
                .into_iter()
                .collect(),
            None => self.cache.get_package_from_all_catalogs(&subscription.package),
        };
        if candidates.is_empty() {
            return Err(ResolveError::CatalogMiss(subscription.package.clone()));
        }

        let virtual_id = Identifier::new(subscription.package.clone());
        if self.visited.insert(virtual_id.clone()) {
            let dep_ids: Vec<Identifier> = candidates.iter().map(|op| op.identifier()).collect();
            let mut virt = Installable::virtual_package(virtual_id);
            virt.add_dependency(dep_ids);
            self.installables.push(virt);
        }

        let owned: Vec<Operator> = candidates.into_iter().cloned().collect();
        for operator in &owned {
            self.add_bundle(operator)?;
        }
        Ok(())
    }

    fn add_bundle(&mut self, operator: &Operator) -> Result<(), ResolveError> {
        let id = operator.identifier();
        if !self.visited.insert(id.clone()) {
            return Ok(());
        }

        let mut constraints = Vec::new();
        let mut nested: Vec<Operator> = Vec::new();

        for version_dependency in &operator.version_dependencies {
            let candidates = self
                .cache
                .get_package_version_from_all_catalogs(&version_dependency.package, &version_dependency.version);
            if candidates.is_empty() {
                return Err(ResolveError::CatalogMiss(format!(
                    "{}@{}",
                    version_dependency.package, version_dependency.version
                )));
            }
            let dep_ids: Vec<Identifier> = candidates.iter().map(|op| op.identifier()).collect();
            constraints.push(Constraint::Dependency(dep_ids));
            nested.extend(candidates.into_iter().cloned());
        }

        self.installables.push(Installable::bundle(id, constraints));

        for dependency in &nested {
            self.add_bundle(dependency)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    fn operator(catalog: &str, csv: &str, package: &str, version: &str) -> Operator {
        Operator {
            csv_name: csv.to_string(),
            package_name: package.to_string(),
            version: Some(Version::parse(version).unwrap()),
            source: CatalogKey::new("ns", catalog),
            version_dependencies: vec![],
        }
    }

    #[test]
    fn resolves_single_package_with_one_candidate() {
        let mut cache = Cache::new();
        cache.add_catalog(
            CatalogKey::new("ns", "community"),
            vec![operator("community", "etcd.v0.9.2", "etcd", "0.9.2")],
        );
        let resolver = BundleResolver::new(&cache);
        let resolved = resolver
            .solve_operators(&[], &[Subscription::new("etcd", CatalogKey::new("ns", "community"))], &[])
            .expect("resolves");
        assert_eq!(resolved.len(), 1);
        assert!(resolved.contains_key("etcd.v0.9.2"));
    }

    #[test]
    fn missing_package_is_a_catalog_miss() {
        let cache = Cache::new();
        let resolver = BundleResolver::new(&cache);
        let err = resolver
            .solve_operators(&[], &[Subscription::new("etcd", CatalogKey::new("ns", "community"))], &[])
            .expect_err("no candidates");
        assert!(matches!(err, ResolveError::CatalogMiss(_)));
    }

    #[test]
    fn resolves_transitive_package_dependency() {
        let mut cache = Cache::new();
        let mut root = operator("community", "etcd-operator.v1.0.0", "etcd", "1.0.0");
        root.version_dependencies
            .push(crate::catalog::VersionDependency::new("prometheus", Version::parse("2.0.0").unwrap()));
        cache.add_catalog(
            CatalogKey::new("ns", "community"),
            vec![
                root,
                operator("community", "prometheus.v2.0.0", "prometheus", "2.0.0"),
            ],
        );
        let resolver = BundleResolver::new(&cache);
        let resolved = resolver
            .solve_operators(&[], &[Subscription::new("etcd", CatalogKey::new("ns", "community"))], &[])
            .expect("resolves");
        assert!(resolved.contains_key("etcd-operator.v1.0.0"));
        assert!(resolved.contains_key("prometheus.v2.0.0"));
    }

    #[test]
    fn dependency_cycle_terminates() {
        let mut cache = Cache::new();
        let mut a = operator("community", "a.v1.0.0", "a", "1.0.0");
        a.version_dependencies
            .push(crate::catalog::VersionDependency::new("b", Version::parse("1.0.0").unwrap()));
        let mut b = operator("community", "b.v1.0.0", "b", "1.0.0");
        b.version_dependencies
            .push(crate::catalog::VersionDependency::new("a", Version::parse("1.0.0").unwrap()));
        cache.add_catalog(CatalogKey::new("ns", "community"), vec![a, b]);

        let resolver = BundleResolver::new(&cache);
        let resolved = resolver
            .solve_operators(&[], &[Subscription::new("a", CatalogKey::new("ns", "community"))], &[])
            .expect("resolves despite the cycle");
        assert!(resolved.contains_key("a.v1.0.0"));
        assert!(resolved.contains_key("b.v1.0.0"));
    }

    #[test]
    fn diamond_dependency_is_deduplicated() {
        let mut cache = Cache::new();
        let mut top = operator("community", "top.v1.0.0", "top", "1.0.0");
        top.version_dependencies
            .push(crate::catalog::VersionDependency::new("left", Version::parse("1.0.0").unwrap()));
        top.version_dependencies
            .push(crate::catalog::VersionDependency::new("right", Version::parse("1.0.0").unwrap()));
        let mut left = operator("community", "left.v1.0.0", "left", "1.0.0");
        left.version_dependencies
            .push(crate::catalog::VersionDependency::new("shared", Version::parse("1.0.0").unwrap()));
        let mut right = operator("community", "right.v1.0.0", "right", "1.0.0");
        right
            .version_dependencies
            .push(crate::catalog::VersionDependency::new("shared", Version::parse("1.0.0").unwrap()));
        let shared = operator("community", "shared.v1.0.0", "shared", "1.0.0");
        cache.add_catalog(
            CatalogKey::new("ns", "community"),
            vec![top, left, right, shared],
        );

        let resolver = BundleResolver::new(&cache);
        let resolved = resolver
            .solve_operators(&[], &[Subscription::new("top", CatalogKey::new("ns", "community"))], &[])
            .expect("resolves");
        assert_eq!(resolved.len(), 4);
    }

    #[test]
    fn pinned_version_dependency_selects_exact_version() {
        let mut cache = Cache::new();
        let mut root = operator("community", "root.v1.0.0", "root", "1.0.0");
        root.version_dependencies
            .push(crate::catalog::VersionDependency::new("etcd", Version::parse("0.9.2").unwrap()));
        cache.add_catalog(
            CatalogKey::new("ns", "community"),
            vec![
                root,
                operator("community", "etcd.v0.9.2", "etcd", "0.9.2"),
                operator("community", "etcd.v1.0.0", "etcd", "1.0.0"),
            ],
        );
        let resolver = BundleResolver::new(&cache);
        let resolved = resolver
            .solve_operators(&[], &[Subscription::new("root", CatalogKey::new("ns", "community"))], &[])
            .expect("resolves");
        assert!(resolved.contains_key("etcd.v0.9.2"));
        assert!(!resolved.contains_key("etcd.v1.0.0"));
    }

    #[test]
    fn subscription_and_add_request_resolve_together() {
        let mut cache = Cache::new();
        let mut package_b = operator("community", "packageB.v1", "packageB", "1.0.0");
        package_b
            .version_dependencies
            .push(crate::catalog::VersionDependency::new("packageC", Version::parse("0.1.0").unwrap()));
        cache.add_catalog(
            CatalogKey::new("olm", "community"),
            vec![
                operator("community", "packageA.v1", "packageA", "0.0.1"),
                package_b,
                operator("community", "packageC.v1", "packageC", "0.1.0"),
            ],
        );

        let resolver = BundleResolver::new(&cache);
        let resolved = resolver
            .solve_operators(
                &[],
                &[Subscription::new("packageA", CatalogKey::new("olm", "community"))],
                &[Subscription::new("packageB", CatalogKey::new("olm", "community"))],
            )
            .expect("resolves");

        assert_eq!(resolved.len(), 3);
        assert!(resolved.contains_key("packageA.v1"));
        assert!(resolved.contains_key("packageB.v1"));
        assert!(resolved.contains_key("packageC.v1"));
    }

    #[test]
    fn installed_csvs_are_accepted_but_do_not_affect_the_result() {
        let mut cache = Cache::new();
        cache.add_catalog(
            CatalogKey::new("ns", "community"),
            vec![operator("community", "etcd.v0.9.2", "etcd", "0.9.2")],
        );
        let resolver = BundleResolver::new(&cache);
        let without = resolver
            .solve_operators(&[], &[Subscription::new("etcd", CatalogKey::new("ns", "community"))], &[])
            .expect("resolves");
        let with = resolver
            .solve_operators(
                &["unrelated.v1".to_string()],
                &[Subscription::new("etcd", CatalogKey::new("ns", "community"))],
                &[],
            )
            .expect("resolves");
        assert_eq!(without, with);
    }
}
