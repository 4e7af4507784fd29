//! C4 data model: catalog-sourced operator bundles and the cache that
//! indexes them for the resolver.
//!
//! An [`Operator`] is one version of one package, published from one
//! catalog. [`Cache`] answers the lookups [`crate::resolver::BundleResolver`]
//! needs while expanding a subscription into SAT installables: by package
//! name, by bundle name, or by an exact pinned version.

use semver::Version;

use crate::sat::Identifier;

/// Which catalog an [`Operator`] was published from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogKey {
    pub namespace: String,
    pub name: String,
}

impl CatalogKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        CatalogKey {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

/// A dependency on an exact version of another package, e.g. a CSV's
/// `olm.package` dependency pinned to a specific release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDependency {
    pub package: String,
    pub version: Version,
}

impl VersionDependency {
    pub fn new(package: impl Into<String>, version: Version) -> Self {
        VersionDependency {
            package: package.into(),
            version,
        }
    }

    /// Whether `operator` is an acceptable target of this dependency: same
    /// package name, and a version that matches exactly.
    pub fn can_be_satisfied_by(&self, operator: &Operator) -> bool {
        operator.package_name == self.package && operator.version.as_ref() == Some(&self.version)
    }
}

/// One bundle available for installation: a single version of a single
/// package, as published by one catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    /// The bundle's name within its catalog, e.g. `etcdoperator.v0.9.2`.
    pub csv_name: String,
    /// The package this bundle belongs to, e.g. `etcd`.
    pub package_name: String,
    /// The bundle's version, if it declares one.
    pub version: Option<Version>,
    /// Which catalog this bundle was read from.
    pub source: CatalogKey,
    /// Packages this bundle requires, pinned to an exact version.
    pub version_dependencies: Vec<VersionDependency>,
}

impl Operator {
    /// The globally unique identifier this bundle is known by in the SAT
    /// layer: `namespace/catalog/csv-name`.
    pub fn identifier(&self) -> Identifier {
        Identifier::new(format!(
            "{}/{}/{}",
            self.source.namespace, self.source.name, self.csv_name
        ))
    }
}

/// Indexes every catalog's operators for the lookups the resolver performs
/// while expanding a subscription.
///
/// Mirrors the reference cache's role: a read-through index over whatever
/// catalogs are currently registered, rebuilt wholesale on [`Cache::resync`]
/// rather than updated incrementally. Catalogs are kept in registration
/// order and each catalog's operators in insertion order — that order
/// feeds literal numbering and therefore the SAT backend's branch order,
/// which drives the input-order tie-break in §4.1, so it must never be
/// reshuffled (e.g. by sorting) on the way out.
#[derive(Debug, Default)]
pub struct Cache {
    catalogs: Vec<(CatalogKey, Vec<Operator>)>,
}

impl Cache {
    pub fn new() -> Self {
        Cache {
            catalogs: Vec::new(),
        }
    }

    /// Register (or replace) the operator list for one catalog. Replacing
    /// an existing catalog keeps its original registration position.
    pub fn add_catalog(&mut self, key: CatalogKey, operators: Vec<Operator>) {
        if let Some(entry) = self.catalogs.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = operators;
        } else {
            self.catalogs.push((key, operators));
        }
    }

    /// Replace the entire cache contents, as if every catalog were reloaded
    /// from scratch, preserving the registration order given.
    pub fn resync(&mut self, catalogs: Vec<(CatalogKey, Vec<Operator>)>) {
        self.catalogs = catalogs;
    }

    /// Every operator across every catalog providing `package`, in catalog
    /// registration order and then per-catalog insertion order.
    pub fn get_package_from_all_catalogs(&self, package: &str) -> Vec<&Operator> {
        self.catalogs
            .iter()
            .flat_map(|(_, ops)| ops.iter())
            .filter(|op| op.package_name == package)
            .collect()
    }

    /// Every operator across every catalog with the given bundle name, in
    /// the same order as [`Cache::get_package_from_all_catalogs`].
    pub fn get_csv_name_from_all_catalogs(&self, csv_name: &str) -> Vec<&Operator> {
        self.catalogs
            .iter()
            .flat_map(|(_, ops)| ops.iter())
            .filter(|op| op.csv_name == csv_name)
            .collect()
    }

    /// Every operator across every catalog providing an exact `package` at
    /// `version`, in the same order as [`Cache::get_package_from_all_catalogs`].
    pub fn get_package_version_from_all_catalogs(
        &self,
        package: &str,
        version: &Version,
    ) -> Vec<&Operator> {
        self.catalogs
            .iter()
            .flat_map(|(_, ops)| ops.iter())
            .filter(|op| op.package_name == package && op.version.as_ref() == Some(version))
            .collect()
    }

    /// The operator named `csv_name` within the specific catalog `key`, if
    /// any.
    pub fn get_csv_name_from_catalog(&self, key: &CatalogKey, csv_name: &str) -> Option<&Operator> {
        self.catalogs
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, ops)| ops.iter().find(|op| op.csv_name == csv_name))
    }
}
