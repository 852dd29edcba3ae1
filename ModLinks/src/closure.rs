//! Dependency closure
//!
//! Expands a set of requested mods into everything they need, following
//! `Dependencies` transitively.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;

use crate::catalog::Manifest;
use crate::error::MissingDependencies;

/// The mods needed to satisfy a request, and the names that could not be found.
///
/// Both halves are always filled in; a request with missing names still yields
/// the records that could be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Closure {
    /// Records to install, in the order the walk first reached them.
    pub records: Vec<Manifest>,
    /// Requested or depended-on names that are not in the catalog.
    pub missing: BTreeSet<String>,
}

impl Closure {
    /// Whether every name could be found.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// The aggregate error for all missing names, if there are any.
    #[must_use]
    pub fn missing_error(&self) -> Option<MissingDependencies> {
        if self.missing.is_empty() {
            return None;
        }
        Some(MissingDependencies {
            names: self.missing.iter().cloned().collect(),
        })
    }

    /// Names of the resolved records.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|m| m.name.as_str())
    }
}

/// Compute the transitive closure of `requested` over `catalog`.
///
/// Each name is expanded at most once, so dependency cycles terminate. If the
/// catalog repeats a name, the later entry is used.
pub fn closure<S: AsRef<str>>(catalog: &[Manifest], requested: &[S]) -> Closure {
    let by_name: HashMap<&str, &Manifest> =
        catalog.iter().map(|m| (m.name.as_str(), m)).collect();

    let mut visited: IndexMap<&str, &Manifest> = IndexMap::new();
    let mut missing = BTreeSet::new();

    for name in requested {
        visit(name.as_ref(), &by_name, &mut visited, &mut missing);
    }

    tracing::debug!(
        "Dependency closure of {} request(s): {} record(s), {} missing",
        requested.len(),
        visited.len(),
        missing.len()
    );

    Closure {
        records: visited.into_values().cloned().collect(),
        missing,
    }
}

fn visit<'a>(
    name: &str,
    by_name: &HashMap<&'a str, &'a Manifest>,
    visited: &mut IndexMap<&'a str, &'a Manifest>,
    missing: &mut BTreeSet<String>,
) {
    if visited.contains_key(name) || missing.contains(name) {
        return;
    }
    let Some((&key, &manifest)) = by_name.get_key_value(name) else {
        missing.insert(name.to_string());
        return;
    };
    visited.insert(key, manifest);
    for dependency in manifest.dependency_names() {
        visit(dependency, by_name, visited, missing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Link;
    use pretty_assertions::assert_eq;

    fn manifest(name: &str, deps: &[&str]) -> Manifest {
        Manifest {
            dependencies: Some(deps.iter().map(ToString::to_string).collect()),
            ..Manifest::new(name, Link::new(format!("https://example.com/{name}.zip"), "00"))
        }
    }

    fn names(closure: &Closure) -> Vec<&str> {
        closure.names().collect()
    }

    fn catalog() -> Vec<Manifest> {
        vec![
            manifest("A", &["B"]),
            manifest("B", &[]),
            manifest("C", &[]),
        ]
    }

    #[test]
    fn test_transitive_dependencies() {
        let result = closure(&catalog(), &["A"]);
        assert_eq!(names(&result), vec!["A", "B"]);
        assert!(result.is_complete());
        assert_eq!(result.missing_error(), None);
    }

    #[test]
    fn test_missing_name_does_not_affect_others() {
        let result = closure(&catalog(), &["A", "Z"]);
        assert_eq!(names(&result), vec!["A", "B"]);
        assert_eq!(result.missing, BTreeSet::from(["Z".to_string()]));
        assert_eq!(
            result.missing_error().unwrap().to_string(),
            "required mods do not exist: Z"
        );
    }

    #[test]
    fn test_missing_dependencies_aggregate_sorted() {
        let catalog = vec![manifest("Rando", &["MenuChanger", "ItemChanger"])];
        let result = closure(&catalog, &["Rando"]);
        assert_eq!(names(&result), vec!["Rando"]);
        assert_eq!(
            result.missing_error().unwrap().names,
            vec!["ItemChanger".to_string(), "MenuChanger".to_string()]
        );
    }

    #[test]
    fn test_cycle_terminates() {
        let catalog = vec![manifest("A", &["B"]), manifest("B", &["A"])];
        let result = closure(&catalog, &["A"]);
        assert_eq!(names(&result), vec!["A", "B"]);
        assert!(result.is_complete());
    }

    #[test]
    fn test_shared_dependency_included_once() {
        let catalog = vec![
            manifest("A", &["Vasi"]),
            manifest("B", &["Vasi"]),
            manifest("Vasi", &[]),
        ];
        let result = closure(&catalog, &["A", "B", "A"]);
        assert_eq!(names(&result), vec!["A", "Vasi", "B"]);
    }

    #[test]
    fn test_unspecified_dependencies_are_a_leaf() {
        let catalog = vec![Manifest::new("Solo", Link::new("https://example.com/Solo.dll", "00"))];
        let result = closure(&catalog, &["Solo"]);
        assert_eq!(names(&result), vec!["Solo"]);
    }

    #[test]
    fn test_duplicate_names_use_last_entry() {
        let catalog = vec![manifest("A", &["B"]), manifest("B", &[]), manifest("A", &[])];
        let result = closure(&catalog, &["A"]);
        assert_eq!(names(&result), vec!["A"]);
    }
}
