//! Catalog listings

use std::collections::BTreeSet;
use std::fmt::Write;

use modlinks::catalog::Manifest;

/// Shown for fields of installed mods the catalog does not know.
pub const PLACEHOLDER: &str = "N/A";

/// Which mods to list.
#[derive(Debug, Clone, Default)]
pub struct ListFilter<'a> {
    /// Case-insensitive substring of the name.
    pub search: Option<&'a str>,
    /// Restrict to these installed mod names.
    pub installed: Option<&'a [String]>,
}

/// Select and sort catalog entries for display.
///
/// With an installed filter, installed mods missing from the catalog are listed
/// too, with every field set to [`PLACEHOLDER`].
pub fn list_mods(catalog: &[Manifest], filter: &ListFilter) -> Vec<Manifest> {
    let mut mods: Vec<Manifest> = match filter.installed {
        None => catalog.to_vec(),
        Some(installed) => {
            let installed: BTreeSet<&str> = installed.iter().map(String::as_str).collect();
            let known: BTreeSet<&str> = catalog.iter().map(|m| m.name.as_str()).collect();
            catalog
                .iter()
                .filter(|m| installed.contains(m.name.as_str()))
                .cloned()
                .chain(
                    installed
                        .iter()
                        .filter(|name| !known.contains(*name))
                        .map(|name| placeholder(name)),
                )
                .collect()
        }
    };

    if let Some(search) = filter.search.filter(|s| !s.is_empty()) {
        let search = search.to_lowercase();
        mods.retain(|m| m.name.to_lowercase().contains(&search));
    }

    mods.sort_by(|a, b| a.name.cmp(&b.name));
    mods
}

fn placeholder(name: &str) -> Manifest {
    Manifest {
        name: name.to_string(),
        description: PLACEHOLDER.to_string(),
        version: PLACEHOLDER.to_string(),
        dependencies: Some(vec![PLACEHOLDER.to_string()]),
        repository: Some(PLACEHOLDER.to_string()),
        ..Default::default()
    }
}

/// Render a listing: one name per line, or a detail block per mod.
pub fn format_listing(mods: &[Manifest], detailed: bool) -> String {
    let mut out = String::new();
    for m in mods {
        let _ = writeln!(out, "{}", m.name);
        if !detailed {
            continue;
        }
        let deps = match m.dependency_names() {
            [] => "none".to_string(),
            names => names.join(", "),
        };
        let _ = writeln!(out, "\tVersion: {}", m.version);
        let _ = writeln!(out, "\tRepository: {}", m.repository.as_deref().unwrap_or_default());
        let _ = writeln!(out, "\tDependencies: {deps}");
        let _ = writeln!(out, "\t{}\n", m.description.replace('\n', "\n\t"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use modlinks::catalog::Link;
    use pretty_assertions::assert_eq;

    fn catalog() -> Vec<Manifest> {
        vec![
            Manifest {
                description: "Teleport\nbetween benches".to_string(),
                version: "3.0.0.0".to_string(),
                repository: Some("https://github.com/homothetyhk/Benchwarp".to_string()),
                ..Manifest::new("Benchwarp", Link::new("https://example.com/Benchwarp.zip", "aa"))
            },
            Manifest {
                version: "1.0.0.0".to_string(),
                dependencies: Some(vec!["Vasi".to_string(), "Satchel".to_string()]),
                ..Manifest::new("QoL", Link::new("https://example.com/QoL.zip", "bb"))
            },
            Manifest::new("Vasi", Link::new("https://example.com/Vasi.zip", "cc")),
            Manifest::new("Satchel", Link::new("https://example.com/Satchel.zip", "dd")),
        ]
    }

    fn names(mods: &[Manifest]) -> Vec<&str> {
        mods.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_list_all_sorted() {
        let mods = list_mods(&catalog(), &ListFilter::default());
        assert_eq!(names(&mods), vec!["Benchwarp", "QoL", "Satchel", "Vasi"]);
        assert_eq!(format_listing(&mods, false), "Benchwarp\nQoL\nSatchel\nVasi\n");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let filter = ListFilter {
            search: Some("A"),
            ..Default::default()
        };
        let mods = list_mods(&catalog(), &filter);
        assert_eq!(names(&mods), vec!["Benchwarp", "Satchel", "Vasi"]);
    }

    #[test]
    fn test_installed_includes_unknown_mods() {
        let installed = vec!["Vasi".to_string(), "HandMade".to_string()];
        let filter = ListFilter {
            installed: Some(&installed),
            ..Default::default()
        };
        let mods = list_mods(&catalog(), &filter);
        assert_eq!(names(&mods), vec!["HandMade", "Vasi"]);
        assert_eq!(mods[0].version, PLACEHOLDER);
        assert_eq!(
            format_listing(&mods[..1], true),
            "HandMade\n\tVersion: N/A\n\tRepository: N/A\n\tDependencies: N/A\n\tN/A\n\n"
        );
    }

    #[test]
    fn test_detailed_format() {
        let mods = list_mods(
            &catalog(),
            &ListFilter {
                search: Some("bench"),
                ..Default::default()
            },
        );
        assert_eq!(
            format_listing(&mods, true),
            "Benchwarp\n\tVersion: 3.0.0.0\n\tRepository: https://github.com/homothetyhk/Benchwarp\n\tDependencies: none\n\tTeleport\n\tbetween benches\n\n"
        );

        let qol = list_mods(
            &catalog(),
            &ListFilter {
                search: Some("qol"),
                ..Default::default()
            },
        );
        assert!(format_listing(&qol, true).contains("\tDependencies: Vasi, Satchel\n"));
        assert!(format_listing(&qol, true).contains("\tRepository: \n"));
    }
}
