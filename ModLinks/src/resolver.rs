//! Mod name resolution
//!
//! Users type partial or differently-cased names. A request is narrowed in three
//! steps, each one only consulted when the previous step left more than one
//! candidate:
//!
//! 1. names containing the request, ignoring case
//! 2. names equal to the request, ignoring case
//! 3. names equal to the request exactly
//!
//! So `"rando"` is ambiguous among `RandoPlus` and `TrandoPlus`, but `"randoplus"`
//! picks `RandoPlus` even though `TrandoPlus` also contains it.

use crate::catalog::Manifest;
use crate::error::ResolveError;

/// Resolve `requested` against `names`, returning the single matching name.
///
/// Candidate lists in errors keep the order of `names`.
///
/// # Errors
/// See [`ResolveError`] for the three ways resolution can fail.
pub fn resolve<S: AsRef<str>>(names: &[S], requested: &str) -> Result<String, ResolveError> {
    let folded = requested.to_lowercase();

    let containing: Vec<&str> = names
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|name| name.to_lowercase().contains(&folded))
        .collect();
    match containing.as_slice() {
        [] => {
            return Err(ResolveError::NotFound {
                requested: requested.to_string(),
            });
        }
        [only] => return Ok((*only).to_string()),
        _ => {}
    }

    let equal: Vec<&str> = containing
        .iter()
        .copied()
        .filter(|name| name.to_lowercase() == folded)
        .collect();
    match equal.as_slice() {
        [] => return Err(ambiguous(requested, &containing)),
        [only] => return Ok((*only).to_string()),
        _ => {}
    }

    match equal.iter().filter(|name| **name == requested).count() {
        0 => Err(ambiguous(requested, &equal)),
        1 => Ok(requested.to_string()),
        count => Err(ResolveError::DuplicateExact {
            requested: requested.to_string(),
            count,
        }),
    }
}

/// Resolve `requested` against a catalog and return the matching manifest.
///
/// When the catalog has the same name twice this fails with
/// [`ResolveError::DuplicateExact`] rather than picking one.
///
/// # Errors
/// See [`resolve`].
pub fn resolve_manifest<'a>(
    catalog: &'a [Manifest],
    requested: &str,
) -> Result<&'a Manifest, ResolveError> {
    let names: Vec<&str> = catalog.iter().map(|m| m.name.as_str()).collect();
    let name = resolve(&names, requested)?;
    catalog
        .iter()
        .find(|m| m.name == name)
        .ok_or(ResolveError::NotFound {
            requested: requested.to_string(),
        })
}

fn ambiguous(requested: &str, candidates: &[&str]) -> ResolveError {
    ResolveError::Ambiguous {
        requested: requested.to_string(),
        candidates: candidates.iter().map(ToString::to_string).collect(),
    }
}
