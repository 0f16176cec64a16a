//! Tolerant version-string helpers for registry results

use std::cmp::Ordering;

/// A version is stable when it carries no pre-release tag (`-beta`, `-rc.1`, ...)
pub fn is_stable(version: &str) -> bool {
    !version.contains('-')
}

/// Numeric components of a version with leading zeros stripped; anything
/// non-numeric counts as 0. Kept as digit strings so arbitrarily long
/// components still order numerically.
fn components(version: &str) -> Vec<&str> {
    version
        .split('.')
        .map(|part| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return "";
            }
            part.trim_start_matches('0')
        })
        .collect()
}

/// Compare two normalized digit strings by value ("" is zero)
fn compare_numeric(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Descending comparator: newer versions sort first.
///
/// Components are compared numerically, missing trailing components are 0,
/// so `2.0` and `2.0.0` compare equal.
pub fn compare_semver_desc(a: &str, b: &str) -> Ordering {
    let pa = components(a);
    let pb = components(b);

    for i in 0..pa.len().max(pb.len()) {
        let va = pa.get(i).copied().unwrap_or("");
        let vb = pb.get(i).copied().unwrap_or("");
        match compare_numeric(vb, va) {
            Ordering::Equal => continue,
            other => return other,
        }
    }

    Ordering::Equal
}

/// Keep stable versions and order them newest first (ties keep input order)
pub fn stable_sorted<I, S>(versions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut stable: Vec<String> = versions
        .into_iter()
        .map(Into::into)
        .filter(|v| is_stable(v))
        .collect();
    stable.sort_by(|a, b| compare_semver_desc(a, b));
    stable
}
