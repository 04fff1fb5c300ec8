//! Module path major-version suffixes
//!
//! Go encodes major versions 2 and above in the module path: `example.com/mod/v2`.
//! `gopkg.in` paths use a dotted suffix instead, for every major: `gopkg.in/yaml.v3`.

const GOPKG_IN: &str = "gopkg.in/";

/// Split a module path into its prefix and major-version suffix
///
/// The suffix keeps its separator (`/v2`, `.v3`) and is empty when the path
/// has no valid major suffix.
pub fn split_path_version(path: &str) -> (&str, &str) {
    if path.starts_with(GOPKG_IN) {
        return split_gopkg_in(path);
    }

    if let Some(idx) = path.rfind("/v") {
        let digits = &path[idx + 2..];
        if is_major_digits(digits) && !matches!(digits, "0" | "1") {
            return (&path[..idx], &path[idx..]);
        }
    }
    (path, "")
}

fn split_gopkg_in(path: &str) -> (&str, &str) {
    let body = path.strip_suffix("-unstable").unwrap_or(path);
    if let Some(idx) = body.rfind(".v") {
        if is_major_digits(&body[idx + 2..]) {
            return (&path[..idx], &path[idx..]);
        }
    }
    (path, "")
}

fn is_major_digits(digits: &str) -> bool {
    !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'))
}

/// Major version named by the path suffix, if any
pub fn path_major(path: &str) -> Option<u64> {
    let (_, suffix) = split_path_version(path);
    let digits = suffix.get(2..)?;
    let digits = digits.strip_suffix("-unstable").unwrap_or(digits);
    digits.parse().ok()
}

/// Build the path for a given major version of the module rooted at `prefix`
pub fn path_for_major(prefix: &str, major: u64) -> String {
    if prefix.starts_with(GOPKG_IN) {
        format!("{}.v{}", prefix, major)
    } else if major >= 2 {
        format!("{}/v{}", prefix, major)
    } else {
        prefix.to_string()
    }
}

/// The module path of the next major family, for paths that carry a `/vN` suffix
pub fn next_major_path(path: &str) -> Option<String> {
    let (prefix, suffix) = split_path_version(path);
    if suffix.is_empty() || prefix.starts_with(GOPKG_IN) {
        return None;
    }
    let major = path_major(path)?;
    Some(path_for_major(prefix, major + 1))
}

/// Derive the module path a dependency had at `previous_version`
///
/// `+incompatible` versions live at the unsuffixed path whatever their major.
pub fn path_at_version(path: &str, previous_version: &str) -> Option<String> {
    let previous = super::GoVersion::parse(previous_version)?;
    let (prefix, _) = split_path_version(path);
    if previous.is_incompatible() {
        return Some(prefix.to_string());
    }
    Some(path_for_major(prefix, previous.major()))
}

/// Returns true if the two paths differ only in their major-version suffix
pub fn is_major_path_change(old_path: &str, new_path: &str) -> bool {
    if old_path == new_path {
        return false;
    }
    let (old_prefix, _) = split_path_version(old_path);
    let (new_prefix, _) = split_path_version(new_path);
    old_prefix == new_prefix
}
