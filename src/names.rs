// src/names.rs

//! Helpers for dotted fully-qualified Java names.
//!
//! An empty name denotes the default package.

/// Everything before the last `.`, or `""` when there is none
pub fn parent(name: &str) -> &str {
    &name[..name.rfind('.').unwrap_or(0)]
}

/// Everything after the last `.`, or the whole name when there is none
pub fn leaf(name: &str) -> &str {
    &name[name.rfind('.').map_or(0, |i| i + 1)..]
}

/// Package segments are lower-case, type names are capitalized.
pub fn is_package_name(name: &str) -> bool {
    leaf(name).chars().next().map_or(true, char::is_lowercase)
}

/// `a.b.c` -> `/a/b/c`, the trailing path a package occupies on disk
pub fn package_path(name: &str) -> String {
    format!("/{}", name.replace('.', "/"))
}
