//! Base-dir template expansion
//!
//! A base-dir template recognises exactly one variable, `{repo-name}`, which
//! expands to the basename of the main repository root. After substitution:
//!
//! - a leading `~` expands to the home directory,
//! - a relative path is joined onto the main repository root,
//! - an absolute path is kept.
//!
//! The result is lexically cleaned (no `.` components, `..` collapsed).

use std::path::{Path, PathBuf};

use normalize_path::NormalizePath;

/// The single variable a base-dir template may contain.
pub const REPO_NAME_VAR: &str = "{repo-name}";

/// Historical default base dir, checked by [`legacy_base_dir`].
pub const LEGACY_BASE_DIR: &str = "../{repo-name}-wt";

/// Expand a base-dir template against the main repository root.
///
/// `home` is passed explicitly so expansion stays a pure function; callers use
/// [`crate::path::home_dir`].
///
/// ```
/// use std::path::Path;
/// use git_wt::config::expand_path_template;
///
/// let root = Path::new("/src/app");
/// assert_eq!(expand_path_template(".wt", root, None), Path::new("/src/app/.wt"));
/// assert_eq!(
///     expand_path_template("../{repo-name}-wt", root, None),
///     Path::new("/src/app-wt")
/// );
/// ```
pub fn expand_path_template(template: &str, main_root: &Path, home: Option<&Path>) -> PathBuf {
    let repo_name = main_root
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    let substituted = template.replace(REPO_NAME_VAR, &repo_name);

    let home_str = home.map(|h| h.to_string_lossy().into_owned());
    let expanded = shellexpand::tilde_with_context(&substituted, || home_str.as_deref());

    let path = Path::new(expanded.as_ref());
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        main_root.join(path)
    };
    joined.normalize()
}

/// The historical `../{repo-name}-wt` directory, if it exists.
pub fn legacy_base_dir(main_root: &Path) -> Option<PathBuf> {
    let legacy = expand_path_template(LEGACY_BASE_DIR, main_root, None);
    legacy.is_dir().then_some(legacy)
}
