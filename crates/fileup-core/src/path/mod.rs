//! Path decomposition and lexical normalization.
//!
//! Pure string functions: nothing here touches the filesystem, so symlinks
//! and the real directory tree are never consulted.

mod sanitize;

pub use sanitize::sanitize_component;

/// Separator used for every joined or parsed path.
pub const SEPARATOR: char = '/';

/// A path split into directory, filename (stem) and extension.
///
/// Absent components are `None`; an empty component is never returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPath {
    pub directory: Option<String>,
    pub filename: Option<String>,
    pub extension: Option<String>,
}

/// Splits `path` on its final separator, then splits the basename on its
/// final `.`.
///
/// A basename whose only `.` is the leading one is a dotfile and has no
/// extension.
///
/// # Examples
///
/// - `"a/b/photo.jpg"` → directory `a/b`, filename `photo`, extension `jpg`
/// - `"/.profile"` → directory `/`, filename `.profile`, no extension
pub fn parse_path(path: &str) -> ParsedPath {
    let (directory, basename) = match path.rfind(SEPARATOR) {
        Some(0) => (Some(SEPARATOR.to_string()), &path[1..]),
        Some(idx) => (Some(path[..idx].to_string()), &path[idx + 1..]),
        None => (None, path),
    };

    let (filename, extension) = match basename.rfind('.') {
        Some(0) | None => (basename, None),
        Some(idx) => (&basename[..idx], Some(&basename[idx + 1..])),
    };

    ParsedPath {
        directory: directory.filter(|d| !d.is_empty()),
        filename: non_empty(filename),
        extension: extension.and_then(non_empty),
    }
}

/// Joins `segments` with a single separator and collapses `/./`, `//` and
/// `/<name>/../` (where `<name>` is not `..`) until no rewrite applies.
///
/// Leading `..` segments that have nothing left to cancel are kept.
pub fn normalize<S: AsRef<str>>(segments: &[S]) -> String {
    let mut path = segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join("/");

    loop {
        let mut changed = false;
        while path.contains("/./") {
            path = path.replace("/./", "/");
            changed = true;
        }
        while path.contains("//") {
            path = path.replace("//", "/");
            changed = true;
        }
        if let Some(collapsed) = collapse_parent(&path) {
            path = collapsed;
            changed = true;
        }
        if !changed {
            return path;
        }
    }
}

/// Rewrites the first `/<name>/../` occurrence to `/`, if any.
fn collapse_parent(path: &str) -> Option<String> {
    let mut start = 0;
    while let Some(rel) = path[start..].find("/../") {
        let at = start + rel;
        if let Some(prev) = path[..at].rfind(SEPARATOR) {
            let name = &path[prev + 1..at];
            if !name.is_empty() && name != ".." {
                return Some(format!("{}/{}", &path[..prev], &path[at + 4..]));
            }
        }
        start = at + 1;
    }
    None
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
