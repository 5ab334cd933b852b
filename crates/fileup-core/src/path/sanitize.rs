//! Linux-safe sanitization of client-supplied name components.

/// Linux NAME_MAX in bytes.
const NAME_MAX: usize = 255;

/// Sanitizes a single name component taken from untrusted metadata (an
/// upload's client filename, a URL path segment).
///
/// - Replaces NUL, `/`, `\` and control characters with `_`
/// - Trims surrounding whitespace
/// - Limits length to 255 bytes
///
/// Returns `None` when nothing usable remains (empty, `.` or `..`).
pub fn sanitize_component(name: &str) -> Option<String> {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c == '\0' || c == '/' || c == '\\' || c.is_control() {
            out.push('_');
        } else {
            out.push(c);
        }
    }

    let trimmed = out.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return None;
    }

    if trimmed.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        Some(trimmed[..take].to_string())
    } else {
        Some(trimmed.to_string())
    }
}
