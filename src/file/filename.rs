//! Client filename sanitizing.

/// Reduce a client-supplied filename to a name that is safe to store.
///
/// Only the final path segment survives. Both `/` and `\` count as
/// separators, a leading drive prefix such as `C:` is dropped and NUL
/// characters are removed.
///
/// Returns `None` when nothing usable is left (empty, `.` or `..`).
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let last = raw.rsplit(|c| c == '/' || c == '\\').next().unwrap_or("");

    let mut chars = last.chars();
    let without_drive = match (chars.next(), chars.next()) {
        (Some(drive), Some(':')) if drive.is_ascii_alphabetic() => &last[2..],
        _ => last,
    };

    let name: String = without_drive.chars().filter(|&c| c != '\0').collect();

    match name.as_str() {
        "" | "." | ".." => None,
        _ => Some(name),
    }
}
