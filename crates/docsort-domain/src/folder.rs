//! Folder naming - the on-disk form of a canonical name
//!
//! A company folder's name IS its identity once sanitized. Every character
//! that [`sanitize_folder_name`] rewrites to `_` is also treated as a word
//! separator by the normalizer, so a canonical name and the folder derived
//! from it normalize to the same key.

/// Name used for documents whose company could not be determined
pub const UNKNOWN_NAME: &str = "Unknown";

/// Longest folder name produced by [`sanitize_folder_name`], in bytes
///
/// Filesystems cap a name at 255 bytes, not characters.
pub const MAX_FOLDER_NAME_LEN: usize = 200;

/// Raw names that carry no company information
const PLACEHOLDER_NAMES: [&str; 4] = ["unknown", "null", "none", "n/a"];

/// Whether `c` cannot appear in a folder name on common filesystems
pub fn is_reserved_char(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c.is_control()
}

/// Whether a raw name is a placeholder ("unknown", "null", empty, ...)
pub fn is_placeholder_name(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty()
        || PLACEHOLDER_NAMES
            .iter()
            .any(|p| trimmed.eq_ignore_ascii_case(p))
}

/// Whether `folder_name` is the reserved folder, in any casing
pub fn is_unknown_folder(folder_name: &str) -> bool {
    folder_name.eq_ignore_ascii_case(UNKNOWN_NAME)
}

/// Turn a display name into a filesystem-safe folder name
///
/// Reserved characters become `_`, whitespace runs become a single `_`,
/// leading/trailing underscores and dots are trimmed and the result
/// is capped at [`MAX_FOLDER_NAME_LEN`] bytes on a character boundary.
/// Never returns
/// an empty string.
///
/// # Examples
///
/// ```
/// use docsort_domain::sanitize_folder_name;
///
/// assert_eq!(sanitize_folder_name("Bank of America"), "Bank_of_America");
/// assert_eq!(sanitize_folder_name("AC/DC: Live"), "AC_DC__Live");
/// assert_eq!(sanitize_folder_name("   "), "Unknown");
/// ```
pub fn sanitize_folder_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_whitespace = false;

    for c in name.trim().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        out.push(if is_reserved_char(c) { '_' } else { c });
    }

    let cleaned = truncate_to_bytes(&out, MAX_FOLDER_NAME_LEN).trim_matches(|c| c == '_' || c == '.');

    if cleaned.is_empty() {
        UNKNOWN_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

fn truncate_to_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Render a folder name back into a human-readable name
///
/// Underscores become spaces. Casing is left untouched.
pub fn folder_name_to_display(folder_name: &str) -> String {
    folder_name
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_whitespace() {
        assert_eq!(sanitize_folder_name("City of  Kent"), "City_of_Kent");
    }

    #[test]
    fn test_sanitize_reserved_chars() {
        assert_eq!(sanitize_folder_name("A<B>C"), "A_B_C");
        assert_eq!(sanitize_folder_name("Who?*"), "Who");
        assert_eq!(sanitize_folder_name("Acme/Widgets"), "Acme_Widgets");
    }

    #[test]
    fn test_sanitize_never_empty() {
        assert_eq!(sanitize_folder_name(""), UNKNOWN_NAME);
        assert_eq!(sanitize_folder_name("///"), UNKNOWN_NAME);
        assert_eq!(sanitize_folder_name("."), UNKNOWN_NAME);
    }

    #[test]
    fn test_sanitize_trailing_dot() {
        assert_eq!(sanitize_folder_name("Acme Inc."), "Acme_Inc");
    }

    #[test]
    fn test_sanitize_no_hidden_folders() {
        assert_eq!(sanitize_folder_name(".com Holdings"), "com_Holdings");
    }

    #[test]
    fn test_sanitize_length_cap() {
        let long = "x".repeat(500);
        assert_eq!(sanitize_folder_name(&long).len(), MAX_FOLDER_NAME_LEN);
    }

    #[test]
    fn test_sanitize_length_cap_multibyte() {
        let long = "日本".repeat(150);
        let folder = sanitize_folder_name(&long);
        assert!(folder.len() <= MAX_FOLDER_NAME_LEN);
        // 3 bytes per character, cut on a boundary
        assert_eq!(folder.chars().count(), 66);
        assert!(long.starts_with(&folder));

        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(&folder)).unwrap();
    }

    #[test]
    fn test_folder_name_to_display() {
        assert_eq!(folder_name_to_display("Bank_of_America"), "Bank of America");
        assert_eq!(folder_name_to_display("_Acme__Corp_"), "Acme Corp");
    }

    #[test]
    fn test_placeholder_names() {
        assert!(is_placeholder_name(""));
        assert!(is_placeholder_name("  Unknown "));
        assert!(is_placeholder_name("NULL"));
        assert!(is_placeholder_name("n/a"));
        assert!(!is_placeholder_name("Unknown Industries"));
    }

    #[test]
    fn test_unknown_folder_any_case() {
        assert!(is_unknown_folder("Unknown"));
        assert!(is_unknown_folder("unknown"));
        assert!(is_unknown_folder("UNKNOWN"));
        assert!(!is_unknown_folder("Unknown_Industries"));
    }
}
