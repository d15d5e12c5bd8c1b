//! Tag naming rules.
//!
//! Tag names are case-sensitive natural keys: `"Work"` and `"work"` are two
//! different tags. Names are stored exactly as given, never trimmed or
//! case-folded.

/// Maximum length of a tag name in characters.
pub const MAX_TAG_NAME_LENGTH: usize = 100;

/// Validate a tag name: must contain a non-whitespace character and stay
/// within [`MAX_TAG_NAME_LENGTH`].
pub fn validate_tag_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Tag name cannot be empty".to_string());
    }
    if name.chars().count() > MAX_TAG_NAME_LENGTH {
        return Err(format!(
            "Tag name exceeds maximum length of {MAX_TAG_NAME_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Collapse repeated names so a note never carries the same tag twice.
///
/// The first occurrence wins and input order is otherwise preserved.
pub fn dedup_tag_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}
