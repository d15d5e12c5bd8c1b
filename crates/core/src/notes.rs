//! Note field rules.

/// Maximum length of a note title in characters.
pub const MAX_NOTE_TITLE_LENGTH: usize = 255;

/// Validate a note title: required, non-blank, within the length limit.
pub fn validate_note_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Note title cannot be empty".to_string());
    }
    if title.chars().count() > MAX_NOTE_TITLE_LENGTH {
        return Err(format!(
            "Note title exceeds maximum length of {MAX_NOTE_TITLE_LENGTH} characters"
        ));
    }
    Ok(())
}
