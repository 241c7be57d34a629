/// Title used when nothing better could be resolved.
pub const UNTITLED: &str = "Untitled";

/// Characters that are not allowed in file or directory names on common filesystems.
pub fn is_forbidden(c: char) -> bool {
    matches!(c, '\\' | '/' | '*' | '?' | ':' | '"' | '<' | '>' | '|')
}

/// Removes every forbidden character; everything else, including non-ASCII, passes through.
///
/// The result may be empty. Callers that need a usable path component should
/// go through [`name_or_untitled`].
pub fn sanitize(input: &str) -> String {
    input.chars().filter(|c| !is_forbidden(*c)).collect()
}

/// Sanitized, trimmed name, or [`UNTITLED`] if nothing usable is left.
///
/// Names made only of dots (`.`, `..`, ...) would resolve to the parent or
/// current directory when joined onto a path, so they count as unusable.
pub fn name_or_untitled(input: &str) -> String {
    let cleaned = sanitize(input);
    let trimmed = cleaned.trim();
    if trimmed.chars().all(|c| c == '.') {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}
