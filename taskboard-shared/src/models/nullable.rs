/// Nullable text handling
///
/// Optional text columns are a tri-state: absent (`None`, SQL NULL),
/// present-but-empty (`Some("")`), or present with content. Storage keeps the
/// distinction; the wire does not, every variant renders as a plain string.
///
/// Values that went through an array-typed cast upstream can arrive wrapped in
/// braces (`{urgent}`), so normalization trims leading and trailing `{` / `}`.

const BRACES: [char; 2] = ['{', '}'];

/// Renders an optional text value for the wire
///
/// # Example
///
/// ```
/// use taskboard_shared::models::nullable::normalize;
///
/// assert_eq!(normalize(None), "");
/// assert_eq!(normalize(Some("{urgent}")), "urgent");
/// assert_eq!(normalize(Some("plain")), "plain");
/// ```
pub fn normalize(value: Option<&str>) -> String {
    match value {
        Some(text) => text.trim_matches(BRACES.as_slice()).to_string(),
        None => String::new(),
    }
}

/// Extension trait so storage structs can write `task.descr.normalized()`
pub trait NullableText {
    /// Wire rendering of the value, see [`normalize`]
    fn normalized(&self) -> String;
}

impl NullableText for Option<String> {
    fn normalized(&self) -> String {
        normalize(self.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_is_empty_string() {
        let value: Option<String> = None;
        assert_eq!(value.normalized(), "");
    }

    #[test]
    fn test_present_empty_is_empty_string() {
        assert_eq!(Some(String::new()).normalized(), "");
    }

    #[test]
    fn test_braces_are_trimmed() {
        assert_eq!(normalize(Some("{urgent}")), "urgent");
        assert_eq!(normalize(Some("{{nested}}")), "nested");
        assert_eq!(normalize(Some("{left")), "left");
        assert_eq!(normalize(Some("right}")), "right");
    }

    #[test]
    fn test_inner_braces_are_kept() {
        assert_eq!(normalize(Some("a{b}c")), "a{b}c");
        assert_eq!(normalize(Some("{a,b}")), "a,b");
    }

    #[test]
    fn test_only_braces_collapse_to_empty() {
        assert_eq!(normalize(Some("{}")), "");
    }
}
