//! Suggestion filtering for the dashboard editor's text fields.

/// All candidates containing `value` as a substring, original order preserved.
/// An empty `value` matches every candidate, so clearing a field shows the full
/// list.
pub fn filter_suggestions(value: &str, candidates: &[String]) -> Vec<String> {
    candidates
        .iter()
        .filter(|c| c.contains(value))
        .cloned()
        .collect()
}

/// Tag suggestions for the criteria field. Only active inside a tag token: when
/// `value` has no `#` there is nothing to complete. The last `#`-segment is the
/// lookup fragment; everything before it is kept verbatim, so a suggestion
/// replaces only the fragment the user is typing.
pub fn tag_suggestions(value: &str, all_tags: &[String]) -> Vec<String> {
    let Some(pos) = value.rfind('#') else {
        return Vec::new();
    };
    let (prefix, lookup) = (&value[..pos], &value[pos + 1..]);
    all_tags
        .iter()
        .filter(|t| t.contains(lookup))
        .map(|t| format!("{}#{}", prefix, t))
        .collect()
}

/// The chosen suggestion becomes the field's new full value.
pub fn suggestion_value(suggestion: &str) -> String {
    suggestion.to_string()
}
