pub(crate) fn strip_invisible(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "").trim().to_string()
}

/// Header names compare case-insensitively with `_`, `-`, and runs of spaces folded.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = strip_invisible(value).replace(['_', '-'], " ");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}
