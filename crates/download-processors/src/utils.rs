/// Trims surrounding whitespace, then replaces path separators, characters
/// reserved on common filesystems and control characters with `_`.
pub fn sanitize_path_component(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
