//! Dotted paths.
//!
//! Paths are built by joining property names with `.`. Literal dots inside
//! property names are not escaped, so `{"a.b": 1}` and `{"a": {"b": 1}}`
//! both produce the path `a.b`.

/// Separator between path segments.
pub const PATH_SEPARATOR: &str = ".";

/// Join path segments into a dotted path. The root path is the empty string.
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut joined = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            joined.push_str(PATH_SEPARATOR);
        }
        joined.push_str(segment.as_ref());
    }
    joined
}
