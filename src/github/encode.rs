// src/github/encode.rs
// Percent-encoding helpers shared by the API paths and the generated links.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

// Same characters JavaScript's encodeURIComponent leaves alone:
// A-Z a-z 0-9 - _ . ! ~ * ' ( )
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Encodes a single component; `/` becomes `%2F`.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Encodes each `/`-separated segment on its own, dropping empty segments.
///
/// `"docs//my file.md"` becomes `"docs/my%20file.md"`.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(encode_component)
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("feature/x"), "feature%2Fx");
        assert_eq!(encode_component("a b#c?"), "a%20b%23c%3F");
        assert_eq!(encode_component("v1.0_rc-(1)~*!'"), "v1.0_rc-(1)~*!'");
        assert_eq!(encode_component("ü"), "%C3%BC");
    }

    #[test]
    fn test_encode_path_per_segment() {
        assert_eq!(encode_path("docs//my file.md"), "docs/my%20file.md");
        assert_eq!(encode_path("/src/lib/"), "src/lib");
        assert_eq!(encode_path(""), "");
    }
}
