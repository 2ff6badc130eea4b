//! textual paths, split into components
use smallvec::SmallVec;

use super::PATH_SEPARATOR;

pub const PARENT_DIR: &str = "..";
pub const CURRENT_DIR: &str = ".";

pub type Components = SmallVec<[String; 8]>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedPath {
    pub components: Components,
    pub is_absolute: bool,
}

/// split a path on `/`
///
/// A leading `/` makes the path absolute. Empty components are kept, so
/// `"a//b"` gives `["a", "", "b"]` and `""` gives `[""]`.
pub fn parse_path(text: &str) -> ParsedPath {
    let (is_absolute, rest) = match text.strip_prefix(PATH_SEPARATOR) {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    ParsedPath {
        components: rest.split(PATH_SEPARATOR).map(str::to_owned).collect(),
        is_absolute,
    }
}

impl ParsedPath {
    /// split off the last component, the name of the node a path points at
    pub fn split_last(&self) -> Option<(&str, &[String])> {
        self.components
            .split_last()
            .map(|(last, prefix)| (last.as_str(), prefix))
    }
}

/// `.`, `..` and the empty string can't name a node
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name != CURRENT_DIR && name != PARENT_DIR && !name.contains(PATH_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn components(path: &ParsedPath) -> Vec<&str> {
        path.components.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_absolute_and_relative() {
        let absolute = parse_path("/a/b");
        assert!(absolute.is_absolute);
        assert_eq!(components(&absolute), ["a", "b"]);

        let relative = parse_path("a/b");
        assert!(!relative.is_absolute);
        assert_eq!(relative.components, absolute.components);
    }

    #[test]
    fn test_empty_components_are_kept() {
        assert_eq!(components(&parse_path("a//b")), ["a", "", "b"]);
        assert_eq!(components(&parse_path("a/")), ["a", ""]);
        assert_eq!(components(&parse_path("")), [""]);

        let root = parse_path("/");
        assert!(root.is_absolute);
        assert_eq!(components(&root), [""]);
    }

    #[test]
    fn test_split_last() {
        let path = parse_path("/d/e/f.txt");
        let (name, prefix) = path.split_last().unwrap();
        assert_eq!(name, "f.txt");
        assert_eq!(prefix, ["d".to_string(), "e".to_string()]);

        let path = parse_path("x");
        let (name, prefix) = path.split_last().unwrap();
        assert_eq!(name, "x");
        assert!(prefix.is_empty());
    }

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("a.txt"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("."));
        assert!(!is_valid_name(".."));
        assert!(!is_valid_name("a/b"));
    }
}
