use std::collections::HashMap;

use bp2bzl_ir::BazelTargets;

/// Order a directory -> targets map for rendering: directories sorted by path,
/// targets within each directory sorted by name.
///
/// The input map has no defined iteration order, so everything is collected
/// into a vector and sorted here. Empty collections are kept.
pub fn sorted_build_dirs(build_to_targets: &HashMap<String, BazelTargets>) -> Vec<(&str, BazelTargets)> {
    let mut dirs: Vec<(&str, BazelTargets)> = build_to_targets
        .iter()
        .map(|(dir, targets)| (dir.as_str(), targets.sorted()))
        .collect();
    dirs.sort_by(|a, b| a.0.cmp(b.0));
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp2bzl_ir::BazelTarget;
    use pretty_assertions::assert_eq;

    fn targets(dir: &str, names: &[&str]) -> BazelTargets {
        names
            .iter()
            .map(|n| BazelTarget::generated(*n, "filegroup"))
            .collect()
    }

    #[test]
    fn test_dirs_and_targets_sorted() {
        let mut map = HashMap::new();
        map.insert("b".to_string(), targets("b", &["z", "y"]));
        map.insert("".to_string(), targets("", &["root"]));
        map.insert("a/c".to_string(), targets("a/c", &["m", "a", "k"]));
        map.insert("a".to_string(), targets("a", &[]));

        let sorted = sorted_build_dirs(&map);
        let dirs: Vec<_> = sorted.iter().map(|(d, _)| *d).collect();
        assert_eq!(dirs, vec!["", "a", "a/c", "b"]);

        let names: Vec<_> = sorted[2].1.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "k", "m"]);
        assert!(sorted[1].1.is_empty());
    }
}
