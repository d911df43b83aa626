use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::{ConfigSnapshot, CONFIG_FILE_NAME};
use crate::error::LoadError;
use crate::module::Module;
use crate::shim::{RuleShim, ShimBody, RULE_SHIMS_FILE_NAME};

/// Per-directory module dump file name.
pub const MODULE_DUMP_FILE_NAME: &str = "Android.bp.json";

/// Directory holding converter output inside a tree; never walked.
pub const OUTPUT_DIR_NAME: &str = ".bp2bzl";

/// Hand-written BUILD file names, in lookup order.
pub const HANDCRAFTED_BUILD_FILE_NAMES: [&str; 2] = ["BUILD.bazel", "BUILD"];

/// A dumped module tree with everything a conversion run reads.
#[derive(Debug, Clone)]
pub struct LoadedTree {
    /// Tree root directory
    pub root: PathBuf,
    /// Configuration snapshot (defaults when the config file is absent)
    pub config: ConfigSnapshot,
    /// All module variants, in directory-walk order
    pub modules: Vec<Module>,
    /// Directory -> hand-written BUILD file content, for allowlisted directories
    pub handcrafted: BTreeMap<String, String>,
    /// Rule shims from `rule_shims.json`
    pub rule_shims: Vec<RuleShim>,
}

impl LoadedTree {
    /// Distinct module directories.
    pub fn dirs(&self) -> BTreeSet<&str> {
        self.modules.iter().map(|m| m.dir.as_str()).collect()
    }
}

/// Load a dumped module tree rooted at `root`.
pub fn load_tree(root: &Path) -> Result<LoadedTree, LoadError> {
    if !root.is_dir() {
        return Err(LoadError::TreeNotFound(root.to_string_lossy().into_owned()));
    }

    let config_path = root.join(CONFIG_FILE_NAME);
    let config: ConfigSnapshot = if config_path.exists() {
        read_json(&config_path, CONFIG_FILE_NAME)?
    } else {
        debug!("no {} in {}, using defaults", CONFIG_FILE_NAME, root.display());
        ConfigSnapshot::default()
    };

    let mut modules = Vec::new();
    let mut dump_dirs = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.file_name() != OUTPUT_DIR_NAME)
    {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if !entry.file_type().is_file() || entry.file_name() != MODULE_DUMP_FILE_NAME {
            continue;
        }
        let path = entry.path();
        let rel_path = relative_path(root, path);
        let dir = path
            .parent()
            .map(|p| relative_path(root, p))
            .unwrap_or_default();

        let mut dir_modules: Vec<Module> = read_json(path, &rel_path)?;
        debug!("loaded {} modules from {}", dir_modules.len(), rel_path);
        for module in &mut dir_modules {
            module.dir = dir.clone();
        }
        modules.extend(dir_modules);
        dump_dirs.push(dir);
    }

    let mut handcrafted = BTreeMap::new();
    for dir in dump_dirs {
        if !config.keeps_existing_build_file(&dir) {
            continue;
        }
        if let Some(content) = read_handcrafted(root, &dir)? {
            handcrafted.insert(dir, content);
        } else {
            warn!("{} keeps its existing BUILD file but has none", dir);
        }
    }

    let shims_path = root.join(RULE_SHIMS_FILE_NAME);
    let rule_shims = if shims_path.exists() {
        let table: IndexMap<String, ShimBody> = read_json(&shims_path, RULE_SHIMS_FILE_NAME)?;
        let shims: Vec<RuleShim> = table
            .into_iter()
            .map(|(identifier, body)| RuleShim::from_body(identifier, body))
            .collect();
        check_reserved_shims(&shims)?;
        shims
    } else {
        Vec::new()
    };

    Ok(LoadedTree {
        root: root.to_path_buf(),
        config,
        modules,
        handcrafted,
        rule_shims,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, display: &str) -> Result<T, LoadError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| LoadError::Io(path.to_string_lossy().into_owned(), e))?;
    serde_json::from_str(&content).map_err(|source| LoadError::Parse {
        file: display.to_string(),
        source,
    })
}

fn read_handcrafted(root: &Path, dir: &str) -> Result<Option<String>, LoadError> {
    for name in HANDCRAFTED_BUILD_FILE_NAMES {
        let path = root.join(dir).join(name);
        if path.is_file() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| LoadError::Io(path.to_string_lossy().into_owned(), e))?;
            return Ok(Some(content));
        }
    }
    Ok(None)
}

fn check_reserved_shims(shims: &[RuleShim]) -> Result<(), LoadError> {
    match shims.iter().find(|shim| shim.is_reserved()) {
        Some(shim) => Err(LoadError::ReservedShim(shim.identifier.clone())),
        None => Ok(()),
    }
}

fn walk_error(root: &Path, err: walkdir::Error) -> LoadError {
    let path = err
        .path()
        .map(|p| relative_path(root, p))
        .unwrap_or_default();
    LoadError::Walk { path, source: err }
}

/// Forward-slash relative path, so directory keys match across platforms.
fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_missing_tree() {
        let result = load_tree(Path::new("/nonexistent/bp2bzl/tree"));
        assert!(matches!(result, Err(LoadError::TreeNotFound(_))));
    }

    #[test]
    fn test_load_assigns_dirs_in_walk_order() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "b/Android.bp.json",
            r#"[{ "name": "libb", "module_type": "cc_library" }]"#,
        );
        write(
            dir.path(),
            "a/x/Android.bp.json",
            r#"[{ "name": "liba", "module_type": "cc_library" }]"#,
        );
        write(
            dir.path(),
            "Android.bp.json",
            r#"[{ "name": "root", "module_type": "filegroup" }]"#,
        );

        let tree = load_tree(dir.path()).unwrap();
        let dirs: Vec<_> = tree.modules.iter().map(|m| m.dir.as_str()).collect();
        assert_eq!(dirs, vec!["", "a/x", "b"]);
        assert_eq!(tree.config, ConfigSnapshot::default());
        assert!(tree.rule_shims.is_empty());
    }

    #[test]
    fn test_load_handcrafted_only_when_allowlisted() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            CONFIG_FILE_NAME,
            r#"{ "keep_existing_build_file": { "kept": false } }"#,
        );
        write(dir.path(), "kept/Android.bp.json", "[]");
        write(dir.path(), "kept/BUILD", "filegroup(name = \"x\")\n");
        write(dir.path(), "other/Android.bp.json", "[]");
        write(dir.path(), "other/BUILD.bazel", "# ignored\n");

        let tree = load_tree(dir.path()).unwrap();
        assert_eq!(tree.handcrafted.len(), 1);
        assert_eq!(tree.handcrafted["kept"], "filegroup(name = \"x\")\n");
    }

    #[test]
    fn test_load_allowlisted_dir_without_build_file() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            CONFIG_FILE_NAME,
            r#"{ "keep_existing_build_file": { "kept": false } }"#,
        );
        write(dir.path(), "kept/Android.bp.json", "[]");

        let tree = load_tree(dir.path()).unwrap();
        assert!(tree.handcrafted.is_empty());
    }

    #[test]
    fn test_load_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bad/Android.bp.json", "{ not json");

        match load_tree(dir.path()) {
            Err(LoadError::Parse { file, .. }) => assert_eq!(file, "bad/Android.bp.json"),
            other => panic!("Expected Parse error, got: {:?}", other),
        }
    }

    #[test]
    fn test_load_rule_shims_keyed_by_identifier() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            RULE_SHIMS_FILE_NAME,
            r##"{
                "java": { "rules": ["java_library"], "content": "# java" },
                "cc": { "rules": ["cc_library", "cc_test_"], "content": "# cc" }
            }"##,
        );

        let tree = load_tree(dir.path()).unwrap();
        assert_eq!(
            tree.rule_shims,
            vec![
                RuleShim::new("java", vec!["java_library".into()], "# java"),
                RuleShim::new("cc", vec!["cc_library".into(), "cc_test_".into()], "# cc"),
            ]
        );
    }

    #[test]
    fn test_load_rejects_reserved_shim_identifier() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            RULE_SHIMS_FILE_NAME,
            r#"{ "providers": { "rules": [], "content": "" } }"#,
        );

        match load_tree(dir.path()) {
            Err(LoadError::ReservedShim(id)) => assert_eq!(id, "providers"),
            other => panic!("Expected ReservedShim, got: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_load_reports_walk_errors() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "a/Android.bp.json",
            r#"[{ "name": "liba", "module_type": "cc_library" }]"#,
        );
        std::os::unix::fs::symlink(dir.path(), dir.path().join("a/loop")).unwrap();

        match load_tree(dir.path()) {
            Err(LoadError::Walk { path, .. }) => assert_eq!(path, "a/loop"),
            other => panic!("Expected Walk error, got: {:?}", other),
        }
    }
}
