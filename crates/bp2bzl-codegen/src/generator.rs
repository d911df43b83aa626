use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use bp2bzl_ir::{BazelTargets, CodegenMode};
use bp2bzl_model::RuleShim;

use crate::aggregate::sorted_build_dirs;
use crate::dialects;
use crate::error::CodegenError;
use crate::starlark::render_targets;
use crate::traits::TreeDialect;

/// Basename of every generated BUILD file.
pub const GENERATED_BUILD_FILE_NAME: &str = "BUILD.bazel";

/// Top-level workspace marker.
pub const WORKSPACE_FILE_NAME: &str = "WORKSPACE";

/// One output artifact, written verbatim to `dir/basename`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BazelFile {
    /// Directory relative to the output root; empty for the root itself
    pub dir: String,
    pub basename: String,
    pub contents: String,
}

impl BazelFile {
    pub fn new(
        dir: impl Into<String>,
        basename: impl Into<String>,
        contents: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            basename: basename.into(),
            contents: contents.into(),
        }
    }

    /// `dir/basename`, or just `basename` at the root.
    pub fn path_string(&self) -> String {
        if self.dir.is_empty() {
            self.basename.clone()
        } else {
            format!("{}/{}", self.dir, self.basename)
        }
    }

    /// Full path under `root`.
    pub fn path_under(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        if !self.dir.is_empty() {
            path.push(&self.dir);
        }
        path.push(&self.basename);
        path
    }
}

/// Put the preamble ahead of the rendered targets, separated by one blank
/// line. An empty preamble adds nothing.
pub fn join_preamble(preamble: &str, body: &str) -> String {
    if preamble.is_empty() {
        body.to_string()
    } else {
        format!("{}\n\n{}", preamble, body)
    }
}

/// The ordered output files of one run.
#[derive(Debug, Clone, Default)]
pub struct GeneratedTree {
    files: Vec<BazelFile>,
}

impl GeneratedTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, file: BazelFile) {
        self.files.push(file);
    }

    pub fn extend(&mut self, files: impl IntoIterator<Item = BazelFile>) {
        self.files.extend(files);
    }

    /// All files, in assembly order.
    pub fn files(&self) -> &[BazelFile] {
        &self.files
    }

    pub fn into_files(self) -> Vec<BazelFile> {
        self.files
    }

    /// Number of generated files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Find a file by directory and basename.
    pub fn get(&self, dir: &str, basename: &str) -> Option<&BazelFile> {
        self.files
            .iter()
            .find(|f| f.dir == dir && f.basename == basename)
    }

    /// Fail on the first `(dir, basename)` pair seen twice.
    pub fn check_unique(&self) -> Result<(), CodegenError> {
        let mut seen = HashSet::new();
        for file in &self.files {
            if !seen.insert((file.dir.as_str(), file.basename.as_str())) {
                return Err(CodegenError::DuplicateOutput(file.path_string()));
            }
        }
        Ok(())
    }

    /// Write all files under `output_dir`. Nothing is written when two files
    /// share a path.
    pub fn write_to_disk(&self, output_dir: &Path) -> Result<(), CodegenError> {
        self.check_unique()?;
        for file in &self.files {
            let full_path = file.path_under(output_dir);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, &file.contents)?;
        }
        debug!("wrote {} files to {}", self.files.len(), output_dir.display());
        Ok(())
    }
}

impl From<Vec<BazelFile>> for GeneratedTree {
    fn from(files: Vec<BazelFile>) -> Self {
        Self { files }
    }
}

/// Assembles BUILD files and scaffolding for one conversion mode.
pub struct BuildFileGenerator {
    dialect: Box<dyn TreeDialect>,
}

impl std::fmt::Debug for BuildFileGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildFileGenerator")
            .field("mode", &self.dialect.mode())
            .finish()
    }
}

impl BuildFileGenerator {
    pub fn new(mode: CodegenMode) -> Self {
        Self {
            dialect: dialects::create_dialect(mode),
        }
    }

    pub fn mode(&self) -> CodegenMode {
        self.dialect.mode()
    }

    /// Scaffolding first, then one BUILD file per directory in path order.
    ///
    /// An empty package marker in the scaffolding gives way to the generated
    /// BUILD file of the same directory.
    pub fn generate(
        &self,
        rule_shims: &[RuleShim],
        build_to_targets: &HashMap<String, BazelTargets>,
    ) -> GeneratedTree {
        let mut tree = GeneratedTree::new();
        for file in self.dialect.scaffolding(rule_shims) {
            let is_marker = file.basename == GENERATED_BUILD_FILE_NAME && file.contents.is_empty();
            if is_marker && build_to_targets.contains_key(&file.dir) {
                debug!("'{}' already has a generated BUILD file", file.dir);
                continue;
            }
            tree.add_file(file);
        }
        tree.extend(self.build_files(build_to_targets));
        info!(
            mode = %self.mode(),
            dirs = build_to_targets.len(),
            files = tree.file_count(),
            "assembled output tree"
        );
        tree
    }

    /// One BUILD file per directory, directories and targets sorted.
    pub fn build_files(&self, build_to_targets: &HashMap<String, BazelTargets>) -> Vec<BazelFile> {
        sorted_build_dirs(build_to_targets)
            .into_iter()
            .map(|(dir, targets)| {
                let preamble = self.dialect.preamble(&targets);
                let contents = join_preamble(&preamble, &render_targets(&targets));
                BazelFile::new(dir, GENERATED_BUILD_FILE_NAME, contents)
            })
            .collect()
    }

    /// Access the dialect.
    pub fn dialect(&self) -> &dyn TreeDialect {
        self.dialect.as_ref()
    }
}

/// Produce every output file of a conversion run.
pub fn create_bazel_files(
    rule_shims: &[RuleShim],
    build_to_targets: &HashMap<String, BazelTargets>,
    mode: CodegenMode,
) -> Vec<BazelFile> {
    BuildFileGenerator::new(mode)
        .generate(rule_shims, build_to_targets)
        .into_files()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp2bzl_ir::BazelTarget;
    use pretty_assertions::assert_eq;

    use crate::dialects::bp2build::GENERATED_FILE_HEADER;
    use crate::dialects::queryview::NUM_ADDITIONAL_FILES;

    fn single_dir(dir: &str, targets: BazelTargets) -> HashMap<String, BazelTargets> {
        let mut map = HashMap::new();
        map.insert(dir.to_string(), targets);
        map
    }

    #[test]
    fn test_join_preamble() {
        assert_eq!(join_preamble("# head", "body()"), "# head\n\nbody()");
        assert_eq!(join_preamble("", "body()"), "body()");
    }

    #[test]
    fn test_bp2build_build_file_contents() {
        let targets: BazelTargets = ["b", "a"]
            .into_iter()
            .map(|n| BazelTarget::generated(n, "filegroup"))
            .collect();
        let files = create_bazel_files(&[], &single_dir("pkg", targets), CodegenMode::Bp2Build);

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path_string(), "pkg/BUILD.bazel");
        assert_eq!(
            files[0].contents,
            format!(
                "{}\npackage(default_visibility = [\"//visibility:public\"])\n\n\
                 filegroup(\n    name = \"a\",\n)\n\nfilegroup(\n    name = \"b\",\n)",
                GENERATED_FILE_HEADER
            )
        );
    }

    #[test]
    fn test_queryview_adds_scaffolding_first() {
        let targets: BazelTargets = vec![BazelTarget::generated("a", "soong_module")]
            .into_iter()
            .collect();
        let shims = vec![RuleShim::new("cc", vec!["cc_library".into()], "")];
        let files = create_bazel_files(&shims, &single_dir("pkg", targets), CodegenMode::QueryView);

        assert_eq!(files.len(), NUM_ADDITIONAL_FILES + shims.len() + 1);
        assert_eq!(files[0].basename, WORKSPACE_FILE_NAME);
        assert_eq!(files.last().unwrap().path_string(), "pkg/BUILD.bazel");
    }

    #[test]
    fn test_root_targets_replace_package_marker() {
        let targets: BazelTargets = vec![BazelTarget::generated("top", "soong_module")]
            .into_iter()
            .collect();
        let tree = BuildFileGenerator::new(CodegenMode::QueryView)
            .generate(&[], &single_dir("", targets));

        assert!(tree.check_unique().is_ok());
        let root = tree.get("", GENERATED_BUILD_FILE_NAME).unwrap();
        assert!(root.contents.contains("name = \"top\""));
        assert_eq!(tree.file_count(), NUM_ADDITIONAL_FILES);
    }

    #[test]
    fn test_empty_collection_still_emitted() {
        let files =
            create_bazel_files(&[], &single_dir("empty", BazelTargets::new()), CodegenMode::Bp2Build);
        assert_eq!(files.len(), 1);
        assert!(files[0].contents.ends_with("\n\n"));
    }

    #[test]
    fn test_write_to_disk() {
        let mut tree = GeneratedTree::new();
        tree.add_file(BazelFile::new("", WORKSPACE_FILE_NAME, ""));
        tree.add_file(BazelFile::new("a/b", GENERATED_BUILD_FILE_NAME, "filegroup(name = \"x\")"));

        let dir = tempfile::tempdir().unwrap();
        tree.write_to_disk(dir.path()).unwrap();

        assert!(dir.path().join("WORKSPACE").exists());
        let content = std::fs::read_to_string(dir.path().join("a/b/BUILD.bazel")).unwrap();
        assert_eq!(content, "filegroup(name = \"x\")");
    }

    #[test]
    fn test_duplicate_output_rejected_before_writing() {
        let tree: GeneratedTree = vec![
            BazelFile::new("a", "x.bzl", "1"),
            BazelFile::new("a", "x.bzl", "2"),
        ]
        .into();

        let dir = tempfile::tempdir().unwrap();
        match tree.write_to_disk(dir.path()) {
            Err(CodegenError::DuplicateOutput(path)) => assert_eq!(path, "a/x.bzl"),
            other => panic!("Expected DuplicateOutput, got: {:?}", other),
        }
        assert!(!dir.path().join("a").exists());
    }

    #[test]
    fn test_get_by_dir_and_basename() {
        let tree: GeneratedTree = vec![BazelFile::new("", GENERATED_BUILD_FILE_NAME, "")].into();
        assert!(tree.get("", GENERATED_BUILD_FILE_NAME).is_some());
        assert!(tree.get("a", GENERATED_BUILD_FILE_NAME).is_none());
    }
}
