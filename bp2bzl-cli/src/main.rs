use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use bp2bzl_codegen::{BuildFileGenerator, GeneratedTree};
use bp2bzl_ir::{convert_modules, CodegenMode};

#[derive(Parser)]
#[command(name = "bp2bzl", about = "bp2bzl – convert module graphs into Bazel BUILD trees")]
#[command(version, propagate_version = true)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Fully generated BUILD files for converted modules
    Bp2build,
    /// Mirror of every module variant plus rule shims
    Queryview,
}

impl From<Mode> for CodegenMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Bp2build => CodegenMode::Bp2Build,
            Mode::Queryview => CodegenMode::QueryView,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Convert a dumped module tree into BUILD files
    Convert {
        /// Dumped module tree (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Destination tree to produce
        #[arg(short, long, value_enum, default_value = "bp2build")]
        mode: Mode,
        /// Output directory (defaults to <path>/.bp2bzl/<mode>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write toolchain, product-config, and API-level injection files
    Inject {
        /// Dumped module tree (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Output directory (defaults to <path>/.bp2bzl/soong_injection)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Load a module tree and show a conversion summary
    Check {
        /// Dumped module tree (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Convert { path, mode, output } => {
            cmd_convert(&path, mode.into(), output.as_deref())
        }
        Command::Inject { path, output } => cmd_inject(&path, output.as_deref()),
        Command::Check { path } => cmd_check(&path),
    };

    match result {
        Ok(success) => {
            if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::from(1)
        }
    }
}

fn display_path(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

fn cmd_convert(path: &Path, mode: CodegenMode, output: Option<&Path>) -> Result<bool> {
    println!("{} {} ({})", "Converting".bold(), display_path(path), mode);

    let tree = bp2bzl_model::load_tree(path)
        .with_context(|| format!("Failed to load module tree at '{}'", path.display()))?;

    let conversion = convert_modules(&tree.modules, &tree.handcrafted, mode);
    conversion.metrics.log_summary(mode);

    let generator = BuildFileGenerator::new(mode);
    let generated = generator.generate(&tree.rule_shims, &conversion.build_to_targets);

    let output_dir = match output {
        Some(d) => d.to_path_buf(),
        None => path.join(".bp2bzl").join(mode.to_string()),
    };

    generated
        .write_to_disk(&output_dir)
        .with_context(|| format!("Failed to write to '{}'", output_dir.display()))?;

    println!(
        "{} Generated {} file(s) → {}",
        "✓".green().bold(),
        generated.file_count(),
        output_dir.display()
    );
    for file in generated.files() {
        debug!("wrote {}", file.path_string());
    }

    Ok(true)
}

fn cmd_inject(path: &Path, output: Option<&Path>) -> Result<bool> {
    let tree = bp2bzl_model::load_tree(path)
        .with_context(|| format!("Failed to load module tree at '{}'", path.display()))?;

    // The converted-module listing always reflects the bp2build conversion.
    let conversion = convert_modules(&tree.modules, &tree.handcrafted, CodegenMode::Bp2Build);
    let files = bp2bzl_codegen::create_injection_files(&tree.config, &conversion.metrics)
        .context("Failed to build injection files")?;
    let generated = GeneratedTree::from(files);

    let output_dir = match output {
        Some(d) => d.to_path_buf(),
        None => path.join(".bp2bzl/soong_injection"),
    };

    generated
        .write_to_disk(&output_dir)
        .with_context(|| format!("Failed to write to '{}'", output_dir.display()))?;

    println!(
        "{} Wrote {} injection file(s) → {}",
        "✓".green().bold(),
        generated.file_count(),
        output_dir.display()
    );

    Ok(true)
}

fn cmd_check(path: &Path) -> Result<bool> {
    let tree = bp2bzl_model::load_tree(path)
        .with_context(|| format!("Failed to load module tree at '{}'", path.display()))?;

    println!("{}", "Module Tree".bold().underline());
    println!("  Root:         {}", display_path(&tree.root));
    println!("  Modules:      {}", tree.modules.len());
    println!("  Directories:  {}", tree.dirs().len());
    println!("  Handcrafted:  {}", tree.handcrafted.len());
    println!("  Rule shims:   {}", tree.rule_shims.len());
    println!("  API levels:   {}", tree.config.api_levels.len());

    let conversion = convert_modules(&tree.modules, &tree.handcrafted, CodegenMode::Bp2Build);
    let metrics = &conversion.metrics;

    println!();
    println!("{}", "bp2build".bold().underline());
    for (rule_class, count) in &metrics.rule_class_count {
        println!("  {:<24} {}", rule_class, count);
    }
    println!(
        "  {} converted, {} unconverted",
        metrics.generated_target_count(),
        metrics.unconverted_module_count
    );

    println!();
    if metrics.generated_target_count() == 0 && !tree.modules.is_empty() {
        println!("{} No module has a bp2build conversion", "⚠".yellow().bold());
    } else {
        println!("{} Module tree loaded", "✓".green().bold());
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_tree() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .join("fixtures/sample-tree")
    }

    #[test]
    fn convert_bp2build_fixture() {
        let tmp = TempDir::new().unwrap();
        let ok = cmd_convert(&sample_tree(), CodegenMode::Bp2Build, Some(tmp.path())).unwrap();
        assert!(ok);

        assert!(tmp.path().join("bionic/libc/BUILD.bazel").exists());
        assert!(tmp.path().join("external/zlib/BUILD.bazel").exists());
        assert!(!tmp.path().join("WORKSPACE").exists());
    }

    #[test]
    fn convert_queryview_fixture() {
        let tmp = TempDir::new().unwrap();
        let ok = cmd_convert(&sample_tree(), CodegenMode::QueryView, Some(tmp.path())).unwrap();
        assert!(ok);

        assert!(tmp.path().join("WORKSPACE").exists());
        assert!(tmp
            .path()
            .join("build/bazel/queryview_rules/cc.bzl")
            .exists());
    }

    #[test]
    fn inject_fixture() {
        let tmp = TempDir::new().unwrap();
        assert!(cmd_inject(&sample_tree(), Some(tmp.path())).unwrap());

        let listing =
            std::fs::read_to_string(tmp.path().join("metrics/converted_modules.txt")).unwrap();
        assert_eq!(listing, "framework-minus-apex\nframework-srcs\nlibc\nlibz");
        assert!(tmp.path().join("api_levels/api_levels.json").exists());
    }

    #[test]
    fn convert_missing_tree_fails() {
        let tmp = TempDir::new().unwrap();
        let result = cmd_convert(
            &tmp.path().join("missing"),
            CodegenMode::Bp2Build,
            Some(tmp.path()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn mode_maps_to_codegen_mode() {
        assert_eq!(CodegenMode::from(Mode::Bp2build), CodegenMode::Bp2Build);
        assert_eq!(CodegenMode::from(Mode::Queryview), CodegenMode::QueryView);
    }
}
