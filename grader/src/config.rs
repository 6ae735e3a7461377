//! Grader configuration stored in `grader.toml`.
//!
//! Every file name and command the two workflows use lives here. Missing
//! tables and fields fall back to the course layout: `CompareFiles.c`
//! compiled to `comp.out`, cases under `textComparison/`, and a `make`
//! build producing `a.out` that reads `conf.txt`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Top-level configuration (TOML).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GraderConfig {
    pub compare: CompareConfig,
    pub submit: SubmitConfig,
}

/// Batch comparator settings. Relative paths resolve against the base dir.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompareConfig {
    /// C source of the comparator.
    pub source: PathBuf,
    /// Executable the compiler writes.
    pub executable: PathBuf,
    /// Comparison root holding `<group>/<case>/` directories.
    pub root: PathBuf,
    /// Compiler command, invoked as `<compiler..> <source> -o <executable>`.
    pub compiler: Vec<String>,
    /// Extension (without the dot) of the files compared in each case.
    pub extension: String,
    /// Per-comparison timeout in seconds; `0` waits indefinitely.
    pub timeout_secs: u64,
    /// Captured comparator output beyond this many bytes is discarded.
    pub output_limit_bytes: usize,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("CompareFiles.c"),
            executable: PathBuf::from("comp.out"),
            root: PathBuf::from("textComparison"),
            compiler: vec!["cc".to_string()],
            extension: "txt".to_string(),
            timeout_secs: 0,
            output_limit_bytes: 100_000,
        }
    }
}

impl CompareConfig {
    pub fn timeout(&self) -> Option<Duration> {
        timeout_from_secs(self.timeout_secs)
    }
}

/// Submission runner settings.
///
/// `build_dir` resolves against the base dir; `executable`, `config_file`
/// and `artifacts` resolve against `build_dir`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SubmitConfig {
    pub build_dir: PathBuf,
    pub build_command: Vec<String>,
    pub executable: PathBuf,
    /// Passed to the executable as its sole argument.
    pub config_file: PathBuf,
    /// Removed in order after a successful run.
    pub artifacts: Vec<PathBuf>,
    /// Timeout in seconds for the build and for the run; `0` waits indefinitely.
    pub timeout_secs: u64,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            build_dir: PathBuf::from("."),
            build_command: vec!["make".to_string()],
            executable: PathBuf::from("a.out"),
            config_file: PathBuf::from("conf.txt"),
            artifacts: vec![PathBuf::from("a.out"), PathBuf::from("comp.out")],
            timeout_secs: 0,
        }
    }
}

impl SubmitConfig {
    pub fn timeout(&self) -> Option<Duration> {
        timeout_from_secs(self.timeout_secs)
    }
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

impl GraderConfig {
    pub fn validate(&self) -> Result<()> {
        let compare = &self.compare;
        validate_command("compare.compiler", &compare.compiler)?;
        validate_file_name("compare.source", &compare.source)?;
        validate_file_name("compare.executable", &compare.executable)?;
        validate_file_name("compare.root", &compare.root)?;
        if compare.extension.trim().is_empty() {
            bail!("compare.extension must be non-empty");
        }
        if compare.extension.starts_with('.') {
            bail!("compare.extension must not start with '.'");
        }
        if compare.output_limit_bytes == 0 {
            bail!("compare.output_limit_bytes must be > 0");
        }

        let submit = &self.submit;
        validate_command("submit.build_command", &submit.build_command)?;
        validate_file_name("submit.build_dir", &submit.build_dir)?;
        validate_file_name("submit.executable", &submit.executable)?;
        validate_file_name("submit.config_file", &submit.config_file)?;
        if submit.artifacts.is_empty() {
            bail!("submit.artifacts must be a non-empty array");
        }
        for (index, artifact) in submit.artifacts.iter().enumerate() {
            validate_file_name(&format!("submit.artifacts[{index}]"), artifact)?;
        }
        Ok(())
    }
}

fn validate_command(label: &str, command: &[String]) -> Result<()> {
    if command.is_empty() || command[0].trim().is_empty() {
        bail!("{label} must be a non-empty array");
    }
    Ok(())
}

fn validate_file_name(label: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        bail!("{label} must be non-empty");
    }
    Ok(())
}

/// Command-line overrides for `[compare]`.
#[derive(Debug, Clone, Default)]
pub struct CompareOverrides {
    pub source: Option<PathBuf>,
    pub executable: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub compiler: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
}

/// Command-line overrides for `[submit]`.
#[derive(Debug, Clone, Default)]
pub struct SubmitOverrides {
    pub build_dir: Option<PathBuf>,
    pub build_command: Option<Vec<String>>,
    pub config_file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

/// Apply compare overrides to a loaded config and revalidate.
pub fn apply_compare_overrides(
    mut base: GraderConfig,
    overrides: &CompareOverrides,
) -> Result<GraderConfig> {
    if let Some(source) = &overrides.source {
        base.compare.source = source.clone();
    }
    if let Some(executable) = &overrides.executable {
        base.compare.executable = executable.clone();
    }
    if let Some(root) = &overrides.root {
        base.compare.root = root.clone();
    }
    if let Some(compiler) = &overrides.compiler {
        base.compare.compiler = compiler.clone();
    }
    if let Some(timeout_secs) = overrides.timeout_secs {
        base.compare.timeout_secs = timeout_secs;
    }
    base.validate()?;
    Ok(base)
}

/// Apply submit overrides to a loaded config and revalidate.
pub fn apply_submit_overrides(
    mut base: GraderConfig,
    overrides: &SubmitOverrides,
) -> Result<GraderConfig> {
    if let Some(build_dir) = &overrides.build_dir {
        base.submit.build_dir = build_dir.clone();
    }
    if let Some(build_command) = &overrides.build_command {
        base.submit.build_command = build_command.clone();
    }
    if let Some(config_file) = &overrides.config_file {
        base.submit.config_file = config_file.clone();
    }
    if let Some(timeout_secs) = overrides.timeout_secs {
        base.submit.timeout_secs = timeout_secs;
    }
    base.validate()?;
    Ok(base)
}

/// Default config file name, looked up in the base directory.
pub const DEFAULT_CONFIG_FILE: &str = "grader.toml";

/// Load a config file the user named explicitly; it must exist.
pub fn load_required_config(path: &Path) -> Result<GraderConfig> {
    if !path.is_file() {
        bail!("config file {} not found", path.display());
    }
    load_config(path)
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `GraderConfig::default()`.
pub fn load_config(path: &Path) -> Result<GraderConfig> {
    if !path.exists() {
        let cfg = GraderConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: GraderConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}
