use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use grader::config::{
    CompareOverrides, DEFAULT_CONFIG_FILE, SubmitOverrides, apply_compare_overrides,
    apply_submit_overrides, load_config, load_required_config,
};
use grader::paths::{base_dir, resolve};
use grader::{cli, exit_codes, logging};

#[derive(Parser)]
#[command(
    name = "grader",
    version,
    about = "Compile and run C assignments against text comparison cases"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// Base directory for every relative path (default: current directory).
    #[arg(long, global = true)]
    dir: Option<PathBuf>,
    /// Configuration file, relative to the base directory; must exist when given.
    /// Without it, `grader.toml` is used if present, built-in defaults otherwise.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Write a JSON record of the run to this path.
    #[arg(long, global = true)]
    results: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Compile the comparator and run it on every `<root>/<group>/<case>/`.
    Compare {
        /// Comparison root holding `<group>/<case>/` directories.
        #[arg(long)]
        root: Option<PathBuf>,
        /// C source of the comparator.
        #[arg(long)]
        source: Option<PathBuf>,
        /// Executable the compiler writes.
        #[arg(long)]
        executable: Option<PathBuf>,
        /// Compiler command; repeat for extra arguments (`--compiler gcc --compiler -O2`).
        #[arg(long, allow_hyphen_values = true)]
        compiler: Vec<String>,
        /// Per-comparison timeout in seconds; `0` waits indefinitely.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Build the submission, run it with its configuration file, remove artifacts.
    Submit {
        /// Directory the build runs in.
        #[arg(long)]
        build_dir: Option<PathBuf>,
        /// Build command; repeat for extra arguments.
        #[arg(long, allow_hyphen_values = true)]
        build_command: Vec<String>,
        /// File passed to the built executable, relative to the build directory.
        #[arg(long)]
        config_file: Option<PathBuf>,
        /// Timeout in seconds for the build and for the run; `0` waits indefinitely.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

fn main() {
    logging::init();
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let args = Cli::parse();
    let base = base_dir(args.global.dir.as_deref())?;
    let loaded = match &args.global.config {
        Some(path) => load_required_config(&resolve(&base, path))?,
        None => load_config(&base.join(DEFAULT_CONFIG_FILE))?,
    };
    let results = args.global.results.map(|path| resolve(&base, &path));

    match args.command {
        Command::Compare {
            root,
            source,
            executable,
            compiler,
            timeout_secs,
        } => {
            let overrides = CompareOverrides {
                source,
                executable,
                root,
                compiler: non_empty(compiler),
                timeout_secs,
            };
            let cfg = apply_compare_overrides(loaded, &overrides)?;
            cli::compare(&cfg, &base, results.as_deref())
        }
        Command::Submit {
            build_dir,
            build_command,
            config_file,
            timeout_secs,
        } => {
            let overrides = SubmitOverrides {
                build_dir,
                build_command: non_empty(build_command),
                config_file,
                timeout_secs,
            };
            let cfg = apply_submit_overrides(loaded, &overrides)?;
            cli::submit(&cfg, &base, results.as_deref())
        }
    }
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    (!values.is_empty()).then_some(values)
}
