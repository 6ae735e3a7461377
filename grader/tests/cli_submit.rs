//! CLI tests for `grader submit`.
//!
//! Each stage leaves a marker file so the tests can tell which stages ran.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use grader::exit_codes;

const SCRIPT_BUILD: &str = r#"[submit]
build_command = ["sh", "build.sh"]
"#;

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, contents).expect("write");
}

/// `build.sh` that produces an `a.out` exiting with `run_code`.
fn build_script(run_code: i32) -> String {
    format!(
        "echo built > built.log\n\
         printf '#!/bin/sh\\ntest -f \"$1\" || exit 9\\necho ran > ran.log\\nexit {run_code}\\n' > a.out\n\
         chmod +x a.out\n\
         touch comp.out\n"
    )
}

fn grader(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_grader"))
        .arg("submit")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("grader submit")
}

#[test]
fn successful_run_cleans_up() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path();
    write(&dir.join("grader.toml"), SCRIPT_BUILD);
    write(&dir.join("build.sh"), &build_script(0));
    write(&dir.join("conf.txt"), "students\ninput.txt\nexpected.txt\n");

    let output = grader(dir, &[]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Program completed successfully."));
    assert!(dir.join("ran.log").exists());
    assert!(!dir.join("a.out").exists());
    assert!(!dir.join("comp.out").exists());
}

#[test]
fn build_failure_skips_later_stages() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path();
    write(&dir.join("grader.toml"), SCRIPT_BUILD);
    write(&dir.join("build.sh"), "exit 2\n");
    write(&dir.join("conf.txt"), "x\n");
    write(&dir.join("comp.out"), "stale\n");

    let output = grader(dir, &[]);
    assert_eq!(output.status.code(), Some(exit_codes::BUILD_FAILED));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Error while running 'sh build.sh'"));
    assert!(!dir.join("ran.log").exists());
    assert!(dir.join("comp.out").exists());
}

#[test]
fn run_failure_skips_cleanup() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path();
    write(&dir.join("grader.toml"), SCRIPT_BUILD);
    write(&dir.join("build.sh"), &build_script(1));
    write(&dir.join("conf.txt"), "x\n");

    let output = grader(dir, &["--results", "submit.json"]);
    assert_eq!(output.status.code(), Some(exit_codes::RUN_FAILED));
    assert!(dir.join("built.log").exists());
    assert!(dir.join("ran.log").exists());
    assert!(dir.join("a.out").exists());
    assert!(dir.join("comp.out").exists());

    let contents = fs::read_to_string(dir.join("submit.json")).expect("results file");
    let value: serde_json::Value = serde_json::from_str(&contents).expect("json");
    assert_eq!(value["detail"]["failed_stage"], "run");
    assert_eq!(value["detail"]["completed"][0], "build");
}

#[test]
fn separate_build_dir_and_config_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path();
    let student = dir.join("student");
    write(&dir.join("grader.toml"), SCRIPT_BUILD);
    write(&student.join("build.sh"), &build_script(0));
    write(&student.join("settings.txt"), "x\n");

    let output = grader(
        dir,
        &["--build-dir", "student", "--config-file", "settings.txt"],
    );
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(student.join("ran.log").exists());
    assert!(!student.join("a.out").exists());
}

#[test]
fn makefile_end_to_end() {
    let make_available = Command::new("make")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false);
    if !make_available {
        eprintln!("skipping: make not installed");
        return;
    }

    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path();
    write(&dir.join("main.sh"), "#!/bin/sh\ntest -f \"$1\"\n");
    write(
        &dir.join("Makefile"),
        "a.out: main.sh\n\tcp main.sh a.out && chmod +x a.out && touch comp.out\n",
    );
    write(&dir.join("conf.txt"), "x\n");

    let output = grader(dir, &[]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Program completed successfully."));
    assert!(!dir.join("a.out").exists());
    assert!(!dir.join("comp.out").exists());
}

#[test]
fn missing_explicit_config_is_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path();
    write(&dir.join("build.sh"), &build_script(0));
    write(&dir.join("conf.txt"), "x\n");

    let output = grader(dir, &["--config", "tpyo.toml"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config file"));
    assert!(stderr.contains("tpyo.toml"));
    assert!(!dir.join("built.log").exists());
}

#[test]
fn missing_config_file_reported_on_stderr() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path();
    write(&dir.join("grader.toml"), SCRIPT_BUILD);
    write(&dir.join("build.sh"), &build_script(0));

    let output = grader(dir, &[]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("configuration file"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("configuration file"));
    assert!(dir.join("built.log").exists());
    assert!(!dir.join("ran.log").exists());
    assert!(dir.join("a.out").exists());
}

#[test]
fn cleanup_failure_names_io_cause() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path();
    write(&dir.join("grader.toml"), SCRIPT_BUILD);
    write(
        &dir.join("build.sh"),
        "printf '#!/bin/sh\\nexit 0\\n' > a.out\nchmod +x a.out\n",
    );
    write(&dir.join("conf.txt"), "x\n");

    let output = grader(dir, &["--results", "submit.json"]);
    assert_eq!(output.status.code(), Some(exit_codes::CLEANUP_FAILED));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout
        .lines()
        .find(|line| line.starts_with("Error while deleting"))
        .expect("cleanup error line");
    assert!(line.contains("comp.out': "), "no cause in {line:?}");

    let contents = fs::read_to_string(dir.join("submit.json")).expect("results file");
    let value: serde_json::Value = serde_json::from_str(&contents).expect("json");
    assert_eq!(value["error"], line);
}
