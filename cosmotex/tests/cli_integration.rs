//! Integration tests for the cosmotex CLI

use std::fs;
use std::path::Path;
use std::process::Command;

fn collect(cmd: &mut Command) -> (String, String, bool) {
    let output = cmd.output().expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

fn run_cosmotex(args: &[&str]) -> (String, String, bool) {
    collect(Command::new(env!("CARGO_BIN_EXE_cosmotex")).args(args))
}

fn run_cosmotex_in(dir: &Path, args: &[&str]) -> (String, String, bool) {
    collect(
        Command::new(env!("CARGO_BIN_EXE_cosmotex"))
            .args(args)
            .current_dir(dir),
    )
}

#[test]
fn test_cli_help() {
    let (stdout, _, success) = run_cosmotex(&["--help"]);

    assert!(success);
    assert!(stdout.contains("cosmotex"));
    assert!(stdout.contains("write"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("read"));
}

#[test]
fn test_write_help_lists_options() {
    let (stdout, _, success) = run_cosmotex(&["write", "--help"]);

    assert!(success);
    assert!(stdout.contains("--overwrite"));
    assert!(stdout.contains("--output-file"));
    assert!(stdout.contains("--option"));
}

#[test]
fn test_cli_version() {
    let (stdout, _, success) = run_cosmotex(&["--version"]);

    assert!(success);
    assert!(stdout.contains("cosmotex"));
}

#[test]
fn test_write_to_stdout() {
    let (stdout, _, success) = run_cosmotex(&["write", "Planck18", "--caption", "Planck"]);

    assert!(success);
    assert!(stdout.starts_with("\\begin{table}\n"));
    assert!(stdout.contains("\\caption{Planck}"));
    assert!(stdout.contains("$H_0 [\\mathrm{km/s/Mpc}]$"));
    assert!(stdout.contains("Planck18 & 67.66"));
    assert!(stdout.trim_end().ends_with("\\end{table}"));
}

#[test]
fn test_write_multiple_models_as_aastex() {
    let (stdout, _, success) = run_cosmotex(&["write", "WMAP9", "WMAP7", "--format", "aastex"]);

    assert!(success);
    assert!(stdout.contains("\\begin{deluxetable}"));
    assert!(stdout.contains("WMAP9 & 69.32"));
    assert!(stdout.contains("WMAP7 & 70.4"));
}

#[test]
fn test_write_file_refuses_existing_without_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.tex");
    let path_str = path.to_str().unwrap();

    let (_, _, success) = run_cosmotex(&["write", "Planck18", "-o", path_str]);
    assert!(success);
    let first = fs::read_to_string(&path).unwrap();
    assert!(first.contains("Planck18"));

    let (_, stderr, success) = run_cosmotex(&["write", "WMAP9", "-o", path_str]);
    assert!(!success);
    assert!(stderr.contains("already exists"));
    assert_eq!(fs::read_to_string(&path).unwrap(), first);

    let (_, _, success) = run_cosmotex(&["write", "WMAP9", "-o", path_str, "--overwrite"]);
    assert!(success);
    assert!(fs::read_to_string(&path).unwrap().contains("WMAP9"));
}

#[test]
fn test_write_from_parameter_file() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("model.toml");
    fs::write(&model, "name = \"Custom\"\nH0 = 72.0\nOm0 = 0.28\n").unwrap();

    let (stdout, _, success) = run_cosmotex(&["write", model.to_str().unwrap()]);

    assert!(success);
    assert!(stdout.contains("Custom & 72.0 & 0.28"));
}

#[test]
fn test_unknown_option_fails() {
    let (stdout, stderr, success) =
        run_cosmotex(&["write", "Planck18", "--option", "fmt=ascii"]);

    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("unknown writer option 'fmt'"));
}

#[test]
fn test_unknown_realization_fails() {
    let (_, stderr, success) = run_cosmotex(&["write", "Planck99"]);

    assert!(!success);
    assert!(stderr.contains("Planck99"));
}

#[test]
fn test_list_text_and_json() {
    let (stdout, _, success) = run_cosmotex(&["list"]);
    assert!(success);
    for name in ["Planck13", "Planck15", "Planck18", "WMAP5", "WMAP7", "WMAP9"] {
        assert!(stdout.contains(name), "missing {name}");
    }

    let (stdout, _, success) = run_cosmotex(&["list", "--output", "json"]);
    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    let models = parsed.as_array().unwrap();
    assert_eq!(models.len(), 6);
    assert_eq!(models[2]["name"], "Planck18");
    assert_eq!(models[2]["H0"], 67.66);
}

#[test]
fn test_read_round_trip_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.tex");
    let path_str = path.to_str().unwrap();

    let (_, _, success) = run_cosmotex(&["write", "Planck18", "WMAP9", "-o", path_str]);
    assert!(success);

    let (stdout, _, success) = run_cosmotex(&["read", path_str, "--output", "json"]);
    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    let columns = parsed["columns"].as_array().unwrap();
    assert_eq!(columns[0]["name"], "name");
    assert_eq!(columns[0]["values"][1], "WMAP9");
    assert_eq!(columns[1]["name"], "H0");
    assert_eq!(columns[1]["values"][0], 67.66);
}

#[test]
fn test_realization_name_wins_over_same_named_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Planck18"), "not a model").unwrap();

    let (stdout, _, success) = run_cosmotex_in(dir.path(), &["write", "Planck18"]);

    assert!(success);
    assert!(stdout.contains("Planck18 & 67.66"));
}

#[test]
fn test_oversized_precision_is_reported() {
    let (stdout, stderr, success) =
        run_cosmotex(&["write", "Planck18", "--option", "formats=H0:.70000f"]);

    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("invalid value for option 'formats'"));
    assert!(!stderr.contains("panicked"));
}

#[test]
fn test_read_text_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.tex");
    let path_str = path.to_str().unwrap();

    let (_, _, success) = run_cosmotex(&["write", "WMAP9", "-o", path_str]);
    assert!(success);

    let (stdout, _, success) = run_cosmotex(&["read", path_str, "--output", "text"]);
    assert!(success);
    assert!(stdout.contains("name"));
    assert!(stdout.contains("WMAP9"));
    assert!(stdout.contains("69.32"));
}
