// Integration tests for `wgrid dump`.
// Run with: cargo test -p windowgrid-cli --test dump_tests -- --nocapture
//
// Manual smoke test (cannot be automated, requires a real TTY):
//   wgrid peek --rows 50000 --cols 500
//   Verify: header row and row numbers stay pinned, `>` widens the current
//   column, Enter then Esc leaves the cell unchanged, q exits and restores the terminal.

use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

fn wgrid() -> Command {
    Command::new(env!("CARGO_BIN_EXE_wgrid"))
}

/// Settings with 10px per character so widths are easy to reason about.
fn settings_file() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{
    // test settings
    "viewer.pixelsPerChar": 10,
    "data.rows": 5,
    "data.cols": 3
}"#,
    )
    .unwrap();
    (dir, path)
}

fn run(args: &[&str]) -> (bool, String, String) {
    let (_dir, config) = settings_file();
    let output = wgrid()
        .arg("dump")
        .arg("--config")
        .arg(&config)
        .args(args)
        .output()
        .expect("wgrid dump");
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn dump_default_window() {
    let (ok, stdout, stderr) = run(&["--width", "25", "--height", "2"]);
    assert!(ok, "stderr: {}", stderr);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "      Column:0   Column:1");
    assert_eq!(lines[1], "1     r:0:c:0    r:0:c:1");
    assert_eq!(lines[2], "2     r:1:c:0    r:1:c:1");
    assert_eq!(lines[3], "-- 5 rows x 3 cols, revision 1, view revision 1");
}

#[test]
fn dump_applies_edits_and_resizes() {
    let (ok, stdout, stderr) = run(&[
        "--height", "1", "--set", "0,0=X", "--resize", "1:20", "--resize", "2:-10",
    ]);
    assert!(ok, "stderr: {}", stderr);
    assert!(stdout.contains("1     X"), "stdout: {}", stdout);
    assert!(stdout.ends_with("revision 2, view revision 3\n"), "stdout: {}", stdout);
}

#[test]
fn dump_huge_window_is_clamped() {
    let (ok, stdout, stderr) = run(&[
        "--width", "25", "--height", "18446744073709551615", "--col-offset", "18446744073709551615",
    ]);
    assert!(ok, "stderr: {}", stderr);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], "      Column:0");
    assert_eq!(lines[5], "5     r:4:c:0");
}

#[test]
fn dump_non_finite_resize_is_usage_error() {
    let (_dir, config) = settings_file();
    let output = wgrid()
        .args(["dump", "--resize", "1:nan", "--config"])
        .arg(&config)
        .output()
        .expect("wgrid dump");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn dump_out_of_range_edit_fails() {
    let (ok, _stdout, stderr) = run(&["--set", "5,0=nope"]);
    assert!(!ok);
    assert!(stderr.contains("row index 5 out of range (len 5)"), "stderr: {}", stderr);
}

#[test]
fn dump_bad_argument_is_usage_error() {
    let (_dir, config) = settings_file();
    let output = wgrid()
        .args(["dump", "--set", "garbage", "--config"])
        .arg(&config)
        .output()
        .expect("wgrid dump");
    assert_eq!(output.status.code(), Some(2));
}
