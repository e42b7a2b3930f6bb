// End-to-end tests for the potmap binary.
// Run with: cargo test -p potmap-cli --test cli_tests -- --nocapture

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// potmap with settings pinned to a file that does not exist, so the
/// user's own settings never leak into a test.
fn potmap() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_potmap"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.env("POTMAP_SETTINGS", fixtures_dir().join("no-such-settings.json"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run(args: &[&str]) -> Output {
    potmap().args(args).output().expect("run potmap")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn fixture(name: &str) -> String {
    fixtures_dir().join(name).to_string_lossy().into_owned()
}

// ===========================================================================
// analyze
// ===========================================================================

#[test]
fn analyze_human_summary() {
    let out = run(&["analyze", &fixture("deck.csv")]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("15 x 3 (45 points)"), "{text}");
    assert!(text.contains("Uncertain:    22"), "{text}");
    assert!(text.contains("Recommendations:"));
}

#[test]
fn analyze_json_is_single_value() {
    let out = run(&["analyze", &fixture("deck.csv"), "--json"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let val: serde_json::Value = serde_json::from_str(stdout(&out).trim()).unwrap();

    assert_eq!(val["grid"]["rows"], 15);
    assert_eq!(val["grid"]["cols"], 3);
    assert!(val["grid"]["fingerprint"].as_str().unwrap().starts_with("sha256:"));
    assert_eq!(val["statistics"]["total"], 45);
    assert_eq!(val["statistics"]["uncertain"]["count"], 22);
    assert_eq!(val["gradients"].as_array().unwrap().len(), 28);
    assert!(val["recommendations"][0]["type"].is_string());
}

#[test]
fn analyze_threshold_and_electrode_flags() {
    let out = run(&[
        "analyze",
        &fixture("deck.csv"),
        "--electrode",
        "sce",
        "--severe",
        "-230",
        "--low",
        "-190",
        "--json",
    ]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let val: serde_json::Value = serde_json::from_str(stdout(&out).trim()).unwrap();
    assert_eq!(val["parameters"]["electrode"], "SCE");
    assert_eq!(val["parameters"]["severe_threshold_mv"], -230.0);
    // -0.24 and -0.25 fall below -230 mV
    assert_eq!(val["statistics"]["severe"]["count"], 2);
}

#[test]
fn analyze_rejects_inverted_thresholds() {
    let out = run(&["analyze", &fixture("deck.csv"), "--severe=-100", "--low=-200"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("error:"));
}

#[test]
fn analyze_severe_requires_low() {
    let out = run(&["analyze", &fixture("deck.csv"), "--severe=-300"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn analyze_single_row_has_no_gradients() {
    let out = run(&["analyze", &fixture("single_row.csv"), "--json"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let val: serde_json::Value = serde_json::from_str(stdout(&out).trim()).unwrap();
    assert_eq!(val["degenerate_axis"], true);
    assert!(val["gradients"].as_array().unwrap().is_empty());

    let human = run(&["analyze", &fixture("single_row.csv")]);
    assert!(stdout(&human).contains("Gradients:  none"));
}

#[test]
fn verbose_logs_settings_and_parameters() {
    let out = run(&["-v", "analyze", &fixture("deck.csv"), "--electrode", "SCE", "--json"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let err = stderr(&out);
    assert!(err.contains("no-such-settings.json: electrode CSE, cover 30 mm"), "{err}");
    assert!(err.contains("parameters: electrode SCE, thresholds -260 / -110 mV"), "{err}");
    // stdout stays a single JSON value
    serde_json::from_str::<serde_json::Value>(stdout(&out).trim()).unwrap();

    let quiet = run(&["analyze", &fixture("deck.csv"), "--json"]);
    assert!(!stderr(&quiet).contains("parameters:"));
}

#[test]
fn analyze_missing_file_exit_code() {
    let out = run(&["analyze", "does-not-exist.csv"]);
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn analyze_malformed_csv_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, "# header only\nY/X;0;1\n").unwrap();
    let out = run(&["analyze", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(4));
    assert!(stderr(&out).contains("hint:"));
}

// ===========================================================================
// report / validate
// ===========================================================================

#[test]
fn report_markdown_to_stdout() {
    let out = run(&["report", &fixture("survey.toml")]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let md = stdout(&out);
    assert!(md.starts_with("# Half-Cell Potential Mapping Report"));
    assert!(md.contains("- Location: Parking deck, level 2"));
    assert!(md.contains("Surface dry, ambient 21 C."));
    assert!(md.contains("| p1 | north-face.jpg | Spalling near column C4 |"));
    assert!(md.contains("- ART: ART-2026-0042"));
    assert!(md.contains("_... and 12 more not shown_"));
}

#[test]
fn report_json_file_inferred_from_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    let out = run(&["report", &fixture("survey.toml"), "-o", path.to_str().unwrap()]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("wrote "));

    let val: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(val["meta"]["electrode"], "CSE");
    assert_eq!(val["sections"].as_array().unwrap().len(), 13);
    assert_eq!(val["charts"].as_array().unwrap().len(), 5);
}

#[test]
fn report_unknown_extension_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    let out = run(&["report", &fixture("survey.toml"), "-o", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(2));
    assert!(!path.exists());
}

#[test]
fn validate_ok() {
    let out = run(&["validate", &fixture("survey.toml")]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).starts_with("ok: 15 x 3 grid, electrode CSE"));
}

#[test]
fn validate_bad_survey_exit_codes() {
    let dir = tempfile::tempdir().unwrap();

    let parse = dir.path().join("parse.toml");
    std::fs::write(&parse, "grid = \n").unwrap();
    assert_eq!(run(&["validate", parse.to_str().unwrap()]).status.code(), Some(10));

    let invalid = dir.path().join("invalid.toml");
    std::fs::write(&invalid, "grid = \"x.csv\"\nelectrode = \"H2\"\n").unwrap();
    let out = run(&["validate", invalid.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(11));
    assert!(stderr(&out).contains("potmap electrodes"));

    let missing = dir.path().join("missing.toml");
    assert_eq!(run(&["validate", missing.to_str().unwrap()]).status.code(), Some(12));
}

#[test]
fn settings_file_changes_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("settings.json");
    std::fs::write(&settings, r#"{ "electrode": "SCE" }"#).unwrap();

    let out = potmap()
        .env("POTMAP_SETTINGS", &settings)
        .args(["analyze", &fixture("deck.csv"), "--json"])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let val: serde_json::Value = serde_json::from_str(stdout(&out).trim()).unwrap();
    assert_eq!(val["parameters"]["electrode"], "SCE");
    assert_eq!(val["parameters"]["low_threshold_mv"], -110.0);
}

// ===========================================================================
// grid / electrodes
// ===========================================================================

#[test]
fn grid_template_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("template.csv");
    let out = run(&["grid", "--x", "0.3,0,0.15", "--y", "1.84,1.94", "-o", path.to_str().unwrap()]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Y/X;0,00;0,15;0,30\n1,94;0,00;0,00;0,00\n1,84;0,00;0,00;0,00\n"
    );

    let analyzed = run(&["analyze", path.to_str().unwrap(), "--json"]);
    assert!(analyzed.status.success());
}

#[test]
fn electrodes_json_lists_catalog() {
    let out = run(&["electrodes", "--json"]);
    assert!(out.status.success());
    let val: serde_json::Value = serde_json::from_str(stdout(&out).trim()).unwrap();
    let codes: Vec<&str> = val.as_array().unwrap().iter().map(|e| e["code"].as_str().unwrap()).collect();
    assert_eq!(codes, vec!["CSE", "SCE", "AgAgCl"]);
    assert_eq!(val[2]["severe_threshold_mv"], -305.0);
}
