use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join("drawio").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn cli() -> Command {
    Command::cargo_bin("drawbridge-cli").expect("binary built")
}

#[test]
fn extract_reports_devices_and_connections() {
    let out = cli()
        .args(["extract", fixture("basic.xml").to_string_lossy().as_ref()])
        .assert()
        .success();

    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(value["kind"], "xml");
    let names: Vec<&str> = value["devices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["unique_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["router", "router-2", "router-3"]);

    assert_eq!(value["connections"][0]["from"], "router");
    assert_eq!(value["connections"][0]["to"], "router-2");
    assert_eq!(value["connections"][1]["from_adapter_number"], 1);
}

#[test]
fn extract_out_writes_the_manifest_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let manifest = tmp.path().join("Connections.json");

    cli()
        .args([
            "extract",
            "--out",
            manifest.to_string_lossy().as_ref(),
            fixture("basic.xml").to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let written = fs::read_to_string(&manifest).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
    assert_eq!(value[0]["from_adapter_number"], 0);
}

#[test]
fn detect_names_both_variants() {
    cli()
        .args(["detect", fixture("basic.xml").to_string_lossy().as_ref()])
        .assert()
        .success()
        .stdout("xml\n");

    cli()
        .args(["detect", fixture("basic.svg").to_string_lossy().as_ref()])
        .assert()
        .success()
        .stdout("svg\n");
}

#[test]
fn stdin_dash_reads_the_document_from_stdin() {
    let text = fs::read_to_string(fixture("basic.svg")).unwrap();
    cli()
        .args(["detect", "-"])
        .write_stdin(text)
        .assert()
        .success()
        .stdout("svg\n");
}

#[test]
fn machines_lists_one_unique_name_per_line() {
    cli()
        .args(["machines", fixture("basic.svg").to_string_lossy().as_ref()])
        .assert()
        .success()
        .stdout("router\nlayer_2_switch\n");
}

#[test]
fn latest_selects_the_newest_diagram_in_the_intake_dir() {
    let tmp = tempfile::tempdir().expect("tempdir");
    fs::copy(fixture("basic.xml"), tmp.path().join("lab.xml")).unwrap();
    fs::write(tmp.path().join("notes.txt"), "not a diagram").unwrap();

    cli()
        .args(["detect", "--latest", tmp.path().to_string_lossy().as_ref()])
        .assert()
        .success()
        .stdout("xml\n");
}

#[test]
fn kind_flag_rejects_the_other_variant() {
    cli()
        .args([
            "extract",
            "--kind",
            "svg",
            fixture("basic.xml").to_string_lossy().as_ref(),
        ])
        .assert()
        .failure()
        .code(1);

    cli()
        .args([
            "extract",
            "--kind",
            "xml",
            fixture("basic.xml").to_string_lossy().as_ref(),
        ])
        .assert()
        .success();
}

#[test]
fn latest_with_kind_only_considers_matching_extensions() {
    let tmp = tempfile::tempdir().expect("tempdir");
    fs::copy(fixture("basic.svg"), tmp.path().join("older.svg")).unwrap();
    fs::copy(fixture("basic.xml"), tmp.path().join("newer.xml")).unwrap();

    cli()
        .args([
            "detect",
            "--kind",
            "svg",
            "--latest",
            tmp.path().to_string_lossy().as_ref(),
        ])
        .assert()
        .success()
        .stdout("svg\n");
}

#[test]
fn latest_on_an_empty_intake_dir_is_a_clean_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    cli()
        .args(["detect", "--latest", tmp.path().to_string_lossy().as_ref()])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn links_playbook_derives_the_project_from_the_file_name() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let details = tmp.path().join("gns3_server_details.txt");
    fs::write(&details, "192.168.56.10\n3080\n").unwrap();

    let out = cli()
        .args([
            "links-playbook",
            "--server",
            details.to_string_lossy().as_ref(),
            fixture("basic.xml").to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    assert!(stdout.starts_with("---\n"));
    assert!(stdout.contains("project_name: basic"));
    assert!(stdout.contains("Create link router to router-2"));
    assert!(stdout.contains("http://192.168.56.10:3080"));
}

#[test]
fn machines_playbook_skips_machines_without_templates() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let details = tmp.path().join("gns3_server_details.txt");
    fs::write(&details, "192.168.56.10\n3080\n").unwrap();
    let templates = tmp.path().join("gns3_templates.json");
    fs::write(
        &templates,
        r#"{"c3725 Router": {"template_id": "t-router", "node_type": "dynamips"}}"#,
    )
    .unwrap();

    let out = cli()
        .args([
            "machines-playbook",
            "--server",
            details.to_string_lossy().as_ref(),
            "--templates",
            templates.to_string_lossy().as_ref(),
            "--project",
            "lab1",
            fixture("basic.svg").to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("Add router to the project"));
    // The switch has no template in the catalog and is skipped.
    assert!(!stdout.contains("Add layer_2_switch to the project"));
}

#[test]
fn renumber_reassigns_adapters_from_display_names() {
    let manifest = r#"[
        {"from": "router", "to": "switch", "from_adapter_number": 9, "to_adapter_number": 9},
        {"from": "router", "to": "switch", "from_adapter_number": 9, "to_adapter_number": 9}
    ]"#;

    let out = cli()
        .args(["renumber", "-"])
        .write_stdin(manifest)
        .assert()
        .success();

    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value[0]["from_adapter_number"], 0);
    assert_eq!(value[1]["from_adapter_number"], 1);
    assert_eq!(value[1]["to_adapter_number"], 1);
}
