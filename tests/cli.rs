use std::io::Write;
use std::process::Command;

use serde_json::Value;

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_bubble-chart"))
}

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn thousands_separators_are_not_numbers() {
    let data = write_temp(
        ".csv",
        "id,total_amount,county_name,category,group\n\
         1,\"1,200\",Adams,low,2008\n",
    );
    let output = binary()
        .arg(data.path())
        .args(["--headless", "--seed", "4"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("malformed value \"1,200\""));
}

#[test]
fn headless_run_prints_one_node_per_record() {
    let data = write_temp(
        ".csv",
        "id,total_amount,county_name,category,group\n\
         1,1200,Adams,low,2008\n\
         2,5400,Boone,high,2009\n\
         3,800,\"Cass, North\",medium,2010\n",
    );
    let output = binary()
        .arg(data.path())
        .args(["--headless", "--seed", "4", "--mode", "split", "--ticks", "50"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let snapshot: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["mode"], "split_by_group");
    assert_eq!(snapshot["ticks"], 50);

    let nodes = snapshot["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0]["id"], "2");
    assert_eq!(nodes[2]["name"], "Cass, North");
    assert_eq!(snapshot["labels"].as_array().unwrap().len(), 3);
}

#[test]
fn headless_run_settles_by_default() {
    let data = write_temp(
        ".json",
        r#"{"records": [
            {"id": "a", "value": 10, "category": "low", "group": "x"},
            {"id": "b", "value": 30, "category": "high", "group": "y"}
        ]}"#,
    );
    let config = write_temp(".json", r#"{"width": 500, "height": 300}"#);

    let output = binary()
        .arg(data.path())
        .arg("--config")
        .arg(config.path())
        .args(["--headless", "--seed", "1", "--height", "320"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let snapshot: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["mode"], "grouped");
    assert_eq!(snapshot["alpha"], 0.0);
    assert_eq!(snapshot["width"], 500.0);
    assert_eq!(snapshot["height"], 320.0);
    assert!(snapshot["labels"].as_array().unwrap().is_empty());
}

#[test]
fn duplicate_ids_fail_the_run() {
    let data = write_temp(
        ".json",
        r#"[
            {"id": "a", "value": 1, "category": "low", "group": "x"},
            {"id": "a", "value": 2, "category": "low", "group": "x"}
        ]"#,
    );
    let output = binary().arg(data.path()).arg("--headless").output().unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("duplicate record id `a`"));
}
