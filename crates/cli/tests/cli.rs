use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const PRINTER: &str = include_str!("../../tree/tests/fixtures/printer_tree.txt");

#[allow(deprecated)]
fn bom_matrix() -> Command {
    Command::cargo_bin("bom-matrix").expect("binary")
}

fn write_input(dir: &Path, text: &str) -> std::path::PathBuf {
    let path = dir.join("tree.txt");
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn writes_csv_next_to_input() {
    let temp = tempdir().unwrap();
    let input = write_input(temp.path(), PRINTER);

    bom_matrix()
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote: "))
        .stdout(predicate::str::contains("DirectChildren.csv"))
        .stdout(predicate::str::contains("RollupPartsOnly.csv"))
        .stdout(predicate::str::contains("Sheets:"));

    let direct = fs::read_to_string(temp.path().join("DirectChildren.csv")).unwrap();
    assert!(direct.starts_with("Item,Carriage,Corner,Frame,Idler,Printer\n"));
    assert!(direct.contains("\nCorner,0,0,2,0,0\n"));
    assert!(direct.contains("\nFoot,0,0,0,0,4\n"));

    let rollup = fs::read_to_string(temp.path().join("RollupPartsOnly.csv")).unwrap();
    assert!(rollup.contains("\nM5x10,1,2,4,0,5\n"));
    // Feet of the pattern after the idler roll into the printer only
    assert!(rollup.contains("\nFoot,0,0,0,0,4\n"));
    assert!(rollup.contains("\nBearing625,0,0,0,2,2\n"));
    assert!(!rollup.contains("\nFrame,"));
}

#[test]
fn json_goes_to_out_dir() {
    let temp = tempdir().unwrap();
    let input = write_input(temp.path(), PRINTER);
    let out = temp.path().join("reports");

    bom_matrix()
        .arg(&input)
        .arg("--out-dir")
        .arg(&out)
        .arg("--format")
        .arg("json")
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("assembly_matrix.json"));

    let body: Value =
        serde_json::from_str(&fs::read_to_string(out.join("assembly_matrix.json")).unwrap())
            .expect("valid json");
    assert_eq!(body["direct_children"]["columns"][4], "Printer");
    assert_eq!(body["rollup_parts_only"]["rows"][0]["item"], "Bearing625");
    assert!(!temp.path().join("DirectChildren.csv").exists());
}

#[test]
fn custom_tree_format() {
    let temp = tempdir().unwrap();
    let input = write_input(
        temp.path(),
        "Cart (Assembly) @ cart\n +- Axle001 => Assembly\n |   +- Wheel001 => Body\n |   \\- Wheel002 => Body\n \\- Axle002 => Assembly\n",
    );
    let format = temp.path().join("format.toml");
    fs::write(&format, "branch_glyphs = [\"+\", \"\\\\\"]\nbranch_dash = \"-\"\n").unwrap();

    bom_matrix()
        .arg(&input)
        .arg("--tree-format")
        .arg(&format)
        .assert()
        .success();

    let rollup = fs::read_to_string(temp.path().join("RollupPartsOnly.csv")).unwrap();
    assert_eq!(rollup, "Item,Axle,Cart\nWheel,2,4\n");
}

#[test]
fn missing_input_fails() {
    let temp = tempdir().unwrap();

    bom_matrix()
        .arg(temp.path().join("absent.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse tree export"));
}

#[test]
fn cyclic_tree_fails_without_output() {
    let temp = tempdir().unwrap();
    let input = write_input(
        temp.path(),
        "A (Assembly) @ a\n └─ B => Assembly\n     └─ A => Assembly\n",
    );

    bom_matrix()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cyclic sub-assembly reference"));

    assert!(!temp.path().join("DirectChildren.csv").exists());
}

#[test]
fn tree_without_assemblies_writes_empty_matrices() {
    let temp = tempdir().unwrap();
    let input = write_input(temp.path(), "Loose (Body)\n");

    bom_matrix().arg(&input).assert().success();

    let direct = fs::read_to_string(temp.path().join("DirectChildren.csv")).unwrap();
    assert!(direct.starts_with("Item\n"));
    assert!(!direct.contains(','));
}
