use std::fs;
use std::io::{Cursor, Write};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn dtex(workdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dtex").unwrap();
    cmd.current_dir(workdir.path());
    cmd
}

fn write_zip(path: &std::path::Path, files: &[(&str, &[u8])]) {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in files {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(data).unwrap();
    }
    fs::write(path, writer.finish().unwrap().into_inner()).unwrap();
}

#[test]
fn empty_folder_reports_no_data() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("facturas")).unwrap();

    dtex(&dir)
        .args(["folder", "facturas", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 0 documents"))
        .stdout(predicate::str::contains("No line items found in 0 documents"));

    assert!(!dir.path().join("facturas_consolidadas.xlsx").exists());
}

#[test]
fn missing_folder_is_an_error() {
    let dir = TempDir::new().unwrap();

    dtex(&dir)
        .args(["folder", "no-existe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid folder"));
}

#[test]
fn file_given_as_folder_is_an_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("factura.pdf"), b"x").unwrap();

    dtex(&dir)
        .args(["folder", "factura.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn corrupt_pdf_is_skipped_and_reported() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("facturas")).unwrap();
    fs::write(dir.path().join("facturas/roto.pdf"), b"not a pdf").unwrap();
    fs::write(dir.path().join("facturas/notas.txt"), b"ignored").unwrap();

    dtex(&dir)
        .args(["folder", "facturas", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 documents"))
        .stdout(predicate::str::contains("Skipped 1 documents"))
        .stdout(predicate::str::contains("roto.pdf"))
        .stdout(predicate::str::contains("No line items found in 1 documents"));
}

#[test]
fn invalid_archive_is_an_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("facturas.zip"), b"not a zip").unwrap();

    dtex(&dir)
        .args(["archive", "facturas.zip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid archive"));
}

#[test]
fn archive_without_pdfs_writes_report() {
    let dir = TempDir::new().unwrap();
    write_zip(&dir.path().join("facturas.zip"), &[("leeme.txt", &b"hola"[..])]);

    dtex(&dir)
        .args(["archive", "facturas.zip", "-q", "--report", "reporte.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No line items found in 0 documents"));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("reporte.json")).unwrap()).unwrap();
    assert_eq!(report["documents_seen"], 0);
    assert!(report["warnings"].as_array().unwrap().is_empty());
}

#[test]
fn explicit_config_must_exist() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("facturas")).unwrap();

    dtex(&dir)
        .args(["--config", "falta.json", "folder", "facturas"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn config_init_get_set() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("conf/dtex.json");
    let config = config.to_str().unwrap();

    dtex(&dir)
        .args(["--config", config, "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not created"));

    dtex(&dir)
        .args(["--config", config, "config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    dtex(&dir)
        .args(["--config", config, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    dtex(&dir)
        .args(["--config", config, "config", "get", "tables.signature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Cantidad\""));

    dtex(&dir)
        .args(["--config", config, "config", "set", "export.sheet_name", "DTE"])
        .assert()
        .success();

    dtex(&dir)
        .args(["--config", config, "config", "get", "export.sheet_name"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"DTE\""));

    dtex(&dir)
        .args(["--config", config, "config", "set", "export.csv_delimiter", ";"])
        .assert()
        .success();

    dtex(&dir)
        .args(["--config", config, "config", "get", "export.csv_delimiter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\";\""));

    dtex(&dir)
        .args(["--config", config, "config", "set", "export.csv_delimiter", "ab"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value"));

    dtex(&dir)
        .args(["--config", config, "config", "set", "export.format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value"));

    dtex(&dir)
        .args(["--config", config, "config", "set", "export.nope", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}
