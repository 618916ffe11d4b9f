use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `egtel` with its config directory isolated under `home`.
fn egtel(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("egtel").expect("bin");
    cmd.env("HOME", home).env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

fn write_png(path: &Path) {
    image::RgbImage::from_pixel(40, 30, image::Rgb([250, 250, 250]))
        .save(path)
        .expect("png");
}

#[test]
fn text_attributes_each_number() {
    let home = TempDir::new().expect("tempdir");
    let input = home.path().join("ocr.txt");
    fs::write(&input, "Vodafone: 01112345678 Orange: 01212345678").expect("write");

    egtel(home.path())
        .args(["text", "--format", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("01112345678,Vodafone,false"))
        .stdout(predicate::str::contains("01212345678,Orange,false"));
}

#[test]
fn text_reads_stdin() {
    let home = TempDir::new().expect("tempdir");

    egtel(home.path())
        .args(["text", "-"])
        .write_stdin("الاسم: Ahmed Ali\nرقم قومي 29505151234567\nمحفظة 01001234567")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"national_id\": \"29505151234567\""))
        .stdout(predicate::str::contains("\"phone_number\": \"01001234567\""))
        .stdout(predicate::str::contains("\"has_wallet\": true"));
}

#[test]
fn config_init_get_set() {
    let home = TempDir::new().expect("tempdir");
    let config = home.path().join("egtel.json");
    let config_arg = config.to_str().expect("utf8 path");

    egtel(home.path())
        .args(["-c", config_arg, "config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    egtel(home.path())
        .args(["-c", config_arg, "config", "get", "extraction.excerpt_chars"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100"));

    egtel(home.path())
        .args(["-c", config_arg, "config", "set", "ocr.tessdata_dir", "/opt/tessdata"])
        .assert()
        .success();

    egtel(home.path())
        .args(["-c", config_arg, "config", "get", "ocr.tessdata_dir"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/opt/tessdata"));

    egtel(home.path())
        .args(["-c", config_arg, "config", "set", "ocr.no_such_key", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn config_path_uses_config_dir() {
    let home = TempDir::new().expect("tempdir");

    egtel(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("egtel"))
        .stdout(predicate::str::contains("config.json"))
        .stdout(predicate::str::contains("not created"));
}

#[test]
fn extract_without_trained_data_fails() {
    let home = TempDir::new().expect("tempdir");
    let tessdata = home.path().join("tessdata");
    fs::create_dir_all(&tessdata).expect("mkdir");
    let input = home.path().join("shot.png");
    write_png(&input);

    egtel(home.path())
        .arg("extract")
        .arg("--tessdata")
        .arg(&tessdata)
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unavailable"))
        .stderr(predicate::str::contains("--tessdata"));
}

#[test]
fn batch_without_trained_data_fails() {
    let home = TempDir::new().expect("tempdir");
    let tessdata = home.path().join("tessdata");
    let shots = home.path().join("shots");
    fs::create_dir_all(&tessdata).expect("mkdir");
    fs::create_dir_all(&shots).expect("mkdir");
    write_png(&shots.join("a.png"));

    let out = home.path().join("out");
    let pattern = format!("{}/*.png", shots.display());

    egtel(home.path())
        .args(["batch", &pattern, "--summary", "--output-dir"])
        .arg(&out)
        .arg("--tessdata")
        .arg(&tessdata)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unavailable"));

    assert!(!out.join("summary.csv").exists());
}

#[test]
fn batch_without_images_fails() {
    let home = TempDir::new().expect("tempdir");
    fs::write(home.path().join("notes.txt"), "ignored").expect("write");
    let pattern = format!("{}/*", home.path().display());

    egtel(home.path())
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching images"));
}

#[test]
#[ignore = "needs tesseract with eng trained data installed"]
fn extract_missing_file_fails() {
    let home = TempDir::new().expect("tempdir");

    egtel(home.path())
        .arg("extract")
        .arg(home.path().join("missing.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no input image"));
}

#[test]
#[ignore = "needs tesseract with eng trained data installed"]
fn extract_blank_image_finds_nothing() {
    let home = TempDir::new().expect("tempdir");
    let input = home.path().join("shot.png");
    write_png(&input);

    egtel(home.path())
        .args(["extract", "--format", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::diff("phone_number,carrier,has_wallet,source_text_excerpt\n\n"));
}

#[test]
#[ignore = "needs tesseract with eng trained data installed"]
fn batch_writes_summary() {
    let home = TempDir::new().expect("tempdir");
    let shots = home.path().join("shots");
    fs::create_dir_all(&shots).expect("mkdir");
    write_png(&shots.join("a.png"));
    write_png(&shots.join("b.png"));
    fs::write(shots.join("notes.txt"), "ignored").expect("write");

    let out = home.path().join("out");
    let pattern = format!("{}/*", shots.display());

    egtel(home.path())
        .args(["batch", &pattern, "--summary", "--output-dir"])
        .arg(&out)
        .assert()
        .success();

    let summary = fs::read_to_string(out.join("summary.csv")).expect("summary");
    assert_eq!(summary.lines().count(), 3);
    assert!(summary.contains("a.png,success,nothing found"));
    assert!(out.join("b.json").exists());
}
