use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn obbtile() -> Command {
    Command::cargo_bin("obbtile").unwrap()
}

fn dataset(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&root);

    std::fs::create_dir_all(root.join("images")).unwrap();
    std::fs::create_dir_all(root.join("labelTxt")).unwrap();

    image::RgbImage::from_pixel(100, 80, image::Rgb([10, 20, 30]))
        .save(root.join("images").join("P0001.png"))
        .unwrap();

    std::fs::write(
        root.join("labelTxt").join("P0001.txt"),
        "imagesource:GoogleEarth\ngsd:0.5\n5 5 25 5 25 25 5 25 plane 0\n",
    )
    .unwrap();

    root
}

fn write_config(root: &Path, sizes: &[u32], gaps: &[u32]) -> PathBuf {
    let config = serde_json::json!({
        "img_dirs": [root.join("images")],
        "ann_dirs": [root.join("labelTxt")],
        "sizes": sizes,
        "gaps": gaps,
        "save_dir": root.join("split"),
        "padding_value": [0]
    });

    let path = root.join("config.json");
    std::fs::write(&path, config.to_string()).unwrap();
    path
}

#[test]
fn help_lists_subcommands() {
    obbtile()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("split"))
        .stdout(predicate::str::contains("windows"));
}

#[test]
fn windows_prints_json() {
    obbtile()
        .args(["windows", "--width", "1000", "--height", "1000"])
        .args(["--sizes", "512", "--gaps", "0"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(r#"[{"x1":0,"y1":0,"x2":512,"y2":512}"#))
        .stdout(predicate::str::contains(
            r#"{"x1":488,"y1":488,"x2":1000,"y2":1000}"#,
        ));
}

#[test]
fn windows_rejects_size_not_above_gap() {
    obbtile()
        .args(["windows", "--width", "1000", "--height", "1000"])
        .args(["--sizes", "256", "--gaps", "256"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SizeGapError"));
}

#[test]
fn windows_rejects_mismatched_pairs() {
    obbtile()
        .args(["windows", "--width", "100", "--height", "100"])
        .args(["--sizes", "64,32", "--gaps", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sizes and gaps"));
}

#[test]
fn split_writes_patches_and_counts() {
    let root = dataset("TEST_OBBTILE_CLI_SPLIT");
    let config = write_config(&root, &[64], &[16]);

    obbtile()
        .args(["split", "--config"])
        .arg(&config)
        .args(["--threads", "2"])
        .assert()
        .success();

    let save_dir = root.join("split");

    // 100 x 80 with 64-pixel windows and step 48 gives starts {0, 36} x {0, 16}
    let images = std::fs::read_dir(save_dir.join("images")).unwrap().count();
    let annfiles = std::fs::read_dir(save_dir.join("annfiles")).unwrap().count();
    assert_eq!(images, 4);
    assert_eq!(annfiles, 4);

    let counts = std::fs::read_to_string(save_dir.join("patch_counts.tsv")).unwrap();
    assert_eq!(counts.trim(), "P0001\t4");

    let first = std::fs::read_to_string(save_dir.join("annfiles").join("P0001__64__0___0.txt"))
        .unwrap();
    assert_eq!(first.trim(), "5 5 25 5 25 25 5 25 plane 0");

    assert!(!save_dir.join("split_errors.tsv").exists());

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn split_output_flag_overrides_save_dir() {
    let root = dataset("TEST_OBBTILE_CLI_SPLIT_OUTPUT");
    let config = write_config(&root, &[128], &[0]);
    let output = root.join("elsewhere");

    obbtile()
        .args(["split", "--config"])
        .arg(&config)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    assert!(output.join("images").join("P0001__128__0___0.png").exists());
    assert!(!root.join("split").exists());

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn split_rejects_invalid_config() {
    let root = dataset("TEST_OBBTILE_CLI_SPLIT_INVALID");
    let config = write_config(&root, &[64], &[64]);

    obbtile()
        .args(["split", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("[obbtile::split] ERROR"));

    assert!(!root.join("split").exists());

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn split_missing_config() {
    obbtile()
        .args(["split", "--config", "does_not_exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[obbtile::split] ERROR"));
}
