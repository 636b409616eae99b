use std::error::Error;
use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use image::{ImageBuffer, Rgb};
use tempfile::tempdir;

fn prepare_inputs(root: &Path) -> Result<(), Box<dyn Error>> {
    let images = root.join("images");
    fs::create_dir_all(&images)?;
    fs::create_dir_all(root.join("networks"))?;
    let img = ImageBuffer::from_fn(16, 16, |x, y| Rgb([(x * 8) as u8, (y * 8) as u8, 64u8]));
    img.save(images.join("cat.png"))?;
    fs::write(root.join("img_name.txt"), "cat.png\n")?;
    Ok(())
}

#[test]
fn unknown_flag_prints_usage_and_exits_cleanly() {
    let assert = cargo_bin_cmd!("imagenet-profile")
        .arg("--definitely-not-a-flag")
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("Usage"), "usage missing from: {stdout}");
}

#[test]
fn malformed_profile_value_prints_usage_and_exits_cleanly() {
    let assert = cargo_bin_cmd!("imagenet-profile")
        .args(["--profile", "sometimes"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("--network"));
}

#[test]
fn help_lists_supported_networks() {
    let assert = cargo_bin_cmd!("imagenet-profile")
        .arg("--help")
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("inception-v4"));
    assert!(stdout.contains("googlenet-12"));
}

#[test]
fn unknown_network_fails() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;
    prepare_inputs(work_dir.path())?;

    let assert = cargo_bin_cmd!("imagenet-profile")
        .current_dir(work_dir.path())
        .args(["--network", "lenet", "--settle-delay-ms", "0"])
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("lenet"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn missing_manifest_fails() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;
    let manifest = work_dir.path().join("absent.txt");

    cargo_bin_cmd!("imagenet-profile")
        .current_dir(work_dir.path())
        .args(["--network", "alexnet", "--settle-delay-ms", "0"])
        .arg("--manifest")
        .arg(&manifest)
        .assert()
        .failure();
    Ok(())
}

#[test]
fn missing_model_file_fails_and_names_the_file() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;
    prepare_inputs(work_dir.path())?;

    let assert = cargo_bin_cmd!("imagenet-profile")
        .current_dir(work_dir.path())
        .args([
            "--network",
            "alexnet",
            "--image-dir",
            "images",
            "--settle-delay-ms",
            "0",
        ])
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("alexnet.onnx"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn settings_file_overrides_defaults() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;
    prepare_inputs(work_dir.path())?;
    let settings = work_dir.path().join("settings.json");
    fs::write(
        &settings,
        r#"{ "image_dir": "images", "model_dir": "elsewhere", "settle_delay_ms": 0 }"#,
    )?;

    let assert = cargo_bin_cmd!("imagenet-profile")
        .current_dir(work_dir.path())
        .args(["--network", "resnet-18"])
        .arg("--config")
        .arg(&settings)
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("elsewhere"), "stderr: {stderr}");
    Ok(())
}
