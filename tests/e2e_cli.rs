//! CLI end-to-end tests
//!
//! Tests for the mp3forge command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the mp3forge binary
#[allow(deprecated)]
fn mp3forge_cmd() -> Command {
    Command::cargo_bin("mp3forge").unwrap()
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = mp3forge_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = mp3forge_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mp3forge"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_flag() {
    let mut cmd = mp3forge_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mp3forge"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = mp3forge_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_start_help() {
    let mut cmd = mp3forge_cmd();
    cmd.args(["start", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Start the web server"))
        .stdout(predicate::str::contains("--port"));
}

#[test]
fn test_cli_check_tools_command() {
    let mut cmd = mp3forge_cmd();
    cmd.arg("check-tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("ffmpeg"));
}

#[test]
fn test_cli_validate_defaults() {
    let mut cmd = mp3forge_cmd();
    cmd.arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("using defaults"))
        .stdout(predicate::str::contains("0.0.0.0:5000"))
        .stdout(predicate::str::contains("libmp3lame @ 192k"));
}

#[test]
fn test_cli_validate_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{ "server": { "port": 8080 }, "conversion": { "audio_bitrate": "320k" } }"#,
    )
    .unwrap();

    let mut cmd = mp3forge_cmd();
    cmd.arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains(":8080"))
        .stdout(predicate::str::contains("320k"));
}

#[test]
fn test_cli_validate_invalid_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let mut cmd = mp3forge_cmd();
    cmd.arg("validate").arg(&path).assert().failure();
}

#[test]
fn test_cli_validate_missing_config() {
    let dir = tempdir().unwrap();

    let mut cmd = mp3forge_cmd();
    cmd.arg("validate")
        .arg(dir.path().join("nope.json"))
        .assert()
        .failure();
}

#[test]
fn test_cli_convert_nonexistent_file() {
    let mut cmd = mp3forge_cmd();
    cmd.args(["convert", "/nonexistent/clip.mov"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_cli_convert_refuses_to_overwrite_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("song.mp3");
    fs::write(&input, b"ID3").unwrap();

    let mut cmd = mp3forge_cmd();
    cmd.arg("convert")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("overwrite"));

    assert_eq!(fs::read(&input).unwrap(), b"ID3");
}

#[cfg(unix)]
#[test]
fn test_cli_convert_with_configured_ffmpeg() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let ffmpeg = dir.path().join("ffmpeg");
    fs::write(
        &ffmpeg,
        "#!/bin/sh\nfor a in \"$@\"; do out=\"$a\"; done\nprintf 'ID3' > \"$out\"\n",
    )
    .unwrap();
    fs::set_permissions(&ffmpeg, fs::Permissions::from_mode(0o755)).unwrap();

    let config = dir.path().join("config.json");
    fs::write(
        &config,
        format!(r#"{{ "tools": {{ "ffmpeg_path": "{}" }} }}"#, ffmpeg.display()),
    )
    .unwrap();

    let input = dir.path().join("clip.mov");
    fs::write(&input, b"video").unwrap();

    let mut cmd = mp3forge_cmd();
    cmd.arg("--config")
        .arg(&config)
        .arg("convert")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("clip.mp3"));

    assert_eq!(fs::read(dir.path().join("clip.mp3")).unwrap(), b"ID3");
}
