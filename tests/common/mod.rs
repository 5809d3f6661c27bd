//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which builds an [`AppContext`] whose scratch root
//! is a private temp dir and starts Axum on a random port for HTTP-level
//! testing. [`fake_ffmpeg`] writes shell scripts that stand in for ffmpeg so
//! conversions are deterministic.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mf_core::config::Config;
use mf_server::context::AppContext;
use mf_server::router::build_router;
use tempfile::TempDir;

/// Fake ffmpeg that writes `ID3` followed by the input bytes to the output
/// path (the last argument) and records its arguments in `args.txt`.
pub const COPYING_FFMPEG: &str = r#"#!/bin/sh
dir=$(dirname "$0")
printf '%s\n' "$@" > "$dir/args.txt"
prev=""
for a in "$@"; do
  if [ "$prev" = "-i" ]; then input="$a"; fi
  prev="$a"
  out="$a"
done
{ printf 'ID3'; cat "$input"; } > "$out"
"#;

/// Fake ffmpeg that rejects every input the way ffmpeg does for garbage.
pub const FAILING_FFMPEG: &str = r#"#!/bin/sh
dir=$(dirname "$0")
printf '%s\n' "$@" > "$dir/args.txt"
echo "temp_input.mp4: Invalid data found when processing input" >&2
exit 1
"#;

/// Test harness wrapping a running server and its private directories.
pub struct TestHarness {
    pub addr: SocketAddr,
    pub scratch: TempDir,
    pub tools_dir: TempDir,
}

impl TestHarness {
    /// Start a server whose ffmpeg is the given fake script.
    #[cfg(unix)]
    pub async fn with_fake_ffmpeg(script: &str) -> Self {
        let tools_dir = tempfile::tempdir().expect("failed to create tools dir");
        let ffmpeg = fake_ffmpeg(tools_dir.path(), script);

        let mut config = Config::default();
        config.tools.ffmpeg_path = Some(ffmpeg);
        Self::with_config(config, tools_dir).await
    }

    /// Start a server using whatever ffmpeg is on `PATH`.
    pub async fn with_system_ffmpeg() -> Self {
        let tools_dir = tempfile::tempdir().expect("failed to create tools dir");
        Self::with_config(Config::default(), tools_dir).await
    }

    async fn with_config(mut config: Config, tools_dir: TempDir) -> Self {
        let scratch = tempfile::tempdir().expect("failed to create scratch dir");
        config.server.scratch_dir = Some(scratch.path().to_path_buf());

        let app = build_router(AppContext::new(config), None);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            addr,
            scratch,
            tools_dir,
        }
    }

    /// POST `data` as the `file` field with the given filename.
    pub async fn upload(&self, filename: &str, data: Vec<u8>) -> reqwest::Response {
        upload_to(self.addr, filename, data).await
    }

    /// Arguments the fake ffmpeg was last invoked with, if it ran at all.
    pub fn ffmpeg_args(&self) -> Option<Vec<String>> {
        let args = std::fs::read_to_string(self.tools_dir.path().join("args.txt")).ok()?;
        Some(args.lines().map(String::from).collect())
    }

    /// Wait briefly for the scratch root to become empty.
    ///
    /// The scratch guard is dropped by the server as the body stream ends,
    /// which can race the client finishing its read.
    pub async fn scratch_drained(&self) -> bool {
        for _ in 0..50 {
            if is_empty_dir(self.scratch.path()) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    }
}

/// POST `data` as the `file` field of a multipart form to `addr`.
pub async fn upload_to(addr: SocketAddr, filename: &str, data: Vec<u8>) -> reqwest::Response {
    let part = reqwest::multipart::Part::bytes(data).file_name(filename.to_string());
    let form = reqwest::multipart::Form::new().part("file", part);

    reqwest::Client::new()
        .post(format!("http://{addr}/convert"))
        .multipart(form)
        .send()
        .await
        .expect("request failed")
}

/// Write an executable script named `ffmpeg` into `dir`.
#[cfg(unix)]
pub fn fake_ffmpeg(dir: &Path, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("ffmpeg");
    std::fs::write(&path, script).expect("failed to write fake ffmpeg");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("failed to chmod fake ffmpeg");
    path
}

pub fn is_empty_dir(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(true)
}

/// Filename from an `attachment; filename="..."` header value.
pub fn disposition_filename(value: &str) -> Option<&str> {
    let start = value.find("filename=\"")? + "filename=\"".len();
    let end = value[start..].find('"')? + start;
    Some(&value[start..end])
}
