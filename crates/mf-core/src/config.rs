//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! server, tools and conversion sub-configs. Every section defaults sensibly
//! so a completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub tools: ToolsConfig,
    pub conversion: ConversionConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Load configuration strictly: read and parse errors are returned.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.server.max_upload_mb == 0 {
            warnings.push("server.max_upload_mb is 0; every upload will be rejected".into());
        }

        if let Some(ref dir) = self.server.scratch_dir {
            if !dir.is_dir() {
                warnings.push(format!(
                    "server.scratch_dir {} does not exist; it will be created on demand",
                    dir.display()
                ));
            }
        }

        if let Some(ref dir) = self.server.static_dir {
            if !dir.join("index.html").is_file() {
                warnings.push(format!(
                    "server.static_dir {} has no index.html; the built-in landing page is used",
                    dir.display()
                ));
            }
        }

        if let Some(ref path) = self.tools.ffmpeg_path {
            if !path.exists() {
                warnings.push(format!(
                    "tools.ffmpeg_path {} does not exist; falling back to PATH",
                    path.display()
                ));
            }
        }

        if !is_valid_bitrate(&self.conversion.audio_bitrate) {
            warnings.push(format!(
                "conversion.audio_bitrate '{}' does not look like an ffmpeg bitrate (e.g. 192k)",
                self.conversion.audio_bitrate
            ));
        }

        if self.conversion.timeout_secs == 0 {
            warnings.push("conversion.timeout_secs is 0; every conversion will time out".into());
        }

        warnings
    }
}

/// Accepts `<digits>` optionally followed by a single `k` or `M` suffix.
fn is_valid_bitrate(s: &str) -> bool {
    let digits = s.strip_suffix(['k', 'K', 'M']).unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served at `/`; the built-in landing page is used when unset.
    pub static_dir: Option<PathBuf>,
    /// Root for per-request scratch directories (defaults to the OS temp dir).
    pub scratch_dir: Option<PathBuf>,
    /// Maximum accepted request body, in MiB.
    pub max_upload_mb: u64,
    /// Hide error details from crash reports (they are still logged).
    pub redact_errors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            static_dir: None,
            scratch_dir: None,
            max_upload_mb: 2048,
            redact_errors: false,
        }
    }
}

impl ServerConfig {
    /// Body limit in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        usize::try_from(self.max_upload_mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
    }

    /// Resolved scratch root.
    pub fn scratch_root(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Paths to external tools (override PATH lookup).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
}

/// Audio extraction settings handed to ffmpeg.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub audio_codec: String,
    pub audio_bitrate: String,
    pub timeout_secs: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            audio_codec: "libmp3lame".into(),
            audio_bitrate: "192k".into(),
            timeout_secs: 3600,
        }
    }
}

impl ConversionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
