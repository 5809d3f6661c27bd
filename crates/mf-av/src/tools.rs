//! External tool detection and management.
//!
//! The [`ToolRegistry`] discovers and caches the location of the external CLI
//! tools mp3forge shells out to and provides lookup methods for the rest of
//! the crate.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Known tool names that the registry manages.
const KNOWN_TOOLS: &[&str] = &["ffmpeg"];

/// Resolved location of a single external tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Human-readable tool name (e.g. "ffmpeg").
    pub name: String,
    /// Resolved path to the executable.
    pub path: PathBuf,
}

/// Availability information for a tool, returned by [`ToolRegistry::check_all`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Version string (first line of `-version` output), if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// Registry holding discovered tool configurations.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolConfig>,
}

impl ToolRegistry {
    /// Discover tools by searching `PATH` (or using overrides from config).
    ///
    /// For each known tool, if the [`mf_core::config::ToolsConfig`] supplies a
    /// custom path **and** that path exists, it is used directly. Otherwise
    /// [`which::which`] is used to locate the tool in `PATH`. Tools that are
    /// not found are omitted from the registry.
    pub fn discover(tools_config: &mf_core::config::ToolsConfig) -> Self {
        let mut tools = HashMap::new();

        for &name in KNOWN_TOOLS {
            let custom_path = match name {
                "ffmpeg" => tools_config.ffmpeg_path.as_deref(),
                _ => None,
            };

            let resolved = match custom_path {
                Some(p) if p.exists() => Some(p.to_path_buf()),
                Some(p) => {
                    tracing::warn!(
                        "Configured {name} path {} does not exist; searching PATH",
                        p.display()
                    );
                    which::which(name).ok()
                }
                None => which::which(name).ok(),
            };

            if let Some(path) = resolved {
                tools.insert(
                    name.to_string(),
                    ToolConfig {
                        name: name.to_string(),
                        path,
                    },
                );
            }
        }

        Self { tools }
    }

    /// Return a reference to the [`ToolConfig`] for the given tool, or an
    /// [`mf_core::Error::Tool`] if the tool was not found during discovery.
    pub fn require(&self, name: &str) -> mf_core::Result<&ToolConfig> {
        self.tools.get(name).ok_or_else(|| {
            mf_core::Error::tool(name, format!("{name} not found; is it installed and in PATH?"))
        })
    }

    /// Check all known tools and return availability information.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        KNOWN_TOOLS
            .iter()
            .map(|&name| match self.tools.get(name) {
                Some(cfg) => ToolInfo {
                    name: name.to_string(),
                    available: true,
                    version: detect_version(&cfg.path),
                    path: Some(cfg.path.clone()),
                },
                None => ToolInfo {
                    name: name.to_string(),
                    available: false,
                    version: None,
                    path: None,
                },
            })
            .collect()
    }
}

/// Run `<tool> -version` and return the first line of stdout.
fn detect_version(path: &Path) -> Option<String> {
    let output = std::process::Command::new(path)
        .arg("-version")
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mf_core::config::ToolsConfig;

    #[test]
    fn discover_with_default_config() {
        let cfg = ToolsConfig::default();
        let registry = ToolRegistry::discover(&cfg);
        // We cannot guarantee ffmpeg is installed in CI,
        // but the call itself must not panic.
        let _ = registry.check_all();
    }

    #[test]
    fn require_missing_tool_returns_error() {
        let registry = ToolRegistry::default();
        let err = registry.require("ffmpeg").unwrap_err();
        assert_eq!(err.kind(), "ToolError");
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn check_all_reports_missing_tools() {
        let registry = ToolRegistry::default();
        let infos = registry.check_all();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].name, "ffmpeg");
        assert!(!infos[0].available);
        assert!(infos[0].path.is_none());
    }

    #[test]
    fn configured_path_wins_when_it_exists() {
        let fake = tempfile::NamedTempFile::new().unwrap();
        let cfg = ToolsConfig {
            ffmpeg_path: Some(fake.path().to_path_buf()),
        };
        let registry = ToolRegistry::discover(&cfg);
        assert_eq!(registry.require("ffmpeg").unwrap().path, fake.path());
    }

    #[test]
    fn tool_info_serialization() {
        let info = ToolInfo {
            name: "ffmpeg".to_string(),
            available: true,
            version: Some("ffmpeg version 6.1".to_string()),
            path: Some(PathBuf::from("/usr/bin/ffmpeg")),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["name"], "ffmpeg");
        assert_eq!(json["available"], true);
        assert_eq!(json["path"], "/usr/bin/ffmpeg");
    }
}
