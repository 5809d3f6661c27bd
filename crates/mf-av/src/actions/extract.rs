//! Extract the audio of a media file into an MP3 via ffmpeg.

use std::path::Path;
use std::time::Duration;

use mf_core::config::ConversionConfig;

use crate::command::{ToolCommand, ToolOutput};
use crate::tools::ToolRegistry;

/// Encoder settings for [`extract_mp3`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// ffmpeg audio encoder name.
    pub audio_codec: String,
    /// ffmpeg bitrate string (`192k`).
    pub audio_bitrate: String,
    /// Maximum time ffmpeg may run.
    pub timeout: Duration,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::from(&ConversionConfig::default())
    }
}

impl From<&ConversionConfig> for ExtractOptions {
    fn from(cfg: &ConversionConfig) -> Self {
        Self {
            audio_codec: cfg.audio_codec.clone(),
            audio_bitrate: cfg.audio_bitrate.clone(),
            timeout: cfg.timeout(),
        }
    }
}

/// Build the ffmpeg invocation without running it.
///
/// Video streams are dropped, the first audio stream is encoded with the
/// configured codec and bitrate, and an existing output is overwritten.
pub fn extract_mp3_command(
    ffmpeg: &Path,
    input: &Path,
    output: &Path,
    options: &ExtractOptions,
) -> ToolCommand {
    let mut cmd = ToolCommand::new(ffmpeg.to_path_buf());
    cmd.args(["-hide_banner", "-nostdin", "-y"]);
    cmd.arg("-i");
    cmd.arg(input.to_string_lossy().as_ref());
    cmd.arg("-vn");
    cmd.args(["-acodec", options.audio_codec.as_str()]);
    cmd.args(["-b:a", options.audio_bitrate.as_str()]);
    cmd.arg(output.to_string_lossy().as_ref());
    cmd.timeout(options.timeout);
    cmd
}

/// Transcode the audio of `input` into an MP3 at `output`.
///
/// # Errors
///
/// Returns [`mf_core::Error::Tool`] when ffmpeg is missing, fails, times out,
/// or exits successfully without writing the output file.
pub async fn extract_mp3(
    tools: &ToolRegistry,
    input: &Path,
    output: &Path,
    options: &ExtractOptions,
) -> mf_core::Result<ToolOutput> {
    let ffmpeg = tools.require("ffmpeg")?;

    tracing::info!(
        "extract mp3 ({} @ {}) from {:?}",
        options.audio_codec,
        options.audio_bitrate,
        input
    );

    let result = extract_mp3_command(&ffmpeg.path, input, output, options)
        .execute()
        .await?;

    match tokio::fs::metadata(output).await {
        Ok(meta) if meta.is_file() => {
            tracing::info!(
                "extract mp3 finished in {:.2?} ({} bytes)",
                result.elapsed,
                meta.len()
            );
            Ok(result)
        }
        _ => Err(mf_core::Error::tool(
            "ffmpeg",
            format!("finished without producing {}", output.display()),
        )),
    }
}
