//! Unified error type for mp3forge.
//!
//! All crates funnel their failures into [`Error`], which carries enough context
//! for the HTTP layer to derive a status code via [`Error::http_status`] and a
//! crash-report category via [`Error::kind`].

/// Unified error type covering all failure modes in mp3forge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The upload carried no `file` field, or its filename was empty.
    #[error("No file selected")]
    MissingFile,

    /// The multipart upload could not be read.
    #[error("Upload error: {0}")]
    Upload(String),

    /// Input data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// An external tool (ffmpeg) returned an error.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    ///
    /// Tool failures are 500, not 502.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::MissingFile => 400,
            Error::Upload(_) => 400,
            Error::Validation(_) => 400,
            Error::Io { .. } => 500,
            Error::Tool { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Category name shown in crash reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MissingFile => "MissingFile",
            Error::Upload(_) => "UploadError",
            Error::Validation(_) => "ValidationError",
            Error::Io { .. } => "IoError",
            Error::Tool { .. } => "ToolError",
            Error::Internal(_) => "InternalError",
        }
    }

    /// The error message without its category prefix.
    pub fn detail(&self) -> String {
        match self {
            Error::MissingFile => self.to_string(),
            Error::Upload(msg) | Error::Validation(msg) | Error::Internal(msg) => msg.clone(),
            Error::Io { source } => source.to_string(),
            Error::Tool { tool, message } => format!("{tool}: {message}"),
        }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
