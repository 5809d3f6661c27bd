//! # mf-av
//!
//! Audio extraction and external tool management for mp3forge.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache the path to ffmpeg.
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support for running external processes.
//! - **Scratch space** ([`Scratch`]) -- a per-conversion temporary directory
//!   that is deleted when dropped.
//! - **Actions** ([`actions`]) -- the ffmpeg invocation that turns a video into
//!   an MP3.

pub mod actions;
pub mod command;
pub mod scratch;
pub mod tools;

// ---- Re-exports for convenience ----

pub use actions::{extract_mp3, ExtractOptions};
pub use command::{ToolCommand, ToolOutput};
pub use scratch::Scratch;
pub use tools::{ToolInfo, ToolRegistry};
