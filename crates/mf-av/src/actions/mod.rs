//! Media processing actions.

mod extract;

pub use extract::{extract_mp3, extract_mp3_command, ExtractOptions};
