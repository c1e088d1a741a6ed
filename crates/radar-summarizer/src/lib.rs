//! Chat-completions client that writes short restroom descriptions.

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::ChatSummarizer;
pub use error::SummarizerError;
pub use prompt::{build_prompt, parse_descriptions};
