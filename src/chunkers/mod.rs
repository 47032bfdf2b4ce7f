//! Text splitting used to keep payloads under downstream service limits.

mod splitter;

pub use splitter::{split_text, BoundarySplitter, TextChunk};
