//! Export: flatten the document into a downloadable PNG.

mod compositor;
mod text;

pub use compositor::compose;
pub use text::{FontBook, TextRenderer, TextRun};

#[cfg(test)]
pub(crate) use text::TEST_FONT;

/// Suggested download name for an export made at `unix_ms`.
pub fn export_file_name(unix_ms: u64) -> String {
    format!("edited-image-{unix_ms}.png")
}
