//! Retouch Core - interactive image editing engine
//!
//! This crate holds everything behind the Retouch editor that is not
//! rendering: the rotation-aware coordinate mapper, the crop, draw and text
//! tools, undo/redo history and the export compositor that flattens all
//! layers at the image's native resolution.
//!
//! # Spaces
//!
//! - **Display space**: pointer positions relative to the on-screen layout
//!   box, which holds the display canvas rotated about its center.
//! - **Canvas-local space**: the unrotated display canvas. Crop regions,
//!   strokes and text positions live here.
//! - **Native space**: pixels of the actual bitmap.
//!
//! # Example
//!
//! ```ignore
//! use retouch_core::{Editor, Point, PointerTarget, ToolKind};
//!
//! let mut editor = Editor::default();
//! editor.load_bytes(&upload)?;
//! editor.rotate();
//! editor.activate_tool(ToolKind::Draw);
//! editor.pointer_down(PointerTarget::Canvas, Point::new(10.0, 10.0));
//! editor.pointer_move(Point::new(80.0, 40.0));
//! editor.pointer_up();
//! let png = editor.export_png()?;
//! ```

pub mod canvas;
pub mod color;
pub mod config;
pub mod decode;
pub mod document;
pub mod editor;
pub mod encode;
pub mod error;
pub mod export;
pub mod geometry;
pub mod history;
pub mod mapper;
pub mod tools;
pub mod transform;

pub use canvas::{display_size, CanvasMode};
pub use color::{Color, ColorParseError};
pub use config::EditorConfig;
pub use decode::{decode_image, DecodeError, DecodedImage};
pub use document::Document;
pub use editor::Editor;
pub use encode::{encode_png, EncodeError};
pub use error::{EditorError, Result};
pub use export::{compose, export_file_name, FontBook, TextRenderer, TextRun};
pub use geometry::{Point, Rotation, Size};
pub use history::History;
pub use tools::{
    AnnotationId, Brush, CropHandle, CropRegion, Key, PointerTarget, TextAnnotation, TextStyle,
    ToolKind, ToolMode,
};
