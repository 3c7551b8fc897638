//! Retouch WASM - WebAssembly bindings for Retouch
//!
//! This crate exposes the retouch-core editor to the browser UI.
//!
//! # Module Structure
//!
//! - `editor` - The stateful editor session (`JsEditor`)
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Image decoding bindings (PNG, JPEG, GIF, WebP, BMP)
//! - `encode` - Image encoding bindings (PNG export)
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditor } from '@retouch/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const editor = new JsEditor();
//! editor.load_bytes(new Uint8Array(await file.arrayBuffer()));
//! editor.rotate();
//!
//! const png = editor.export_png();
//! download(new Blob([png], { type: 'image/png' }), editor.export_file_name());
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod editor;
mod encode;
mod types;

// Re-export public types
pub use decode::{decode_image, image_orientation};
pub use editor::JsEditor;
pub use encode::{encode_png, encode_png_from_image};
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
