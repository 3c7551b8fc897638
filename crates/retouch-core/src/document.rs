//! The editable document: base image, rotation and text annotations.

use std::sync::Arc;

use crate::decode::DecodedImage;
use crate::geometry::{Rotation, Size};
use crate::tools::{AnnotationId, TextAnnotation};

/// One committed editor state.
///
/// The bitmap is shared between snapshots; an upload or crop swaps in a new
/// one rather than mutating it. The native size is always read from the
/// bitmap itself, so the two cannot disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub image: Arc<DecodedImage>,
    pub rotation: Rotation,
    /// Paint order: later annotations draw on top.
    pub text_annotations: Vec<TextAnnotation>,
}

impl Document {
    /// A fresh document for a newly loaded bitmap.
    pub fn new(image: DecodedImage) -> Self {
        Self {
            image: Arc::new(image),
            rotation: Rotation::NONE,
            text_annotations: Vec::new(),
        }
    }

    pub fn native_size(&self) -> Size {
        Size::from_pixels(self.image.width, self.image.height)
    }

    pub fn native_dimensions(&self) -> (u32, u32) {
        (self.image.width, self.image.height)
    }

    pub fn annotation(&self, id: AnnotationId) -> Option<&TextAnnotation> {
        self.text_annotations.iter().find(|a| a.id == id)
    }

    pub fn with_rotation(&self, rotation: Rotation) -> Self {
        Self {
            rotation,
            ..self.clone()
        }
    }

    pub fn with_annotations(&self, text_annotations: Vec<TextAnnotation>) -> Self {
        Self {
            text_annotations,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::tools::TextStyle;

    #[test]
    fn test_native_size_follows_image() {
        let doc = Document::new(DecodedImage::filled(1000, 500, [0, 0, 0, 255]));
        assert_eq!(doc.native_size(), Size::new(1000.0, 500.0));
        assert_eq!(doc.native_dimensions(), (1000, 500));
        assert_eq!(doc.rotation, Rotation::NONE);
        assert!(doc.text_annotations.is_empty());
    }

    #[test]
    fn test_derived_documents_share_the_bitmap() {
        let doc = Document::new(DecodedImage::filled(4, 4, [1, 2, 3, 255]));
        let rotated = doc.with_rotation(Rotation::new(90));
        assert!(Arc::ptr_eq(&doc.image, &rotated.image));
        assert_eq!(rotated.rotation.degrees(), 90);

        let a = TextAnnotation::new("hi", Point::new(1.0, 2.0), TextStyle::default()).unwrap();
        let annotated = rotated.with_annotations(vec![a.clone()]);
        assert_eq!(annotated.annotation(a.id), Some(&a));
        assert!(Arc::ptr_eq(&doc.image, &annotated.image));
    }
}
