//! Annotation overlay for a loaded thumbnail.
//!
//! Annotations are only drawn over the image; the exported file is the
//! thumbnail itself re-encoded as JPEG.

mod annotation;
mod canvas;

pub use annotation::{Annotation, Tool, ToolOptions, MAX_TEXT_SIZE, MIN_TEXT_SIZE};
pub use canvas::show_canvas;

use eframe::egui::{ColorImage, Pos2, TextureHandle};
use thiserror::Error;

/// Default filename offered when saving the edited image.
pub const EDITED_FILENAME: &str = "edited-thumbnail.jpg";

const JPEG_QUALITY: u8 = 92;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no image loaded in the editor")]
    NoImage,
    #[error("JPEG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Pixels plus the texture already uploaded for them.
pub struct EditorImage {
    pub pixels: ColorImage,
    pub texture: TextureHandle,
}

impl EditorImage {
    pub fn size(&self) -> [usize; 2] {
        self.pixels.size
    }
}

#[derive(Default)]
pub struct EditorState {
    pub source_url: String,
    pub image: Option<EditorImage>,
    pub active_tool: Option<Tool>,
    pub options: ToolOptions,
    pub annotations: Vec<Annotation>,
    /// Last clicked point; new text is placed here.
    pub anchor: Option<Pos2>,
    drag: Vec<Pos2>,
}

impl EditorState {
    /// Replaces the image and drops everything drawn on the previous one.
    pub fn open(&mut self, source_url: &str, image: EditorImage) {
        self.source_url = source_url.to_string();
        self.image = Some(image);
        self.annotations.clear();
        self.anchor = None;
        self.drag.clear();
    }

    pub fn is_open(&self) -> bool {
        self.image.is_some()
    }

    pub fn close(&mut self) {
        *self = EditorState {
            options: std::mem::take(&mut self.options),
            active_tool: self.active_tool,
            ..EditorState::default()
        };
    }

    pub fn select_tool(&mut self, tool: Tool) {
        self.active_tool = Some(tool);
        self.drag.clear();
    }

    /// Adds the text from the options panel at the anchor, or the image
    /// centre. Blank text is ignored.
    pub fn add_text(&mut self) -> bool {
        let content = self.options.text.trim();
        if content.is_empty() {
            return false;
        }
        let Some(image) = &self.image else {
            return false;
        };
        let [w, h] = image.size();
        let pos = self
            .anchor
            .unwrap_or(Pos2::new(w as f32 / 2.0, h as f32 / 2.0));
        self.annotations
            .push(Annotation::text(pos, content, &self.options));
        true
    }

    pub fn undo(&mut self) -> Option<Annotation> {
        self.annotations.pop()
    }

    pub fn clear(&mut self) {
        self.annotations.clear();
        self.drag.clear();
    }

    pub fn set_anchor(&mut self, pos: Pos2) {
        self.anchor = Some(pos);
    }

    pub fn begin_drag(&mut self, pos: Pos2) {
        self.drag.clear();
        if self.active_tool.is_some_and(Tool::draws_by_drag) {
            self.drag.push(pos);
        }
    }

    pub fn drag_to(&mut self, pos: Pos2) {
        if self.drag.is_empty() {
            return;
        }
        match self.active_tool {
            Some(Tool::Rectangle) if self.drag.len() > 1 => {
                if let Some(last) = self.drag.last_mut() {
                    *last = pos;
                }
            }
            _ => self.drag.push(pos),
        }
    }

    pub fn finish_drag(&mut self) {
        if let Some(a) = self.drag_preview() {
            self.annotations.push(a);
        }
        self.drag.clear();
    }

    /// The shape the in-progress drag would commit.
    pub fn drag_preview(&self) -> Option<Annotation> {
        Annotation::from_drag(self.active_tool?, &self.drag, &self.options)
    }

    /// Encodes the loaded image as JPEG. Annotations are not rasterized.
    pub fn export_jpeg(&self) -> Result<Vec<u8>, ExportError> {
        let image = self.image.as_ref().ok_or(ExportError::NoImage)?;
        encode_jpeg(&image.pixels)
    }
}

pub fn encode_jpeg(pixels: &ColorImage) -> Result<Vec<u8>, ExportError> {
    let [w, h] = pixels.size;
    let raw: Vec<u8> = pixels
        .pixels
        .iter()
        .flat_map(|c| {
            let [r, g, b, _] = c.to_srgba_unmultiplied();
            [r, g, b]
        })
        .collect();
    let rgb = image::RgbImage::from_raw(w as u32, h as u32, raw).ok_or_else(|| {
        image::ImageError::Parameter(image::error::ParameterError::from_kind(
            image::error::ParameterErrorKind::DimensionMismatch,
        ))
    })?;
    let mut out = std::io::Cursor::new(Vec::new());
    rgb.write_to(&mut out, image::ImageOutputFormat::Jpeg(JPEG_QUALITY))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, Color32, Context, TextureOptions};

    fn state_with_image(w: usize, h: usize) -> EditorState {
        let ctx = Context::default();
        let pixels = ColorImage::new([w, h], Color32::from_rgb(40, 80, 120));
        let texture = ctx.load_texture("test", pixels.clone(), TextureOptions::default());
        let mut state = EditorState::default();
        state.open("https://img.youtube.com/vi/x/default.jpg", EditorImage { pixels, texture });
        state
    }

    #[test]
    fn text_goes_to_centre_without_anchor() {
        let mut state = state_with_image(120, 90);
        state.select_tool(Tool::Text);
        state.options.text = "  Hello ".to_string();
        assert!(state.add_text());
        match &state.annotations[0] {
            Annotation::Text { pos, content, size, .. } => {
                assert_eq!(*pos, pos2(60.0, 45.0));
                assert_eq!(content, "Hello");
                assert_eq!(*size, 24.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn text_goes_to_anchor_and_blank_is_ignored() {
        let mut state = state_with_image(120, 90);
        state.options.text = "   ".to_string();
        assert!(!state.add_text());
        state.options.text = "Hi".to_string();
        state.set_anchor(pos2(3.0, 4.0));
        assert!(state.add_text());
        assert!(matches!(state.annotations[0], Annotation::Text { pos, .. } if pos == pos2(3.0, 4.0)));
    }

    #[test]
    fn add_text_needs_an_image() {
        let mut state = EditorState::default();
        state.options.text = "Hi".to_string();
        assert!(!state.add_text());
    }

    #[test]
    fn brush_drag_commits_a_stroke() {
        let mut state = state_with_image(50, 50);
        state.select_tool(Tool::Brush);
        state.begin_drag(pos2(1.0, 1.0));
        state.drag_to(pos2(2.0, 2.0));
        state.drag_to(pos2(3.0, 5.0));
        state.finish_drag();
        match &state.annotations[..] {
            [Annotation::Stroke { points, .. }] => assert_eq!(points.len(), 3),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(state.drag_preview(), None);
    }

    #[test]
    fn rectangle_drag_keeps_only_the_corners() {
        let mut state = state_with_image(50, 50);
        state.select_tool(Tool::Rectangle);
        state.begin_drag(pos2(10.0, 10.0));
        state.drag_to(pos2(20.0, 15.0));
        state.drag_to(pos2(30.0, 40.0));
        state.finish_drag();
        assert!(matches!(
            &state.annotations[..],
            [Annotation::Rectangle { rect, .. }] if rect.max == pos2(30.0, 40.0)
        ));
    }

    #[test]
    fn drags_without_a_drawing_tool_do_nothing() {
        let mut state = state_with_image(50, 50);
        state.begin_drag(pos2(1.0, 1.0));
        state.drag_to(pos2(9.0, 9.0));
        state.finish_drag();
        state.select_tool(Tool::Text);
        state.begin_drag(pos2(1.0, 1.0));
        state.drag_to(pos2(9.0, 9.0));
        state.finish_drag();
        assert!(state.annotations.is_empty());
    }

    #[test]
    fn undo_and_clear() {
        let mut state = state_with_image(50, 50);
        state.options.text = "a".to_string();
        state.add_text();
        state.add_text();
        assert!(state.undo().is_some());
        assert_eq!(state.annotations.len(), 1);
        state.clear();
        assert!(state.annotations.is_empty());
        assert!(state.undo().is_none());
    }

    #[test]
    fn reopening_drops_old_annotations_but_close_keeps_options() {
        let mut state = state_with_image(50, 50);
        state.options.text = "a".to_string();
        state.add_text();
        state.close();
        assert!(!state.is_open());
        assert!(state.annotations.is_empty());
        assert_eq!(state.options.text, "a");
    }

    #[test]
    fn export_without_image_fails() {
        assert!(matches!(
            EditorState::default().export_jpeg(),
            Err(ExportError::NoImage)
        ));
    }

    #[test]
    fn export_produces_decodable_jpeg() {
        let state = state_with_image(16, 8);
        let bytes = state.export_jpeg().unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }
}
