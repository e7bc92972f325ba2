use eframe::egui::{Color32, Pos2, Rect};

pub const MIN_TEXT_SIZE: f32 = 10.0;
pub const MAX_TEXT_SIZE: f32 = 72.0;

/// Editor tools, each with its own options panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Text,
    Brush,
    Rectangle,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Text, Tool::Brush, Tool::Rectangle];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Text => "text",
            Tool::Brush => "brush",
            Tool::Rectangle => "rectangle",
        }
    }

    /// Catalog key for the toolbar button.
    pub fn label_key(self) -> &'static str {
        match self {
            Tool::Text => "tool-text",
            Tool::Brush => "tool-brush",
            Tool::Rectangle => "tool-rectangle",
        }
    }

    pub fn draws_by_drag(self) -> bool {
        matches!(self, Tool::Brush | Tool::Rectangle)
    }
}

/// Settings shown in the sidebar for the active tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOptions {
    pub text: String,
    pub text_color: Color32,
    pub text_size: f32,
    pub stroke_color: Color32,
    pub stroke_width: f32,
}

impl Default for ToolOptions {
    fn default() -> Self {
        Self {
            text: String::new(),
            text_color: Color32::WHITE,
            text_size: 24.0,
            stroke_color: Color32::from_rgb(0xff, 0x3b, 0x30),
            stroke_width: 4.0,
        }
    }
}

/// Overlay item. Coordinates and sizes are in image pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Text {
        pos: Pos2,
        content: String,
        color: Color32,
        size: f32,
    },
    Stroke {
        points: Vec<Pos2>,
        color: Color32,
        width: f32,
    },
    Rectangle {
        rect: Rect,
        color: Color32,
        width: f32,
    },
}

impl Annotation {
    pub fn text(pos: Pos2, content: &str, options: &ToolOptions) -> Self {
        Annotation::Text {
            pos,
            content: content.to_string(),
            color: options.text_color,
            size: options.text_size.clamp(MIN_TEXT_SIZE, MAX_TEXT_SIZE),
        }
    }

    /// Shape drawn by dragging along `path`, if the drag is long enough.
    pub fn from_drag(tool: Tool, path: &[Pos2], options: &ToolOptions) -> Option<Self> {
        let (first, last) = (*path.first()?, *path.last()?);
        match tool {
            Tool::Brush => (path.len() >= 2).then(|| Annotation::Stroke {
                points: path.to_vec(),
                color: options.stroke_color,
                width: options.stroke_width,
            }),
            Tool::Rectangle => {
                let rect = Rect::from_two_pos(first, last);
                (rect.width() > 0.0 && rect.height() > 0.0).then_some(Annotation::Rectangle {
                    rect,
                    color: options.stroke_color,
                    width: options.stroke_width,
                })
            }
            Tool::Text => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn only_brush_and_rectangle_draw_by_drag() {
        let dragging: Vec<_> = Tool::ALL
            .into_iter()
            .filter(|t| t.draws_by_drag())
            .map(Tool::name)
            .collect();
        assert_eq!(dragging, ["brush", "rectangle"]);
    }

    #[test]
    fn text_size_is_clamped() {
        let options = ToolOptions {
            text_size: 200.0,
            ..ToolOptions::default()
        };
        match Annotation::text(pos2(1.0, 1.0), "hi", &options) {
            Annotation::Text { size, color, .. } => {
                assert_eq!(size, MAX_TEXT_SIZE);
                assert_eq!(color, Color32::WHITE);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rectangle_is_normalized() {
        let options = ToolOptions::default();
        let drag = [pos2(30.0, 40.0), pos2(20.0, 25.0), pos2(10.0, 5.0)];
        let Some(Annotation::Rectangle { rect, .. }) =
            Annotation::from_drag(Tool::Rectangle, &drag, &options)
        else {
            panic!("expected rectangle");
        };
        assert_eq!(rect.min, pos2(10.0, 5.0));
        assert_eq!(rect.max, pos2(30.0, 40.0));
    }

    #[test]
    fn degenerate_drags_draw_nothing() {
        let options = ToolOptions::default();
        let click = [pos2(5.0, 5.0)];
        assert_eq!(Annotation::from_drag(Tool::Brush, &click, &options), None);
        assert_eq!(Annotation::from_drag(Tool::Rectangle, &click, &options), None);
        assert_eq!(Annotation::from_drag(Tool::Text, &click, &options), None);
        assert_eq!(Annotation::from_drag(Tool::Brush, &[], &options), None);
    }
}
