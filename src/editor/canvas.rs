use eframe::egui::{
    pos2, vec2, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke, Ui, Vec2,
};

use super::{Annotation, EditorState};

/// Largest on-screen size for the image, keeping its aspect ratio.
/// Never scales up.
pub fn fit_size(image_size: [usize; 2], available: Vec2) -> Vec2 {
    let size = vec2(image_size[0] as f32, image_size[1] as f32);
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec2::ZERO;
    }
    let scale = (available.x / size.x).min(available.y / size.y).min(1.0);
    size * scale.max(0.0)
}

fn image_to_screen(p: Pos2, image_rect: Rect, scale: f32) -> Pos2 {
    image_rect.min + p.to_vec2() * scale
}

fn screen_to_image(p: Pos2, image_rect: Rect, scale: f32) -> Pos2 {
    ((p - image_rect.min) / scale).to_pos2()
}

pub fn show_canvas(ui: &mut Ui, state: &mut EditorState, max_height: f32) {
    let Some(image) = state.image.as_ref() else {
        ui.spinner();
        return;
    };
    let texture_id = image.texture.id();
    let image_size = image.size();

    let shown = fit_size(image_size, vec2(ui.available_width(), max_height));
    if shown == Vec2::ZERO {
        return;
    }
    let (response, painter) = ui.allocate_painter(shown, Sense::click_and_drag());
    let image_rect = response.rect;
    let scale = image_rect.width() / image_size[0] as f32;

    painter.image(
        texture_id,
        image_rect,
        Rect::from_min_max(Pos2::ZERO, pos2(1.0, 1.0)),
        Color32::WHITE,
    );
    for annotation in &state.annotations {
        draw_annotation(&painter, annotation, image_rect, scale, false);
    }
    if let Some(preview) = state.drag_preview() {
        draw_annotation(&painter, &preview, image_rect, scale, true);
    }
    if let Some(anchor) = state.anchor {
        draw_anchor(&painter, image_to_screen(anchor, image_rect, scale));
    }

    if let Some(pointer) = response.interact_pointer_pos() {
        let p = screen_to_image(pointer, image_rect, scale);
        if response.drag_started() {
            state.begin_drag(p);
        } else if response.dragged() {
            state.drag_to(p);
        }
        if response.clicked() {
            state.set_anchor(p);
        }
    }
    if response.drag_stopped() {
        state.finish_drag();
    }
}

fn draw_annotation(
    painter: &Painter,
    annotation: &Annotation,
    image_rect: Rect,
    scale: f32,
    preview: bool,
) {
    let tint = |c: Color32| if preview { c.linear_multiply(0.7) } else { c };
    match annotation {
        Annotation::Text {
            pos,
            content,
            color,
            size,
        } => {
            painter.text(
                image_to_screen(*pos, image_rect, scale),
                Align2::CENTER_CENTER,
                content,
                FontId::proportional((size * scale).max(6.0)),
                tint(*color),
            );
        }
        Annotation::Stroke {
            points,
            color,
            width,
        } => {
            let screen = points
                .iter()
                .map(|p| image_to_screen(*p, image_rect, scale))
                .collect();
            painter.add(Shape::line(
                screen,
                Stroke::new((width * scale).max(1.0), tint(*color)),
            ));
        }
        Annotation::Rectangle { rect, color, width } => {
            let screen = Rect::from_min_max(
                image_to_screen(rect.min, image_rect, scale),
                image_to_screen(rect.max, image_rect, scale),
            );
            painter.rect_stroke(
                screen,
                0.0,
                Stroke::new((width * scale).max(1.0), tint(*color)),
            );
        }
    }
}

fn draw_anchor(painter: &Painter, at: Pos2) {
    let stroke = Stroke::new(1.5, Color32::from_rgb(77, 141, 255));
    painter.line_segment([at - vec2(6.0, 0.0), at + vec2(6.0, 0.0)], stroke);
    painter.line_segment([at - vec2(0.0, 6.0), at + vec2(0.0, 6.0)], stroke);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_keeps_aspect_and_never_upscales() {
        assert_eq!(fit_size([1280, 720], vec2(640.0, 1000.0)), vec2(640.0, 360.0));
        assert_eq!(fit_size([1280, 720], vec2(2000.0, 360.0)), vec2(640.0, 360.0));
        assert_eq!(fit_size([120, 90], vec2(2000.0, 2000.0)), vec2(120.0, 90.0));
        assert_eq!(fit_size([0, 90], vec2(100.0, 100.0)), Vec2::ZERO);
    }

    #[test]
    fn screen_and_image_coordinates_invert() {
        let rect = Rect::from_min_size(pos2(100.0, 50.0), vec2(640.0, 360.0));
        let p = pos2(320.0, 180.0);
        let screen = image_to_screen(p, rect, 0.5);
        assert_eq!(screen, pos2(260.0, 140.0));
        assert_eq!(screen_to_image(screen, rect, 0.5), p);
    }
}
