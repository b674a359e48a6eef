use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};
use kitab_roots::corpus::Category;

pub(super) fn category_color(category: Category) -> Color32 {
    match category {
        Category::Revelation => Color32::from_rgb(0xD4, 0xAF, 0x37),
        Category::Witness => Color32::from_rgb(0x4A, 0x90, 0xD9),
        Category::Inscription => Color32::from_rgb(0x2E, 0x8B, 0x57),
        Category::SelfHood => Color32::from_rgb(0xDC, 0x14, 0x3C),
        Category::Dwelling => Color32::from_rgb(0x8B, 0x45, 0x13),
        Category::Speech => Color32::from_rgb(0x00, 0xCE, 0xD1),
        Category::Rupture => Color32::from_rgb(0x8B, 0x00, 0x00),
        Category::Time => Color32::from_rgb(0x70, 0x80, 0x90),
        Category::Relation => Color32::from_rgb(0xFF, 0x69, 0xB4),
        Category::Intention => Color32::from_rgb(0xDD, 0xA0, 0xDD),
        Category::Orientation => Color32::from_rgb(0x9A, 0xCD, 0x32),
        Category::Origin => Color32::from_rgb(0xFF, 0x63, 0x47),
        Category::Truth => Color32::from_rgb(0xFA, 0xFA, 0xD2),
        Category::Light => Color32::from_rgb(0xFF, 0xD7, 0x00),
        Category::Perception => Color32::from_rgb(0x7B, 0x68, 0xEE),
        Category::Unity => Color32::from_rgb(0xFF, 0xFF, 0xFF),
        Category::Structure => Color32::from_rgb(0xB0, 0xC4, 0xDE),
        Category::Unknown => Color32::from_rgb(0x66, 0x66, 0x66),
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

/// Faint fill for a root tag, the category colour at low opacity.
pub(super) fn tag_fill(color: Color32) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 0x22)
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 8.0, Color32::from_rgb(28, 25, 23));

    let step = (64.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(80, 70, 60, 50));

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Layout space is centred on `origin`, the middle of the layout canvas.
pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, origin: Vec2, world: Vec2) -> Pos2 {
    rect.center() + pan + (world - origin) * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, origin: Vec2, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom + origin
}
