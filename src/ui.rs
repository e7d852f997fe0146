//! UI / rendering helpers.
//!
//! This module owns everything that depends on `egui` for presentation:
//! the [`Surface`] implementation over a [`egui::Painter`], the world/screen
//! transform, pointer translation, and the generated textures. Entity logic
//! never lives here.

use egui::{Align2, Color32, ColorImage, FontId, Painter, Pos2, Rect, Stroke, pos2, vec2};

use crate::entity::{MouseButton, PlayerSprite, PointerEvent, Shadow, SpriteSheet, Surface};
use crate::geometry::{Rectangle, Vector};
use crate::roster::PlayerColor;

/// Size of the map background in world units.
pub const WORLD_SIZE: Vector = Vector::new(1000.0, 560.0);

/// Name label size in world units.
const NAME_FONT_SIZE: f32 = 14.0;

// ---------------------------------------------------------------------------
// World ↔ screen
// ---------------------------------------------------------------------------

/// Uniform scale plus offset placing the world inside a screen rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub origin: Pos2,
    pub scale: f32,
}

impl MapView {
    /// Largest view of `world` that fits in `available`, centered.
    pub fn fit(available: Rect, world: Vector) -> Self {
        let scale = (available.width() / world.x)
            .min(available.height() / world.y)
            .max(f32::EPSILON);
        let used = vec2(world.x * scale, world.y * scale);
        Self {
            origin: available.center() - used / 2.0,
            scale,
        }
    }

    pub fn to_screen(&self, point: Vector) -> Pos2 {
        self.origin + vec2(point.x * self.scale, point.y * self.scale)
    }

    pub fn to_world(&self, pos: Pos2) -> Vector {
        Vector::new(
            (pos.x - self.origin.x) / self.scale,
            (pos.y - self.origin.y) / self.scale,
        )
    }

    pub fn rect_to_screen(&self, rect: &Rectangle) -> Rect {
        Rect::from_min_size(
            self.to_screen(rect.position()),
            vec2(rect.width() * self.scale, rect.height() * self.scale),
        )
    }
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// [`Surface`] drawing through an egui painter in world coordinates.
pub struct PainterSurface<'a> {
    painter: &'a Painter,
    view: MapView,
    font: FontId,
    shadow: Option<Shadow>,
    saved: Vec<Option<Shadow>>,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a Painter, view: MapView) -> Self {
        Self {
            painter,
            view,
            font: FontId::proportional(NAME_FONT_SIZE * view.scale),
            shadow: None,
            saved: Vec::new(),
        }
    }

    fn glow(&self, rect: Rect, shadow: Shadow) {
        let steps = 5;
        for i in (1..=steps).rev() {
            let t = i as f32 / steps as f32;
            let alpha = ((1.0 - t) * 90.0 + 10.0) as u8;
            let color = Color32::from_rgba_unmultiplied(
                shadow.color.r(),
                shadow.color.g(),
                shadow.color.b(),
                alpha,
            );
            let grow = shadow.blur * self.view.scale * t;
            self.painter.rect_filled(rect.expand(grow), grow, color);
        }
    }
}

impl PainterSurface<'_> {
    /// Halo behind a text run: faint copies on a ring sized by the blur.
    fn text_glow(&self, pos: Pos2, text: &str, shadow: Shadow) {
        let color = Color32::from_rgba_unmultiplied(
            shadow.color.r(),
            shadow.color.g(),
            shadow.color.b(),
            40,
        );
        let radius = shadow.blur * self.view.scale * 0.2;
        for step in 0..8 {
            let angle = step as f32 * std::f32::consts::FRAC_PI_4;
            self.painter.text(
                pos + vec2(angle.cos(), angle.sin()) * radius,
                Align2::LEFT_TOP,
                text,
                self.font.clone(),
                color,
            );
        }
    }
}

impl Surface for PainterSurface<'_> {
    fn save(&mut self) {
        self.saved.push(self.shadow);
    }

    fn restore(&mut self) {
        self.shadow = self.saved.pop().flatten();
    }

    fn set_shadow(&mut self, shadow: Shadow) {
        self.shadow = Some(shadow);
    }

    fn stroke_rect(&mut self, rect: &Rectangle, color: Color32) {
        self.painter.rect_stroke(
            self.view.rect_to_screen(rect),
            0.0,
            Stroke::new(1.0, color),
            egui::StrokeKind::Inside,
        );
    }

    fn measure_text(&mut self, text: &str) -> f32 {
        let galley = self
            .painter
            .layout_no_wrap(text.to_owned(), self.font.clone(), Color32::WHITE);
        galley.size().x / self.view.scale
    }

    fn draw_stroke_text(&mut self, position: Vector, text: &str) {
        let pos = self.view.to_screen(position);
        if let Some(shadow) = self.shadow {
            self.text_glow(pos, text, shadow);
        }
        for (dx, dy) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
            self.painter.text(
                pos + vec2(dx, dy),
                Align2::LEFT_TOP,
                text,
                self.font.clone(),
                Color32::BLACK,
            );
        }
        self.painter
            .text(pos, Align2::LEFT_TOP, text, self.font.clone(), Color32::WHITE);
    }

    fn draw_image(&mut self, sheet: &SpriteSheet, source: &Rectangle, dest: &Rectangle) {
        let rect = self.view.rect_to_screen(dest);
        if let Some(shadow) = self.shadow {
            self.glow(rect, shadow);
        }
        let uv = Rect::from_min_max(
            pos2(source.x() / sheet.width, source.y() / sheet.height),
            pos2(
                (source.x() + source.width()) / sheet.width,
                (source.y() + source.height()) / sheet.height,
            ),
        );
        self.painter.image(sheet.texture, rect, uv, Color32::WHITE);
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

impl From<egui::PointerButton> for MouseButton {
    fn from(button: egui::PointerButton) -> Self {
        match button {
            egui::PointerButton::Primary => Self::Primary,
            egui::PointerButton::Secondary => Self::Secondary,
            egui::PointerButton::Middle => Self::Middle,
            egui::PointerButton::Extra1 | egui::PointerButton::Extra2 => Self::Other,
        }
    }
}

/// Translate this frame's raw input into world-space pointer events.
///
/// Presses and double clicks only count over `map_rect`; moves and releases
/// are forwarded from anywhere so a drag can always finish.
pub fn pointer_events(input: &egui::InputState, view: &MapView, map_rect: Rect) -> Vec<PointerEvent> {
    let mut events = Vec::new();

    for event in &input.events {
        match event {
            egui::Event::PointerMoved(pos) => {
                events.push(PointerEvent::Move(view.to_world(*pos)));
            }
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                ..
            } => {
                let point = view.to_world(*pos);
                let button = MouseButton::from(*button);
                if !*pressed {
                    events.push(PointerEvent::Up { button, point });
                } else if map_rect.contains(*pos) {
                    events.push(PointerEvent::Down { button, point });
                }
            }
            _ => {}
        }
    }

    if input.pointer.button_double_clicked(egui::PointerButton::Primary)
        && let Some(pos) = input.pointer.interact_pos()
        && map_rect.contains(pos)
    {
        events.push(PointerEvent::DoubleClick(view.to_world(pos)));
    }

    events
}

// ---------------------------------------------------------------------------
// Generated art
// ---------------------------------------------------------------------------

/// Swatch color for a seat.
pub fn color_of(color: PlayerColor) -> Color32 {
    match color {
        PlayerColor::Red => Color32::from_rgb(197, 17, 17),
        PlayerColor::Blue => Color32::from_rgb(100, 149, 237),
        PlayerColor::Green => Color32::from_rgb(17, 127, 45),
        PlayerColor::Pink => Color32::from_rgb(237, 84, 186),
        PlayerColor::Orange => Color32::from_rgb(239, 125, 14),
        PlayerColor::Yellow => Color32::from_rgb(246, 246, 88),
        PlayerColor::Black => Color32::from_rgb(63, 71, 78),
        PlayerColor::White => Color32::from_rgb(214, 224, 240),
        PlayerColor::Purple => Color32::from_rgb(153, 50, 204),
        PlayerColor::Brown => Color32::from_rgb(139, 69, 19),
        PlayerColor::Cyan => Color32::from_rgb(56, 254, 220),
        PlayerColor::Lime => Color32::from_rgb(80, 239, 57),
    }
}

const CELL_W: usize = 40;
const ALIVE_H: usize = 52;
const DEAD_H: usize = 34;
const SHEET_W: usize = CELL_W * 2;
const SHEET_H: usize = ALIVE_H * PlayerColor::ALL.len();

/// Alive and dead regions for `color` on the generated sheet.
pub fn sprite_rects(color: PlayerColor) -> (Rectangle, Rectangle) {
    let top = (color.index() * ALIVE_H) as f32;
    (
        Rectangle::from_xywh(0.0, top, CELL_W as f32, ALIVE_H as f32),
        Rectangle::from_xywh(CELL_W as f32, top, CELL_W as f32, DEAD_H as f32),
    )
}

pub fn player_sprite(sheet: SpriteSheet, color: PlayerColor) -> PlayerSprite {
    let (alive, dead) = sprite_rects(color);
    PlayerSprite { sheet, alive, dead }
}

/// One row per seat: a standing crewmate, then a body.
pub fn sprite_sheet_image() -> ColorImage {
    let mut rgba = vec![0_u8; SHEET_W * SHEET_H * 4];
    let visor = Color32::from_rgb(150, 202, 221);
    let bone = Color32::from_rgb(240, 240, 230);

    for color in PlayerColor::ALL {
        let body = color_of(color);
        let top = color.index() * ALIVE_H;

        for y in 0..ALIVE_H {
            for x in 0..CELL_W {
                let pixel = crewmate_pixel(x, y, body, visor);
                put(&mut rgba, x, top + y, pixel);
            }
        }
        for y in 0..DEAD_H {
            for x in 0..CELL_W {
                let pixel = body_pixel(x, y, body, bone);
                put(&mut rgba, CELL_W + x, top + y, pixel);
            }
        }
    }

    ColorImage::from_rgba_unmultiplied([SHEET_W, SHEET_H], &rgba)
}

pub fn sheet_size() -> (f32, f32) {
    (SHEET_W as f32, SHEET_H as f32)
}

fn put(rgba: &mut [u8], x: usize, y: usize, color: Option<Color32>) {
    let Some(color) = color else {
        return;
    };
    let i = (y * SHEET_W + x) * 4;
    if let Some(px) = rgba.get_mut(i..i + 4) {
        px.copy_from_slice(&color.to_array());
    }
}

fn crewmate_pixel(x: usize, y: usize, body: Color32, visor: Color32) -> Option<Color32> {
    let (fx, fy) = (x as f32, y as f32);
    let in_visor = (18.0..34.0).contains(&fx) && (10.0..20.0).contains(&fy);
    let in_body = (6.0..32.0).contains(&fx) && (2.0..44.0).contains(&fy);
    let in_pack = (2.0..8.0).contains(&fx) && (14.0..34.0).contains(&fy);
    let in_legs = (y >= 44) && ((8..16).contains(&x) || (22..30).contains(&x));
    if in_visor {
        Some(visor)
    } else if in_body || in_pack || in_legs {
        Some(body)
    } else {
        None
    }
}

fn body_pixel(x: usize, y: usize, body: Color32, bone: Color32) -> Option<Color32> {
    let in_bone = (18..22).contains(&x) && (2..14).contains(&y);
    let in_half = (4..36).contains(&x) && (12..DEAD_H).contains(&y);
    if in_bone {
        Some(bone)
    } else if in_half {
        Some(body)
    } else {
        None
    }
}

/// Rooms of the backdrop, world units.
const ROOMS: [(f32, f32, f32, f32); 6] = [
    (60.0, 60.0, 220.0, 150.0),
    (400.0, 40.0, 220.0, 180.0),
    (740.0, 60.0, 200.0, 150.0),
    (60.0, 330.0, 220.0, 170.0),
    (400.0, 320.0, 220.0, 190.0),
    (740.0, 330.0, 200.0, 170.0),
];

/// Paint the map backdrop under the entities.
pub fn paint_background(painter: &Painter, view: &MapView) {
    let world = Rectangle::from_xywh(0.0, 0.0, WORLD_SIZE.x, WORLD_SIZE.y);
    painter.rect_filled(view.rect_to_screen(&world), 4.0, Color32::from_rgb(22, 26, 36));

    let hall = Color32::from_rgb(48, 54, 70);
    let corridors = [
        Rectangle::from_xywh(160.0, 120.0, 680.0, 40.0),
        Rectangle::from_xywh(160.0, 400.0, 680.0, 40.0),
        Rectangle::from_xywh(490.0, 140.0, 40.0, 280.0),
    ];
    for corridor in &corridors {
        painter.rect_filled(view.rect_to_screen(corridor), 0.0, hall);
    }

    let floor = Color32::from_rgb(70, 78, 98);
    for (x, y, w, h) in ROOMS {
        let room = Rectangle::from_xywh(x, y, w, h);
        painter.rect_filled(view.rect_to_screen(&room), 6.0, floor);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
