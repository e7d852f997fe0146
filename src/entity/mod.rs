//! Drawable, pointer-interactive objects on the map.
//!
//! An entity owns its bounds and a few interaction flags. The host loop
//! ([`crate::canvas::Canvas`]) only ever sees the [`Entity`] capability set,
//! so any kind of sprite can share one event-routing loop.

pub mod player;

pub use player::{PlayerEntity, PlayerSprite};

use egui::{Color32, TextureId};

use crate::geometry::{Rectangle, Vector};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Secondary,
    Middle,
    Other,
}

/// Raw pointer input, already in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { button: MouseButton, point: Vector },
    Move(Vector),
    Up { button: MouseButton, point: Vector },
    DoubleClick(Vector),
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// Borrowed handle to a sprite sheet texture. Entities read sub-rectangles
/// from it and never free it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteSheet {
    pub texture: TextureId,
    pub width: f32,
    pub height: f32,
}

/// Glow drawn behind subsequent content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub blur: f32,
    pub color: Color32,
}

/// The shared drawing target handed to entities during the render pass.
///
/// Mirrors a 2-D canvas context: state (currently only the shadow) is pushed
/// with [`Surface::save`] and popped with [`Surface::restore`].
pub trait Surface {
    fn save(&mut self);
    fn restore(&mut self);
    fn set_shadow(&mut self, shadow: Shadow);
    fn stroke_rect(&mut self, rect: &Rectangle, color: Color32);
    /// Rendered width of `text` in world units.
    fn measure_text(&mut self, text: &str) -> f32;
    /// Outlined text with its top-left corner at `position`.
    fn draw_stroke_text(&mut self, position: Vector, text: &str);
    /// Draw the `source` region of `sheet` scaled into `dest`.
    fn draw_image(&mut self, sheet: &SpriteSheet, source: &Rectangle, dest: &Rectangle);
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

pub const DEBUG_COLOR: Color32 = Color32::from_rgb(255, 0, 255);

/// State every entity carries.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCore {
    pub rect: Rectangle,
    /// Draw the bounding box.
    pub debug: bool,
    /// The pointer currently controls this entity.
    pub active: bool,
    /// Pointer interaction is permitted at all.
    pub draggable: bool,
}

impl EntityCore {
    pub fn new(rect: Rectangle, debug: bool) -> Self {
        Self {
            rect,
            debug,
            active: false,
            draggable: true,
        }
    }

    pub fn hit(&self, point: Vector) -> bool {
        self.rect.contains_point(point)
    }

    /// Base render: the debug bounding box, nothing else.
    pub fn render(&self, surface: &mut dyn Surface) {
        if self.debug {
            surface.stroke_rect(&self.rect, DEBUG_COLOR);
        }
    }
}

/// Capability set shared by everything the host loop drives.
///
/// Implementors that override [`Entity::render`] call
/// [`EntityCore::render`] first and draw their own content after it.
/// Every pointer hook returns whether it consumed the event.
pub trait Entity {
    fn core(&self) -> &EntityCore;
    fn core_mut(&mut self) -> &mut EntityCore;

    fn render(&self, surface: &mut dyn Surface) {
        self.core().render(surface);
    }

    fn on_mouse_move(&mut self, _point: Vector) -> bool {
        false
    }

    fn on_mouse_down(&mut self, _button: MouseButton, _point: Vector) -> bool {
        false
    }

    fn on_mouse_up(&mut self, _button: MouseButton, _point: Vector) -> bool {
        false
    }

    fn on_double_click(&mut self, _point: Vector) -> bool {
        false
    }

    /// Route one event to the matching hook.
    fn handle(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { button, point } => self.on_mouse_down(button, point),
            PointerEvent::Move(point) => self.on_mouse_move(point),
            PointerEvent::Up { button, point } => self.on_mouse_up(button, point),
            PointerEvent::DoubleClick(point) => self.on_double_click(point),
        }
    }
}

impl<E: Entity + ?Sized> Entity for Box<E> {
    fn core(&self) -> &EntityCore {
        (**self).core()
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        (**self).core_mut()
    }

    fn render(&self, surface: &mut dyn Surface) {
        (**self).render(surface);
    }

    fn on_mouse_move(&mut self, point: Vector) -> bool {
        (**self).on_mouse_move(point)
    }

    fn on_mouse_down(&mut self, button: MouseButton, point: Vector) -> bool {
        (**self).on_mouse_down(button, point)
    }

    fn on_mouse_up(&mut self, button: MouseButton, point: Vector) -> bool {
        (**self).on_mouse_up(button, point)
    }

    fn on_double_click(&mut self, point: Vector) -> bool {
        (**self).on_double_click(point)
    }
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------


#[cfg(test)]
mod tests {
    use super::recording::{Call, RecordingSurface};
    use super::*;

    /// Entity that relies entirely on the default hooks.
    struct Inert(EntityCore);

    impl Entity for Inert {
        fn core(&self) -> &EntityCore {
            &self.0
        }

        fn core_mut(&mut self) -> &mut EntityCore {
            &mut self.0
        }
    }

    #[test]
    fn default_hooks_consume_nothing() {
        let mut e = Inert(EntityCore::new(Rectangle::from_xywh(0.0, 0.0, 10.0, 10.0), false));
        let inside = Vector::new(5.0, 5.0);
        assert!(!e.on_mouse_down(MouseButton::Primary, inside));
        assert!(!e.on_mouse_move(inside));
        assert!(!e.on_mouse_up(MouseButton::Primary, inside));
        assert!(!e.on_double_click(inside));
        assert!(!e.core().active);
    }

    #[test]
    fn base_render_draws_debug_box_only_when_enabled() {
        let rect = Rectangle::from_xywh(1.0, 2.0, 3.0, 4.0);
        let mut surface = RecordingSurface::default();

        Inert(EntityCore::new(rect, false)).render(&mut surface);
        assert!(surface.calls.is_empty());

        Inert(EntityCore::new(rect, true)).render(&mut surface);
        assert_eq!(surface.calls, vec![Call::StrokeRect(rect)]);
    }

    #[test]
    fn boxed_entities_forward_hooks() {
        let mut boxed: Box<dyn Entity> = Box::new(Inert(EntityCore::new(
            Rectangle::from_xywh(0.0, 0.0, 1.0, 1.0),
            false,
        )));
        assert!(!boxed.handle(PointerEvent::DoubleClick(Vector::ZERO)));
        boxed.core_mut().debug = true;
        assert!(boxed.core().debug);
    }
}
