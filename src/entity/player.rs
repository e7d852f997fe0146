//! The participant sprite on the map.
//!
//! Life state is never stored: it is read off `data.section` against the
//! configured [`SectionIds`]. A double click toggles alive/dead by rewriting
//! section membership in the shared store; the entity itself only changes
//! when the host pushes fresh data through [`PlayerEntity::update_player`].

use egui::Color32;
use log::debug;

use super::{Entity, EntityCore, MouseButton, Shadow, SpriteSheet, Surface};
use crate::geometry::{Rectangle, Vector};
use crate::roster::{self, PlayerData, SectionIds, SharedStore};

/// Gap between the top of the sprite and the name's top edge.
const NAME_OFFSET: f32 = 20.0;

const ACTIVE_GLOW: Shadow = Shadow {
    blur: 15.0,
    color: Color32::from_rgb(0xC2, 0xD2, 0xE3),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeState {
    Unused,
    Alive,
    Dead,
}

/// Where a participant's two looks live on the shared sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSprite {
    pub sheet: SpriteSheet,
    pub alive: Rectangle,
    pub dead: Rectangle,
}

pub struct PlayerEntity {
    core: EntityCore,
    data: PlayerData,
    sections: SectionIds,
    sprite: PlayerSprite,
    image_rect: Rectangle,
    store: SharedStore,
}

impl PlayerEntity {
    pub fn new(
        data: PlayerData,
        position: Vector,
        sections: SectionIds,
        sprite: PlayerSprite,
        store: SharedStore,
        debug: bool,
    ) -> Self {
        let rect = Rectangle::new(position, sprite.alive.width(), sprite.alive.height());
        let mut player = Self {
            core: EntityCore::new(rect, debug),
            image_rect: sprite.alive,
            data,
            sections,
            sprite,
            store,
        };
        let data = player.data.clone();
        player.update_player(data, sections);
        player
    }

    /// Take in new participant data and section ids.
    ///
    /// Recomputes `draggable` and the sprite region, and resizes the bounds
    /// to match; the position is left alone. Safe to call mid-drag.
    pub fn update_player(&mut self, data: PlayerData, sections: SectionIds) {
        self.data = data;
        self.sections = sections;

        self.core.draggable = self.data.section != self.sections.unused;
        self.image_rect = if self.data.section == self.sections.dead {
            self.sprite.dead
        } else {
            self.sprite.alive
        };

        self.core
            .rect
            .set_dimensions(self.image_rect.width(), self.image_rect.height());
    }

    pub fn state(&self) -> LifeState {
        if self.data.section == self.sections.unused {
            LifeState::Unused
        } else if self.data.section == self.sections.dead {
            LifeState::Dead
        } else {
            LifeState::Alive
        }
    }

    pub fn data(&self) -> &PlayerData {
        &self.data
    }

    pub fn section_ids(&self) -> SectionIds {
        self.sections
    }

    /// The sprite sheet region drawn for the current state.
    pub fn image_rect(&self) -> Rectangle {
        self.image_rect
    }

    pub fn rect(&self) -> Rectangle {
        self.core.rect
    }

    pub fn is_active(&self) -> bool {
        self.core.active
    }

    pub fn is_draggable(&self) -> bool {
        self.core.draggable
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.core.debug = debug;
    }

    fn toggle_section(&self) {
        let color = self.data.color;
        let SectionIds { reset, dead, .. } = self.sections;

        let mut store = self.store.borrow_mut();
        let (sections, target) = if self.data.section == dead {
            (roster::revive(store.sections(), color, dead, reset), reset)
        } else {
            (roster::kill(store.sections(), color, dead), dead)
        };
        store.set_sections(sections);
        store.set_player_section(color, target);

        debug!("{} moved to section {:?}", color.name(), target);
    }
}

impl Entity for PlayerEntity {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn render(&self, surface: &mut dyn Surface) {
        self.core.render(surface);

        if self.state() == LifeState::Unused {
            return;
        }

        surface.save();

        if self.core.active {
            surface.set_shadow(ACTIVE_GLOW);
        }

        let rect = &self.core.rect;
        if !self.data.name.is_empty() {
            let width = surface.measure_text(&self.data.name);
            surface.draw_stroke_text(
                Vector::new(
                    rect.x() + (rect.width() - width) / 2.0,
                    rect.y() - NAME_OFFSET,
                ),
                &self.data.name,
            );
        }

        surface.draw_image(&self.sprite.sheet, &self.image_rect, rect);

        surface.restore();
    }

    fn on_mouse_move(&mut self, point: Vector) -> bool {
        if self.core.active {
            self.core.rect.center_on(point);
            return true;
        }
        false
    }

    /// Any button starts a drag.
    fn on_mouse_down(&mut self, _button: MouseButton, point: Vector) -> bool {
        self.core.active = self.core.draggable && self.core.hit(point);
        if self.core.active {
            debug!("drag start: {}", self.data.color.name());
        }
        self.core.active
    }

    /// Any release ends the drag. Never consumes, so every entity sees it.
    fn on_mouse_up(&mut self, _button: MouseButton, _point: Vector) -> bool {
        if self.core.active {
            debug!("drag end: {}", self.data.color.name());
        }
        self.core.active = false;
        self.core.active
    }

    fn on_double_click(&mut self, point: Vector) -> bool {
        if !self.core.hit(point) || self.state() == LifeState::Unused {
            return false;
        }
        self.toggle_section();
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::super::recording::{Call, RecordingSurface};
    use super::*;
    use crate::roster::{PlayerColor, Roster, SectionId, SectionStore};
    use proptest::prelude::*;

    const ALIVE: Rectangle = Rectangle::from_xywh(0.0, 0.0, 40.0, 40.0);
    const DEAD: Rectangle = Rectangle::from_xywh(40.0, 0.0, 40.0, 30.0);

    fn ids() -> SectionIds {
        SectionIds::new(SectionId(1), SectionId(2), SectionId(3)).expect("distinct ids")
    }

    fn sprite() -> PlayerSprite {
        PlayerSprite {
            sheet: SpriteSheet {
                texture: egui::TextureId::Managed(0),
                width: 80.0,
                height: 40.0,
            },
            alive: ALIVE,
            dead: DEAD,
        }
    }

    fn data(section: u32, name: &str) -> PlayerData {
        PlayerData {
            color: PlayerColor::Red,
            name: name.into(),
            section: SectionId(section),
        }
    }

    /// Roster with Red seated in `section`.
    fn roster_with_red_in(section: u32) -> Rc<RefCell<Roster>> {
        let mut roster = Roster::default_game();
        roster.move_player(PlayerColor::Red, SectionId(section));
        Rc::new(RefCell::new(roster))
    }

    fn player(section: u32, roster: &Rc<RefCell<Roster>>) -> PlayerEntity {
        let store: SharedStore = roster.clone();
        PlayerEntity::new(
            data(section, "Alice"),
            Vector::new(10.0, 10.0),
            ids(),
            sprite(),
            store,
            false,
        )
    }

    fn holders(roster: &Roster) -> Vec<SectionId> {
        roster
            .sections()
            .iter()
            .filter(|s| s.contains(PlayerColor::Red))
            .map(|s| s.id)
            .collect()
    }

    // -- construction & update ----------------------------------------------

    #[test]
    fn new_alive_player_uses_alive_sprite_at_position() {
        let roster = roster_with_red_in(1);
        let p = player(1, &roster);
        assert_eq!(p.rect(), Rectangle::from_xywh(10.0, 10.0, 40.0, 40.0));
        assert_eq!(p.image_rect(), ALIVE);
        assert_eq!(p.state(), LifeState::Alive);
        assert!(p.is_draggable());
        assert!(!p.is_active());
    }

    #[test]
    fn new_unused_player_is_not_draggable() {
        let roster = roster_with_red_in(3);
        let p = player(3, &roster);
        assert_eq!(p.state(), LifeState::Unused);
        assert!(!p.is_draggable());
    }

    #[test]
    fn update_resizes_but_keeps_position() {
        let roster = roster_with_red_in(1);
        let mut p = player(1, &roster);
        p.update_player(data(2, "Alice"), ids());

        assert_eq!(p.image_rect(), DEAD);
        assert_eq!(p.rect(), Rectangle::from_xywh(10.0, 10.0, 40.0, 30.0));
        assert!(p.is_draggable());
    }

    #[test]
    fn update_is_idempotent() {
        let roster = roster_with_red_in(1);
        let mut p = player(1, &roster);
        p.update_player(data(2, "Bob"), ids());
        let once = (p.core().clone(), p.data().clone(), p.image_rect());
        p.update_player(data(2, "Bob"), ids());
        assert_eq!((p.core().clone(), p.data().clone(), p.image_rect()), once);
    }

    #[test]
    fn update_tracks_new_section_ids() {
        let roster = roster_with_red_in(1);
        let mut p = player(1, &roster);
        let swapped = SectionIds::new(SectionId(2), SectionId(1), SectionId(3)).expect("distinct");
        p.update_player(data(1, "Alice"), swapped);
        assert_eq!(p.state(), LifeState::Dead);
        assert_eq!(p.image_rect(), DEAD);
    }

    proptest! {
        #[test]
        fn update_upholds_state_invariants(
            reset in 0u32..6,
            dead in 0u32..6,
            unused in 0u32..6,
            section in 0u32..8,
        ) {
            prop_assume!(reset != dead && reset != unused && dead != unused);
            let ids = SectionIds::new(SectionId(reset), SectionId(dead), SectionId(unused))
                .expect("distinct ids");

            let roster = roster_with_red_in(1);
            let mut p = player(1, &roster);
            p.update_player(data(section, "Alice"), ids);

            prop_assert_eq!(p.is_draggable(), section != unused);
            let expected = if section == dead { DEAD } else { ALIVE };
            prop_assert_eq!(p.image_rect(), expected);
            prop_assert_eq!(
                (p.rect().width(), p.rect().height()),
                (expected.width(), expected.height())
            );
            prop_assert_eq!(p.rect().position(), Vector::new(10.0, 10.0));
        }
    }

    // -- drag ----------------------------------------------------------------

    #[test]
    fn drag_round_trip() {
        let roster = roster_with_red_in(1);
        let mut p = player(1, &roster);

        assert!(p.on_mouse_down(MouseButton::Primary, Vector::new(20.0, 20.0)));
        assert!(p.is_active());

        let target = Vector::new(200.0, 150.0);
        assert!(p.on_mouse_move(target));
        assert_eq!(p.rect().center(), target);

        assert!(!p.on_mouse_up(MouseButton::Primary, target));
        assert!(!p.is_active());
    }

    #[test]
    fn drag_follows_pointer_outside_bounds() {
        let roster = roster_with_red_in(1);
        let mut p = player(1, &roster);
        p.on_mouse_down(MouseButton::Primary, Vector::new(20.0, 20.0));

        assert!(p.on_mouse_move(Vector::new(500.0, 500.0)));
        assert!(p.on_mouse_move(Vector::new(900.0, 20.0)));
        assert_eq!(p.rect().center(), Vector::new(900.0, 20.0));
    }

    #[test]
    fn any_button_starts_a_drag() {
        let roster = roster_with_red_in(1);
        let mut p = player(1, &roster);
        assert!(p.on_mouse_down(MouseButton::Secondary, Vector::new(20.0, 20.0)));
    }

    #[test]
    fn mouse_down_outside_does_not_activate() {
        let roster = roster_with_red_in(1);
        let mut p = player(1, &roster);
        assert!(!p.on_mouse_down(MouseButton::Primary, Vector::new(60.0, 20.0)));
        assert!(!p.on_mouse_move(Vector::new(60.0, 20.0)));
        assert_eq!(p.rect().position(), Vector::new(10.0, 10.0));
    }

    #[test]
    fn release_elsewhere_ends_drag() {
        let roster = roster_with_red_in(1);
        let mut p = player(1, &roster);
        p.on_mouse_down(MouseButton::Primary, Vector::new(20.0, 20.0));
        assert!(!p.on_mouse_up(MouseButton::Primary, Vector::new(800.0, 800.0)));
        assert!(!p.is_active());
    }

    #[test]
    fn unused_player_ignores_pointer() {
        let roster = roster_with_red_in(3);
        let mut p = player(3, &roster);
        let inside = Vector::new(20.0, 20.0);
        assert!(!p.on_mouse_down(MouseButton::Primary, inside));
        assert!(!p.on_mouse_move(inside));
        assert!(!p.on_mouse_up(MouseButton::Primary, inside));
        assert!(!p.on_double_click(inside));
        assert_eq!(holders(&roster.borrow()), vec![SectionId(3)]);
    }

    // -- double click --------------------------------------------------------

    #[test]
    fn double_click_kills_alive_player() {
        let roster = roster_with_red_in(4);
        let mut p = player(4, &roster);

        assert!(p.on_double_click(Vector::new(20.0, 20.0)));

        let roster = roster.borrow();
        assert_eq!(holders(&roster), vec![SectionId(2)]);
        assert_eq!(
            roster.player(PlayerColor::Red).map(|d| d.section),
            Some(SectionId(2))
        );
    }

    #[test]
    fn double_click_revives_dead_player_into_reset() {
        let roster = roster_with_red_in(2);
        let mut p = player(2, &roster);

        assert!(p.on_double_click(Vector::new(20.0, 20.0)));

        let roster = roster.borrow();
        assert_eq!(holders(&roster), vec![SectionId(1)]);
        assert_eq!(
            roster.player(PlayerColor::Red).map(|d| d.section),
            Some(SectionId(1))
        );
    }

    #[test]
    fn double_click_outside_changes_nothing() {
        let roster = roster_with_red_in(1);
        let before = roster.borrow().sections().to_vec();
        let revision = roster.borrow().revision();
        let mut p = player(1, &roster);

        assert!(!p.on_double_click(Vector::new(5.0, 5.0)));
        assert_eq!(roster.borrow().sections(), before.as_slice());
        assert_eq!(roster.borrow().revision(), revision);
    }

    #[test]
    fn double_click_leaves_entity_data_until_update() {
        let roster = roster_with_red_in(1);
        let mut p = player(1, &roster);
        p.on_double_click(Vector::new(20.0, 20.0));
        assert_eq!(p.state(), LifeState::Alive);
    }

    #[test]
    fn kill_then_render_draws_dead_sprite() {
        let roster = roster_with_red_in(1);
        let mut p = player(1, &roster);
        assert_eq!(p.rect().position(), Vector::new(10.0, 10.0));

        assert!(p.on_double_click(Vector::new(20.0, 20.0)));
        let fresh = roster
            .borrow()
            .player(PlayerColor::Red)
            .cloned()
            .expect("red is seated");
        assert_eq!(fresh.section, SectionId(2));
        p.update_player(fresh, ids());

        let mut surface = RecordingSurface::default();
        p.render(&mut surface);
        assert_eq!(surface.images(), vec![(DEAD, p.rect())]);
    }

    // -- render --------------------------------------------------------------

    #[test]
    fn unused_player_draws_nothing() {
        let roster = roster_with_red_in(3);
        let p = player(3, &roster);
        let mut surface = RecordingSurface::default();
        p.render(&mut surface);
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn unused_player_still_draws_debug_box() {
        let roster = roster_with_red_in(3);
        let mut p = player(3, &roster);
        p.set_debug(true);
        let mut surface = RecordingSurface::default();
        p.render(&mut surface);
        assert_eq!(surface.calls, vec![Call::StrokeRect(p.rect())]);
    }

    #[test]
    fn name_is_centered_above_sprite() {
        let roster = roster_with_red_in(1);
        let p = player(1, &roster);
        let mut surface = RecordingSurface::default();
        p.render(&mut surface);

        // "Alice" measures 30 units, sprite is 40 wide at x = 10.
        assert_eq!(
            surface.calls,
            vec![
                Call::Save,
                Call::Text(Vector::new(15.0, -10.0), "Alice".into()),
                Call::Image {
                    source: ALIVE,
                    dest: p.rect()
                },
                Call::Restore,
            ]
        );
    }

    #[test]
    fn empty_name_draws_no_text() {
        let roster = roster_with_red_in(1);
        let mut p = player(1, &roster);
        p.update_player(data(1, ""), ids());
        let mut surface = RecordingSurface::default();
        p.render(&mut surface);
        assert!(!surface.calls.iter().any(|c| matches!(c, Call::Text(..))));
        assert_eq!(surface.images().len(), 1);
    }

    #[test]
    fn active_player_glows() {
        let roster = roster_with_red_in(1);
        let mut p = player(1, &roster);
        p.on_mouse_down(MouseButton::Primary, Vector::new(20.0, 20.0));
        let mut surface = RecordingSurface::default();
        p.render(&mut surface);
        assert_eq!(surface.calls.get(1), Some(&Call::Shadow(ACTIVE_GLOW)));
    }
}
