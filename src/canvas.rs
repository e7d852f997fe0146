//! Host loop: owns the entities in z-order, routes pointer events and runs
//! the render pass.

use std::cell::RefCell;

use crate::entity::{Entity, PlayerEntity, PointerEvent, Surface};
use crate::roster::{Roster, SectionIds};

/// Ordered entity list. Index 0 gets every event first.
pub struct Canvas<E: Entity> {
    entities: Vec<E>,
}

impl<E: Entity> Default for Canvas<E> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
        }
    }
}

impl<E: Entity> Canvas<E> {
    pub fn new(entities: Vec<E>) -> Self {
        Self { entities }
    }

    pub fn push(&mut self, entity: E) {
        self.entities.push(entity);
    }

    pub fn entities(&self) -> &[E] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [E] {
        &mut self.entities
    }

    /// Offer `event` to each entity in order until one consumes it.
    ///
    /// Returns the index of the consumer, if any.
    pub fn dispatch(&mut self, event: PointerEvent) -> Option<usize> {
        self.entities.iter_mut().position(|e| e.handle(event))
    }

    /// Draw every entity in order.
    pub fn render(&self, surface: &mut dyn Surface) {
        for entity in &self.entities {
            entity.render(surface);
        }
    }

    pub fn set_debug(&mut self, debug: bool) {
        for entity in &mut self.entities {
            entity.core_mut().debug = debug;
        }
    }
}

impl Canvas<PlayerEntity> {
    /// Push the roster's current records into every player entity.
    ///
    /// Players whose color has no record in the roster are left as they are.
    pub fn sync(&mut self, roster: &Roster, sections: SectionIds) {
        for player in &mut self.entities {
            if let Some(data) = roster.player(player.data().color) {
                player.update_player(data.clone(), sections);
            }
        }
    }

    /// [`Canvas::sync`] only when the roster moved past `synced`.
    pub fn sync_if_changed(&mut self, roster: &Roster, sections: SectionIds, synced: &mut u64) {
        if roster.revision() != *synced {
            self.sync(roster, sections);
            *synced = roster.revision();
        }
    }

    /// One frame of input: catch up with the roster, dispatch, catch up again.
    ///
    /// The roster is not borrowed while events run, since a double click
    /// writes to it.
    pub fn pump(
        &mut self,
        roster: &RefCell<Roster>,
        sections: SectionIds,
        synced: &mut u64,
        events: impl IntoIterator<Item = PointerEvent>,
    ) {
        self.sync_if_changed(&roster.borrow(), sections, synced);
        for event in events {
            self.dispatch(event);
        }
        self.sync_if_changed(&roster.borrow(), sections, synced);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
