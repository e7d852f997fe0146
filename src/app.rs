//! Application shell — wires the roster, the map canvas and the UI together.

use std::cell::RefCell;
use std::f32::consts::TAU;
use std::rc::Rc;

use egui::{Color32, RichText, Sense, TextureHandle, TextureOptions};
use log::{info, warn};

use crate::canvas::Canvas;
use crate::entity::{PlayerEntity, SpriteSheet};
use crate::geometry::Vector;
use crate::roster::{
    PlayerColor, PlayerData, Roster, RosterAction, Section, SectionIds, SectionStore, SharedStore,
};
use crate::settings::Settings;
use crate::ui::{self, MapView, PainterSurface, WORLD_SIZE};

/// Radius of the ring players start on, world units.
const START_RING: f32 = 150.0;

pub struct CrewMapApp {
    settings: Settings,
    roster: Rc<RefCell<Roster>>,
    section_ids: SectionIds,
    canvas: Canvas<PlayerEntity>,
    synced_revision: u64,
    // Owns the texture the players draw from.
    _sprites: TextureHandle,
}

impl CrewMapApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = Settings::load(cc.storage);

        let roster = Rc::new(RefCell::new(Roster::default_game()));
        let section_ids = Roster::default_section_ids();
        if let Err(e) = section_ids.check_against(roster.borrow().sections()) {
            warn!("section configuration: {e}");
        }

        let sprites = cc.egui_ctx.load_texture(
            "player-sprites",
            ui::sprite_sheet_image(),
            TextureOptions::NEAREST,
        );
        let (width, height) = ui::sheet_size();
        let sheet = SpriteSheet {
            texture: sprites.id(),
            width,
            height,
        };

        let canvas = build_canvas(&roster, section_ids, sheet, settings.debug_bounds);
        let synced_revision = roster.borrow().revision();
        info!("map ready with {} players", canvas.entities().len());

        Self {
            settings,
            roster,
            section_ids,
            canvas,
            synced_revision,
            _sprites: sprites,
        }
    }

    /// Push roster changes into the entities if anything moved.
    fn sync(&mut self) {
        self.canvas.sync_if_changed(
            &self.roster.borrow(),
            self.section_ids,
            &mut self.synced_revision,
        );
    }

    fn reset_game(&mut self) {
        self.roster.borrow_mut().reset();
        info!("game reset");
    }
}

fn name_id(color: PlayerColor) -> egui::Id {
    egui::Id::new(("name", color))
}

/// One entity per seat, spread on a ring around the map center.
fn build_canvas(
    roster: &Rc<RefCell<Roster>>,
    section_ids: SectionIds,
    sheet: SpriteSheet,
    debug: bool,
) -> Canvas<PlayerEntity> {
    let store: SharedStore = roster.clone();
    let center = WORLD_SIZE.scale(0.5);
    let seats = PlayerColor::ALL.len() as f32;

    let players = roster
        .borrow()
        .players()
        .map(|data| {
            let angle = data.color.index() as f32 / seats * TAU;
            let sprite = ui::player_sprite(sheet, data.color);
            let at = center + Vector::new(angle.cos(), angle.sin()).scale(START_RING)
                - Vector::new(sprite.alive.width(), sprite.alive.height()).scale(0.5);
            PlayerEntity::new(data.clone(), at, section_ids, sprite, store.clone(), debug)
        })
        .collect();

    Canvas::new(players)
}

impl eframe::App for CrewMapApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.settings.store(storage);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync();

        self.top_bar(ctx);
        self.roster_panel(ctx);
        self.map_panel(ctx);
    }
}

// ---------------------------------------------------------------------------
// Panels
// ---------------------------------------------------------------------------

impl CrewMapApp {
    fn top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("settings").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Crew Map");
                ui.separator();

                ui.checkbox(&mut self.settings.names, "Names");
                if ui
                    .checkbox(&mut self.settings.debug_bounds, "Debug bounds")
                    .changed()
                {
                    self.canvas.set_debug(self.settings.debug_bounds);
                }

                ui.separator();
                if ui.button("Reset game").clicked() {
                    self.reset_game();
                }
            });
        });
    }

    fn roster_panel(&mut self, ctx: &egui::Context) {
        let mut actions = Vec::new();

        egui::SidePanel::left("roster")
            .resizable(false)
            .default_width(220.0)
            .show(ctx, |ui| {
                let roster = self.roster.borrow();
                let sections = roster.sections();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    for section in sections {
                        ui.add_space(8.0);
                        ui.label(
                            RichText::new(format!("{} ({})", section.title, section.players.len()))
                                .size(16.0)
                                .strong(),
                        );

                        // Dropping on the section (not on a row) appends.
                        let (_, dropped) =
                            ui.dnd_drop_zone::<PlayerColor, _>(egui::Frame::default(), |ui| {
                                ui.set_min_width(ui.available_width());
                                for (index, member) in section.players.iter().enumerate() {
                                    let Some(player) = roster.player(member.id) else {
                                        continue;
                                    };
                                    let row = ui.horizontal(|ui| {
                                        self.roster_row(ui, sections, section, player, &mut actions);
                                    });
                                    if let Some(color) =
                                        row.response.dnd_release_payload::<PlayerColor>()
                                    {
                                        actions.push(RosterAction::PlacePlayer {
                                            player: *color,
                                            section: section.id,
                                            index,
                                        });
                                    }
                                }
                            });

                        if let Some(color) = dropped
                            && !actions
                                .iter()
                                .any(|a| matches!(a, RosterAction::PlacePlayer { .. }))
                        {
                            actions.push(RosterAction::MovePlayer {
                                player: *color,
                                section: section.id,
                            });
                        }
                    }
                });
            });

        if !actions.is_empty() {
            let mut roster = self.roster.borrow_mut();
            for action in actions {
                roster.apply(action);
            }
        }
    }

    /// One member line: drag handle, name, "move to" menu.
    fn roster_row(
        &self,
        ui: &mut egui::Ui,
        sections: &[Section],
        section: &Section,
        player: &PlayerData,
        actions: &mut Vec<RosterAction>,
    ) {
        // Only the swatch starts a drag so the name stays editable.
        ui.dnd_drag_source(egui::Id::new(("seat", player.color)), player.color, |ui| {
            let (swatch, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), Sense::hover());
            ui.painter().rect_filled(swatch, 3.0, ui::color_of(player.color));
        });

        if self.settings.names {
            let mut name = player.name.clone();
            let edit = egui::TextEdit::singleline(&mut name)
                .id(name_id(player.color))
                .hint_text(player.color.name())
                .desired_width(110.0);
            let response = ui.add(edit);
            if response.changed() {
                actions.push(RosterAction::RenamePlayer {
                    player: player.color,
                    name,
                });
            }
            if response.lost_focus()
                && ui.input(|i| i.key_pressed(egui::Key::Enter))
                && let Some(next) = section.next_after(player.color)
            {
                ui.memory_mut(|m| m.request_focus(name_id(next)));
            }
        } else {
            ui.label(RichText::new(player.color.name()).color(Color32::GRAY));
        }

        ui.menu_button("⋯", |ui| {
            for target in sections.iter().filter(|s| s.id != section.id) {
                if ui.button(target.title.as_str()).clicked() {
                    actions.push(RosterAction::MovePlayer {
                        player: player.color,
                        section: target.id,
                    });
                }
            }
        });
    }

    fn map_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
            let view = MapView::fit(response.rect, WORLD_SIZE);

            // The panels above may have changed the roster this frame, and a
            // double click may change it again.
            let events = ctx.input(|i| ui::pointer_events(i, &view, response.rect));
            self.canvas
                .pump(&self.roster, self.section_ids, &mut self.synced_revision, events);

            ui::paint_background(&painter, &view);
            let mut surface = PainterSurface::new(&painter, view);
            self.canvas.render(&mut surface);
        });
    }
}
