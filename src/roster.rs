//! Shared section/player state.
//!
//! The roster is the authoritative record of which section every participant
//! belongs to. Map entities only ever talk to it through [`SectionStore`];
//! the concrete [`Roster`] additionally serves the roster panel.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::error::{MapError, Result};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifier of a section in the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(pub u32);

/// Participant slot key. Each color is one seat at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerColor {
    Red,
    Blue,
    Green,
    Pink,
    Orange,
    Yellow,
    Black,
    White,
    Purple,
    Brown,
    Cyan,
    Lime,
}

impl PlayerColor {
    pub const ALL: [Self; 12] = [
        Self::Red,
        Self::Blue,
        Self::Green,
        Self::Pink,
        Self::Orange,
        Self::Yellow,
        Self::Black,
        Self::White,
        Self::Purple,
        Self::Brown,
        Self::Cyan,
        Self::Lime,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Pink => "pink",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Black => "black",
            Self::White => "white",
            Self::Purple => "purple",
            Self::Brown => "brown",
            Self::Cyan => "cyan",
            Self::Lime => "lime",
        }
    }

    /// Position in [`PlayerColor::ALL`], used as the sprite sheet row.
    pub const fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One participant as the map sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerData {
    pub color: PlayerColor,
    pub name: String,
    pub section: SectionId,
}

/// Membership entry inside a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionMember {
    pub id: PlayerColor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    pub players: Vec<SectionMember>,
}

impl Section {
    pub fn new(id: SectionId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            players: Vec::new(),
        }
    }

    pub fn contains(&self, player: PlayerColor) -> bool {
        self.players.iter().any(|m| m.id == player)
    }

    /// The member after `player`, wrapping to the first.
    pub fn next_after(&self, player: PlayerColor) -> Option<PlayerColor> {
        let at = self.players.iter().position(|m| m.id == player)?;
        self.players
            .get(at + 1)
            .or_else(|| self.players.first())
            .map(|m| m.id)
    }
}

/// The three well-known sections that encode life state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionIds {
    /// Where a revived participant lands.
    pub reset: SectionId,
    pub dead: SectionId,
    /// Participants not in play: invisible and not draggable on the map.
    pub unused: SectionId,
}

impl SectionIds {
    /// # Errors
    ///
    /// Returns [`MapError::DuplicateSectionId`] if two roles share an id.
    pub fn new(reset: SectionId, dead: SectionId, unused: SectionId) -> Result<Self> {
        if reset == dead || reset == unused {
            return Err(MapError::DuplicateSectionId(reset));
        }
        if dead == unused {
            return Err(MapError::DuplicateSectionId(dead));
        }
        Ok(Self {
            reset,
            dead,
            unused,
        })
    }

    /// Verify every configured id names a section in `sections`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::MissingSection`] for the first id not found.
    pub fn check_against(&self, sections: &[Section]) -> Result<()> {
        for id in [self.reset, self.dead, self.unused] {
            if !sections.iter().any(|s| s.id == id) {
                return Err(MapError::MissingSection(id));
            }
        }
        Ok(())
    }
}

impl TryFrom<[SectionId; 3]> for SectionIds {
    type Error = MapError;

    fn try_from([reset, dead, unused]: [SectionId; 3]) -> Result<Self> {
        Self::new(reset, dead, unused)
    }
}

// ---------------------------------------------------------------------------
// Membership transforms
// ---------------------------------------------------------------------------

/// Alive → dead: drop `player` from every section but `dead`, append it there.
pub fn kill(sections: &[Section], player: PlayerColor, dead: SectionId) -> Vec<Section> {
    sections
        .iter()
        .map(|section| {
            let mut section = section.clone();
            if section.id == dead {
                section.players.push(SectionMember { id: player });
            } else {
                section.players.retain(|m| m.id != player);
            }
            section
        })
        .collect()
}

/// Dead → alive: drop `player` from `dead`, append it to `reset`.
pub fn revive(
    sections: &[Section],
    player: PlayerColor,
    dead: SectionId,
    reset: SectionId,
) -> Vec<Section> {
    sections
        .iter()
        .map(|section| {
            let mut section = section.clone();
            if section.id == dead {
                section.players.retain(|m| m.id != player);
            } else if section.id == reset {
                section.players.push(SectionMember { id: player });
            }
            section
        })
        .collect()
}

/// Move `player` to the end of `target`, wherever it currently is.
pub fn move_to(sections: &[Section], player: PlayerColor, target: SectionId) -> Vec<Section> {
    place_at(sections, player, target, usize::MAX)
}

/// Move `player` so it ends up at `index` in `target` (clamped to the end).
///
/// Works the same within one section and across sections.
pub fn place_at(
    sections: &[Section],
    player: PlayerColor,
    target: SectionId,
    index: usize,
) -> Vec<Section> {
    sections
        .iter()
        .map(|section| {
            let mut section = section.clone();
            section.players.retain(|m| m.id != player);
            if section.id == target {
                let at = index.min(section.players.len());
                section.players.insert(at, SectionMember { id: player });
            }
            section
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// The slice of the shared store that map entities may touch.
pub trait SectionStore {
    fn sections(&self) -> &[Section];
    /// Replace the whole section list.
    fn set_sections(&mut self, sections: Vec<Section>);
    /// Point `player` at `section` without touching section membership.
    fn set_player_section(&mut self, player: PlayerColor, section: SectionId);
}

/// Store handle injected into entities. The map is single-threaded.
pub type SharedStore = Rc<RefCell<dyn SectionStore>>;

/// Every mutation the roster accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterAction {
    SetSections(Vec<Section>),
    SetPlayerSection {
        player: PlayerColor,
        section: SectionId,
    },
    RenamePlayer {
        player: PlayerColor,
        name: String,
    },
    /// Membership and pointer in one step.
    MovePlayer {
        player: PlayerColor,
        section: SectionId,
    },
    /// Like `MovePlayer`, landing at `index` instead of the end.
    PlacePlayer {
        player: PlayerColor,
        section: SectionId,
        index: usize,
    },
}

/// In-memory roster: ordered sections plus the player → section mapping.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    sections: Vec<Section>,
    players: FxHashMap<PlayerColor, PlayerData>,
    revision: u64,
}

impl Roster {
    pub const CREW: SectionId = SectionId(1);
    pub const DEAD: SectionId = SectionId(2);
    pub const UNUSED: SectionId = SectionId(3);
    pub const SUSPECT: SectionId = SectionId(4);

    const IN_PLAY: usize = 8;

    /// Build a roster from sections, deriving each player's pointer from
    /// the section that lists it.
    pub fn new(sections: Vec<Section>) -> Self {
        let mut players = FxHashMap::default();
        for section in &sections {
            for member in &section.players {
                players.insert(
                    member.id,
                    PlayerData {
                        color: member.id,
                        name: String::new(),
                        section: section.id,
                    },
                );
            }
        }
        Self {
            sections,
            players,
            revision: 0,
        }
    }

    /// The stock table: eight seats in Crew, the rest Unused.
    pub fn default_game() -> Self {
        let mut crew = Section::new(Self::CREW, "Crew");
        let suspect = Section::new(Self::SUSPECT, "Suspect");
        let dead = Section::new(Self::DEAD, "Dead");
        let mut unused = Section::new(Self::UNUSED, "Unused");

        for (i, color) in PlayerColor::ALL.into_iter().enumerate() {
            let member = SectionMember { id: color };
            if i < Self::IN_PLAY {
                crew.players.push(member);
            } else {
                unused.players.push(member);
            }
        }

        Self::new(vec![crew, suspect, dead, unused])
    }

    /// Section ids for [`Roster::default_game`].
    pub const fn default_section_ids() -> SectionIds {
        SectionIds {
            reset: Self::CREW,
            dead: Self::DEAD,
            unused: Self::UNUSED,
        }
    }

    pub fn player(&self, color: PlayerColor) -> Option<&PlayerData> {
        self.players.get(&color)
    }

    /// Players in seat order.
    pub fn players(&self) -> impl Iterator<Item = &PlayerData> {
        PlayerColor::ALL
            .iter()
            .filter_map(|color| self.players.get(color))
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Bumped on every mutation.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Back to [`Roster::default_game`], as a new revision.
    pub fn reset(&mut self) {
        let revision = self.revision + 1;
        *self = Self::default_game();
        self.revision = revision;
    }

    pub fn set_player_name(&mut self, player: PlayerColor, name: impl Into<String>) {
        self.apply(RosterAction::RenamePlayer {
            player,
            name: name.into(),
        });
    }

    pub fn move_player(&mut self, player: PlayerColor, section: SectionId) {
        self.apply(RosterAction::MovePlayer { player, section });
    }

    pub fn place_player(&mut self, player: PlayerColor, section: SectionId, index: usize) {
        self.apply(RosterAction::PlacePlayer {
            player,
            section,
            index,
        });
    }

    /// Apply a single [`RosterAction`]. The only way roster state changes.
    pub fn apply(&mut self, action: RosterAction) {
        match action {
            RosterAction::SetSections(sections) => {
                self.sections = sections;
            }
            RosterAction::SetPlayerSection { player, section } => {
                self.pointer_mut(player).section = section;
            }
            RosterAction::RenamePlayer { player, name } => {
                self.pointer_mut(player).name = name;
            }
            RosterAction::MovePlayer { player, section } => {
                self.sections = move_to(&self.sections, player, section);
                self.pointer_mut(player).section = section;
            }
            RosterAction::PlacePlayer {
                player,
                section,
                index,
            } => {
                self.sections = place_at(&self.sections, player, section, index);
                self.pointer_mut(player).section = section;
            }
        }
        self.revision += 1;
    }

    fn pointer_mut(&mut self, player: PlayerColor) -> &mut PlayerData {
        let fallback = self
            .sections
            .first()
            .map(|s| s.id)
            .unwrap_or(Self::UNUSED);
        self.players.entry(player).or_insert_with(|| PlayerData {
            color: player,
            name: String::new(),
            section: fallback,
        })
    }
}

impl SectionStore for Roster {
    fn sections(&self) -> &[Section] {
        &self.sections
    }

    fn set_sections(&mut self, sections: Vec<Section>) {
        self.apply(RosterAction::SetSections(sections));
    }

    fn set_player_section(&mut self, player: PlayerColor, section: SectionId) {
        self.apply(RosterAction::SetPlayerSection { player, section });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
