#![warn(clippy::all, rust_2018_idioms)]
//! Draggable player sprites on a game map, with double-click alive/dead
//! toggling backed by a shared section roster.

pub mod canvas;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod roster;
pub mod settings;
pub mod ui;

mod app;
pub use app::CrewMapApp;
pub use error::{MapError, Result};
