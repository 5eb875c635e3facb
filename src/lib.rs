//! Lipid Panda: explore per-sample measurement tables by column class.
//!
//! The engine lives in [`data`] and [`registry`]; [`state::AppState`] ties it
//! into one session that the egui front end in [`app`] and [`ui`] drives.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod registry;
pub mod state;
pub mod ui;
