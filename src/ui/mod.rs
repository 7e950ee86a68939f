//! Presentation layer: egui widgets fed by [`crate::state::AppState`].

pub mod charts;
pub mod dashboard;
pub mod panels;
pub mod table;
