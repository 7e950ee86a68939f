use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::FILTER_COLUMNS;
use crate::data::model::columns;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Only filters whose column exists in the
/// dataset are shown.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // Cheap Arc clone so we can mutate state inside the loop.
    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };
    if dataset.is_empty() {
        ui.label("The loaded file has no rows.");
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (col, label) in FILTER_COLUMNS {
                if !dataset.has_column(col) {
                    continue;
                }
                let all_values = dataset.distinct_values(col);

                // Show count of selected / total in the header
                let n_selected = state.filters.get(col).map_or(0, BTreeSet::len);
                let header_text = format!("{label}  ({n_selected}/{})", all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(col);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(col);
                            }
                        });

                        let swatches = match col {
                            columns::CATEGORY => state.category_colors.clone(),
                            columns::PAYMENT_METHOD => state.payment_colors.clone(),
                            _ => None,
                        };

                        for val in &all_values {
                            let mut checked = state
                                .filters
                                .get(col)
                                .is_some_and(|selected| selected.contains(val));

                            let mut text = RichText::new(val.to_string());
                            if let Some(cm) = &swatches {
                                text = text.color(cm.color_for(val));
                            }

                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle_filter_value(col, val);
                            }
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_reload = state.data_path.is_some();
            if ui.add_enabled(can_reload, egui::Button::new("Reload")).clicked() {
                if let Err(e) = state.reload() {
                    log::error!("Failed to reload: {e}");
                }
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(path)) = (&state.dataset, &state.data_path) {
            ui.label(format!(
                "{}: {} transactions loaded, {} visible",
                path.display(),
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open transaction data")
        .add_filter("Supported files", &["csv", "tsv", "txt", "json", "parquet", "pq"])
        .add_filter("Delimited text", &["csv", "tsv", "txt"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.load_path(&path) {
            log::error!("Failed to load file: {e}");
        }
    }
}
