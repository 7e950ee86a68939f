use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::View;

/// Scrollable table of the filtered rows, one column per dataset column.
pub fn data_table(ui: &mut Ui, view: &View<'_>, max_height: f32) {
    let dataset = view.dataset();
    if dataset.columns.is_empty() {
        return;
    }

    let row_height = egui::TextStyle::Body
        .resolve(ui.style())
        .size
        .max(ui.spacing().interact_size.y);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(60.0), dataset.columns.len())
        .max_scroll_height(max_height)
        .header(row_height + 4.0, |mut header| {
            for col in &dataset.columns {
                header.col(|ui| {
                    ui.strong(&col.name);
                });
            }
        })
        .body(|body| {
            body.rows(row_height, view.len(), |mut row| {
                let record = &dataset.records[view.rows()[row.index()]];
                for cell in &record.cells {
                    row.col(|ui| {
                        ui.label(cell.to_string());
                    });
                }
            });
        });
}
