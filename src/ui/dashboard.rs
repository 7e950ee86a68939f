use eframe::egui::{Color32, RichText, ScrollArea, Ui};

use crate::data::aggregate::Metrics;
use crate::state::AppState;
use crate::ui::{charts, table};

// ---------------------------------------------------------------------------
// Central panel – table, metrics and insights
// ---------------------------------------------------------------------------

/// Render the dashboard body. Sections whose columns are missing from the
/// dataset are skipped.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new("Customer Shopping Behavior Dashboard").size(26.0));
            ui.label("Analyze trends in purchases, customer demographics, and spending patterns.");
            ui.add_space(8.0);

            let (Some(view), Some(summary)) = (state.view(), state.summary.as_ref()) else {
                ui.label("Open a file to explore transactions  (File → Open…)");
                return;
            };

            ui.heading(format!(
                "Showing {} records after filtering",
                summary.record_count
            ));
            if view.is_empty() {
                ui.label("No records match the current filters.");
            } else {
                table::data_table(ui, &view, state.config.table_max_height);
            }

            ui.add_space(12.0);
            metrics_row(ui, &summary.metrics);

            ui.add_space(12.0);
            ui.heading("Insights");
            ui.columns(2, |cols: &mut [Ui]| {
                if let Some(sums) = &summary.sales_by_category {
                    cols[0].strong("Sales by Category");
                    charts::group_bar_chart(
                        &mut cols[0],
                        "sales_by_category",
                        sums,
                        state.category_colors.as_ref(),
                    );
                }
                if let Some(sums) = &summary.sales_by_payment_method {
                    cols[1].strong("Sales by Payment Method");
                    charts::group_bar_chart(
                        &mut cols[1],
                        "sales_by_payment_method",
                        sums,
                        state.payment_colors.as_ref(),
                    );
                }
            });

            if let Some(bins) = &summary.age_histogram {
                ui.add_space(8.0);
                ui.strong("Customer Age Distribution");
                charts::histogram_chart(ui, "age_histogram", bins);
            }

            ui.add_space(8.0);
            ui.label(
                RichText::new("Dashboard ready! Use filters on the left to explore the data.")
                    .color(Color32::from_rgb(40, 167, 69)),
            );
            ui.small("Built with egui");
        });
}

/// Three metric cards; the price cards are omitted without a price column.
fn metrics_row(ui: &mut Ui, metrics: &Metrics) {
    ui.columns(3, |cols: &mut [Ui]| {
        if let Some(price) = &metrics.price {
            metric_card(&mut cols[0], "Total Sales ($)", &format!("{:.2}", price.total));
            metric_card(&mut cols[1], "Average Order Value ($)", &price.average.to_string());
        }
        metric_card(
            &mut cols[2],
            "Total Transactions",
            &metrics.transaction_count.to_string(),
        );
    });
}

fn metric_card(ui: &mut Ui, label: &str, value: &str) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(28.0).strong());
    });
}
