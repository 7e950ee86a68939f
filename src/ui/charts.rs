use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::ColorMap;
use crate::data::aggregate::GroupSums;
use crate::data::histogram::HistogramBin;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Grouped sales (bar chart)
// ---------------------------------------------------------------------------

/// One bar per group, placed at x = 0, 1, 2, … and labelled on the x axis.
pub fn group_bar_chart(ui: &mut Ui, id: &str, sums: &GroupSums, colors: Option<&ColorMap>) {
    let labels: Vec<String> = sums.keys().map(|k| k.to_string()).collect();

    let bars: Vec<Bar> = sums
        .iter()
        .enumerate()
        .map(|(i, (group, total))| {
            let color = colors.map_or(Color32::LIGHT_BLUE, |cm| cm.color_for(group));
            Bar::new(i as f64, *total)
                .width(0.7)
                .name(group.to_string())
                .fill(color)
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .y_axis_label("Sales ($)")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark, _range| bar_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Axis label for integer positions only.
fn bar_label(labels: &[String], x: f64) -> String {
    if x < 0.0 || x.fract() != 0.0 {
        return String::new();
    }
    labels.get(x as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Age distribution (histogram)
// ---------------------------------------------------------------------------

pub fn histogram_chart(ui: &mut Ui, id: &str, bins: &[HistogramBin]) {
    let bars: Vec<Bar> = bins
        .iter()
        .map(|bin| {
            let width = bin.high - bin.low;
            let width = if width > 0.0 { width } else { 1.0 };
            Bar::new((bin.low + bin.high) / 2.0, bin.count as f64)
                .width(width)
                .name(format!("{:.1} – {:.1}", bin.low, bin.high))
                .fill(Color32::from_rgb(99, 110, 250))
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label("Age")
        .y_axis_label("Customers")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}
