use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::data::aggregate::Aggregate;
use crate::data::drill::format_columns;
use crate::state::{AppState, ViewMode};

const BAR_WIDTH: f64 = 0.6;

// ---------------------------------------------------------------------------
// Results plot (central panel)
// ---------------------------------------------------------------------------

/// Render the results of the current window. Returns the group key the user
/// clicked on, if any.
pub fn results_plot(ui: &mut Ui, state: &AppState) -> Option<String> {
    if state.registry().is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to explore it  (File → Open…)");
        });
        return None;
    }

    let page = state.visible();
    if page.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Nothing to plot for the current selection.");
        });
        return None;
    }

    match state.mode() {
        ViewMode::ColumnMeans => {
            column_means_plot(ui, state, page.items);
            None
        }
        ViewMode::GroupComposition => composition_plot(ui, state, page.items),
    }
}

fn title(state: &AppState) -> String {
    match state.category() {
        Some(label) => format!("Averages for {label}"),
        None => "Averages over all rows".to_string(),
    }
}

/// One bar per column mean, labelled along the x axis.
fn column_means_plot(ui: &mut Ui, state: &AppState, items: &[Aggregate]) {
    ui.label(title(state));

    let bars: Vec<Bar> = items
        .iter()
        .enumerate()
        .map(|(i, a)| {
            Bar::new(i as f64, if a.value.is_nan() { 0.0 } else { a.value })
                .name(&a.label)
                .width(BAR_WIDTH)
        })
        .collect();

    let labels: Vec<String> = items.iter().map(|a| a.label.clone()).collect();

    Plot::new("column_means_plot")
        .x_axis_label("Columns")
        .y_axis_label("Average")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE));
        });
}

/// One stacked column with a segment per group. Hovering a segment shows its
/// member breakdown; clicking it returns the group key.
fn composition_plot(ui: &mut Ui, state: &AppState, items: &[Aggregate]) -> Option<String> {
    ui.label(format!("Group composition, {}", title(state).to_lowercase()));

    // (key, bottom, top) of every stacked segment
    let mut segments: Vec<(String, f64, f64)> = Vec::with_capacity(items.len());
    let mut bottom = 0.0;
    for a in items {
        let height = if a.value.is_nan() { 0.0 } else { a.value };
        segments.push((a.label.clone(), bottom, bottom + height));
        bottom += height;
    }

    let charts: Vec<BarChart> = segments
        .iter()
        .map(|(key, base, top)| {
            let color = state.color_map.color_for(key);
            let bar = Bar::new(0.0, top - base)
                .base_offset(*base)
                .width(BAR_WIDTH)
                .fill(color)
                .name(key);
            BarChart::new(vec![bar]).name(key).color(color)
        })
        .collect();

    let response = Plot::new("composition_plot")
        .legend(Legend::default())
        .y_axis_label("Average abundance")
        .show_x(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });

    let segment_at = |pos| {
        let point = response.transform.value_from_position(pos);
        if point.x.abs() > BAR_WIDTH / 2.0 {
            return None;
        }
        segments
            .iter()
            .find(|(_, base, top)| point.y >= *base && point.y < *top)
            .map(|(key, _, _)| key.clone())
    };

    if let Some(key) = response.response.hover_pos().and_then(segment_at) {
        if let Ok(Some(detail)) = state.breakdown(&key) {
            let body = format_columns(
                &detail.entries,
                state.config.tooltip_rows,
                state.config.tooltip_col_width,
            );
            response
                .response
                .clone()
                .on_hover_text_at_pointer(RichText::new(format!("{key}\n{body}")).monospace());
        }
    }

    if response.response.clicked() {
        return response.response.interact_pointer_pos().and_then(segment_at);
    }
    None
}
