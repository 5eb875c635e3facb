use std::collections::BTreeSet;
use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::{AppState, Direction, ViewMode};

/// Ticked entries in the two group lists, cleared once moved.
#[derive(Debug, Default)]
pub struct GroupMarks {
    available: BTreeSet<String>,
    selected: BTreeSet<String>,
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
        });

        ui.separator();

        // ---- Dataset selector ----
        let keys: Vec<String> = state.registry().keys().map(str::to_string).collect();
        if !keys.is_empty() {
            let active = state.registry().active_key().unwrap_or_default().to_string();
            egui::ComboBox::from_id_salt("dataset")
                .selected_text(&active)
                .show_ui(ui, |ui: &mut Ui| {
                    for key in &keys {
                        if ui.selectable_label(*key == active, key).clicked() {
                            let result = state.set_active(key);
                            state.report(result);
                        }
                    }
                });

            if let Ok(ds) = state.registry().active() {
                ui.label(format!("{} rows, {} columns", ds.len(), ds.n_columns()));
            }
            ui.separator();
        }

        // ---- View mode ----
        for mode in [ViewMode::ColumnMeans, ViewMode::GroupComposition] {
            if ui.selectable_label(state.mode() == mode, mode.label()).clicked() {
                state.set_mode(mode);
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left panel: category, window, paging and group lists.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, marks: &mut GroupMarks) {
    ui.heading("Selection");
    ui.separator();

    if state.registry().is_empty() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            category_selector(ui, state);
            ui.separator();
            window_controls(ui, state);
            ui.separator();
            group_lists(ui, state, marks);
        });
}

fn category_selector(ui: &mut Ui, state: &mut AppState) {
    let labels = state.category_labels().to_vec();
    if labels.is_empty() {
        ui.label(format!("No '{}' column: using all rows.", state.config.category_column));
        return;
    }

    ui.strong(format!("{} label", state.config.category_column));
    let current = state.category().unwrap_or("All rows").to_string();
    egui::ComboBox::from_id_salt("category")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(state.category().is_none(), "All rows").clicked() {
                state.clear_category_filter();
            }
            for label in &labels {
                if ui.selectable_label(current == *label, label).clicked() {
                    let result = state.set_category_filter(label);
                    state.report(result);
                }
            }
        });
}

fn window_controls(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Window size:");
        let edit = ui.add(egui::TextEdit::singleline(&mut state.window_input).desired_width(40.0));
        let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if submitted || ui.button("Apply").clicked() {
            let input = state.window_input.clone();
            let result = state.set_window_size(&input);
            if result.is_err() {
                state.window_input = state.window().size().to_string();
            }
            state.report(result);
        }
    });

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("←").clicked() {
            state.page(Direction::Left);
        }
        if ui.button("→").clicked() {
            state.page(Direction::Right);
        }
        if ui.button("Plot").clicked() {
            let result = state.refresh();
            state.report(result);
        }
    });
    ui.label(state.progress_label());
}

fn group_lists(ui: &mut Ui, state: &mut AppState, marks: &mut GroupMarks) {
    let available = state.available_groups();
    let selected = state.selected_groups().to_vec();

    if available.is_empty() && selected.is_empty() {
        ui.label("No groups available.");
        return;
    }

    ui.strong("Available groups");
    checklist(ui, &available, &mut marks.available);

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("→ Display").clicked() {
            let keys: Vec<String> = std::mem::take(&mut marks.available).into_iter().collect();
            let result = state.move_to_selected(&keys);
            state.report(result);
        }
        if ui.button("← Remove").clicked() {
            let keys: Vec<String> = std::mem::take(&mut marks.selected).into_iter().collect();
            let result = state.move_to_available(&keys);
            state.report(result);
        }
    });

    ui.strong("Displayed groups");
    checklist(ui, &selected, &mut marks.selected);
}

fn checklist(ui: &mut Ui, items: &[String], marked: &mut BTreeSet<String>) {
    marked.retain(|m| items.contains(m));
    for item in items {
        let mut checked = marked.contains(item);
        if ui.checkbox(&mut checked, item).changed() {
            if checked {
                marked.insert(item.clone());
            } else {
                marked.remove(item);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Drill-down window
// ---------------------------------------------------------------------------

/// Floating table of the selected group's members, largest first.
pub fn drill_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(drill) = state.drill().cloned() else {
        return;
    };

    let mut open = true;
    egui::Window::new(format!("{} breakdown", drill.group))
        .open(&mut open)
        .default_width(320.0)
        .show(ctx, |ui: &mut Ui| {
            ui.label(format!("Total: {:.2}", drill.total));
            ui.separator();
            TableBuilder::new(ui)
                .striped(true)
                .column(Column::remainder())
                .column(Column::auto())
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("Member");
                    });
                    header.col(|ui| {
                        ui.strong("Mean");
                    });
                })
                .body(|body| {
                    body.rows(18.0, drill.entries.len(), |mut row| {
                        let entry = &drill.entries[row.index()];
                        row.col(|ui| {
                            ui.label(&entry.label);
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.3}", entry.value));
                        });
                    });
                });
        });

    if !open {
        state.close_drill();
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let files: Vec<PathBuf> = rfd::FileDialog::new()
        .set_title("Open measurement tables")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_files()
        .unwrap_or_default();

    for path in files {
        // Errors are logged and shown by load_file; keep loading the rest.
        let _ = state.load_file(&path);
    }
}
