use eframe::egui;

use crate::config::ExplorerConfig;
use crate::state::AppState;
use crate::ui::panels::{self, GroupMarks};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LipidPandaApp {
    pub state: AppState,
    /// Rows ticked in the available/displayed group lists.
    marks: GroupMarks,
}

impl LipidPandaApp {
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            state: AppState::new(config),
            marks: GroupMarks::default(),
        }
    }
}

impl Default for LipidPandaApp {
    fn default() -> Self {
        Self::new(ExplorerConfig::default())
    }
}

impl eframe::App for LipidPandaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selection and paging ----
        egui::SidePanel::left("selection_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, &mut self.marks);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(group) = plot::results_plot(ui, &self.state) {
                let result = self.state.select_group(&group);
                self.state.report(result);
            }
        });

        // ---- Floating drill-down window ----
        panels::drill_window(ctx, &mut self.state);
    }
}
