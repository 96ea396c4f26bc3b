use std::time::Duration;

use eframe::egui;

use crate::state::{ActiveView, AppState};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EvDashboardApp {
    pub state: AppState,
}

impl EvDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for EvDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_load();
        if self.state.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Filters, summary cards and view switch ----
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            panels::filter_bar(ui, &mut self.state);
            ui.add_space(4.0);
            panels::summary_cards(ui, &self.state);
            ui.add_space(4.0);
            panels::view_toggle(ui, &mut self.state);
            ui.add_space(4.0);
        });

        // ---- Central panel: charts or table ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            ActiveView::Charts => plot::charts(ui, &self.state),
            ActiveView::Table => table::vehicle_table(ui, &mut self.state),
        });
    }
}
