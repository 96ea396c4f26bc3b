use eframe::egui::{self, Color32, RichText, TextEdit, Ui};

use crate::data::filter::FilterField;
use crate::state::{ActiveView, AppState, LoadStatus};

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

        match &state.status {
            LoadStatus::Idle => {
                ui.label("No dataset loaded");
            }
            LoadStatus::Loading => {
                ui.spinner();
                ui.label("Loading…");
            }
            LoadStatus::Succeeded => {
                let name = state
                    .source
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                ui.label(format!(
                    "{name}: {} vehicles loaded, {} visible",
                    state.dataset.len(),
                    state.visible_count()
                ));
            }
            LoadStatus::Failed(msg) => {
                ui.label(RichText::new(format!("Error: {msg}")).color(Color32::RED));
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Filter bar – global search plus one box per field constraint
// ---------------------------------------------------------------------------

pub fn filter_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        let mut search = state.search.clone();
        let response = ui.add(
            TextEdit::singleline(&mut search)
                .hint_text("Global Search...")
                .desired_width(220.0),
        );
        if response.changed() {
            state.set_search(search);
        }

        for field in FilterField::ALL {
            let mut value = state.filters.get(field).to_string();
            let response = ui.add(
                TextEdit::singleline(&mut value)
                    .hint_text(format!("Filter by {}", field.label()))
                    .desired_width(140.0),
            );
            if response.changed() {
                state.set_filter(field, value);
            }
        }

        let any_active = !state.search.is_empty() || !state.filters.is_empty();
        if ui
            .add_enabled(any_active, egui::Button::new("Clear"))
            .clicked()
        {
            state.clear_filters();
        }
    });
}

// ---------------------------------------------------------------------------
// Summary cards
// ---------------------------------------------------------------------------

pub fn summary_cards(ui: &mut Ui, state: &AppState) {
    let s = &state.snapshot.summary;
    let cards = [
        ("Total Vehicles", s.total_vehicles.to_string()),
        ("Avg Range", format!("{} mi", s.average_range)),
        ("Cities", s.unique_cities.to_string()),
        ("Makes", s.unique_makes.to_string()),
        ("Models", s.unique_models.to_string()),
        ("Median Range", format!("{} mi", s.median_range)),
    ];

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (label, value) in cards {
            egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                ui.set_min_width(130.0);
                ui.vertical(|ui: &mut Ui| {
                    ui.label(label);
                    ui.heading(value);
                });
            });
        }
    });
}

// ---------------------------------------------------------------------------
// View toggle
// ---------------------------------------------------------------------------

pub fn view_toggle(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for (view, label) in [(ActiveView::Charts, "Charts"), (ActiveView::Table, "Table View")] {
            if ui.selectable_label(state.view == view, label).clicked() {
                state.view = view;
            }
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open vehicle registration data")
        .add_filter("CSV", &["csv", "txt"])
        .pick_file();

    if let Some(path) = file {
        state.start_load(path);
    }
}
