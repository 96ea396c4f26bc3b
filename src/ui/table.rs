use eframe::egui::{self, Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{fields, Row};
use crate::state::{AppState, PAGE_SIZES};

/// `(field, header)` for every table column, in display order.
const COLUMNS: [(&str, &str); 13] = [
    (fields::VIN, "VIN"),
    (fields::MAKE, "Make"),
    (fields::MODEL, "Model"),
    (fields::MODEL_YEAR, "Year"),
    (fields::VEHICLE_TYPE, "Type"),
    (fields::CAFV_ELIGIBILITY, "CAFV Eligibility"),
    (fields::ELECTRIC_RANGE, "Electric Range (miles)"),
    (fields::BASE_MSRP, "Base MSRP"),
    (fields::COUNTY, "County"),
    (fields::CITY, "City"),
    (fields::LEGISLATIVE_DISTRICT, "Legislative District"),
    (fields::DOL_VEHICLE_ID, "DOL Vehicle ID"),
    (fields::ELECTRIC_UTILITY, "Electric Utility"),
];

const ROW_HEIGHT: f32 = 20.0;

/// Render the filtered rows, one page at a time.
pub fn vehicle_table(ui: &mut Ui, state: &mut AppState) {
    let total = state.visible_count();
    ui.strong(format!("Total Records: {total}"));
    pager(ui, state, total);

    let (start, end) = state.pagination.window(total);
    let page: Vec<&Row> = state.visible_rows().skip(start).take(end - start).collect();

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .columns(Column::auto().at_least(90.0), COLUMNS.len())
            .header(ROW_HEIGHT, |mut header| {
                for (_, title) in COLUMNS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, page.len(), |mut row| {
                    let record = page[row.index()];
                    for (field, _) in COLUMNS {
                        row.col(|ui: &mut Ui| {
                            ui.label(record.get(field).unwrap_or(""));
                        });
                    }
                });
            });
    });
}

fn pager(ui: &mut Ui, state: &mut AppState, total: usize) {
    let (current, pages) = state.pagination.page_of(total);
    ui.horizontal(|ui: &mut Ui| {
        if ui.add_enabled(current > 0, egui::Button::new("⏮")).clicked() {
            state.pagination.go_to_page(0, total);
        }
        if ui.add_enabled(current > 0, egui::Button::new("◀")).clicked() {
            state.pagination.go_to_page(current - 1, total);
        }
        ui.label(format!("Page {} of {pages}", current + 1));
        if ui.add_enabled(current + 1 < pages, egui::Button::new("▶")).clicked() {
            state.pagination.go_to_page(current + 1, total);
        }
        if ui.add_enabled(current + 1 < pages, egui::Button::new("⏭")).clicked() {
            state.pagination.go_to_page(pages - 1, total);
        }

        ui.separator();
        let mut rows = state.pagination.rows_per_page;
        egui::ComboBox::from_id_salt("rows_per_page")
            .selected_text(format!("{rows} / page"))
            .show_ui(ui, |ui: &mut Ui| {
                for size in PAGE_SIZES {
                    ui.selectable_value(&mut rows, size, size.to_string());
                }
            });
        if rows != state.pagination.rows_per_page {
            state.pagination.set_rows_per_page(rows);
        }
    });
}
