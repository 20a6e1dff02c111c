use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Restaurant list (bottom panel)
// ---------------------------------------------------------------------------

/// Render the filtered, sorted restaurant list.
pub fn restaurant_table(ui: &mut Ui, state: &AppState) {
    ui.heading("식당 목록");

    let table = &state.visible;
    if table.is_empty() {
        ui.label("필터링 조건에 맞는 식당이 없습니다.");
        return;
    }

    let columns = table.display_columns();
    let mut builder = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center));
    for _ in &columns {
        builder = builder.column(TableColumn::auto().at_least(60.0).clip(true));
    }

    builder
        .header(22.0, |mut header| {
            for col in &columns {
                header.col(|ui| {
                    ui.strong(col.label());
                });
            }
        })
        .body(|body| {
            body.rows(20.0, table.len(), |mut row| {
                let record = &table.records[row.index()];
                for col in &columns {
                    row.col(|ui| {
                        ui.label(record.display(*col));
                    });
                }
            });
        });
}
