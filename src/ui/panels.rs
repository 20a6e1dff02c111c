use std::time::Instant;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::REFERENCE_COLOR;
use crate::data::filter::FILTER_COLUMNS;
use crate::data::model::Column;
use crate::data::sort::{SortPreset, ViewMode};
use crate::state::{AppState, Status};

// ---------------------------------------------------------------------------
// Side panel – info, filters, sort and quick modes
// ---------------------------------------------------------------------------

/// Render the filter/sort panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    info_box(ui, state);
    ui.separator();

    ui.heading("필터링 및 정렬");
    ui.separator();

    let Some(table) = state.table.clone() else {
        ui.label("불러온 데이터가 없습니다.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Quick modes ----
            ui.strong("나에게 맞는 식당 찾기");
            ui.horizontal(|ui: &mut Ui| {
                for mode in [ViewMode::ParkingEasy, ViewMode::NearestFirst] {
                    if ui.selectable_label(state.mode == mode, mode.label()).clicked() {
                        state.set_mode(mode);
                    }
                }
            });
            if ui.button(ViewMode::All.label()).clicked() {
                state.reset();
            }
            ui.separator();

            // ---- Sort selector ----
            ui.strong("정렬 기준");
            let mut preset = state.sort_preset;
            ui.add_enabled_ui(state.mode == ViewMode::All, |ui: &mut Ui| {
                egui::ComboBox::from_id_salt("sort_preset")
                    .selected_text(preset.label())
                    .show_ui(ui, |ui: &mut Ui| {
                        for option in SortPreset::ALL {
                            ui.selectable_value(&mut preset, option, option.label());
                        }
                    });
            });
            if preset != state.sort_preset {
                state.set_sort_preset(preset);
            }
            ui.separator();

            // ---- Per-column filter widgets (collapsible) ----
            let mut toggled: Vec<(Column, String)> = Vec::new();
            let mut cleared: Vec<Column> = Vec::new();

            for col in FILTER_COLUMNS {
                if !table.has_column(col) {
                    ui.colored_label(
                        ui.visuals().warn_fg_color,
                        format!("CSV 파일에 '{}' 컬럼이 없습니다.", col.label()),
                    );
                    continue;
                }

                let all_values = table.unique_values(col);
                let selected = state.criteria.get(&col);
                let n_selected = selected.map_or(0, |s| s.len());
                let header_text = if n_selected == 0 {
                    format!("{}  (전체)", col.label())
                } else {
                    format!("{}  ({n_selected}/{})", col.label(), all_values.len())
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col.name())
                    .default_open(col == Column::CuisineType)
                    .show(ui, |ui: &mut Ui| {
                        if ui.small_button("전체").clicked() {
                            cleared.push(col);
                        }
                        for value in &all_values {
                            let mut checked = selected.is_some_and(|s| s.contains(value));
                            let mut text = RichText::new(value);
                            if col == Column::CuisineType {
                                text = text.color(state.color_map.color_for(Some(value.as_str())));
                            }
                            if ui.checkbox(&mut checked, text).changed() {
                                toggled.push((col, value.clone()));
                            }
                        }
                    });
            }

            // ---- Pin colours ----
            ui.separator();
            ui.strong("지도 색상 (음식종류)");
            for (value, color) in state.color_map.legend_entries() {
                ui.label(RichText::new(format!("● {value}")).color(color));
            }
            ui.label(RichText::new(format!("◆ {}", state.reference.label)).color(REFERENCE_COLOR));

            for col in cleared {
                state.clear_filter(col);
            }
            for (col, value) in toggled {
                state.toggle_filter_value(col, &value);
            }
        });
}

fn info_box(ui: &mut Ui, state: &AppState) {
    ui.heading("데이터 정보");
    let hours = state.cache_ttl().as_secs() / 3600;
    ui.label(format!("이 앱의 데이터는 매 {hours}시간마다 자동으로 업데이트됩니다."));
    if let Some(url) = &state.edit_url {
        ui.hyperlink_to("구글 시트 원본 바로 가기", url);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open CSV…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload(Instant::now());
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} restaurants loaded, {} visible",
                table.len(),
                state.visible.len()
            ));
        }

        if let Some(warning) = &state.sort_warning {
            ui.separator();
            ui.colored_label(ui.visuals().warn_fg_color, warning.to_string());
        }

        if let Some(Status::Error(msg)) = &state.status {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open restaurant sheet")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.open_file(path, Instant::now());
    }
}
