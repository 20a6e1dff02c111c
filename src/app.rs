use std::time::Instant;

use eframe::egui;

use crate::config::Config;
use crate::state::{AppState, Status};
use crate::ui::{map, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DineNearApp {
    pub state: AppState,
}

impl DineNearApp {
    /// Build the app and perform the first (blocking) load.
    pub fn new(config: &Config) -> Self {
        let mut state = AppState::new(config);
        state.load(Instant::now());
        Self { state }
    }
}

impl eframe::App for DineNearApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Serve from cache, or refetch once the TTL has lapsed.
        if self.state.table.is_some() {
            self.state.load(Instant::now());
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Right side panel: info, filters and sort ----
        egui::SidePanel::right("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: restaurant list ----
        if self.state.table.is_some() {
            egui::TopBottomPanel::bottom("restaurant_list")
                .resizable(true)
                .default_height(260.0)
                .show(ctx, |ui| {
                    table::restaurant_table(ui, &self.state);
                });
        }

        // ---- Central panel: map, or the reason there is none ----
        egui::CentralPanel::default().show(ctx, |ui| match &self.state.status {
            Some(Status::Empty(msg)) => {
                ui.centered_and_justified(|ui| {
                    ui.label(msg);
                });
            }
            Some(Status::Error(msg)) => {
                ui.centered_and_justified(|ui| {
                    ui.colored_label(egui::Color32::RED, msg);
                });
            }
            None => map::restaurant_map(ui, &self.state),
        });
    }
}
