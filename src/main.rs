mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::anyhow;
use app::DineNearApp;
use config::Config;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::load()?;
    log::info!(
        "Reference point {} at ({}, {}), source {}",
        config.ref_label,
        config.ref_lat,
        config.ref_lon,
        config.source
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dine Near – 회식 장소 모음",
        options,
        Box::new(move |cc| {
            install_korean_font(&cc.egui_ctx);
            Ok(Box::new(DineNearApp::new(&config)))
        }),
    )
    .map_err(|e| anyhow!("failed to start UI: {e}"))
}

/// egui's bundled fonts have no Hangul; use a system font when one is found.
fn install_korean_font(ctx: &egui::Context) {
    const CANDIDATES: [&str; 4] = [
        "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
        "/System/Library/Fonts/AppleSDGothicNeo.ttc",
        "C:\\Windows\\Fonts\\malgun.ttf",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    ];

    let Some(bytes) = CANDIDATES.iter().find_map(|p| std::fs::read(p).ok()) else {
        log::warn!("No Korean font found; Hangul labels may not render");
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(
        "korean".to_owned(),
        std::sync::Arc::new(egui::FontData::from_owned(bytes)),
    );
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push("korean".to_owned());
    }
    ctx.set_fonts(fonts);
}
