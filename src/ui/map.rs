use eframe::egui::Ui;
use egui_plot::{MarkerShape, Plot, PlotPoints, Points};

use crate::color::REFERENCE_COLOR;
use crate::data::map::{hover_text, markers, series_name, view_bounds};
use crate::state::AppState;

/// Plot series name of the reference marker.
const REFERENCE_SERIES: &str = "reference";

/// Extra room around the pins, in degrees.
const MARGIN_DEG: f64 = 0.003;

// ---------------------------------------------------------------------------
// Restaurant map (central panel)
// ---------------------------------------------------------------------------

/// Render the visible restaurants as pins around the reference point.
/// x is longitude, y is latitude.
pub fn restaurant_map(ui: &mut Ui, state: &AppState) {
    let pins = markers(&state.visible);
    let bounds = view_bounds(&state.visible, &state.reference);
    let reference = &state.reference;

    if state.visible.is_empty() {
        ui.colored_label(
            ui.visuals().warn_fg_color,
            "선택하신 조건에 맞는 식당이 없습니다. 필터를 조정해주세요.",
        );
    }

    let hover_pins = pins.clone();
    let reference_label = reference.label.clone();

    // Screen width of one degree of longitude relative to one of latitude.
    let aspect = bounds.center.lat.to_radians().cos().max(0.1) as f32;

    Plot::new("restaurant_map")
        .data_aspect(aspect)
        .x_axis_label("경도")
        .y_axis_label("위도")
        .include_x(bounds.min.lon.min(reference.point.lon) - MARGIN_DEG)
        .include_x(bounds.max.lon.max(reference.point.lon) + MARGIN_DEG)
        .include_y(bounds.min.lat.min(reference.point.lat) - MARGIN_DEG)
        .include_y(bounds.max.lat.max(reference.point.lat) + MARGIN_DEG)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(move |name, _value| match name {
            REFERENCE_SERIES => reference_label.clone(),
            _ => hover_text(&hover_pins, name).unwrap_or_default(),
        })
        .show(ui, |plot_ui| {
            for (i, (pin, record)) in pins.iter().zip(&state.visible.records).enumerate() {
                let color = state.color_map.color_for(record.cuisine_type.as_deref());
                let points = Points::new(PlotPoints::new(vec![[
                    pin.position.lon,
                    pin.position.lat,
                ]]))
                .name(series_name(i))
                .color(color)
                .shape(MarkerShape::Circle)
                .filled(true)
                .radius(5.0);
                plot_ui.points(points);
            }

            let school = Points::new(PlotPoints::new(vec![[
                reference.point.lon,
                reference.point.lat,
            ]]))
            .name(REFERENCE_SERIES)
            .color(REFERENCE_COLOR)
            .shape(MarkerShape::Diamond)
            .filled(true)
            .radius(8.0);
            plot_ui.points(school);
        });
}
