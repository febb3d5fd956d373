//! Parameter panel drawn over the water with egui.

use crate::params::{ranges, ParamRange, Rgb, WaterParams};

/// Range and step apply to user edits only; preset values outside the range
/// and fractional iteration counts are shown as-is until dragged.
fn slider(ui: &mut egui::Ui, value: &mut f32, range: ParamRange, label: &str) -> bool {
    ui.add(
        egui::Slider::new(value, range.as_inclusive())
            .step_by(range.step as f64)
            .clamping(egui::SliderClamping::Edits)
            .text(label),
    )
    .changed()
}

fn color_row(ui: &mut egui::Ui, color: &mut Rgb, label: &str) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        let mut rgb = color.to_array();
        let changed = ui.color_edit_button_rgb(&mut rgb).changed();
        if changed {
            *color = Rgb::from_array(rgb);
        }
        ui.monospace(color.to_hex());
        changed
    })
    .inner
}

/// Draw the panel, writing slider edits straight into `params`
///
/// Returns true when any value changed this frame.
pub fn draw(ctx: &egui::Context, params: &mut WaterParams) -> bool {
    let mut changed = false;

    egui::Window::new("Water")
        .default_pos([10.0, 10.0])
        .default_width(280.0)
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading("Big waves");
            ui.separator();
            changed |= slider(ui, &mut params.big_wave_elevation, ranges::BIG_WAVE_ELEVATION, "Elevation");
            changed |= slider(ui, &mut params.big_wave_frequency[0], ranges::BIG_WAVE_FREQUENCY, "Frequency X");
            changed |= slider(ui, &mut params.big_wave_frequency[1], ranges::BIG_WAVE_FREQUENCY, "Frequency Z");
            changed |= slider(ui, &mut params.big_wave_speed, ranges::BIG_WAVE_SPEED, "Speed");

            ui.separator();
            ui.heading("Small waves");
            ui.separator();
            changed |= slider(ui, &mut params.small_wave_elevation, ranges::SMALL_WAVE_ELEVATION, "Elevation");
            changed |= slider(ui, &mut params.small_wave_frequency, ranges::SMALL_WAVE_FREQUENCY, "Frequency");
            changed |= slider(ui, &mut params.small_wave_speed, ranges::SMALL_WAVE_SPEED, "Speed");
            changed |= slider(ui, &mut params.small_wave_iterations, ranges::SMALL_WAVE_ITERATIONS, "Iterations");

            ui.separator();
            ui.heading("Color");
            ui.separator();
            changed |= color_row(ui, &mut params.depth_color, "Depth:");
            changed |= color_row(ui, &mut params.surface_color, "Surface:");
            changed |= slider(ui, &mut params.color_offset, ranges::COLOR_OFFSET, "Offset");
            changed |= slider(ui, &mut params.color_multiplier, ranges::COLOR_MULTIPLIER, "Multiplier");

            ui.separator();
            if ui.button("Reset").clicked() {
                *params = WaterParams::default();
                changed = true;
            }
        });

    if changed {
        log::debug!("Water params changed: {:?}", params);
    }
    changed
}
