//! Report generation bar: file picker plus the simulated progress
//! indicator.

use std::time::Instant;

use egui::RichText;

use crate::types::AppState;

pub fn show(s: &mut AppState, ctx: &egui::Context, now: Instant) {
    egui::TopBottomPanel::bottom("report_bar").show(ctx, |ui| {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new("Generate report:").strong());

            // Picking a file starts generation immediately.
            let picking_enabled = !s.report_in_flight;
            let pick = ui.add_enabled(picking_enabled, egui::Button::new("Choose file…"));
            if pick.clicked() {
                if let Some(path) = rfd::FileDialog::new().pick_file() {
                    s.pick_report_file(&path, now);
                }
            }
            ui.label(RichText::new(&s.report_file_label).weak());

            if s.report_progress.is_active() || s.report_progress.value() > 0 {
                ui.add(
                    egui::ProgressBar::new(f32::from(s.report_progress.value()) / 100.0)
                        .desired_width(180.0)
                        .show_percentage(),
                );
            }
        });
        ui.add_space(4.0);
    });
}
