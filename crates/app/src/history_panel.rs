//! History side panel: per-session filter, delete, and export.

use egui::RichText;

use crate::types::AppState;

pub fn show(s: &mut AppState, ctx: &egui::Context) {
    if !s.history_open {
        return;
    }

    let panel = egui::SidePanel::left("history_panel")
        .resizable(false)
        .default_width(330.0)
        .show(ctx, |ui| {
            ui.add_space(6.0);
            ui.heading("Chat History");
            ui.add_space(4.0);

            let selected_label = s
                .selected_session
                .as_ref()
                .map(|name| format!("Session {}", name))
                .unwrap_or_else(|| "Select a session".to_string());
            let session_names = s.session_names.clone();
            egui::ComboBox::from_id_source("session_select")
                .selected_text(selected_label)
                .show_ui(ui, |ui| {
                    for name in session_names {
                        let label = format!("Session {}", name);
                        ui.selectable_value(&mut s.selected_session, Some(name), label);
                    }
                });

            ui.horizontal(|ui| {
                if ui.button("Filter").clicked() {
                    s.filter_history();
                }
                if ui.button("Delete").clicked() {
                    s.request_delete_session();
                }
                // Export is disabled entirely while logged out.
                let export = ui.add_enabled(s.session.is_logged_in, egui::Button::new("Export"));
                if export.clicked() {
                    s.export_history();
                }
            });

            ui.separator();

            if s.history_rx.is_some() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(RichText::new("Loading…").weak());
                });
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if s.history_records.is_empty() && s.history_rx.is_none() {
                        ui.label(RichText::new("No chat history yet.").weak());
                    }
                    for record in &s.history_records {
                        ui.group(|ui| {
                            ui.label(
                                RichText::new(format!("Session: {}", record.session_label()))
                                    .strong(),
                            );
                            ui.label(format!("Message: {}", record.message));
                            ui.label(format!("Response: {}", record.response));
                            ui.label(RichText::new(&record.timestamp).weak().small());
                        });
                        ui.add_space(4.0);
                    }
                });
        });

    // Clicking anywhere outside the panel closes it. The toggle
    // button is exempt so it does not close-then-reopen.
    if s.history_button_clicked {
        return;
    }
    let clicked = ctx.input(|i| i.pointer.any_click());
    if clicked {
        if let Some(pos) = ctx.input(|i| i.pointer.interact_pos()) {
            if !panel.response.rect.contains(pos) {
                s.close_history();
            }
        }
    }
}
